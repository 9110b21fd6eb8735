use std::path::PathBuf;
use structopt::StructOpt;
use tracing::warn;

pub fn parse_args() -> Command {
    Command::from_args()
}

/// The closed set of supported actions. Each variant carries exactly the
/// arguments that action needs, so an impossible combination cannot be built.
#[derive(Debug, StructOpt)]
#[structopt(
    name = "cirrus",
    about = "A simple cloud-storage client.\nWorks great as part of an automated system, to interact with a storage account.\nThe target account must authorize the application once: run any action and follow the instructions to paste an access code."
)]
pub enum Command {
    /// Lists file and folder names in a remote path
    #[structopt(name = "listfiles")]
    ListFiles(ListArgs),
    /// Like ls -l for your storage account. Warning: verbose output
    #[structopt(name = "listdetails")]
    ListDetails(ListArgs),
    /// Downloads a file, or whatever file is newest in the remote path
    #[structopt(name = "download")]
    Download(DownloadArgs),
    /// Uploads a file and prints a shareable URL to it
    #[structopt(name = "uploadandshare")]
    UploadAndShare(UploadArgs),
    /// Reserved for reclaiming space by removing stale files
    #[structopt(name = "deleteoldestfiles")]
    DeleteOldestFiles(ListArgs),
}

#[derive(Debug, StructOpt)]
pub struct ListArgs {
    /// Remote directory to query, e.g. /a/b/c
    #[structopt(parse(from_str = normalize_remote_path))]
    pub remote_path: String,
}

#[derive(Debug, StructOpt)]
pub struct DownloadArgs {
    /// Remote directory holding the file
    #[structopt(parse(from_str = normalize_remote_path))]
    pub remote_path: String,
    /// Exact file name to download; omit it (or pass "latest") to pick
    /// the most recently modified file in the remote directory
    pub file_name: Option<String>,
}

#[derive(Debug, StructOpt)]
pub struct UploadArgs {
    /// Remote directory to upload into
    #[structopt(parse(from_str = normalize_remote_path))]
    pub remote_path: String,
    /// Local file to upload
    #[structopt(parse(from_os_str))]
    pub local_file: PathBuf,
}

/// Remote paths must start with "/" and must not end with "/" (the root path
/// "/" being the one exception). Corrects bad paths instead of rejecting them.
pub fn normalize_remote_path(path: &str) -> String {
    let mut path = if path.starts_with('/') {
        path.to_owned()
    } else {
        warn!("path {:?} does not start with /, corrected it", path);
        format!("/{}", path)
    };

    while path.len() > 1 && path.ends_with('/') {
        warn!("path {:?} ends with /, corrected it", path);
        path.pop();
    }

    path
}
