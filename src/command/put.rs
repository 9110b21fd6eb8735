use super::*;
use crate::cli::UploadArgs;
use anyhow::{anyhow, Context};
use std::path::Path;

/// Where the shareable URL is persisted, relative to the working directory.
/// Overwritten on every run.
const SHARE_URL_FILE_NAME: &str = "shareurl.txt";

pub fn execute(client: &impl StorageClient, args: &UploadArgs) -> Result<()> {
    run(client, args, Path::new("."))
}

fn run(client: &impl StorageClient, args: &UploadArgs, work_dir: &Path) -> Result<()> {
    let file_name = args
        .local_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("{} does not name a file", args.local_file.display()))?;

    let contents = std::fs::read(&args.local_file)
        .with_context(|| format!("Reading local file {}", args.local_file.display()))?;

    let remote_file = join_remote(&args.remote_path, &file_name);
    println!("Uploading {} to {} ...", file_name, args.remote_path);
    client.upload_file(&remote_file, contents)?;

    let url = client.create_share_link(&remote_file)?;

    let share_file = work_dir.join(SHARE_URL_FILE_NAME);
    std::fs::write(&share_file, format!("shareurl={}", url))
        .with_context(|| format!("Storing link in {}", share_file.display()))?;
    println!("Storing link in file {}", share_file.display());
    println!("{}", url);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    #[test]
    fn uploads_the_file_and_persists_the_share_url() {
        let client = FixedStorage::with_listing(Vec::new());
        let dir = tempfile::tempdir().unwrap();

        let local_file = dir.path().join("release.zip");
        std::fs::write(&local_file, b"payload").unwrap();

        let args = UploadArgs {
            remote_path: "/drops".to_owned(),
            local_file,
        };
        run(&client, &args, dir.path()).unwrap();

        let uploads = client.uploads.borrow();
        assert_eq!(uploads.len(), 1);
        assert_eq!(uploads[0].0, "/drops/release.zip");
        assert_eq!(uploads[0].1, b"payload");

        let share_file = std::fs::read_to_string(dir.path().join(SHARE_URL_FILE_NAME)).unwrap();
        assert_eq!(share_file, format!("shareurl={}", client.share_url));
    }

    #[test]
    fn share_url_file_is_overwritten_each_run() {
        let client = FixedStorage::with_listing(Vec::new());
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(SHARE_URL_FILE_NAME), "shareurl=stale").unwrap();

        let local_file = dir.path().join("release.zip");
        std::fs::write(&local_file, b"payload").unwrap();

        let args = UploadArgs {
            remote_path: "/".to_owned(),
            local_file,
        };
        run(&client, &args, dir.path()).unwrap();

        let share_file = std::fs::read_to_string(dir.path().join(SHARE_URL_FILE_NAME)).unwrap();
        assert_eq!(share_file, format!("shareurl={}", client.share_url));
        assert_eq!(client.uploads.borrow()[0].0, "/release.zip");
    }

    #[test]
    fn missing_local_file_is_a_readable_error() {
        let client = FixedStorage::with_listing(Vec::new());
        let dir = tempfile::tempdir().unwrap();

        let args = UploadArgs {
            remote_path: "/drops".to_owned(),
            local_file: dir.path().join("not-here.zip"),
        };
        let err = run(&client, &args, dir.path()).unwrap_err();
        assert!(err.to_string().contains("not-here.zip"));
    }
}
