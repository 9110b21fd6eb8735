use super::*;
use crate::cli::DownloadArgs;
use crate::listing::DirectoryIndex;
use anyhow::{anyhow, Context};
use bytesize::ByteSize;
use std::path::Path;
use tracing::debug;

pub fn execute(client: &impl StorageClient, args: &DownloadArgs) -> Result<()> {
    run(client, args, Path::new("."))
}

/// Resolves which file to fetch, downloads it, and writes it under the same
/// name into `dest_dir` (the working directory in normal runs).
fn run(client: &impl StorageClient, args: &DownloadArgs, dest_dir: &Path) -> Result<()> {
    let entries = fetch_listing(client, &args.remote_path)?;
    let index = DirectoryIndex::build(entries);

    let file_name = match &args.file_name {
        Some(name) if !name.eq_ignore_ascii_case("latest") => name.clone(),
        // No name, or the "latest" keyword: pick the newest file in the path.
        _ => index
            .latest()
            .map(str::to_owned)
            .ok_or_else(|| {
                anyhow!(
                    "no file in {} has a usable modification time",
                    args.remote_path
                )
            })?,
    };

    let remote_file = join_remote(&args.remote_path, &file_name);
    debug!("downloading {}", remote_file);
    let contents = client.fetch_file(&remote_file)?;

    let destination = dest_dir.join(&file_name);
    std::fs::write(&destination, &contents)
        .with_context(|| format!("Writing {}", destination.display()))?;

    println!(
        "Downloaded {} ({})",
        file_name,
        ByteSize::b(contents.len() as u64)
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;

    fn download_args(remote_path: &str, file_name: Option<&str>) -> DownloadArgs {
        DownloadArgs {
            remote_path: remote_path.to_owned(),
            file_name: file_name.map(str::to_owned),
        }
    }

    fn three_file_client() -> FixedStorage {
        FixedStorage::with_listing(vec![
            file_entry("jan.bin", "2020/01/15 09:00:00 UTC"),
            file_entry("mar.bin", "2020/03/15 09:00:00 UTC"),
            file_entry("feb.bin", "2020/02/15 09:00:00 UTC"),
        ])
        .with_file("/store/jan.bin", b"january")
        .with_file("/store/mar.bin", b"march")
        .with_file("/store/feb.bin", b"february")
    }

    #[test]
    fn latest_keyword_fetches_the_newest_file() {
        let client = three_file_client();
        let dir = tempfile::tempdir().unwrap();

        run(&client, &download_args("/store", Some("latest")), dir.path()).unwrap();

        let written = std::fs::read(dir.path().join("mar.bin")).unwrap();
        assert_eq!(written, b"march");
        assert!(!dir.path().join("jan.bin").exists());
    }

    #[test]
    fn latest_keyword_is_case_insensitive() {
        let client = three_file_client();
        let dir = tempfile::tempdir().unwrap();

        run(&client, &download_args("/store", Some("LATEST")), dir.path()).unwrap();
        assert!(dir.path().join("mar.bin").exists());
    }

    #[test]
    fn omitted_file_name_defaults_to_the_newest_file() {
        let client = three_file_client();
        let dir = tempfile::tempdir().unwrap();

        run(&client, &download_args("/store", None), dir.path()).unwrap();
        assert!(dir.path().join("mar.bin").exists());
    }

    #[test]
    fn explicit_file_name_is_fetched_verbatim() {
        let client = three_file_client();
        let dir = tempfile::tempdir().unwrap();

        run(&client, &download_args("/store", Some("jan.bin")), dir.path()).unwrap();

        let written = std::fs::read(dir.path().join("jan.bin")).unwrap();
        assert_eq!(written, b"january");
    }

    #[test]
    fn unresolvable_latest_is_an_error() {
        let folders_only = FixedStorage::with_listing(vec![RemoteEntry {
            name: "backups".to_owned(),
            modified: None,
            raw_metadata: r#"Folder("/store/backups")"#.to_owned(),
        }]);
        let dir = tempfile::tempdir().unwrap();

        let err = run(
            &folders_only,
            &download_args("/store", Some("latest")),
            dir.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("usable modification time"));
    }

    #[test]
    fn missing_remote_file_surfaces_as_not_found() {
        let client = three_file_client();
        let dir = tempfile::tempdir().unwrap();

        let err = run(
            &client,
            &download_args("/store", Some("nope.bin")),
            dir.path(),
        )
        .unwrap_err();
        assert!(err.to_string().contains("/store/nope.bin"));
    }
}
