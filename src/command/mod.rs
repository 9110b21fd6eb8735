pub mod get;
pub mod list;
pub mod put;

use super::Result;
use crate::storage::{RemoteEntry, StorageClient, StorageError};
use anyhow::bail;

/// Fetches a directory listing. The provider cannot distinguish a missing
/// folder from an empty one, so both surface the same way to the user.
fn fetch_listing(client: &impl StorageClient, remote_path: &str) -> Result<Vec<RemoteEntry>> {
    let entries = client.list_directory(remote_path)?;
    if entries.is_empty() {
        bail!("{}", StorageError::NotFound(remote_path.to_owned()));
    }
    Ok(entries)
}

/// Joins a normalized remote directory with a file name. Normalization
/// guarantees `dir` has no trailing slash except when it is the root itself.
fn join_remote(dir: &str, file_name: &str) -> String {
    if dir == "/" {
        format!("/{}", file_name)
    } else {
        format!("{}/{}", dir, file_name)
    }
}
