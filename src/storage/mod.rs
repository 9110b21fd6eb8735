pub mod dropbox;

pub use dropbox::DropboxStorage;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// One file or folder record from a remote directory listing. Entries belong
/// to the listing call that produced them; a fresh listing replaces them all.
#[derive(Debug, Clone)]
pub struct RemoteEntry {
    pub name: String,
    /// Structured modification time, when the provider exposes one. The
    /// 12-hour text rendering below cannot carry the meridiem, so this field
    /// is authoritative wherever it is set.
    pub modified: Option<DateTime<Utc>>,
    /// The provider's textual rendering of the entry's metadata,
    /// e.g. `File("/a/b.jpg", numBytes=0, ..., lastModified="2014/05/27 10:27:28 UTC", ...)`.
    pub raw_metadata: String,
}

/// The narrow surface this tool needs from a remote storage provider.
/// Everything behind it is an opaque service; one blocking call per operation.
pub trait StorageClient {
    /// Display name of the linked account. Used solely to probe whether the
    /// access token is still honored.
    fn account_display_name(&self) -> Result<String, StorageError>;

    fn list_directory(&self, path: &str) -> Result<Vec<RemoteEntry>, StorageError>;

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    fn upload_file(&self, path: &str, contents: Vec<u8>) -> Result<(), StorageError>;

    fn create_share_link(&self, path: &str) -> Result<String, StorageError>;
}

#[derive(Debug, Error)]
pub enum StorageError {
    /// The provider cannot tell an empty folder from a missing one.
    #[error("{0} is possibly empty or does not exist")]
    NotFound(String),

    #[error("remote call failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server rejected the request: {0}")]
    Rejected(String),
}
