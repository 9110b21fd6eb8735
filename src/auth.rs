use super::Result;
use crate::config::AppCredentials;
use crate::storage::{dropbox, DropboxStorage, StorageClient};
use anyhow::Context;
use dialoguer::Input;
use std::io::ErrorKind;
use std::path::PathBuf;
use tracing::{info, warn};

/// Location of the access token linking a storage account with this app,
/// relative to the working directory.
pub const TOKEN_FILE_NAME: &str = "cirrus-token.txt";

/// On-disk store for the long-lived access token. The file is overwritten on
/// every successful authorization and never deleted when a token goes stale.
pub struct TokenStore {
    path: PathBuf,
}

impl Default for TokenStore {
    fn default() -> Self {
        Self::new(TOKEN_FILE_NAME)
    }
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file is not an error, it just means no token was cached yet.
    /// An existing file yields its first non-blank line, trimmed; a file with
    /// nothing but blank lines counts as absent too.
    pub fn load(&self) -> Result<Option<String>> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(
                    "no cached token at {}, a new one must be requested",
                    self.path.display()
                );
                return Ok(None);
            }
            Err(e) => {
                return Err(e).context(format!("Reading token file {}", self.path.display()))
            }
        };

        Ok(contents
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_owned))
    }

    pub fn save(&self, token: &str) -> Result<()> {
        std::fs::write(&self.path, token)
            .with_context(|| format!("Storing token in {}", self.path.display()))?;
        info!("stored token in {} for future runs", self.path.display());
        Ok(())
    }
}

/// Produces a client whose token the provider has actually honored. A cached
/// token that fails its probe triggers exactly one interactive
/// re-authorization; if the fresh token is rejected too, that is fatal.
pub fn establish_session(
    credentials: &AppCredentials,
    store: &TokenStore,
) -> Result<DropboxStorage> {
    let token = match store.load()? {
        Some(token) => token,
        None => request_new_token(credentials, store)?,
    };

    let client = DropboxStorage::new(token);
    match client.account_display_name() {
        Ok(account) => {
            println!("Linked account: {}", account);
            Ok(client)
        }
        Err(e) => {
            warn!("stored token was not accepted ({}), requesting a new one", e);
            let client = DropboxStorage::new(request_new_token(credentials, store)?);
            let account = client
                .account_display_name()
                .context("Freshly authorized token was rejected as well")?;
            println!("Linked account: {}", account);
            Ok(client)
        }
    }
}

/// One-time interactive flow: the account owner visits the authorization URL,
/// allows the app, and pastes the resulting code back here.
fn request_new_token(credentials: &AppCredentials, store: &TokenStore) -> Result<String> {
    println!("1. Go to: {}", dropbox::authorization_url(&credentials.app_key));
    println!("2. Click \"Allow\" (you might have to log in first).");
    println!("3. Copy the authorization code and paste it below.");

    let code: String = Input::new()
        .with_prompt("Authorization code")
        .interact()
        .context("Reading the authorization code")?;

    let token = dropbox::exchange_code(
        &credentials.app_key,
        &credentials.app_secret,
        code.trim(),
    )
    .context("Exchanging the authorization code for a token")?;

    store.save(&token)?;
    Ok(token)
}
