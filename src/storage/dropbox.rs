use super::{RemoteEntry, StorageClient, StorageError};
use bytesize::ByteSize;
use chrono::{DateTime, Utc};
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use tracing::debug;

const API_BASE: &str = "https://api.dropboxapi.com/2";
const CONTENT_BASE: &str = "https://content.dropboxapi.com/2";
const AUTHORIZE_URL: &str = "https://www.dropbox.com/oauth2/authorize";
const TOKEN_URL: &str = "https://api.dropboxapi.com/oauth2/token";

/// Blocking HTTP client for a Dropbox-style storage API.
pub struct DropboxStorage {
    http: Client,
    token: String,
}

impl DropboxStorage {
    pub fn new(token: String) -> Self {
        Self {
            http: Client::new(),
            token,
        }
    }

    fn api_call(&self, endpoint: &str, body: serde_json::Value) -> Result<Response, StorageError> {
        let response = self
            .http
            .post(&format!("{}/{}", API_BASE, endpoint))
            .bearer_auth(&self.token)
            .json(&body)
            .send()?;
        Ok(response)
    }

    fn content_call(
        &self,
        endpoint: &str,
        arg: serde_json::Value,
        body: Vec<u8>,
    ) -> Result<Response, StorageError> {
        let response = self
            .http
            .post(&format!("{}/{}", CONTENT_BASE, endpoint))
            .bearer_auth(&self.token)
            .header("Dropbox-API-Arg", arg.to_string())
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(body)
            .send()?;
        Ok(response)
    }
}

impl StorageClient for DropboxStorage {
    fn account_display_name(&self) -> Result<String, StorageError> {
        let response = self.api_call("users/get_current_account", serde_json::Value::Null)?;
        let account: Account = expect_success(response)?.json()?;
        Ok(account.name.display_name)
    }

    fn list_directory(&self, path: &str) -> Result<Vec<RemoteEntry>, StorageError> {
        let response = self.api_call(
            "files/list_folder",
            serde_json::json!({ "path": api_path(path) }),
        )?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            // The API folds "no such folder" into a path conflict; callers
            // cannot tell it apart from an empty one.
            return Err(StorageError::NotFound(path.to_owned()));
        }

        let listing: Listing = expect_success(response)?.json()?;
        debug!("{} returned {} entries", path, listing.entries.len());

        Ok(listing.entries.iter().map(to_remote_entry).collect())
    }

    fn fetch_file(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let response = self.content_call(
            "files/download",
            serde_json::json!({ "path": path }),
            Vec::new(),
        )?;

        if response.status() == reqwest::StatusCode::CONFLICT {
            return Err(StorageError::NotFound(path.to_owned()));
        }

        let contents = expect_success(response)?.bytes()?;
        Ok(contents.to_vec())
    }

    fn upload_file(&self, path: &str, contents: Vec<u8>) -> Result<(), StorageError> {
        let response = self.content_call(
            "files/upload",
            serde_json::json!({ "path": path, "mode": "add", "autorename": false }),
            contents,
        )?;
        expect_success(response)?;
        Ok(())
    }

    fn create_share_link(&self, path: &str) -> Result<String, StorageError> {
        let response = self.api_call(
            "sharing/create_shared_link_with_settings",
            serde_json::json!({ "path": path }),
        )?;
        let link: SharedLink = expect_success(response)?.json()?;
        Ok(link.url)
    }
}

/// Builds the one-time authorization URL the account owner must visit.
pub fn authorization_url(app_key: &str) -> String {
    format!(
        "{}?client_id={}&response_type=code",
        AUTHORIZE_URL, app_key
    )
}

/// Exchanges a pasted authorization code for a long-lived access token.
pub fn exchange_code(
    app_key: &str,
    app_secret: &str,
    code: &str,
) -> Result<String, StorageError> {
    let response = Client::new()
        .post(TOKEN_URL)
        .form(&[
            ("code", code),
            ("grant_type", "authorization_code"),
            ("client_id", app_key),
            ("client_secret", app_secret),
        ])
        .send()?;

    let token: TokenResponse = expect_success(response)?.json()?;
    Ok(token.access_token)
}

fn expect_success(response: Response) -> Result<Response, StorageError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let summary = response
        .text()
        .unwrap_or_else(|_| "no response body".to_owned());
    Err(StorageError::Rejected(format!("{}: {}", status, summary)))
}

/// The API names the account root "", while our normalized paths call it "/".
fn api_path(path: &str) -> &str {
    if path == "/" {
        ""
    } else {
        path
    }
}

/// Carries the structured modification time through on files and renders the
/// comma-delimited metadata text form alongside it. The text clock is
/// 12-hour without a meridiem, so the typed field is what latest-file
/// selection trusts. Folders carry no modification time and never win.
fn to_remote_entry(entry: &ListingEntry) -> RemoteEntry {
    let modified = match entry.tag.as_str() {
        "file" => entry.server_modified,
        _ => None,
    };

    let raw_metadata = match (entry.tag.as_str(), modified) {
        ("file", Some(modified)) => format!(
            r#"File("{}", numBytes={}, humanSize="{}", lastModified="{}", rev="{}")"#,
            entry.path_display.as_deref().unwrap_or(&entry.name),
            entry.size.unwrap_or(0),
            ByteSize::b(entry.size.unwrap_or(0)).to_string_as(false),
            modified.format("%Y/%m/%d %I:%M:%S UTC"),
            entry.rev.as_deref().unwrap_or(""),
        ),
        _ => format!(
            r#"Folder("{}")"#,
            entry.path_display.as_deref().unwrap_or(&entry.name)
        ),
    };

    RemoteEntry {
        name: entry.name.clone(),
        modified,
        raw_metadata,
    }
}

#[derive(Debug, Deserialize)]
struct Account {
    name: AccountName,
}

#[derive(Debug, Deserialize)]
struct AccountName {
    display_name: String,
}

#[derive(Debug, Deserialize)]
struct Listing {
    entries: Vec<ListingEntry>,
}

#[derive(Debug, Deserialize)]
struct ListingEntry {
    #[serde(rename = ".tag")]
    tag: String,
    name: String,
    path_display: Option<String>,
    server_modified: Option<DateTime<Utc>>,
    size: Option<u64>,
    rev: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SharedLink {
    url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}
