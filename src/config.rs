use super::Result;
use anyhow::Context;
use std::path::Path;
use tracing::debug;

/// Developer-account credentials for the storage application, expected next to
/// the binary's working directory as simple `KEY=VALUE` lines.
pub const CREDENTIALS_FILE_NAME: &str = "cirrus.properties";

#[derive(Debug, Clone)]
pub struct AppCredentials {
    pub app_key: String,
    pub app_secret: String,
}

pub fn load_app_credentials() -> Result<AppCredentials> {
    load_from(Path::new(CREDENTIALS_FILE_NAME))
}

fn load_from(path: &Path) -> Result<AppCredentials> {
    let contents = std::fs::read_to_string(path).with_context(|| {
        format!(
            "Reading application credentials from {}. Create the file with APP_KEY and APP_SECRET lines",
            path.display()
        )
    })?;

    let app_key = lookup_property(&contents, "APP_KEY");
    let app_secret = lookup_property(&contents, "APP_SECRET");

    match (app_key, app_secret) {
        (Some(app_key), Some(app_secret)) => {
            debug!("loaded application credentials from {}", path.display());
            Ok(AppCredentials {
                app_key,
                app_secret,
            })
        }
        _ => anyhow::bail!(
            "{} must define both APP_KEY and APP_SECRET",
            path.display()
        ),
    }
}

fn lookup_property(contents: &str, key: &str) -> Option<String> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .find_map(|line| {
            let (name, value) = line.split_once('=')?;
            if name.trim() == key {
                Some(value.trim().to_owned())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty())
}
