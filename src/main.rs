mod auth;
mod cli;
mod command;
mod config;
mod listing;
mod storage;

use anyhow::bail;
use command::list::Detail;

type Result<T, E = anyhow::Error> = std::result::Result<T, E>;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let command = cli::parse_args();

    let credentials = config::load_app_credentials()?;
    let token_store = auth::TokenStore::default();
    let client = auth::establish_session(&credentials, &token_store)?;

    match command {
        cli::Command::ListFiles(list_args) => {
            command::list::execute(&client, &list_args, Detail::NamesOnly)?
        }
        cli::Command::ListDetails(list_args) => {
            command::list::execute(&client, &list_args, Detail::WithMetadata)?
        }
        cli::Command::Download(download_args) => command::get::execute(&client, &download_args)?,
        cli::Command::UploadAndShare(upload_args) => {
            command::put::execute(&client, &upload_args)?
        }
        // Known action with no behavior defined yet.
        cli::Command::DeleteOldestFiles(_) => {
            bail!("deleteoldestfiles is recognized but has no implementation yet")
        }
    }

    Ok(())
}
