use super::*;
use crate::cli::ListArgs;

#[derive(Debug, Clone, Copy)]
pub enum Detail {
    NamesOnly,
    WithMetadata,
}

/// Prints the entries of a remote directory, 1-indexed, optionally with each
/// entry's full metadata text appended.
pub fn execute(client: &impl StorageClient, args: &ListArgs, detail: Detail) -> Result<()> {
    let entries = fetch_listing(client, &args.remote_path)?;

    for (position, entry) in entries.iter().enumerate() {
        match detail {
            Detail::NamesOnly => println!("[{}] {}", position + 1, entry.name),
            Detail::WithMetadata => {
                println!("[{}] {}: {}", position + 1, entry.name, entry.raw_metadata)
            }
        }
    }

    Ok(())
}
