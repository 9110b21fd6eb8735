use crate::storage::RemoteEntry;
use chrono::{DateTime, NaiveDateTime, TimeZone, Timelike, Utc};
use thiserror::Error;
use tracing::debug;

/// The exact metadata key holding an entry's modification time.
pub const MODIFIED_KEY: &str = "lastModified";

/// A name-keyed view over one directory listing. Rebuilt wholesale from each
/// listing call; entries keep the order the provider returned them in, which
/// makes latest-file tie-breaking deterministic.
#[derive(Debug)]
pub struct DirectoryIndex {
    entries: Vec<RemoteEntry>,
}

impl DirectoryIndex {
    /// Duplicate names are not expected from the provider, but must not break
    /// the build: the last entry wins, replacing the earlier one in place.
    pub fn build(entries: Vec<RemoteEntry>) -> Self {
        let mut index: Vec<RemoteEntry> = Vec::with_capacity(entries.len());
        for entry in entries {
            match index.iter_mut().find(|seen| seen.name == entry.name) {
                Some(seen) => *seen = entry,
                None => index.push(entry),
            }
        }
        Self { entries: index }
    }

    /// Name of the most recently modified entry, or `None` when the index is
    /// empty or no entry carries a usable modification time. Entries without
    /// one are skipped, not fatal. The scan starts from the Unix epoch and
    /// keeps the first entry seen at the maximum time.
    pub fn latest(&self) -> Option<&str> {
        let mut max_seen = Utc.timestamp(0, 0);
        let mut latest = None;

        for entry in &self.entries {
            match modification_time(entry) {
                Some(modified) if modified > max_seen => {
                    max_seen = modified;
                    latest = Some(entry.name.as_str());
                }
                _ => {}
            }
        }

        if let Some(name) = latest {
            debug!("latest file: {} modified {}", name, max_seen);
        }
        latest
    }
}

/// An entry's structured timestamp is authoritative when the provider set
/// one; text-only sources fall back to parsing the raw metadata.
fn modification_time(entry: &RemoteEntry) -> Option<DateTime<Utc>> {
    if let Some(modified) = entry.modified {
        return Some(modified);
    }
    match parse_modification_time(&entry.raw_metadata) {
        Ok(modified) => Some(modified),
        Err(e) => {
            debug!("{}: no usable modification time ({})", entry.name, e);
            None
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum MetadataError {
    #[error("metadata has no {0:?} key")]
    MissingKey(&'static str),

    #[error("unrecognized timestamp {0:?}")]
    BadTimestamp(String),
}

/// Extracts and parses the `lastModified` value out of an entry's raw metadata
/// text, e.g. `lastModified="2014/05/27 10:27:28 UTC"` somewhere in a
/// comma-delimited rendering.
///
/// The value uses a 12-hour clock with no AM/PM marker, the way the provider
/// renders it: hour 12 denotes the first hour of the day, and an hour outside
/// 1-12 (or a zone other than UTC) means the format assumption no longer
/// holds, so it is a parse failure rather than a guess.
pub fn parse_modification_time(raw_metadata: &str) -> Result<DateTime<Utc>, MetadataError> {
    let value = lookup_quoted_value(raw_metadata, MODIFIED_KEY)
        .ok_or(MetadataError::MissingKey(MODIFIED_KEY))?;

    let bad_timestamp = || MetadataError::BadTimestamp(value.to_owned());

    let clock = value.strip_suffix(" UTC").ok_or_else(bad_timestamp)?;
    let parsed = NaiveDateTime::parse_from_str(clock, "%Y/%m/%d %H:%M:%S")
        .map_err(|_| bad_timestamp())?;

    let hour = match parsed.hour() {
        12 => 0,
        hour @ 1..=11 => hour,
        _ => return Err(bad_timestamp()),
    };

    let resolved = parsed.with_hour(hour).ok_or_else(bad_timestamp)?;
    Ok(Utc.from_utc_datetime(&resolved))
}

/// Exact-match lookup of `key="value"` within comma-delimited metadata text.
fn lookup_quoted_value<'a>(metadata: &'a str, key: &str) -> Option<&'a str> {
    let marker = format!("{}=\"", key);
    metadata.split(',').find_map(|segment| {
        let rest = segment.trim_start().strip_prefix(marker.as_str())?;
        let end = rest.find('"')?;
        Some(&rest[..end])
    })
}
