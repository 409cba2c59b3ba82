//! DTOs for decoding directory listing responses.
//!
//! Single-record responses stay raw JSON; the domain resolvers normalise
//! them. Listings only need each entry's id.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(super) struct DirectoryEntryDto {
    pub(super) id: i64,
}

pub(super) fn into_ids(entries: Vec<DirectoryEntryDto>) -> Vec<i64> {
    entries.into_iter().map(|entry| entry.id).collect()
}
