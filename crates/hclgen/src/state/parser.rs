//! Parser for JSON state documents.

use super::document::StateDocument;
use crate::error::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Highest schema version this parser reads.
pub const MAX_STATE_VERSION: u64 = 3;

#[derive(Deserialize)]
struct VersionHeader {
    version: u64,
}

/// Parse a state document from a file path.
pub fn parse_file(path: &Path) -> Result<StateDocument> {
    let content = std::fs::read_to_string(path)?;
    parse_string(&content)
}

/// Parse a state document from a string.
///
/// The version is checked before the rest of the document so that newer
/// layouts fail with a clear message instead of a field error.
pub fn parse_string(content: &str) -> Result<StateDocument> {
    let header: VersionHeader = serde_json::from_str(content)?;
    if header.version == 0 || header.version > MAX_STATE_VERSION {
        return Err(Error::UnsupportedStateVersion(header.version));
    }

    let document: StateDocument = serde_json::from_str(content)?;
    log::debug!(
        "parsed state version {} (serial {}) with {} module(s)",
        document.version,
        document.serial,
        document.modules.len()
    );
    Ok(document)
}
