//! Remote id extraction from shared sheet links.

use std::sync::OnceLock;

use sheetsync_domain::RemoteId;

use super::error::SyncError;

// Shared links look like `https://character.pf2.tools/?abc123`, sometimes
// with a trailing `-` modifier.
static SHEET_LINK_REGEX: OnceLock<regex_lite::Regex> = OnceLock::new();

/// Pulls the remote id out of a sheet link.
///
/// Anything may precede the `?`; the id is the run of word characters after it.
pub fn extract_remote_id(url: &str) -> Result<RemoteId, SyncError> {
    let re = SHEET_LINK_REGEX.get_or_init(|| {
        regex_lite::Regex::new(r"\?(\w+)-?").expect("SHEET_LINK_REGEX pattern is invalid")
    });

    let id = re
        .captures(url.trim())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| SyncError::InvalidInput(url.to_string()))?;

    RemoteId::new(id).map_err(|_| SyncError::InvalidInput(url.to_string()))
}
