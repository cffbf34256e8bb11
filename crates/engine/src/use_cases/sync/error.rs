//! Sheet synchronization errors.

use sheetsync_domain::DocumentError;

use crate::infrastructure::ports::{FetchError, RepoError};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("This is not a valid character.pf2.tools url, make sure you copy the full url: {0}")]
    InvalidInput(String),
    #[error("Sync failed: {0}")]
    SyncFailed(#[from] FetchError),
    #[error("Unknown sheet type: {0}")]
    UnknownSheetType(String),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
