//! Projection errors.

use sheetsync_domain::DocumentError;

use crate::infrastructure::ports::{FetchError, RepoError};
use crate::use_cases::sync::SyncError;

#[derive(Debug, thiserror::Error)]
pub enum ProjectionError {
    #[error(transparent)]
    Sync(#[from] SyncError),
    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),
    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}
