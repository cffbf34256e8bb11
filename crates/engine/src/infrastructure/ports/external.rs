//! External service ports.

use std::fmt;

use async_trait::async_trait;
use sheetsync_domain::{Document, RemoteId};

use super::error::FetchError;

/// Sub-resources the sheet service exposes per character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Subresource {
    /// The base document: `data` plus computed `values`.
    Sheet,
    Values,
    Feats,
    Features,
    Activities,
    Items,
}

impl Subresource {
    /// Path appended to `{base}/{id}`.
    pub fn path_suffix(&self) -> &'static str {
        match self {
            Subresource::Sheet => "",
            Subresource::Values => "/values",
            Subresource::Feats => "/feats",
            Subresource::Features => "/features",
            Subresource::Activities => "/activities",
            Subresource::Items => "/items",
        }
    }
}

impl fmt::Display for Subresource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Subresource::Sheet => "sheet",
            Subresource::Values => "values",
            Subresource::Feats => "feats",
            Subresource::Features => "features",
            Subresource::Activities => "activities",
            Subresource::Items => "items",
        };
        write!(f, "{name}")
    }
}

/// Fetch capability for remote sheet documents.
///
/// Implementations return the whole response document, already checked for
/// an `"error"` payload. They never retry.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(
        &self,
        remote_id: &RemoteId,
        subresource: Subresource,
    ) -> Result<Document, FetchError>;
}
