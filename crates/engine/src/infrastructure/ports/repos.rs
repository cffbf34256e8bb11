//! Repository port traits for the character cache.

use async_trait::async_trait;
use sheetsync_domain::{Character, RemoteId, UserId};

use super::error::RepoError;

/// Keyed storage of cached characters, unique by remote id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepo: Send + Sync {
    async fn exists(&self, id: &RemoteId) -> Result<bool, RepoError>;

    /// Fails with `ConstraintViolation` when the id is already stored.
    async fn insert(&self, character: &Character) -> Result<(), RepoError>;

    async fn get(&self, id: &RemoteId) -> Result<Option<Character>, RepoError>;

    /// Fails with `NotFound` when the id is not stored.
    async fn update(&self, character: &Character) -> Result<(), RepoError>;

    // Queries for the command layer

    /// Case-insensitive exact match on the character name.
    async fn find_by_name(&self, name: &str) -> Result<Vec<Character>, RepoError>;

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Character>, RepoError>;
}
