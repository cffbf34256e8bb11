//! In-memory character storage, for tests and throwaway runs.

use async_trait::async_trait;
use dashmap::DashMap;
use sheetsync_domain::{Character, RemoteId, UserId};

use crate::infrastructure::ports::{CharacterRepo, RepoError};

#[derive(Default)]
pub struct InMemoryCharacterRepo {
    records: DashMap<RemoteId, Character>,
}

impl InMemoryCharacterRepo {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl CharacterRepo for InMemoryCharacterRepo {
    async fn exists(&self, id: &RemoteId) -> Result<bool, RepoError> {
        Ok(self.records.contains_key(id))
    }

    async fn insert(&self, character: &Character) -> Result<(), RepoError> {
        use dashmap::mapref::entry::Entry;

        match self.records.entry(character.remote_id().clone()) {
            Entry::Occupied(_) => Err(RepoError::constraint(format!(
                "character {} already exists",
                character.remote_id()
            ))),
            Entry::Vacant(slot) => {
                slot.insert(character.clone());
                Ok(())
            }
        }
    }

    async fn get(&self, id: &RemoteId) -> Result<Option<Character>, RepoError> {
        Ok(self.records.get(id).map(|c| c.clone()))
    }

    async fn update(&self, character: &Character) -> Result<(), RepoError> {
        match self.records.get_mut(character.remote_id()) {
            Some(mut stored) => {
                *stored = character.clone();
                Ok(())
            }
            None => Err(RepoError::not_found("Character", character.remote_id())),
        }
    }

    async fn find_by_name(&self, name: &str) -> Result<Vec<Character>, RepoError> {
        let needle = name.to_lowercase();
        let mut found: Vec<Character> = self
            .records
            .iter()
            .filter(|c| c.name().to_lowercase() == needle)
            .map(|c| c.clone())
            .collect();
        found.sort_by(|a, b| a.remote_id().as_str().cmp(b.remote_id().as_str()));
        Ok(found)
    }

    async fn list_for_owner(&self, owner: UserId) -> Result<Vec<Character>, RepoError> {
        let mut found: Vec<Character> = self
            .records
            .iter()
            .filter(|c| c.is_owned_by(owner))
            .map(|c| c.clone())
            .collect();
        found.sort_by(|a, b| a.name().cmp(b.name()));
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> RemoteId {
        RemoteId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn insert_is_unique_by_remote_id() {
        let repo = InMemoryCharacterRepo::new();
        repo.insert(&Character::new(id("abc"))).await.unwrap();

        let err = repo.insert(&Character::new(id("abc"))).await.unwrap_err();
        assert!(matches!(err, RepoError::ConstraintViolation(_)));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn update_requires_existing_record() {
        let repo = InMemoryCharacterRepo::new();
        let err = repo.update(&Character::new(id("abc"))).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn list_for_owner_filters_by_owner() {
        let repo = InMemoryCharacterRepo::new();
        repo.insert(&Character::new(id("a")).with_owner(UserId::new(1)))
            .await
            .unwrap();
        repo.insert(&Character::new(id("b")).with_owner(UserId::new(2)))
            .await
            .unwrap();

        let mine = repo.list_for_owner(UserId::new(1)).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].remote_id().as_str(), "a");
    }
}
