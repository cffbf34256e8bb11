//! Sheet synchronization use cases.
//!
//! Fetches remote sheets and merges them into the character cache. Each sync
//! holds the record's lock from fetch to write, so syncs of one character run
//! in arrival order. Network I/O always completes before the record is
//! touched, and every merge is one repository update.

mod error;
mod identifier;
mod snapshot;

use std::sync::Arc;

use sheetsync_domain::{Character, RemoteId, UserId};

use crate::infrastructure::keyed_lock::KeyedLocks;
use crate::infrastructure::ports::{
    CharacterRepo, ClockPort, DocumentSource, RepoError, Subresource,
};

pub use error::SyncError;
pub use identifier::extract_remote_id;
pub use snapshot::is_image_url;

use snapshot::{build_snapshot, values_from_response};

/// Keeps cached characters in step with the sheet service.
pub struct SheetSynchronizer {
    source: Arc<dyn DocumentSource>,
    repo: Arc<dyn CharacterRepo>,
    clock: Arc<dyn ClockPort>,
    locks: Arc<KeyedLocks>,
}

impl SheetSynchronizer {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        repo: Arc<dyn CharacterRepo>,
        clock: Arc<dyn ClockPort>,
        locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            source,
            repo,
            clock,
            locks,
        }
    }

    /// Creates the record on first sight, then runs a full sync.
    ///
    /// The requester, when given, ends up among the owners.
    pub async fn ensure_character(
        &self,
        remote_id: &RemoteId,
        requester: Option<UserId>,
    ) -> Result<Character, SyncError> {
        let character = {
            let _guard = self.locks.lock(remote_id.as_str()).await;
            match self.repo.get(remote_id).await? {
                Some(existing) => existing,
                None => {
                    let mut created = Character::new(remote_id.clone());
                    if let Some(user) = requester {
                        created.add_owner(user);
                    }
                    self.repo.insert(&created).await?;
                    tracing::info!(remote_id = %remote_id, "Created character record");
                    created
                }
            }
        };

        self.sync(&character, requester).await
    }

    /// [`Self::ensure_character`] for a shared sheet link.
    pub async fn ensure_character_from_url(
        &self,
        url: &str,
        requester: Option<UserId>,
    ) -> Result<Character, SyncError> {
        let remote_id = extract_remote_id(url)?;
        self.ensure_character(&remote_id, requester).await
    }

    /// Full sync: sheet, values, name, type, portrait and timestamp together.
    ///
    /// On any failure the stored record is left exactly as it was.
    pub async fn sync(
        &self,
        character: &Character,
        requester: Option<UserId>,
    ) -> Result<Character, SyncError> {
        let remote_id = character.remote_id();
        let _guard = self.locks.lock(remote_id.as_str()).await;

        let response = self
            .source
            .fetch(remote_id, Subresource::Sheet)
            .await
            .inspect_err(|e| {
                tracing::warn!(remote_id = %remote_id, error = %e, "Sheet fetch failed");
            })?;
        let snapshot = build_snapshot(response, self.clock.now())?;

        let mut fresh = self.load(remote_id).await?;
        fresh.apply_snapshot(snapshot);
        if let Some(user) = requester {
            if fresh.add_owner(user) {
                tracing::debug!(remote_id = %remote_id, owner = %user, "Added owner");
            }
        }
        self.repo.update(&fresh).await?;

        tracing::info!(
            remote_id = %remote_id,
            name = %fresh.name(),
            sheet_type = ?fresh.sheet_type(),
            "Synced character"
        );
        Ok(fresh)
    }

    /// Refreshes only the computed values.
    ///
    /// A failed or malformed values response leaves the stored record as it was.
    pub async fn sync_values(&self, character: &Character) -> Result<Character, SyncError> {
        let remote_id = character.remote_id();
        let _guard = self.locks.lock(remote_id.as_str()).await;

        let response = self
            .source
            .fetch(remote_id, Subresource::Values)
            .await
            .inspect_err(|e| {
                tracing::warn!(remote_id = %remote_id, error = %e, "Values fetch failed");
            })?;
        let values = values_from_response(response)?;

        let mut fresh = self.load(remote_id).await?;
        fresh.replace_values(values);
        self.repo.update(&fresh).await?;

        tracing::debug!(remote_id = %remote_id, "Synced character values");
        Ok(fresh)
    }

    async fn load(&self, remote_id: &RemoteId) -> Result<Character, SyncError> {
        self.repo
            .get(remote_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Character", remote_id).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::memory::InMemoryCharacterRepo;
    use crate::infrastructure::ports::{FetchError, MockCharacterRepo, MockDocumentSource};
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, TimeZone, Utc};
    use serde_json::json;
    use sheetsync_domain::{Document, SheetType};
    use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap()
    }

    fn id() -> RemoteId {
        RemoteId::new("abc123").unwrap()
    }

    fn sheet_response(name: &str) -> Document {
        Document::new(json!({
            "data": { "name": name, "type": "character", "level": 3 },
            "values": { "hp": { "value": 30 } }
        }))
    }

    fn source_returning(doc: Document) -> MockDocumentSource {
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .withf(|_, sub| *sub == Subresource::Sheet)
            .returning(move |_, _| Ok(doc.clone()));
        source
    }

    fn synchronizer(
        source: MockDocumentSource,
        repo: Arc<dyn CharacterRepo>,
    ) -> SheetSynchronizer {
        SheetSynchronizer::new(
            Arc::new(source),
            repo,
            Arc::new(FixedClock(now())),
            Arc::new(KeyedLocks::new()),
        )
    }

    #[tokio::test]
    async fn ensure_creates_then_syncs() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let sync = synchronizer(source_returning(sheet_response("Harsk")), repo.clone());

        let character = sync
            .ensure_character(&id(), Some(UserId::new(1)))
            .await
            .unwrap();

        assert_eq!(character.name(), "Harsk");
        assert_eq!(character.sheet_type(), Some(SheetType::Character));
        assert_eq!(character.last_updated(), Some(now()));
        assert!(character.is_owned_by(UserId::new(1)));
        assert_eq!(repo.get(&id()).await.unwrap(), Some(character));
    }

    #[tokio::test]
    async fn ensure_twice_accumulates_owners() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let sync = synchronizer(source_returning(sheet_response("Harsk")), repo.clone());

        sync.ensure_character(&id(), Some(UserId::new(1)))
            .await
            .unwrap();
        let character = sync
            .ensure_character(&id(), Some(UserId::new(2)))
            .await
            .unwrap();

        assert_eq!(repo.len(), 1);
        assert!(character.is_owned_by(UserId::new(1)));
        assert!(character.is_owned_by(UserId::new(2)));
    }

    #[tokio::test]
    async fn concurrent_ensures_keep_every_owner() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let sync = Arc::new(synchronizer(
            source_returning(sheet_response("Harsk")),
            repo.clone(),
        ));

        let mut handles = Vec::new();
        for user in 1..=10u64 {
            let sync = sync.clone();
            handles.push(tokio::spawn(async move {
                sync.ensure_character(&id(), Some(UserId::new(user))).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = repo.get(&id()).await.unwrap().unwrap();
        assert_eq!(stored.owners().len(), 10);
    }

    #[tokio::test]
    async fn ensure_from_url_rejects_bad_links() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let sync = synchronizer(MockDocumentSource::new(), repo.clone());

        let result = sync
            .ensure_character_from_url("https://character.pf2.tools/abc", None)
            .await;

        assert!(matches!(result, Err(SyncError::InvalidInput(_))));
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn failed_fetch_leaves_record_untouched() {
        let mut previous = Character::new(id());
        previous.apply_snapshot(sheetsync_domain::SheetSnapshot {
            sheet: Document::new(json!({ "name": "Old", "type": "character" })),
            values: Document::new(json!({ "hp": { "value": 5 } })),
            fetched_at: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
            sheet_type: SheetType::Character,
            name: "Old".to_string(),
            image_url: None,
        });

        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(FetchError::Unreachable("connection refused".to_string())));

        let mut repo = MockCharacterRepo::new();
        repo.expect_update().never();
        repo.expect_get().never();

        let sync = synchronizer(source, Arc::new(repo));
        let result = sync.sync(&previous, None).await;

        assert!(matches!(
            result,
            Err(SyncError::SyncFailed(FetchError::Unreachable(_)))
        ));
    }

    #[tokio::test]
    async fn unknown_type_keeps_previous_cache() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let good = synchronizer(source_returning(sheet_response("Harsk")), repo.clone());
        let before = good.ensure_character(&id(), None).await.unwrap();

        let bad = synchronizer(
            source_returning(Document::new(json!({
                "data": { "name": "Changed", "type": "vehicle" }
            }))),
            repo.clone(),
        );
        let result = bad.sync(&before, Some(UserId::new(9))).await;

        assert!(matches!(result, Err(SyncError::UnknownSheetType(_))));
        assert_eq!(repo.get(&id()).await.unwrap(), Some(before));
    }

    #[tokio::test]
    async fn unauthorized_surfaces_as_sync_failure() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .returning(|_, _| Err(FetchError::Unauthorized));
        let sync = synchronizer(source, repo.clone());

        let result = sync.ensure_character(&id(), Some(UserId::new(3))).await;

        assert!(matches!(
            result,
            Err(SyncError::SyncFailed(FetchError::Unauthorized))
        ));
        // The record exists but has never been synced.
        let stored = repo.get(&id()).await.unwrap().unwrap();
        assert!(stored.last_updated().is_none());
        assert!(stored.is_owned_by(UserId::new(3)));
    }

    #[tokio::test]
    async fn sync_values_only_replaces_values() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .withf(|_, sub| *sub == Subresource::Sheet)
            .returning(|_, _| Ok(sheet_response("Harsk")));
        source
            .expect_fetch()
            .withf(|_, sub| *sub == Subresource::Values)
            .returning(|_, _| Ok(Document::new(json!({ "data": { "hp": { "value": 99 } } }))));
        let sync = synchronizer(source, repo.clone());

        let before = sync.ensure_character(&id(), None).await.unwrap();
        let after = sync.sync_values(&before).await.unwrap();

        assert_eq!(after.values_cache().node().get_int(&["hp", "value"], 0).unwrap(), 99);
        assert_eq!(after.sheet_cache(), before.sheet_cache());
        assert_eq!(after.last_updated(), before.last_updated());
        assert_eq!(after.name(), before.name());
        assert_eq!(repo.get(&id()).await.unwrap(), Some(after));
    }

    fn values_source(values: Document) -> MockDocumentSource {
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .withf(|_, sub| *sub == Subresource::Sheet)
            .returning(|_, _| Ok(sheet_response("Harsk")));
        source
            .expect_fetch()
            .withf(|_, sub| *sub == Subresource::Values)
            .returning(move |_, _| Ok(values.clone()));
        source
    }

    #[tokio::test]
    async fn malformed_values_response_keeps_stored_values() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let sync = synchronizer(
            values_source(Document::new(json!({ "unexpected": 1 }))),
            repo.clone(),
        );
        let before = sync.ensure_character(&id(), None).await.unwrap();

        let result = sync.sync_values(&before).await;

        assert!(matches!(
            result,
            Err(SyncError::SyncFailed(FetchError::Malformed(_)))
        ));
        let stored = repo.get(&id()).await.unwrap().unwrap();
        assert_eq!(stored.values_cache().node().get_int(&["hp", "value"], 0).unwrap(), 30);
        assert_eq!(stored, before);
    }

    #[tokio::test]
    async fn failed_values_fetch_keeps_stored_values() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let mut source = MockDocumentSource::new();
        source
            .expect_fetch()
            .withf(|_, sub| *sub == Subresource::Sheet)
            .returning(|_, _| Ok(sheet_response("Harsk")));
        source
            .expect_fetch()
            .withf(|_, sub| *sub == Subresource::Values)
            .returning(|_, _| Err(FetchError::Unreachable("timed out".to_string())));
        let sync = synchronizer(source, repo.clone());
        let before = sync.ensure_character(&id(), None).await.unwrap();

        let result = sync.sync_values(&before).await;

        assert!(matches!(
            result,
            Err(SyncError::SyncFailed(FetchError::Unreachable(_)))
        ));
        assert_eq!(repo.get(&id()).await.unwrap(), Some(before));
    }

    /// First fetch is slow and serves an older sheet; later fetches are fast.
    struct SlowThenFast {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DocumentSource for SlowThenFast {
        async fn fetch(
            &self,
            _remote_id: &RemoteId,
            _subresource: Subresource,
        ) -> Result<Document, FetchError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                Ok(sheet_response("Old"))
            } else {
                Ok(sheet_response("New"))
            }
        }
    }

    /// Advances one second per reading.
    struct SteppingClock(AtomicI64);

    impl ClockPort for SteppingClock {
        fn now(&self) -> DateTime<Utc> {
            now() + Duration::seconds(self.0.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }

    #[tokio::test]
    async fn racing_syncs_keep_the_latest_sheet() {
        let repo = Arc::new(InMemoryCharacterRepo::new());
        let character = Character::new(id());
        repo.insert(&character).await.unwrap();

        let sync = Arc::new(SheetSynchronizer::new(
            Arc::new(SlowThenFast {
                calls: AtomicUsize::new(0),
            }),
            repo.clone(),
            Arc::new(SteppingClock(AtomicI64::new(0))),
            Arc::new(KeyedLocks::new()),
        ));

        let first = {
            let sync = sync.clone();
            let character = character.clone();
            tokio::spawn(async move { sync.sync(&character, None).await })
        };
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        let second = {
            let sync = sync.clone();
            let character = character.clone();
            tokio::spawn(async move { sync.sync(&character, None).await })
        };

        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();

        let stored = repo.get(&id()).await.unwrap().unwrap();
        assert_eq!(stored.name(), "New");
        assert_eq!(stored.last_updated(), Some(now() + Duration::seconds(2)));
    }
}
