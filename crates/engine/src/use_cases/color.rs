//! Display color assignment.
//!
//! A character gets a random color the first time it is rendered and keeps
//! it for the lifetime of the record.

use std::sync::Arc;

use sheetsync_domain::{Character, ColorAssignment, Rgb};

use crate::infrastructure::keyed_lock::KeyedLocks;
use crate::infrastructure::ports::{CharacterRepo, RandomPort, RepoError};

pub struct ColorAssigner {
    repo: Arc<dyn CharacterRepo>,
    random: Arc<dyn RandomPort>,
    locks: Arc<KeyedLocks>,
}

impl ColorAssigner {
    pub fn new(
        repo: Arc<dyn CharacterRepo>,
        random: Arc<dyn RandomPort>,
        locks: Arc<KeyedLocks>,
    ) -> Self {
        Self {
            repo,
            random,
            locks,
        }
    }

    /// The character's color, assigning and persisting one if needed.
    ///
    /// If another request assigned a color since `character` was loaded,
    /// that stored color wins.
    pub async fn color_for(&self, character: &Character) -> Result<Rgb, RepoError> {
        if let ColorAssignment::Assigned(rgb) = character.color() {
            return Ok(rgb);
        }

        let candidate = Rgb::new(self.channel(), self.channel(), self.channel());
        let remote_id = character.remote_id();

        let _guard = self.locks.lock(remote_id.as_str()).await;
        let mut fresh = self
            .repo
            .get(remote_id)
            .await?
            .ok_or_else(|| RepoError::not_found("Character", remote_id))?;

        if let ColorAssignment::Assigned(existing) = fresh.color() {
            return Ok(existing);
        }

        let rgb = fresh.assign_color(candidate);
        self.repo.update(&fresh).await?;
        tracing::info!(remote_id = %remote_id, color = %rgb, "Assigned display color");
        Ok(rgb)
    }

    fn channel(&self) -> u8 {
        // Channels are drawn from [0, 255).
        self.random.gen_range(0, 254).clamp(0, 254) as u8
    }
}
