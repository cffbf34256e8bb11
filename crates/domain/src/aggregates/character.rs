//! Character aggregate - the locally cached copy of a remote sheet
//!
//! # Invariants
//!
//! - `remote_id` is the identity and never changes after construction
//! - `owners` only grows; there is no removal path
//! - sheet cache, values cache, sync timestamp, type, name and image are
//!   replaced together through [`Character::apply_snapshot`]
//! - `color` moves from unassigned to assigned exactly once

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::document::Document;
use crate::ids::{RemoteId, UserId};
use crate::value_objects::{ColorAssignment, Rgb, SheetType};

/// Name used when the remote sheet has none.
pub const DEFAULT_CHARACTER_NAME: &str = "Unnamed Character";

/// Everything a successful full sync derives from one fetched document.
///
/// Built completely before it touches a [`Character`], so a derivation failure
/// never leaves a record half-updated.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetSnapshot {
    pub sheet: Document,
    pub values: Document,
    pub fetched_at: DateTime<Utc>,
    pub sheet_type: SheetType,
    pub name: String,
    pub image_url: Option<String>,
}

/// A cached character record.
///
/// # Example
///
/// ```
/// use sheetsync_domain::{Character, RemoteId, UserId};
///
/// let mut character = Character::new(RemoteId::new("abc123").unwrap());
/// assert!(character.add_owner(UserId::new(7)));
/// assert!(!character.add_owner(UserId::new(7)));
/// assert_eq!(character.name(), "Unnamed Character");
/// assert!(character.last_updated().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    remote_id: RemoteId,
    owners: BTreeSet<UserId>,
    sheet_cache: Document,
    values_cache: Document,
    last_updated: Option<DateTime<Utc>>,
    sheet_type: Option<SheetType>,
    name: String,
    image_url: Option<String>,
    #[serde(default)]
    color: ColorAssignment,
}

impl Character {
    /// A record that has never been synced: empty caches, no owners.
    pub fn new(remote_id: RemoteId) -> Self {
        Self {
            remote_id,
            owners: BTreeSet::new(),
            sheet_cache: Document::empty(),
            values_cache: Document::empty(),
            last_updated: None,
            sheet_type: None,
            name: DEFAULT_CHARACTER_NAME.to_string(),
            image_url: None,
            color: ColorAssignment::Unassigned,
        }
    }

    pub fn with_owner(mut self, owner: UserId) -> Self {
        self.owners.insert(owner);
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[inline]
    pub fn remote_id(&self) -> &RemoteId {
        &self.remote_id
    }

    pub fn owners(&self) -> &BTreeSet<UserId> {
        &self.owners
    }

    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.owners.contains(&user)
    }

    pub fn sheet_cache(&self) -> &Document {
        &self.sheet_cache
    }

    pub fn values_cache(&self) -> &Document {
        &self.values_cache
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    pub fn sheet_type(&self) -> Option<SheetType> {
        self.sheet_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }

    pub fn color(&self) -> ColorAssignment {
        self.color
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Adds an owner. Returns `true` if the user was not an owner yet.
    pub fn add_owner(&mut self, owner: UserId) -> bool {
        self.owners.insert(owner)
    }

    /// Replaces every sync-derived field at once.
    pub fn apply_snapshot(&mut self, snapshot: SheetSnapshot) {
        let SheetSnapshot {
            sheet,
            values,
            fetched_at,
            sheet_type,
            name,
            image_url,
        } = snapshot;
        self.sheet_cache = sheet;
        self.values_cache = values;
        self.last_updated = Some(fetched_at);
        self.sheet_type = Some(sheet_type);
        self.name = name;
        self.image_url = image_url;
    }

    /// Values-only refresh. Leaves the sheet, name, type and timestamp alone.
    pub fn replace_values(&mut self, values: Document) {
        self.values_cache = values;
    }

    /// Assigns `rgb` unless a color is already set; returns the color in effect.
    pub fn assign_color(&mut self, rgb: Rgb) -> Rgb {
        match self.color {
            ColorAssignment::Assigned(existing) => existing,
            ColorAssignment::Unassigned => {
                self.color = ColorAssignment::Assigned(rgb);
                rgb
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use serde_json::json;

    fn snapshot() -> SheetSnapshot {
        SheetSnapshot {
            sheet: Document::new(json!({ "name": "Ezren", "type": "character" })),
            values: Document::new(json!({ "hp": { "value": 16 } })),
            fetched_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            sheet_type: SheetType::Character,
            name: "Ezren".to_string(),
            image_url: Some("https://img.example/ezren.png".to_string()),
        }
    }

    #[test]
    fn new_record_is_empty() {
        let c = Character::new(RemoteId::new("abc").unwrap());
        assert!(c.owners().is_empty());
        assert!(c.sheet_cache().is_empty());
        assert!(c.values_cache().is_empty());
        assert_eq!(c.sheet_type(), None);
        assert_eq!(c.color(), ColorAssignment::Unassigned);
    }

    #[test]
    fn owners_accumulate_without_duplicates() {
        let mut c = Character::new(RemoteId::new("abc").unwrap()).with_owner(UserId::new(1));
        assert!(c.add_owner(UserId::new(2)));
        assert!(!c.add_owner(UserId::new(1)));
        assert_eq!(c.owners().len(), 2);
        assert!(c.is_owned_by(UserId::new(2)));
    }

    #[test]
    fn snapshot_replaces_all_sync_fields() {
        let mut c = Character::new(RemoteId::new("abc").unwrap());
        let snap = snapshot();
        c.apply_snapshot(snap.clone());
        assert_eq!(c.name(), "Ezren");
        assert_eq!(c.sheet_type(), Some(SheetType::Character));
        assert_eq!(c.last_updated(), Some(snap.fetched_at));
        assert_eq!(c.image_url(), Some("https://img.example/ezren.png"));
        assert_eq!(c.values_cache(), &snap.values);
    }

    #[test]
    fn values_refresh_leaves_sheet_fields() {
        let mut c = Character::new(RemoteId::new("abc").unwrap());
        c.apply_snapshot(snapshot());
        let before = c.clone();
        c.replace_values(Document::new(json!({ "hp": { "value": 20 } })));
        assert_eq!(c.sheet_cache(), before.sheet_cache());
        assert_eq!(c.last_updated(), before.last_updated());
        assert_eq!(c.name(), before.name());
        assert_ne!(c.values_cache(), before.values_cache());
    }

    #[test]
    fn color_is_assigned_once() {
        let mut c = Character::new(RemoteId::new("abc").unwrap());
        let first = c.assign_color(Rgb::new(10, 20, 30));
        let second = c.assign_color(Rgb::new(200, 200, 200));
        assert_eq!(first, second);
        assert_eq!(c.color().rgb(), Some(Rgb::new(10, 20, 30)));
    }

    #[test]
    fn record_serializes_round_trip() {
        let mut c = Character::new(RemoteId::new("abc").unwrap()).with_owner(UserId::new(9));
        c.apply_snapshot(snapshot());
        c.assign_color(Rgb::new(1, 2, 3));
        let json = serde_json::to_string(&c).unwrap();
        let back: Character = serde_json::from_str(&json).unwrap();
        assert_eq!(back, c);
    }
}
