//! Projection use cases.
//!
//! Turns cached characters and freshly fetched sub-resources into ordered,
//! presentation-ready sections. Section builders are pure functions over
//! document nodes; [`ProjectionEngine`] does the fetching around them.

mod error;
mod items;
mod lookup;
mod sheet;
mod spells;

use std::sync::Arc;

use sheetsync_domain::{Character, Document, IconSet, Projection, ProjectionMeta, Section};

use crate::infrastructure::ports::{DocumentSource, Subresource};
use crate::use_cases::color::ColorAssigner;
use crate::use_cases::sync::SheetSynchronizer;

pub use error::ProjectionError;
pub use items::{inventory_sections, item_sections};
pub use lookup::{find_by_prefix, list_all, ResourceKind};
pub use sheet::{sheet_sections, SKILLS_PER_SECTION};
pub use spells::spell_sections;

/// Default public site for sheet links.
pub const DEFAULT_SHEET_SITE_URL: &str = "https://character.pf2.tools";

pub struct ProjectionEngine {
    source: Arc<dyn DocumentSource>,
    sync: Arc<SheetSynchronizer>,
    colors: Arc<ColorAssigner>,
    icons: Arc<IconSet>,
    site_url: String,
}

impl ProjectionEngine {
    pub fn new(
        source: Arc<dyn DocumentSource>,
        sync: Arc<SheetSynchronizer>,
        colors: Arc<ColorAssigner>,
        icons: Arc<IconSet>,
        site_url: &str,
    ) -> Self {
        Self {
            source,
            sync,
            colors,
            icons,
            site_url: site_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public link to the character's sheet.
    pub fn sheet_url(&self, character: &Character) -> String {
        format!("{}/?{}", self.site_url, character.remote_id())
    }

    /// The full sheet. Syncs the character first.
    pub async fn sheet(&self, character: &Character) -> Result<Projection, ProjectionError> {
        let character = self.sync.sync(character, None).await?;
        let sections = sheet_sections(
            character.name(),
            character.sheet_cache().node(),
            character.values_cache().node(),
            &self.icons,
        )?;

        let mut meta = self.meta(&character, character.name().to_string()).await?;
        meta.footer = character
            .last_updated()
            .map(|at| format!("Last synced: {}", at.format("%Y-%m-%d %H:%M:%S UTC")));

        tracing::debug!(
            remote_id = %character.remote_id(),
            sections = sections.len(),
            "Built sheet projection"
        );
        Ok(Projection { meta, sections })
    }

    pub async fn feat(
        &self,
        character: &Character,
        name: &str,
    ) -> Result<Option<Projection>, ProjectionError> {
        self.detail(character, ResourceKind::Feat, name).await
    }

    pub async fn all_feats(
        &self,
        character: &Character,
    ) -> Result<Option<Projection>, ProjectionError> {
        self.listing(character, ResourceKind::Feat).await
    }

    pub async fn feature(
        &self,
        character: &Character,
        name: &str,
    ) -> Result<Option<Projection>, ProjectionError> {
        self.detail(character, ResourceKind::Feature, name).await
    }

    pub async fn all_features(
        &self,
        character: &Character,
    ) -> Result<Option<Projection>, ProjectionError> {
        self.listing(character, ResourceKind::Feature).await
    }

    pub async fn action(
        &self,
        character: &Character,
        name: &str,
    ) -> Result<Option<Projection>, ProjectionError> {
        self.detail(character, ResourceKind::Action, name).await
    }

    pub async fn all_actions(
        &self,
        character: &Character,
    ) -> Result<Option<Projection>, ProjectionError> {
        self.listing(character, ResourceKind::Action).await
    }

    pub async fn item(
        &self,
        character: &Character,
        name: &str,
    ) -> Result<Option<Projection>, ProjectionError> {
        self.detail(character, ResourceKind::Item, name).await
    }

    /// Currency and carried items, from a fresh base document.
    pub async fn inventory(
        &self,
        character: &Character,
    ) -> Result<Option<Projection>, ProjectionError> {
        let response = self.fetch(character, Subresource::Sheet).await?;
        let data = response.node();
        let Some(sheet) = data.get(&["data"]).filter(|d| !d.is_empty()) else {
            return Ok(None);
        };

        let sections = inventory_sections(sheet)?;
        let meta = self
            .meta(character, format!("{}'s Inventory", character.name()))
            .await?;
        Ok(Some(Projection { meta, sections }))
    }

    /// Spellcasting overview, from a fresh base document.
    ///
    /// `None` when the character has no spellcasting class.
    pub async fn spells(
        &self,
        character: &Character,
    ) -> Result<Option<Projection>, ProjectionError> {
        let response = self.fetch(character, Subresource::Sheet).await?;
        let empty = Document::empty();
        let root = response.node();
        let Some(sheet) = root.get(&["data"]) else {
            return Ok(None);
        };
        let values = root.get(&["values"]).unwrap_or_else(|| empty.node());

        let Some(sections) = spell_sections(sheet, values, &self.icons)? else {
            return Ok(None);
        };
        let meta = self
            .meta(character, format!("{}'s Spells", character.name()))
            .await?;
        Ok(Some(Projection { meta, sections }))
    }

    async fn detail(
        &self,
        character: &Character,
        kind: ResourceKind,
        name: &str,
    ) -> Result<Option<Projection>, ProjectionError> {
        let response = self.fetch(character, kind.subresource()).await?;
        let entries = lookup::response_entries(response.node())?;
        let Some(entry) = find_by_prefix(&entries, name) else {
            tracing::debug!(
                remote_id = %character.remote_id(),
                kind = kind.label(),
                query = name,
                "No entry matched"
            );
            return Ok(None);
        };

        let sections = match kind {
            ResourceKind::Feat => lookup::feat_sections(&entry, &self.icons)?,
            ResourceKind::Feature => lookup::feature_sections(&entry, &self.icons)?,
            ResourceKind::Action => lookup::action_sections(&entry, &self.icons)?,
            ResourceKind::Item => item_sections(&entry, &self.icons)?,
        };
        let meta = self
            .meta(character, lookup::entry_title(&entry, kind))
            .await?;
        Ok(Some(Projection { meta, sections }))
    }

    async fn listing(
        &self,
        character: &Character,
        kind: ResourceKind,
    ) -> Result<Option<Projection>, ProjectionError> {
        let response = self.fetch(character, kind.subresource()).await?;
        let entries = lookup::response_entries(response.node())?;
        if entries.is_empty() {
            return Ok(None);
        }

        let sections = vec![Section::new(kind.plural(), list_all(&entries, kind))];
        let meta = self
            .meta(character, format!("{}'s {}", character.name(), kind.plural()))
            .await?;
        Ok(Some(Projection { meta, sections }))
    }

    async fn fetch(
        &self,
        character: &Character,
        subresource: Subresource,
    ) -> Result<Document, ProjectionError> {
        let remote_id = character.remote_id();
        self.source
            .fetch(remote_id, subresource)
            .await
            .inspect_err(|e| {
                tracing::warn!(
                    remote_id = %remote_id,
                    subresource = %subresource,
                    error = %e,
                    "Sub-resource fetch failed"
                );
            })
            .map_err(ProjectionError::from)
    }

    async fn meta(
        &self,
        character: &Character,
        title: String,
    ) -> Result<ProjectionMeta, ProjectionError> {
        let color = self.colors.color_for(character).await?;
        Ok(ProjectionMeta {
            title,
            character_name: character.name().to_string(),
            url: Some(self.sheet_url(character)),
            image_url: character.image_url().map(str::to_string),
            color,
            footer: None,
        })
    }
}
