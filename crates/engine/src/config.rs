//! Engine configuration from the environment.

use std::path::PathBuf;

use sheetsync_domain::IconSet;

use crate::infrastructure::pf2tools::DEFAULT_SHEET_API_URL;
use crate::use_cases::projection::DEFAULT_SHEET_SITE_URL;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Base URL of the sheet JSON API.
    pub api_url: String,
    /// Public site used for sheet links.
    pub site_url: String,
    /// SQLite database file for the character cache.
    pub db_path: String,
    pub http_timeout_secs: u64,
    /// Optional JSON file overriding the built-in icons.
    pub icons_path: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_SHEET_API_URL.to_string(),
            site_url: DEFAULT_SHEET_SITE_URL.to_string(),
            db_path: "characters.db".to_string(),
            http_timeout_secs: 30,
            icons_path: None,
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, falling back to defaults for anything
    /// unset, empty or unparsable.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Self {
            api_url: var("SHEET_API_URL").unwrap_or(defaults.api_url),
            site_url: var("SHEET_SITE_URL").unwrap_or(defaults.site_url),
            db_path: var("SHEET_DB").unwrap_or(defaults.db_path),
            http_timeout_secs: var("SHEET_HTTP_TIMEOUT_SECS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_timeout_secs),
            icons_path: var("SHEET_ICONS_PATH").map(PathBuf::from),
        }
    }

    /// Built-in icons, with the override file merged on top when configured.
    pub async fn load_icons(&self) -> anyhow::Result<IconSet> {
        let Some(path) = &self.icons_path else {
            return Ok(IconSet::default());
        };
        let raw = tokio::fs::read_to_string(path).await?;
        let icons = IconSet::from_json_overrides(&raw)?;
        tracing::info!(path = %path.display(), "Loaded icon overrides");
        Ok(icons)
    }
}
