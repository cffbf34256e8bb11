//! Application state and composition.

use std::sync::Arc;

use sheetsync_domain::IconSet;

use crate::config::EngineConfig;
use crate::infrastructure::{
    clock::{SystemClock, SystemRandom},
    keyed_lock::KeyedLocks,
    pf2tools::Pf2ToolsClient,
    ports::{CharacterRepo, ClockPort, DocumentSource, RandomPort},
    sqlite::SqliteCharacterRepo,
};
use crate::use_cases::{ColorAssigner, ProjectionEngine, SheetSynchronizer};

/// Main application state.
///
/// Holds the character store and every use case, ready for a chat layer to call.
pub struct App {
    pub characters: Arc<dyn CharacterRepo>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub sync: Arc<SheetSynchronizer>,
    pub projection: Arc<ProjectionEngine>,
    pub colors: Arc<ColorAssigner>,
}

impl App {
    /// Create a new App with all dependencies wired up.
    ///
    /// Every use case shares one lock map so record updates from any of them
    /// are serialized per character.
    pub fn new(
        characters: Arc<dyn CharacterRepo>,
        source: Arc<dyn DocumentSource>,
        icons: IconSet,
        site_url: &str,
    ) -> Self {
        let clock_port: Arc<dyn ClockPort> = Arc::new(SystemClock::new());
        let random_port: Arc<dyn RandomPort> = Arc::new(SystemRandom::new());
        let locks = Arc::new(KeyedLocks::new());

        let sync = Arc::new(SheetSynchronizer::new(
            source.clone(),
            characters.clone(),
            clock_port,
            locks.clone(),
        ));
        let colors = Arc::new(ColorAssigner::new(
            characters.clone(),
            random_port,
            locks,
        ));
        let projection = Arc::new(ProjectionEngine::new(
            source,
            sync.clone(),
            colors.clone(),
            Arc::new(icons),
            site_url,
        ));

        Self {
            characters,
            use_cases: UseCases {
                sync,
                projection,
                colors,
            },
        }
    }

    /// Production wiring: SQLite cache and the HTTP sheet client.
    pub async fn from_config(config: &EngineConfig) -> anyhow::Result<Self> {
        tracing::info!(db = %config.db_path, "Opening character cache");
        let characters = Arc::new(SqliteCharacterRepo::new(&config.db_path).await?);

        tracing::info!(api = %config.api_url, "Using sheet service");
        let source = Arc::new(Pf2ToolsClient::with_timeout(
            &config.api_url,
            config.http_timeout_secs,
        ));

        let icons = config.load_icons().await?;
        Ok(Self::new(characters, source, icons, &config.site_url))
    }
}
