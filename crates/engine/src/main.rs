//! SheetSync Engine - Main entry point.
//!
//! `sheetsync-engine <sheet-url> [user-id]` syncs one character and prints its
//! sheet as plain text.

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sheetsync_domain::UserId;
use sheetsync_engine::{App, EngineConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment from repo root.
    load_dotenv_from_repo_root();

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sheetsync_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);
    let Some(url) = args.next() else {
        anyhow::bail!("usage: sheetsync-engine <sheet-url> [user-id]");
    };
    let requester = args
        .next()
        .map(|raw| raw.parse::<u64>().map(UserId::new))
        .transpose()
        .context("user id must be a number")?;

    let config = EngineConfig::from_env();
    let app = App::from_config(&config).await?;

    let character = app
        .use_cases
        .sync
        .ensure_character_from_url(&url, requester)
        .await?;
    let projection = app.use_cases.projection.sheet(&character).await?;

    println!("{projection}");
    Ok(())
}

fn load_dotenv_from_repo_root() {
    let repo_root = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("..")
        .join("..");

    // Prefer local overrides.
    for filename in [".env.local", ".env"] {
        let path = repo_root.join(filename);
        if path.exists() {
            let _ = dotenvy::from_path(path);
        }
    }
}
