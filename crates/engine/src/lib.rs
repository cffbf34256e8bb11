//! SheetSync Engine library.
//!
//! Fetches remote character sheets, caches them, and projects them into
//! presentation sections for a chat front end.
//!
//! ## Structure
//!
//! - `use_cases/` - Sync, projection and color assignment
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `config` - Environment configuration
//! - `app` - Application composition

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
pub use config::EngineConfig;
