//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Character storage (SQLite or in-memory)
//! - The remote sheet service (HTTP, or canned documents in tests)
//! - Clock/Random (for testing)

mod error;
mod external;
mod repos;
mod testing;

pub use error::{FetchError, RepoError};
pub use external::{DocumentSource, Subresource};
pub use repos::CharacterRepo;
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use external::MockDocumentSource;
#[cfg(test)]
pub use repos::MockCharacterRepo;
