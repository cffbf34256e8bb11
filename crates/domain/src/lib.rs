//! SheetSync domain.
//!
//! Cached character records, the loosely-typed documents they are built
//! from, and the formatting vocabulary used to project them.

pub mod aggregates;
pub mod document;
pub mod error;
pub mod format;
pub mod icons;
pub mod ids;
pub mod projection;
pub mod value_objects;

pub use aggregates::{Character, SheetSnapshot, DEFAULT_CHARACTER_NAME};
pub use document::{Document, DocumentError, Node};
pub use error::DomainError;
pub use icons::IconSet;
pub use ids::{RemoteId, UserId};
pub use projection::{Projection, ProjectionMeta, Section};
pub use value_objects::{ColorAssignment, Rgb, SheetType};
