//! Use cases - User story orchestration.
//!
//! - `sync` keeps cached characters in step with the sheet service
//! - `projection` renders cached characters into sections
//! - `color` hands out the per-character display color

pub mod color;
pub mod projection;
pub mod sync;

pub use color::ColorAssigner;
pub use projection::{ProjectionEngine, ProjectionError};
pub use sync::{SheetSynchronizer, SyncError};
