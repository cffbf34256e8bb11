//! Aggregates - records with identity and invariants

mod character;

pub use character::{Character, SheetSnapshot, DEFAULT_CHARACTER_NAME};
