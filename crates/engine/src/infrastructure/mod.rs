//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod keyed_lock;
pub mod memory;
pub mod pf2tools;
pub mod ports;
pub mod sqlite;
