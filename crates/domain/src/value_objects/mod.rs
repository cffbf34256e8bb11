//! Value objects - Immutable objects defined by their attributes

mod color;
mod sheet_type;

pub use color::{ColorAssignment, Rgb};
pub use sheet_type::SheetType;
