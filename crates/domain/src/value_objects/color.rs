use std::fmt;

use serde::{Deserialize, Serialize};

/// Display color attached to a character's projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Packed `0xRRGGBB`, the form chat embeds expect.
    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Color state of a character record.
///
/// Moves from `Unassigned` to `Assigned` once and never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "rgb", rename_all = "snake_case")]
pub enum ColorAssignment {
    #[default]
    Unassigned,
    Assigned(Rgb),
}

impl ColorAssignment {
    pub fn rgb(&self) -> Option<Rgb> {
        match self {
            ColorAssignment::Unassigned => None,
            ColorAssignment::Assigned(rgb) => Some(*rgb),
        }
    }

    pub fn is_assigned(&self) -> bool {
        matches!(self, ColorAssignment::Assigned(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packs_channels() {
        assert_eq!(Rgb::new(0x12, 0x34, 0x56).to_u32(), 0x123456);
        assert_eq!(Rgb::new(255, 0, 1).to_string(), "#ff0001");
    }

    #[test]
    fn assignment_serializes_with_state_tag() {
        let json = serde_json::to_value(ColorAssignment::Assigned(Rgb::new(1, 2, 3))).unwrap();
        assert_eq!(json["state"], "assigned");
        assert_eq!(json["rgb"]["g"], 2);
        let back: ColorAssignment = serde_json::from_value(json).unwrap();
        assert_eq!(back.rgb(), Some(Rgb::new(1, 2, 3)));
    }
}
