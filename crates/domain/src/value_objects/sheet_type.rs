use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Sheet kinds declared by the remote service.
///
/// Parsing is strict: a value the service starts sending without this enum
/// knowing about it is an error, never a silent default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetType {
    Character,
    Companion,
    Familiar,
    Npc,
}

impl SheetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SheetType::Character => "character",
            SheetType::Companion => "companion",
            SheetType::Familiar => "familiar",
            SheetType::Npc => "npc",
        }
    }
}

impl fmt::Display for SheetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for SheetType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "character" => Ok(SheetType::Character),
            "companion" => Ok(SheetType::Companion),
            "familiar" => Ok(SheetType::Familiar),
            "npc" => Ok(SheetType::Npc),
            other => Err(DomainError::parse(format!("unknown sheet type: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_declared_types() {
        assert_eq!("character".parse::<SheetType>().unwrap(), SheetType::Character);
        assert_eq!("familiar".parse::<SheetType>().unwrap(), SheetType::Familiar);
    }

    #[test]
    fn rejects_unrecognized_types() {
        assert!("vehicle".parse::<SheetType>().is_err());
        assert!("".parse::<SheetType>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for t in [
            SheetType::Character,
            SheetType::Companion,
            SheetType::Familiar,
            SheetType::Npc,
        ] {
            assert_eq!(t.to_string().parse::<SheetType>().unwrap(), t);
        }
    }
}
