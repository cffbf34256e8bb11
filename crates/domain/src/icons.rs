//! Icon tables used when rendering sheets.
//!
//! Defaults are plain text so projections read correctly anywhere. A chat
//! deployment replaces them with custom emoji through a JSON override file:
//!
//! ```json
//! { "actions": { "1": "<:one:123>" }, "sheet": { "hp": ":heart:" } }
//! ```
//!
//! Overrides merge key by key into the defaults.

use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSet {
    sheet: BTreeMap<String, String>,
    scores: BTreeMap<String, String>,
    proficiency: BTreeMap<String, String>,
    actions: BTreeMap<String, String>,
}

/// Partial icon tables as read from an override file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IconOverrides {
    sheet: BTreeMap<String, String>,
    scores: BTreeMap<String, String>,
    proficiency: BTreeMap<String, String>,
    actions: BTreeMap<String, String>,
}

fn table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

impl Default for IconSet {
    fn default() -> Self {
        Self {
            sheet: table(&[
                ("hp", "❤"),
                ("ac", "🛡"),
                ("per", "👁"),
                ("fort", "FORT"),
                ("ref", "REF"),
                ("will", "WILL"),
                ("land", "Land"),
                ("swim", "Swim"),
                ("climb", "Climb"),
                ("fly", "Fly"),
                ("burrow", "Burrow"),
            ]),
            scores: table(&[
                ("strength", "STR"),
                ("dexterity", "DEX"),
                ("constitution", "CON"),
                ("intelligence", "INT"),
                ("wisdom", "WIS"),
                ("charisma", "CHA"),
            ]),
            // The service has stored ranks both by name and by bonus.
            proficiency: table(&[
                ("untrained", "[U]"),
                ("trained", "[T]"),
                ("expert", "[E]"),
                ("master", "[M]"),
                ("legendary", "[L]"),
                ("0", "[U]"),
                ("2", "[T]"),
                ("4", "[E]"),
                ("6", "[M]"),
                ("8", "[L]"),
            ]),
            actions: table(&[
                ("1", "◆"),
                ("2", "◆◆"),
                ("3", "◆◆◆"),
                ("f", "◇"),
                ("r", "⟲"),
            ]),
        }
    }
}

impl IconSet {
    /// Defaults with the tables from `raw` merged on top.
    pub fn from_json_overrides(raw: &str) -> Result<Self, serde_json::Error> {
        let overrides: IconOverrides = serde_json::from_str(raw)?;
        let mut icons = Self::default();
        icons.sheet.extend(overrides.sheet);
        icons.scores.extend(overrides.scores);
        icons.proficiency.extend(overrides.proficiency);
        icons.actions.extend(overrides.actions);
        Ok(icons)
    }

    pub fn with_action(mut self, kind: &str, icon: &str) -> Self {
        self.actions.insert(kind.to_string(), icon.to_string());
        self
    }

    pub fn with_sheet(mut self, key: &str, icon: &str) -> Self {
        self.sheet.insert(key.to_string(), icon.to_string());
        self
    }

    /// Sheet icon (`hp`, `ac`, `land`, ...); empty when unknown.
    pub fn sheet(&self, key: &str) -> &str {
        self.sheet.get(key).map(String::as_str).unwrap_or("")
    }

    /// Ability score icon, looked up case-insensitively.
    pub fn score(&self, ability: &str) -> Option<&str> {
        self.scores
            .get(&ability.to_lowercase())
            .map(String::as_str)
    }

    /// Proficiency rank icon; empty when the rank is unknown.
    pub fn proficiency(&self, rank: &str) -> &str {
        self.proficiency
            .get(&rank.to_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Icon for an action cost (`1`, `2`, `3`, `f`, `r`).
    pub fn action(&self, kind: &str) -> Option<&str> {
        self.actions.get(kind).map(String::as_str)
    }
}
