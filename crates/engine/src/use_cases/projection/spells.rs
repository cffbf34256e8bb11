//! Spellcasting sections.
//!
//! One block per spellcasting class, an optional focus pool, cantrips, then
//! one block per spell level in ascending order.

use std::collections::BTreeMap;

use serde_json::Value;
use sheetsync_domain::format::modifier;
use sheetsync_domain::{DocumentError, IconSet, Node, Section};

use super::sheet::ability_prefix;

/// Builds the spell sections, or `None` when no class casts spells.
///
/// `sheet` is the base document's `data`, `values` its computed values.
pub fn spell_sections(
    sheet: Node<'_>,
    values: Node<'_>,
    icons: &IconSet,
) -> Result<Option<Vec<Section>>, DocumentError> {
    let casters: Vec<Node<'_>> = sheet
        .items(&["classes"])?
        .into_iter()
        .filter(|class| class.has(&["tradition"]))
        .collect();
    if casters.is_empty() {
        return Ok(None);
    }

    let mut sections = Vec::with_capacity(casters.len() + 2);
    for class in &casters {
        let name = class.get_str(&["name"], "Unnamed Class")?;
        let key = name.to_lowercase();
        let rank = class.display_or(&["proficiency"], "");
        let body = [
            format!(
                "{}{} {}",
                ability_prefix(class, icons)?,
                name,
                icons.proficiency(&rank)
            ),
            format!(
                "Spell Attack `{}`",
                modifier(values.get_int(&[key.as_str(), "bonus"], 0)?)
            ),
            format!("DC `{}`", values.get_int(&[key.as_str(), "value"], 0)?),
        ];
        sections.push(Section::new(name, body.join("\n")));
    }

    if let Some(max) = sheet.get_non_empty_str(&["focusmax"])? {
        sections.push(Section::new(
            "Focus",
            format!(
                "Focus Points: {}/{}",
                sheet.display_or(&["focus"], "0"),
                max
            ),
        ));
    }

    let mut cantrips = Vec::new();
    let mut by_level: BTreeMap<i64, Vec<String>> = BTreeMap::new();
    for spell in sheet.items(&["spells"])? {
        if is_cantrip(&spell) {
            cantrips.push(spell_line(&spell, "Unnamed Cantrip"));
        } else {
            let level = spell.parse_int_or(&["level"], 1);
            by_level
                .entry(level)
                .or_default()
                .push(spell_line(&spell, "Unnamed Spell"));
        }
    }

    if !cantrips.is_empty() {
        sections.push(Section::new("Cantrips", cantrips.join("\n")));
    }
    for (level, lines) in by_level {
        sections.push(Section::new(format!("Level {level}"), lines.join("\n")));
    }

    Ok(Some(sections))
}

/// A present `cantrip` flag marks a cantrip unless it is literally `false`.
fn is_cantrip(spell: &Node<'_>) -> bool {
    spell
        .get(&["cantrip"])
        .is_some_and(|flag| !matches!(flag.value(), Value::Bool(false)))
}

fn spell_line(spell: &Node<'_>, unnamed: &str) -> String {
    let name = spell.display_or(&["name"], unnamed);
    match casts(spell) {
        0 => format!("• {name}"),
        n => format!("• {name} (casts: {n})"),
    }
}

/// Available casts: the length of a `casts` list, or a plain count.
fn casts(spell: &Node<'_>) -> i64 {
    match spell.get(&["casts"]).map(|node| node.value()) {
        Some(Value::Array(slots)) => slots.len() as i64,
        Some(_) => spell.parse_int_or(&["casts"], 0),
        None => 0,
    }
}
