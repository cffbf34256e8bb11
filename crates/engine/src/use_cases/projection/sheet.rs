//! Full character sheet sections.
//!
//! Order: header, vitals, classes, abilities, defenses, conditions, speeds,
//! then skills in pages of [`SKILLS_PER_SECTION`].

use sheetsync_domain::format::{modifier, pad_right, truncate_chars};
use sheetsync_domain::{DocumentError, IconSet, Node, Section};

pub const SKILLS_PER_SECTION: usize = 6;

const SKILL_LABEL_WIDTH: usize = 9;

/// (left, right) ability pairs, one row each.
const ABILITY_ROWS: [(&str, &str); 3] = [
    ("strength", "intelligence"),
    ("dexterity", "wisdom"),
    ("constitution", "charisma"),
];

const SAVES: [(&str, &str); 3] = [("fort", "fortitude"), ("ref", "reflex"), ("will", "will")];

const SPEEDS: [&str; 5] = ["land", "swim", "climb", "fly", "burrow"];

/// Builds every sheet section from the cached sheet and values documents.
pub fn sheet_sections(
    name: &str,
    sheet: Node<'_>,
    values: Node<'_>,
    icons: &IconSet,
) -> Result<Vec<Section>, DocumentError> {
    let classes = sheet.items(&["classes"])?;

    let mut sections = vec![
        Section::new(name, header_line(sheet, &classes)?),
        Section::new("Vitals", vitals(sheet, values, icons)?),
    ];

    if !classes.is_empty() {
        sections.push(Section::new(
            "Classes",
            class_lines(&classes, values, icons)?,
        ));
    }

    sections.push(Section::inline("Abilities", abilities(values, icons)?));
    sections.push(Section::inline("Defenses", defenses(values, icons)?));

    if let Some(conditions) = conditions(sheet)? {
        sections.push(Section::inline("Conditions", conditions));
    }

    sections.push(Section::new("Speeds", speeds(sheet, icons)));
    sections.extend(skill_pages(sheet, values, icons)?);

    Ok(sections)
}

fn header_line(sheet: Node<'_>, classes: &[Node<'_>]) -> Result<String, DocumentError> {
    let level = sheet.get_int(&["level"], 1)?;
    let ancestry = sheet
        .get_non_empty_str(&["ancestry"])?
        .map(|a| format!(" {a}"))
        .unwrap_or_default();
    let class = match classes.first() {
        Some(first) => first.get_str(&["name"], "Adventurer")?,
        None => "Adventurer".to_string(),
    };
    Ok(format!("Lv{level}{ancestry} {class}"))
}

fn vitals(sheet: Node<'_>, values: Node<'_>, icons: &IconSet) -> Result<String, DocumentError> {
    let max_hp = values.get_int(&["hp", "value"], 0)?;
    let damage = sheet.get_int(&["damage"], 0)?;
    let ac = values.get_int(&["armor class", "value"], 0)?;
    let perception = values.get_int(&["perception", "bonus"], 0)?;
    let perception_dc = values.get_int(&["perception", "value"], 0)?;

    Ok([
        format!("{} HP `{}/{}`", icons.sheet("hp"), max_hp.saturating_sub(damage), max_hp),
        format!("{} AC `{}`", icons.sheet("ac"), ac),
        format!(
            "{} Perception `{}` (DC {})",
            icons.sheet("per"),
            modifier(perception),
            perception_dc
        ),
    ]
    .join("\n"))
}

fn class_lines(
    classes: &[Node<'_>],
    values: Node<'_>,
    icons: &IconSet,
) -> Result<String, DocumentError> {
    let mut lines = Vec::with_capacity(classes.len());
    for class in classes {
        let name = class.get_str(&["name"], "")?;
        let ability = ability_prefix(class, icons)?;
        let rank = class.display_or(&["proficiency"], "");
        let key = name.to_lowercase();
        let bonus = values.get_int(&[key.as_str(), "bonus"], 0)?;
        lines.push(format!(
            "{ability}{name} {} (Class DC: {})",
            icons.proficiency(&rank),
            bonus.saturating_add(10)
        ));
    }
    Ok(lines.join("\n"))
}

/// `"{icon} "` for the entry's key ability, or nothing.
pub(super) fn ability_prefix(entry: &Node<'_>, icons: &IconSet) -> Result<String, DocumentError> {
    Ok(entry
        .get_non_empty_str(&["ability"])?
        .and_then(|ability| icons.score(&ability).map(|icon| format!("{icon} ")))
        .unwrap_or_default())
}

fn abilities(values: Node<'_>, icons: &IconSet) -> Result<String, DocumentError> {
    let mut lines = Vec::with_capacity(ABILITY_ROWS.len());
    for (left, right) in ABILITY_ROWS {
        let left_mod = modifier(values.get_int(&[left, "value"], 0)?);
        let right_mod = modifier(values.get_int(&[right, "value"], 0)?);
        lines.push(format!(
            "{} `{}{} `{}`",
            icons.score(left).unwrap_or(""),
            pad_right(&format!("{left_mod}` "), 4),
            icons.score(right).unwrap_or(""),
            right_mod
        ));
    }
    Ok(lines.join("\n"))
}

fn defenses(values: Node<'_>, icons: &IconSet) -> Result<String, DocumentError> {
    let mut lines = Vec::with_capacity(SAVES.len());
    for (icon, save) in SAVES {
        let bonus = values.get_int(&[save, "bonus"], 0)?;
        lines.push(format!("{} `{}`", icons.sheet(icon), modifier(bonus)));
    }
    Ok(lines.join("\n"))
}

fn conditions(sheet: Node<'_>) -> Result<Option<String>, DocumentError> {
    let mut lines = Vec::new();
    for condition in sheet.items(&["conditions"])? {
        // Only numeric values count; flags and labels are skipped.
        if let Some(value) = condition.get_opt_int(&["value"]).ok().flatten() {
            lines.push(format!("{} {}", condition.get_str(&["name"], "")?, value));
        }
    }
    Ok((!lines.is_empty()).then(|| lines.join("\n")))
}

fn speeds(sheet: Node<'_>, icons: &IconSet) -> String {
    SPEEDS
        .iter()
        .enumerate()
        .map(|(slot, kind)| {
            let index = slot.to_string();
            let speed = sheet
                .display(&["speeds", index.as_str(), "value"])
                .map(|v| format!("{v} ft"))
                .unwrap_or_else(|| "—".to_string());
            format!("{} {}", icons.sheet(kind), speed)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Label a skill is shown and sorted under: its lore topic, else its name.
fn skill_label(skill: &Node<'_>) -> Result<String, DocumentError> {
    match skill.get_non_empty_str(&["lore"])? {
        Some(lore) => Ok(lore),
        None => skill.get_str(&["name"], ""),
    }
}

fn skill_pages(
    sheet: Node<'_>,
    values: Node<'_>,
    icons: &IconSet,
) -> Result<Vec<Section>, DocumentError> {
    let mut skills = Vec::new();
    for skill in sheet.items(&["skills"])? {
        skills.push((skill_label(&skill)?, skill));
    }
    skills.sort_by_key(|(label, _)| label.to_lowercase());

    let mut lines = Vec::with_capacity(skills.len());
    for (label, skill) in &skills {
        let key = label.to_lowercase();
        let bonus = values.parse_int_or(&[key.as_str(), "value"], 0);
        let rank = skill.display_or(&["proficiency"], "");
        lines.push(format!(
            "{}{} {} {}",
            ability_prefix(skill, icons)?,
            truncate_chars(label, SKILL_LABEL_WIDTH).to_uppercase(),
            icons.proficiency(&rank),
            modifier(bonus)
        ));
    }

    Ok(lines
        .chunks(SKILLS_PER_SECTION)
        .map(|page| Section::inline("Skills", page.join("\n")))
        .collect())
}
