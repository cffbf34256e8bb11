//! Item detail and inventory sections.

use sheetsync_domain::{DocumentError, IconSet, Node, Section};

use super::lookup::description;

pub fn item_sections(entry: &Node<'_>, icons: &IconSet) -> Result<Vec<Section>, DocumentError> {
    let item_type = entry.get_opt_str(&["type"])?;
    let hp = entry.get_int(&["hp"], 0)?;
    let damage = entry.get_int(&["damage"], 0)?;

    let price = format!(
        "Price: {} {}",
        entry.display_or(&["price"], "0"),
        entry.display_or(&["priceunit"], ""),
    );
    let details = format!(
        "{}\nBulk: {}",
        price.trim_end(),
        entry.display_or(&["bulk"], "0")
    );
    let status = format!(
        "{} HP {}/{}\n{} Hardness {}",
        icons.sheet("hp"),
        hp.saturating_sub(damage),
        hp,
        icons.sheet("ac"),
        entry.display_or(&["hardness"], "0"),
    );

    let mut sections = vec![
        Section::new("Details", details),
        Section::inline("Traits", entry.display_or(&["traits"], "No Traits")),
        Section::inline(
            "Type",
            format!(
                "{} {}",
                item_type.as_deref().unwrap_or("Item"),
                entry.display_or(&["level"], "0")
            ),
        ),
        Section::inline("Status", status),
    ];

    match item_type.as_deref() {
        Some("armor") | Some("shield") => {
            sections.push(Section::new("Armor bonus", armor_block(entry)));
        }
        Some("weapon") => {
            sections.push(Section::new("Weapon Statistics", weapon_block(entry)));
        }
        _ => {}
    }

    sections.push(Section::new("Description", description(entry, icons)?));
    Ok(sections)
}

fn armor_block(entry: &Node<'_>) -> String {
    [
        format!("**Category**: {}", entry.display_or(&["category"], "Uncategorized")),
        format!("**AC bonus**: {}", entry.display_or(&["acbonus"], "0")),
        format!(
            "**Maximum Dexterity Bonus**: {}",
            entry.display_or(&["dexcap"], "-")
        ),
        format!(
            "**Armor Check Penalty**: {}",
            entry.display_or(&["checkpenalty"], "0")
        ),
        format!(
            "**Speed Penalty**: {}ft",
            entry.display_or(&["speedpenalty"], "0")
        ),
        format!("**Strength**: {}", entry.display_or(&["strength"], "0")),
    ]
    .join("\n")
}

fn weapon_block(entry: &Node<'_>) -> String {
    format!(
        "**Group**: {}; **Category**: {}\n**Damage**: 1{} {}",
        entry.display_or(&["group"], "-"),
        entry.display_or(&["category"], "Uncategorized"),
        entry.display_or(&["damagedie"], "d6"),
        entry.display_or(&["damagetype"], "Untyped"),
    )
}

/// Currency and carried items from the base sheet document.
pub fn inventory_sections(sheet: Node<'_>) -> Result<Vec<Section>, DocumentError> {
    let cp = sheet.get_int(&["cp"], 0)?;
    let sp = sheet.get_int(&["sp"], 0)?;
    let gp = sheet.get_int(&["gp"], 0)?;
    let pp = sheet.get_int(&["pp"], 0)?;

    let mut sections = vec![Section::new(
        "Currency",
        format!(
            "CP {cp} | SP {sp} | GP {gp} | PP {pp}\nTotal: {}",
            gold_total(cp, sp, gp, pp)
        ),
    )];

    let items = sheet.items(&["items"])?;
    if !items.is_empty() {
        let lines: Vec<String> = items
            .iter()
            .map(|item| {
                format!(
                    "• {} [{} {}] x{}",
                    item.display_or(&["name"], "Unnamed Item"),
                    item.display_or(&["type"], "Item"),
                    item.display_or(&["level"], "1"),
                    item.display_or(&["quantity"], "1"),
                )
            })
            .collect();
        sections.push(Section::new("Items", lines.join("\n")));
    }

    Ok(sections)
}

/// Coin total in gold pieces, e.g. `"12.35 gp"`.
fn gold_total(cp: i64, sp: i64, gp: i64, pp: i64) -> String {
    let copper = pp
        .saturating_mul(1000)
        .saturating_add(gp.saturating_mul(100))
        .saturating_add(sp.saturating_mul(10))
        .saturating_add(cp);
    let sign = if copper < 0 { "-" } else { "" };
    let copper = copper.unsigned_abs();
    format!("{sign}{}.{:02} gp", copper / 100, copper % 100)
}
