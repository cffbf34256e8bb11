//! Name lookups and detail views for feats, features and actions.

use sheetsync_domain::format::{
    capitalize_first, starts_with_ignore_case, substitute_action_notation,
};
use sheetsync_domain::{DocumentError, IconSet, Node, Section};

use crate::infrastructure::ports::Subresource;

pub const NO_DESCRIPTION: &str = "No Description";

/// Kinds of entries that can be looked up by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Feat,
    Feature,
    Action,
    Item,
}

impl ResourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            ResourceKind::Feat => "Feat",
            ResourceKind::Feature => "Feature",
            ResourceKind::Action => "Action",
            ResourceKind::Item => "Item",
        }
    }

    pub fn plural(&self) -> &'static str {
        match self {
            ResourceKind::Feat => "Feats",
            ResourceKind::Feature => "Features",
            ResourceKind::Action => "Actions",
            ResourceKind::Item => "Items",
        }
    }

    pub fn subresource(&self) -> Subresource {
        match self {
            ResourceKind::Feat => Subresource::Feats,
            ResourceKind::Feature => Subresource::Features,
            ResourceKind::Action => Subresource::Activities,
            ResourceKind::Item => Subresource::Items,
        }
    }

    /// Title for an entry whose name is missing.
    pub fn unnamed(&self) -> String {
        format!("Unnamed {}", self.label())
    }
}

/// Entries under a sub-resource response's `data`. An empty object there
/// means the character has none.
pub fn response_entries<'a>(root: Node<'a>) -> Result<Vec<Node<'a>>, DocumentError> {
    match root.get(&["data"]) {
        Some(data) if data.is_empty() => Ok(Vec::new()),
        _ => root.items(&["data"]),
    }
}

/// First entry, in document order, whose name starts with `name`
/// (case-insensitive). Entries without a name never match.
pub fn find_by_prefix<'a>(entries: &[Node<'a>], name: &str) -> Option<Node<'a>> {
    entries.iter().copied().find(|entry| {
        entry
            .get_opt_str(&["name"])
            .ok()
            .flatten()
            .is_some_and(|entry_name| starts_with_ignore_case(&entry_name, name))
    })
}

/// One line per entry: `{name} ({subtype} {level})`.
pub fn list_all(entries: &[Node<'_>], kind: ResourceKind) -> String {
    entries
        .iter()
        .map(|entry| {
            let name = entry.display_or(&["name"], &kind.unnamed());
            let subtype = capitalize_first(&entry.display_or(&["subtype"], kind.label()));
            let level = entry.display_or(&["level"], "");
            format!("{name} ({})", format!("{subtype} {level}").trim_end())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Entry title, falling back to `Unnamed <Kind>`.
pub fn entry_title(entry: &Node<'_>, kind: ResourceKind) -> String {
    entry
        .get_non_empty_str(&["name"])
        .ok()
        .flatten()
        .unwrap_or_else(|| kind.unnamed())
}

/// Description body with action notation replaced by icons.
pub fn description(entry: &Node<'_>, icons: &IconSet) -> Result<String, DocumentError> {
    Ok(match entry.get_opt_str(&["body"])? {
        Some(body) => substitute_action_notation(&body, icons),
        None => NO_DESCRIPTION.to_string(),
    })
}

pub fn feat_sections(entry: &Node<'_>, icons: &IconSet) -> Result<Vec<Section>, DocumentError> {
    let subtype = capitalize_first(&entry.display_or(&["subtype"], "Feat"));
    let level = entry.display_or(&["level"], "");
    Ok(vec![
        Section::inline("Traits", entry.display_or(&["traits"], "N/A")),
        Section::inline("Type", format!("{subtype} {level}").trim_end()),
        Section::new("Description", description(entry, icons)?),
    ])
}

pub fn feature_sections(
    entry: &Node<'_>,
    icons: &IconSet,
) -> Result<Vec<Section>, DocumentError> {
    let kind = entry.display_or(&["type"], "Feature");
    let level = entry.display_or(&["level"], "");
    Ok(vec![
        Section::new("Type", format!("{kind} {level}").trim_end()),
        Section::new("Description", description(entry, icons)?),
    ])
}

pub fn action_sections(entry: &Node<'_>, icons: &IconSet) -> Result<Vec<Section>, DocumentError> {
    let mut sections = vec![Section::new("Description", description(entry, icons)?)];
    if let Some(cost) = entry.display(&["actions"]) {
        let shown = icons.action(&cost).map(str::to_string).unwrap_or(cost);
        sections.push(Section::new("Actions", shown));
    }
    Ok(sections)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sheetsync_domain::Document;

    fn entries(doc: &Document) -> Vec<Node<'_>> {
        doc.node().items(&["data"]).unwrap()
    }

    #[test]
    fn prefix_search_is_case_insensitive_and_ordered() {
        let doc = Document::new(json!({ "data": [
            { "body": "nameless" },
            { "name": "Fire Shield" },
            { "name": "Fireball" }
        ]}));
        let list = entries(&doc);

        let found = find_by_prefix(&list, "fire").unwrap();
        assert_eq!(found.get_str(&["name"], "").unwrap(), "Fire Shield");

        let found = find_by_prefix(&list, "FIREB").unwrap();
        assert_eq!(found.get_str(&["name"], "").unwrap(), "Fireball");
    }

    #[test]
    fn prefix_search_misses_are_none() {
        let doc = Document::new(json!({ "data": [ { "name": "Shield Block" } ] }));
        assert!(find_by_prefix(&entries(&doc), "fire").is_none());

        let empty = Document::new(json!({ "data": [] }));
        assert!(find_by_prefix(&entries(&empty), "").is_none());
    }

    #[test]
    fn empty_data_object_has_no_entries() {
        let empty = Document::new(json!({ "data": {} }));
        assert!(response_entries(empty.node()).unwrap().is_empty());

        let missing = Document::new(json!({}));
        assert!(response_entries(missing.node()).unwrap().is_empty());

        let filled = Document::new(json!({ "data": { "name": "x" } }));
        assert!(response_entries(filled.node()).is_err());
    }

    #[test]
    fn list_all_fills_defaults() {
        let doc = Document::new(json!({ "data": [
            { "name": "Power Attack", "subtype": "class", "level": 1 },
            { "level": 2 },
            { "name": "Toughness" }
        ]}));

        assert_eq!(
            list_all(&entries(&doc), ResourceKind::Feat),
            "Power Attack (Class 1)\nUnnamed Feat (Feat 2)\nToughness (Feat)"
        );
    }

    #[test]
    fn feat_detail_substitutes_actions() {
        let doc = Document::new(json!({
            "name": "Sudden Charge",
            "traits": ["Flourish", "Open"],
            "subtype": "class",
            "level": 1,
            "body": "Stride twice (aa). If you end adjacent, Strike (a)."
        }));
        let icons = IconSet::default().with_action("1", "[1]").with_action("2", "[2]");

        let sections = feat_sections(&doc.node(), &icons).unwrap();

        assert_eq!(sections[0].body, "Flourish, Open");
        assert_eq!(sections[1].body, "Class 1");
        assert_eq!(
            sections[2].body,
            "Stride twice [2]. If you end adjacent, Strike [1]."
        );
    }

    #[test]
    fn missing_fields_use_placeholders() {
        let doc = Document::new(json!({}));
        let feat = feat_sections(&doc.node(), &IconSet::default()).unwrap();
        assert_eq!(feat[0].body, "N/A");
        assert_eq!(feat[1].body, "Feat");
        assert_eq!(feat[2].body, NO_DESCRIPTION);

        let feature = feature_sections(&doc.node(), &IconSet::default()).unwrap();
        assert_eq!(feature[0].body, "Feature");
        assert_eq!(entry_title(&doc.node(), ResourceKind::Feature), "Unnamed Feature");
    }

    #[test]
    fn action_cost_uses_icon_when_known() {
        let icons = IconSet::default().with_action("2", "[2]");
        let known = Document::new(json!({ "name": "Flurry", "actions": "2" }));
        let odd = Document::new(json!({ "name": "Ritual", "actions": "1 minute" }));
        let none = Document::new(json!({ "name": "Passive" }));

        let sections = action_sections(&known.node(), &icons).unwrap();
        assert_eq!(sections[1].title, "Actions");
        assert_eq!(sections[1].body, "[2]");

        let sections = action_sections(&odd.node(), &icons).unwrap();
        assert_eq!(sections[1].body, "1 minute");

        assert_eq!(action_sections(&none.node(), &icons).unwrap().len(), 1);
    }
}
