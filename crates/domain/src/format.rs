//! Text helpers shared by every projection.

use crate::icons::IconSet;

/// Action-cost notation found in description bodies, longest token first.
const ACTION_TOKENS: [(&str, &str); 5] = [
    ("(aaa)", "3"),
    ("(aa)", "2"),
    ("(a)", "1"),
    ("(f)", "f"),
    ("(r)", "r"),
];

/// Signed modifier: `0 -> "+0"`, `5 -> "+5"`, `-3 -> "-3"`.
pub fn modifier(value: i64) -> String {
    if value >= 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

/// Right-pads `text` with spaces to at least `width` characters.
pub fn pad_right(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

/// First `max` characters of `text`.
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

/// Upper-cases the first character, leaving the rest as written.
pub fn capitalize_first(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

pub fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.to_lowercase().starts_with(&prefix.to_lowercase())
}

/// Replaces `(a)`, `(aa)`, `(aaa)`, `(f)` and `(r)` with their action icons.
///
/// Single pass, so icon text is never substituted again. Anything else in
/// parentheses is copied through unchanged.
pub fn substitute_action_notation(body: &str, icons: &IconSet) -> String {
    let mut out = String::with_capacity(body.len());
    let mut rest = body;
    while let Some(start) = rest.find('(') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match ACTION_TOKENS
            .iter()
            .find(|(token, _)| tail.starts_with(token))
        {
            Some((token, kind)) => {
                out.push_str(icons.action(kind).unwrap_or(*token));
                rest = &tail[token.len()..];
            }
            None => {
                out.push('(');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
