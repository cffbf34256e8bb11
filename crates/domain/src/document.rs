//! Loosely-typed remote documents.
//!
//! The sheet service returns sparse JSON trees whose fields may be missing,
//! `null`, or stored as strings where numbers are expected. `Document` owns such
//! a tree and [`Node`] offers typed accessors over it:
//!
//! - absent and `null` values are equivalent and always fall back to the default
//! - a present value of the wrong JSON type is a [`DocumentError::TypeMismatch`]
//! - integers stored as numeric strings (`"12"`) are accepted
//!
//! Paths are slices of keys. A segment addressing an array is parsed as an index.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Errors raised when a present value cannot be read as the requested type.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DocumentError {
    #[error("Field '{path}' has type {found}, expected {expected}")]
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

impl DocumentError {
    fn mismatch(path: &[&str], expected: &'static str, found: &Value) -> Self {
        Self::TypeMismatch {
            path: path.join("."),
            expected,
            found: kind(found),
        }
    }
}

/// An owned remote document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// An empty object, used for caches that have never been filled.
    pub fn empty() -> Self {
        Self(Value::Object(Map::new()))
    }

    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw).map(Self)
    }

    pub fn node(&self) -> Node<'_> {
        Node(&self.0)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// True for `null`, `{}` and `[]`.
    pub fn is_empty(&self) -> bool {
        self.node().is_empty()
    }

    pub fn is_object(&self) -> bool {
        self.0.is_object()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.as_object().is_some_and(|m| m.contains_key(key))
    }

    /// Moves a top-level field out of the document. `null` counts as absent.
    pub fn into_field(self, key: &str) -> Option<Document> {
        match self.0 {
            Value::Object(mut map) => map
                .remove(key)
                .filter(|v| !v.is_null())
                .map(Document),
            _ => None,
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::empty()
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Borrowed view into a document tree.
#[derive(Debug, Clone, Copy)]
pub struct Node<'a>(&'a Value);

impl<'a> Node<'a> {
    pub fn value(&self) -> &'a Value {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        match self.0 {
            Value::Null => true,
            Value::Object(m) => m.is_empty(),
            Value::Array(a) => a.is_empty(),
            _ => false,
        }
    }

    /// Resolves a path. Returns `None` when any segment is missing or `null`.
    pub fn get(&self, path: &[&str]) -> Option<Node<'a>> {
        let mut current = self.0;
        for segment in path {
            current = match current {
                Value::Object(map) => map.get(*segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        if current.is_null() {
            None
        } else {
            Some(Node(current))
        }
    }

    pub fn has(&self, path: &[&str]) -> bool {
        self.get(path).is_some()
    }

    /// Reads a string. Numbers and booleans are rendered as text.
    pub fn get_opt_str(&self, path: &[&str]) -> Result<Option<String>, DocumentError> {
        match self.get(path).map(|n| n.0) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(Value::Bool(b)) => Ok(Some(b.to_string())),
            Some(other) => Err(DocumentError::mismatch(path, "string", other)),
        }
    }

    pub fn get_str(&self, path: &[&str], default: &str) -> Result<String, DocumentError> {
        Ok(self
            .get_opt_str(path)?
            .unwrap_or_else(|| default.to_string()))
    }

    /// Like [`Node::get_opt_str`] but treats an empty string as absent.
    pub fn get_non_empty_str(&self, path: &[&str]) -> Result<Option<String>, DocumentError> {
        Ok(self.get_opt_str(path)?.filter(|s| !s.is_empty()))
    }

    /// Reads an integer from a number or a numeric string.
    pub fn get_opt_int(&self, path: &[&str]) -> Result<Option<i64>, DocumentError> {
        let Some(node) = self.get(path) else {
            return Ok(None);
        };
        match node.0 {
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    return Ok(Some(i));
                }
                match n.as_f64() {
                    Some(f) if f.fract() == 0.0 && f.abs() < i64::MAX as f64 => {
                        Ok(Some(f as i64))
                    }
                    _ => Err(DocumentError::mismatch(path, "integer", node.0)),
                }
            }
            Value::String(s) => s
                .trim()
                .parse::<i64>()
                .map(Some)
                .map_err(|_| DocumentError::mismatch(path, "integer", node.0)),
            other => Err(DocumentError::mismatch(path, "integer", other)),
        }
    }

    pub fn get_int(&self, path: &[&str], default: i64) -> Result<i64, DocumentError> {
        Ok(self.get_opt_int(path)?.unwrap_or(default))
    }

    /// Reads an integer, falling back to `default` on absence *and* on any
    /// unparsable value.
    pub fn parse_int_or(&self, path: &[&str], default: i64) -> i64 {
        self.get_opt_int(path).ok().flatten().unwrap_or(default)
    }

    /// Array elements at `path`; absent means no elements.
    pub fn items(&self, path: &[&str]) -> Result<Vec<Node<'a>>, DocumentError> {
        match self.get(path).map(|n| n.0) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.iter().map(Node).collect()),
            Some(other) => Err(DocumentError::mismatch(path, "array", other)),
        }
    }

    /// Human-readable rendering of whatever sits at `path`.
    ///
    /// Arrays are joined with `", "`; objects fall back to compact JSON.
    pub fn display(&self, path: &[&str]) -> Option<String> {
        self.get(path).map(|n| render(n.0))
    }

    pub fn display_or(&self, path: &[&str], default: &str) -> String {
        self.display(path).unwrap_or_else(|| default.to_string())
    }
}

fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Array(items) => items
            .iter()
            .filter(|v| !v.is_null())
            .map(render)
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
