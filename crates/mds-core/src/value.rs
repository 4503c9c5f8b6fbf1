//! Metadata values.
//!
//! Local and global metadata map string keys to [`MetaValue`]s. A value is
//! either decoded structured text (scalar, sequence, mapping) or a
//! [`ContentTree`] produced from a rich-content block. The kind is fixed by
//! the block grammar at parse time.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::node::ContentTree;

/// Key/value metadata of a step or of the whole document.
pub type Metadata = BTreeMap<String, MetaValue>;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
    Sequence(Vec<MetaValue>),
    Content(ContentTree),
    Mapping(Metadata),
}

impl MetaValue {
    /// Short name of the value's shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            MetaValue::Null => "null",
            MetaValue::Bool(_) => "a boolean",
            MetaValue::Integer(_) => "an integer",
            MetaValue::Float(_) => "a float",
            MetaValue::String(_) => "a string",
            MetaValue::Sequence(_) => "a sequence",
            MetaValue::Content(_) => "content",
            MetaValue::Mapping(_) => "a mapping",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MetaValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MetaValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Numeric value as a float; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MetaValue::Float(n) => Some(*n),
            MetaValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetaValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[MetaValue]> {
        match self {
            MetaValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&Metadata> {
        match self {
            MetaValue::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_content(&self) -> Option<&ContentTree> {
        match self {
            MetaValue::Content(tree) => Some(tree),
            _ => None,
        }
    }

    /// Look up a key when this value is a mapping.
    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.as_mapping().and_then(|map| map.get(key))
    }
}

impl From<serde_yaml::Value> for MetaValue {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;

        match value {
            Value::Null => MetaValue::Null,
            Value::Bool(b) => MetaValue::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => MetaValue::Integer(i),
                None => MetaValue::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => MetaValue::String(s),
            Value::Sequence(items) => {
                MetaValue::Sequence(items.into_iter().map(MetaValue::from).collect())
            }
            Value::Mapping(map) => MetaValue::Mapping(
                map.into_iter()
                    .filter_map(|(k, v)| yaml_key(k).map(|k| (k, MetaValue::from(v))))
                    .collect(),
            ),
            Value::Tagged(tagged) => MetaValue::from(tagged.value),
        }
    }
}

/// Stringify a scalar YAML mapping key. Non-scalar keys have no string form
/// and are dropped.
fn yaml_key(key: serde_yaml::Value) -> Option<String> {
    use serde_yaml::Value;

    match key {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => Some("null".to_string()),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        Value::Sequence(_) | Value::Mapping(_) => None,
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        MetaValue::String(s.to_string())
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        MetaValue::String(s)
    }
}

impl From<i64> for MetaValue {
    fn from(n: i64) -> Self {
        MetaValue::Integer(n)
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        MetaValue::Bool(b)
    }
}

impl From<ContentTree> for MetaValue {
    fn from(tree: ContentTree) -> Self {
        MetaValue::Content(tree)
    }
}

impl PartialEq<&str> for MetaValue {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == Some(*other)
    }
}

impl PartialEq<i64> for MetaValue {
    fn eq(&self, other: &i64) -> bool {
        self.as_i64() == Some(*other)
    }
}

impl PartialEq<bool> for MetaValue {
    fn eq(&self, other: &bool) -> bool {
        self.as_bool() == Some(*other)
    }
}
