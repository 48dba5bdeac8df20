//! Primitive values exchanged with the renderer and the submitted value tree.
//!
//! Only three shapes exist: text (free text and single-choice selections),
//! booleans (checkboxes) and ordered lists of records (field arrays).
//! Serialization is untagged so the submitted tree is plain JSON:
//! `{"name": "Ana", "tycs": true, "categories": [{"value": "A"}]}`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::{FieldPath, Segment};

/// One sub-record of a field array, keyed by element field name.
pub type Record = BTreeMap<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Text(String),
    List(Vec<Record>),
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Record]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Record>> for Value {
    fn from(items: Vec<Record>) -> Self {
        Value::List(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Text(s) => write!(f, "{s}"),
            Value::List(items) => write!(f, "[{} item(s)]", items.len()),
        }
    }
}

/// Build a record from `(field, value)` pairs.
pub fn record<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Record
where
    K: Into<String>,
    V: Into<Value>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Snapshot of every current field value, keyed by top-level field name.
///
/// Absent optional fields are missing keys, never placeholder values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValueTree(BTreeMap<String, Value>);

impl ValueTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(name.into(), value.into())
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.remove(name)
    }

    /// Resolve a path through records and list indices.
    pub fn get(&self, path: &FieldPath) -> Option<&Value> {
        let mut segments = path.segments().iter();
        let mut current = match segments.next()? {
            Segment::Key(k) => self.0.get(k)?,
            Segment::Index(_) => return None,
        };
        while let Some(segment) = segments.next() {
            let Segment::Index(i) = segment else {
                return None;
            };
            let entry = current.as_list()?.get(*i)?;
            let Some(Segment::Key(field)) = segments.next() else {
                return None;
            };
            current = entry.get(field)?;
        }
        Some(current)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }

    pub fn from_json(value: serde_json::Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for ValueTree {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        ValueTree(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolves_nested_element_paths() {
        let mut tree = ValueTree::new();
        tree.insert("name", "Ana");
        tree.insert(
            "categories",
            vec![record([("value", "A")]), record([("value", "B")])],
        );

        let second: FieldPath = "categories.1.value".parse().unwrap();
        assert_eq!(tree.get(&second), Some(&Value::from("B")));
        assert_eq!(tree.get(&FieldPath::key("name")), Some(&Value::from("Ana")));
        assert!(tree.get(&"categories.2.value".parse().unwrap()).is_none());
        assert!(tree.get(&"name.0".parse().unwrap()).is_none());
    }

    #[test]
    fn json_shape_is_plain() {
        let tree: ValueTree = [
            ("name", Value::from("Ana")),
            ("tycs", Value::from(true)),
            ("categories", Value::from(vec![record([("value", "A")])])),
        ]
        .into_iter()
        .collect();

        assert_eq!(
            tree.to_json(),
            json!({"name": "Ana", "tycs": true, "categories": [{"value": "A"}]})
        );

        let back = ValueTree::from_json(tree.to_json()).unwrap();
        assert_eq!(back, tree);
    }
}
