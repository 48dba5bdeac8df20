use std::collections::BTreeMap;

use serde_json::{Map as JsonMap, Value as JsonValue};

use crate::path::{FieldPath, Segment};

/// Validation messages keyed by the path of the value they describe.
///
/// Scalars use their field path (`name`), array elements the element path
/// (`categories.0.value`) and list-level failures the array path itself
/// (`categories`). The tree is always derived from a value tree by
/// [`crate::FormSchema::validate`]; nothing else writes into it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
    messages: BTreeMap<FieldPath, String>,
}

impl ErrorTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, path: FieldPath, message: impl Into<String>) {
        self.messages.insert(path, message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn message(&self, path: &FieldPath) -> Option<&str> {
        self.messages.get(path).map(|s| s.as_str())
    }

    /// Message for a top-level field (or the list-level message of an array).
    pub fn field(&self, name: &str) -> Option<&str> {
        self.message(&FieldPath::key(name))
    }

    pub fn element(&self, array: &str, index: usize, field: &str) -> Option<&str> {
        self.message(&FieldPath::element(array, index, field))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&FieldPath, &str)> {
        self.messages.iter().map(|(p, m)| (p, m.as_str()))
    }

    /// Nested JSON mirroring the value tree; every populated node carries a
    /// `message` key: `{"categories": {"message": .., "0": {"value": {"message": ..}}}}`.
    pub fn to_json(&self) -> JsonValue {
        let mut root = JsonMap::new();
        for (path, message) in &self.messages {
            insert_message(&mut root, path.segments(), message);
        }
        JsonValue::Object(root)
    }
}

fn insert_message(node: &mut JsonMap<String, JsonValue>, segments: &[Segment], message: &str) {
    let Some((first, rest)) = segments.split_first() else {
        node.insert("message".into(), JsonValue::String(message.to_string()));
        return;
    };
    let child = node
        .entry(first.to_string())
        .or_insert_with(|| JsonValue::Object(JsonMap::new()));
    if let JsonValue::Object(inner) = child {
        insert_message(inner, rest, message);
    }
}
