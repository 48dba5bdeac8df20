//! Field definitions: what a field holds, how it is labelled and which rules
//! apply to it.
//!
//! ```ignore
//! use form::{FieldKind, FieldSchema};
//!
//! let name = FieldSchema::new("name", "Name", FieldKind::Text)
//!     .required("Please enter your name");
//! ```

use crate::path::FieldPath;
use crate::rule::{Rule, Stage};
use crate::value::{Record, Value};

/// One option of a single-choice selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub value: String,
    pub label: String,
}

impl Choice {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose label is its value.
    pub fn plain(value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            label: value.clone(),
            value,
        }
    }
}

/// The primitive control a field is rendered with, which also fixes the value
/// shape it accepts.
///
/// - `Text` / `TextArea` / `Select` hold `Value::Text`
/// - `Bool` holds `Value::Bool`
/// - `Array` holds `Value::List`, one record per entry shaped by `element`
#[derive(Debug, Clone)]
pub enum FieldKind {
    Text,
    TextArea,
    Select { options: Vec<Choice> },
    Bool,
    Array { element: Vec<FieldSchema> },
}

impl FieldKind {
    /// Whether `value` has the shape this kind stores.
    pub fn accepts(&self, value: &Value) -> bool {
        matches!(
            (self, value),
            (
                FieldKind::Text | FieldKind::TextArea | FieldKind::Select { .. },
                Value::Text(_)
            ) | (FieldKind::Bool, Value::Bool(_))
                | (FieldKind::Array { .. }, Value::List(_))
        )
    }
}

/// Declarative description of a single field.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    pub name: String,
    pub label: String,
    pub kind: FieldKind,
    pub default: Option<Value>,
    pub type_message: Option<String>,
    rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(name: impl Into<String>, label: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            kind,
            default: None,
            type_message: None,
            rules: Vec::new(),
        }
    }

    /// Initial value used when a session starts or resets.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Message reported when the stored value has the wrong shape.
    pub fn type_message(mut self, message: impl Into<String>) -> Self {
        self.type_message = Some(message.into());
        self
    }

    /// Attach a rule. Rules are kept in stage order; rules of the same stage
    /// keep the order they were added in.
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self.rules.sort_by_key(Rule::stage);
        self
    }

    pub fn required(self, message: impl Into<String>) -> Self {
        self.rule(Rule::required(message))
    }

    pub fn one_of<S: Into<String>>(
        self,
        options: impl IntoIterator<Item = S>,
        message: impl Into<String>,
    ) -> Self {
        self.rule(Rule::one_of(options, message))
    }

    pub fn min_length(self, min: usize, message: impl Into<String>) -> Self {
        self.rule(Rule::min_length(min, message))
    }

    pub fn custom(
        self,
        message: impl Into<String>,
        predicate: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.rule(Rule::custom(message, predicate))
    }

    pub fn min_items(self, min: usize, message: impl Into<String>) -> Self {
        self.rule(Rule::min_items(min, message))
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn is_array(&self) -> bool {
        matches!(self.kind, FieldKind::Array { .. })
    }

    /// Element fields of an array field; empty for scalars.
    pub fn element_fields(&self) -> &[FieldSchema] {
        match &self.kind {
            FieldKind::Array { element } => element,
            _ => &[],
        }
    }

    pub fn element_field(&self, name: &str) -> Option<&FieldSchema> {
        self.element_fields().iter().find(|f| f.name == name)
    }

    /// Record a freshly appended entry starts with: each element field's
    /// default, or `""` for text-like fields and `false` for checkboxes.
    pub fn element_defaults(&self) -> Record {
        self.element_fields()
            .iter()
            .map(|f| {
                let value = match (&f.default, &f.kind) {
                    (Some(v), _) => v.clone(),
                    (None, FieldKind::Bool) => Value::Bool(false),
                    (None, FieldKind::Array { .. }) => Value::List(Vec::new()),
                    (None, _) => Value::Text(String::new()),
                };
                (f.name.clone(), value)
            })
            .collect()
    }

    /// First failing check for this field, in stage order: presence, shape of
    /// the stored value, then the remaining rules. `None` means valid.
    pub fn first_failure(&self, value: Option<&Value>, path: &FieldPath) -> Option<String> {
        let (presence, rest): (Vec<&Rule>, Vec<&Rule>) = self
            .rules
            .iter()
            .partition(|r| r.stage() == Stage::Presence);

        for rule in presence {
            if let Err(message) = rule.check(value) {
                return Some(message.to_string());
            }
        }

        if let Some(v) = value {
            if !self.kind.accepts(v) {
                return Some(
                    self.type_message
                        .clone()
                        .unwrap_or_else(|| format!("{path} has the wrong type")),
                );
            }
        }

        rest.into_iter()
            .find_map(|rule| rule.check(value).err().map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rules_are_stage_sorted() {
        let field = FieldSchema::new("question", "Question", FieldKind::TextArea)
            .min_length(10, "too short")
            .required("required");
        let stages: Vec<Stage> = field.rules().iter().map(Rule::stage).collect();
        assert_eq!(stages, vec![Stage::Presence, Stage::Shape]);
    }

    #[test]
    fn first_failure_short_circuits() {
        let field = FieldSchema::new("question", "Question", FieldKind::TextArea)
            .min_length(10, "too short")
            .required("required");
        let path = FieldPath::key("question");

        assert_eq!(field.first_failure(None, &path).as_deref(), Some("required"));
        assert_eq!(
            field.first_failure(Some(&Value::from("")), &path).as_deref(),
            Some("required")
        );
        assert_eq!(
            field.first_failure(Some(&Value::from("short")), &path).as_deref(),
            Some("too short")
        );
        assert_eq!(field.first_failure(Some(&Value::from("long enough!")), &path), None);
    }

    #[test]
    fn wrong_shape_reports_type_message() {
        let field = FieldSchema::new("name", "Name", FieldKind::Text);
        let path = FieldPath::key("name");
        assert_eq!(
            field.first_failure(Some(&Value::from(true)), &path).as_deref(),
            Some("name has the wrong type")
        );

        let field = field.type_message("Name must be text");
        assert_eq!(
            field.first_failure(Some(&Value::from(true)), &path).as_deref(),
            Some("Name must be text")
        );
    }

    #[test]
    fn element_defaults_follow_kinds() {
        let array = FieldSchema::new(
            "categories",
            "Categories",
            FieldKind::Array {
                element: vec![
                    FieldSchema::new("value", "Category", FieldKind::Text),
                    FieldSchema::new("primary", "Primary", FieldKind::Bool),
                ],
            },
        );
        let defaults = array.element_defaults();
        assert_eq!(defaults.get("value"), Some(&Value::from("")));
        assert_eq!(defaults.get("primary"), Some(&Value::from(false)));
    }
}
