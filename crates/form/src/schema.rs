//! Form schema: the ordered set of field definitions plus the interpreter
//! that turns a [`ValueTree`] into an [`ErrorTree`].
//!
//! Validation is a pure function of the value tree. It never fails: absent
//! and malformed values are reported as messages like any other violation.
//!
//! ```ignore
//! use form::{FieldKind, FieldSchema, FormSchema};
//!
//! let schema = FormSchema::new("Contact", vec![
//!     FieldSchema::new("name", "Name", FieldKind::Text).required("Name is required"),
//!     FieldSchema::new("categories", "Categories", FieldKind::Array {
//!         element: vec![FieldSchema::new("value", "Category", FieldKind::Text)
//!             .one_of(["A", "B"], "Pick a category")],
//!     })
//!     .min_items(1, "Pick a category"),
//! ]);
//! let errors = schema.validate(&values);
//! ```

use tracing::trace;

use crate::error_tree::ErrorTree;
use crate::field::FieldSchema;
use crate::path::{FieldPath, Segment};
use crate::value::{Value, ValueTree};

/// Declarative schema for a multi-field form.
#[derive(Debug, Clone)]
pub struct FormSchema {
    pub title: String,
    pub fields: Vec<FieldSchema>,
}

impl FormSchema {
    pub fn new(title: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            title: title.into(),
            fields,
        }
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn field(&self, name: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Initial values: every field with a declared default, and an empty list
    /// for every array field without one.
    pub fn default_values(&self) -> ValueTree {
        let mut tree = ValueTree::new();
        for field in &self.fields {
            match (&field.default, field.is_array()) {
                (Some(v), _) => {
                    tree.insert(field.name.clone(), v.clone());
                }
                (None, true) => {
                    tree.insert(field.name.clone(), Value::List(Vec::new()));
                }
                (None, false) => {}
            }
        }
        tree
    }

    /// Recompute every message for `values`.
    ///
    /// Each field is checked independently and stops at its first failure.
    /// Array fields additionally validate every element against the element
    /// schema; element messages are independent of the list-level message.
    pub fn validate(&self, values: &ValueTree) -> ErrorTree {
        let mut errors = ErrorTree::new();
        for field in &self.fields {
            let path = FieldPath::key(field.name.clone());
            validate_field(field, values.field(&field.name), &path, &mut errors);
        }
        trace!(
            form = %self.title,
            messages = errors.len(),
            "validated form values"
        );
        errors
    }
}

fn validate_field(
    field: &FieldSchema,
    value: Option<&Value>,
    path: &FieldPath,
    errors: &mut ErrorTree,
) {
    if let Some(message) = field.first_failure(value, path) {
        errors.insert(path.clone(), message);
    }

    let Some(Value::List(items)) = value else {
        return;
    };
    for (index, record) in items.iter().enumerate() {
        let entry_path = path.child(Segment::Index(index));
        for element in field.element_fields() {
            let element_path = entry_path.child(Segment::Key(element.name.clone()));
            validate_field(element, record.get(&element.name), &element_path, errors);
        }
    }
}
