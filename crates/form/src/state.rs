//! Form runtime (mutable) state.
//!
//! Holds the current editing state of one form:
//!   * scalar values and which of them were touched
//!   * one [`FieldArray`] per array field
//!   * the last computed [`ErrorTree`] and how often submit was requested
//!
//! Only the session writes the error tree; renderers read snapshots and go
//! through bindings and array operations for every change.

use std::collections::{BTreeMap, BTreeSet};

use tracing::error;

use crate::array::{EntryId, FieldArray};
use crate::error_tree::ErrorTree;
use crate::errors::{FormError, Result};
use crate::path::{FieldPath, Segment};
use crate::schema::FormSchema;
use crate::value::{Value, ValueTree};

/// What a bound path points at after resolution against the schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Target {
    Scalar(String),
    Element {
        array: String,
        id: EntryId,
        field: String,
    },
}

#[derive(Debug, Clone, Default)]
pub(crate) struct FormState {
    pub(crate) values: BTreeMap<String, Value>,
    pub(crate) touched: BTreeSet<String>,
    pub(crate) arrays: BTreeMap<String, FieldArray>,
    pub(crate) errors: ErrorTree,
    pub(crate) submit_count: usize,
}

impl FormState {
    /// Fresh state holding the schema's defaults.
    pub(crate) fn from_schema(schema: &FormSchema) -> Self {
        let mut state = FormState::default();
        for field in &schema.fields {
            if field.is_array() {
                let mut array = FieldArray::new(field.name.clone(), field.element_defaults());
                if let Some(Value::List(records)) = &field.default {
                    if let Err(err) = array.replace(records.iter().cloned()) {
                        error!(%err, field = %field.name, "default entries ignored");
                    }
                }
                state.arrays.insert(field.name.clone(), array);
            } else if let Some(default) = &field.default {
                state.values.insert(field.name.clone(), default.clone());
            }
        }
        state
    }

    pub(crate) fn field_array(&self, name: &str) -> Option<&FieldArray> {
        self.arrays.get(name)
    }

    pub(crate) fn field_array_mut(&mut self, name: &str) -> Result<&mut FieldArray> {
        self.arrays
            .get_mut(name)
            .ok_or_else(|| FormError::UnknownArray(name.to_string()))
    }

    /// Snapshot of all values as the tree validation and the submit sink see.
    pub(crate) fn value_tree(&self) -> ValueTree {
        let mut tree: ValueTree = self
            .values
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        for (name, array) in &self.arrays {
            tree.insert(name.clone(), Value::List(array.records()));
        }
        tree
    }

    /// Map a path onto a scalar field or an array entry field.
    pub(crate) fn resolve(&self, schema: &FormSchema, path: &FieldPath) -> Result<Target> {
        let unknown = || FormError::UnknownField(path.clone());
        match path.segments() {
            [Segment::Key(name)] => {
                let field = schema.field(name).ok_or_else(unknown)?;
                if field.is_array() {
                    return Err(FormError::NotBindable(path.clone()));
                }
                Ok(Target::Scalar(name.clone()))
            }
            [Segment::Key(name), Segment::Index(index), Segment::Key(element)] => {
                let field = schema.field(name).ok_or_else(unknown)?;
                field.element_field(element).ok_or_else(unknown)?;
                let array = self
                    .arrays
                    .get(name)
                    .ok_or_else(|| FormError::UnknownArray(name.clone()))?;
                let id = array.id_at(*index).ok_or(FormError::IndexOutOfRange {
                    array: name.clone(),
                    index: *index,
                    len: array.len(),
                })?;
                Ok(Target::Element {
                    array: name.clone(),
                    id,
                    field: element.clone(),
                })
            }
            _ => Err(unknown()),
        }
    }

    pub(crate) fn read(&self, target: &Target) -> Option<&Value> {
        match target {
            Target::Scalar(name) => self.values.get(name),
            Target::Element { array, id, field } => {
                self.arrays.get(array).and_then(|a| a.value(*id, field))
            }
        }
    }

    pub(crate) fn write(&mut self, target: &Target, value: Value) -> Result<()> {
        match target {
            Target::Scalar(name) => {
                self.values.insert(name.clone(), value);
                self.touched.insert(name.clone());
                Ok(())
            }
            Target::Element { array, id, field } => {
                self.field_array_mut(array)?.set_value(*id, field, value)
            }
        }
    }

    pub(crate) fn is_touched(&self, target: &Target) -> bool {
        match target {
            Target::Scalar(name) => self.touched.contains(name),
            Target::Element { array, id, field } => self
                .arrays
                .get(array)
                .is_some_and(|a| a.is_touched(*id, field)),
        }
    }

    /// Current path of a target; element paths follow the entry's position.
    pub(crate) fn path_of(&self, target: &Target) -> Option<FieldPath> {
        match target {
            Target::Scalar(name) => Some(FieldPath::key(name.clone())),
            Target::Element { array, id, field } => self
                .arrays
                .get(array)
                .and_then(|a| a.field_path(*id, field).ok()),
        }
    }
}
