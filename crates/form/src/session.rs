//! Form session: the aggregate root a renderer talks to.
//!
//! It owns the schema, the editing state and the submit sink. Renderers read
//! `values()` / `errors()` snapshots and change state only through
//! [`FormSession::bind`] and the array operations.
//!
//! The error tree is recomputed at two checkpoints: on `submit()` and after
//! every structural array change. Plain value edits never validate.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::array::{EntryId, FieldArray};
use crate::binding::FieldBinding;
use crate::error_tree::ErrorTree;
use crate::errors::{FormError, Result};
use crate::path::{FieldPath, IntoFieldPath};
use crate::schema::FormSchema;
use crate::state::FormState;
use crate::value::{Record, Value, ValueTree};

/// Receives the value tree of every successful submit.
pub trait SubmitSink {
    fn submit(&mut self, values: &ValueTree);
}

impl<F> SubmitSink for F
where
    F: FnMut(&ValueTree),
{
    fn submit(&mut self, values: &ValueTree) {
        self(values)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// The sink received the values.
    Submitted,
    /// Validation failed; the error tree was published and the sink not called.
    Invalid,
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted)
    }
}

pub struct FormSession {
    schema: Arc<FormSchema>,
    state: FormState,
    sink: Box<dyn SubmitSink>,
}

impl FormSession {
    pub fn new(schema: impl Into<Arc<FormSchema>>, sink: impl SubmitSink + 'static) -> Self {
        let schema = schema.into();
        let state = FormState::from_schema(&schema);
        debug!(form = %schema.title, fields = schema.field_count(), "form session created");
        Self {
            schema,
            state,
            sink: Box::new(sink),
        }
    }

    pub fn schema(&self) -> &FormSchema {
        &self.schema
    }

    /// Snapshot of every current value.
    pub fn values(&self) -> ValueTree {
        self.state.value_tree()
    }

    /// Error tree from the last checkpoint.
    pub fn errors(&self) -> &ErrorTree {
        &self.state.errors
    }

    pub fn submit_count(&self) -> usize {
        self.state.submit_count
    }

    /// Bind a scalar field (`name`) or an array element field
    /// (`categories.0.value`). Unknown paths are shape errors.
    pub fn bind(&mut self, path: impl IntoFieldPath) -> Result<FieldBinding<'_>> {
        let path = path.into_field_path().map_err(shape_error)?;
        let target = self
            .state
            .resolve(&self.schema, &path)
            .map_err(shape_error)?;
        Ok(FieldBinding::new(&mut self.state, target))
    }

    /// Shorthand for `bind(path)?.set(value)`.
    pub fn set(&mut self, path: impl IntoFieldPath, value: impl Into<Value>) -> Result<()> {
        self.bind(path)?.set(value)
    }

    pub fn field_array(&self, name: &str) -> Result<&FieldArray> {
        self.state
            .field_array(name)
            .ok_or_else(|| shape_error(FormError::UnknownArray(name.to_string())))
    }

    pub fn append(&mut self, array: &str) -> Result<EntryId> {
        let id = self.array_mut(array)?.append();
        self.publish();
        Ok(id)
    }

    pub fn insert(&mut self, array: &str, index: usize) -> Result<EntryId> {
        let id = self.array_mut(array)?.insert(index).map_err(shape_error)?;
        self.publish();
        Ok(id)
    }

    pub fn remove(&mut self, array: &str, id: EntryId) -> Result<Record> {
        let record = self.array_mut(array)?.remove(id).map_err(shape_error)?;
        self.publish();
        Ok(record)
    }

    pub fn move_entry(&mut self, array: &str, id: EntryId, to: usize) -> Result<()> {
        self.array_mut(array)?
            .move_entry(id, to)
            .map_err(shape_error)?;
        self.publish();
        Ok(())
    }

    pub fn swap(&mut self, array: &str, a: EntryId, b: EntryId) -> Result<()> {
        self.array_mut(array)?.swap(a, b).map_err(shape_error)?;
        self.publish();
        Ok(())
    }

    /// Validate the current values without publishing the result.
    pub fn validate(&self) -> ErrorTree {
        self.schema.validate(&self.state.value_tree())
    }

    pub fn is_valid(&self) -> bool {
        self.validate().is_empty()
    }

    /// Recompute and publish the error tree.
    pub fn revalidate(&mut self) -> &ErrorTree {
        self.publish();
        &self.state.errors
    }

    /// Validate once; on success hand the values to the sink, otherwise
    /// publish the errors and leave the sink alone.
    pub fn submit(&mut self) -> SubmitOutcome {
        self.state.submit_count += 1;
        let values = self.state.value_tree();
        let errors = self.schema.validate(&values);
        let outcome = if errors.is_empty() {
            info!(form = %self.schema.title, "form submitted");
            self.sink.submit(&values);
            SubmitOutcome::Submitted
        } else {
            info!(
                form = %self.schema.title,
                errors = errors.len(),
                "submit rejected by validation"
            );
            SubmitOutcome::Invalid
        };
        self.state.errors = errors;
        outcome
    }

    /// Message for `path` if the renderer should show it yet: after the first
    /// submit, or once the field was touched.
    pub fn visible_error(&self, path: &FieldPath) -> Option<&str> {
        let message = self.state.errors.message(path)?;
        let touched = self
            .state
            .resolve(&self.schema, path)
            .map(|target| self.state.is_touched(&target))
            .unwrap_or(false);
        (self.state.submit_count > 0 || touched).then_some(message)
    }

    /// Back to the schema defaults: values, entries, touched flags, errors and
    /// the submit count.
    pub fn reset(&mut self) {
        self.state = FormState::from_schema(&self.schema);
        debug!(form = %self.schema.title, "form reset");
    }

    /// Reset, then take `values` as the new starting point. Loaded values are
    /// not marked touched. Entry records missing element fields get their
    /// defaults.
    ///
    /// All or nothing: on a shape error the session keeps its current state.
    pub fn load(&mut self, values: &ValueTree) -> Result<()> {
        let mut next = FormState::from_schema(&self.schema);
        for (name, value) in values.iter() {
            let field = self
                .schema
                .field(name)
                .ok_or_else(|| shape_error(FormError::UnknownField(FieldPath::key(name.clone()))))?;
            match (field.is_array(), value) {
                (true, Value::List(records)) => {
                    next.field_array_mut(name)
                        .and_then(|array| array.replace(records.iter().cloned()))
                        .map_err(shape_error)?;
                }
                (true, _) => {
                    return Err(shape_error(FormError::NotBindable(FieldPath::key(
                        name.clone(),
                    ))));
                }
                (false, v) => {
                    next.values.insert(name.clone(), v.clone());
                }
            }
        }
        self.state = next;
        debug!(form = %self.schema.title, fields = values.len(), "values loaded");
        Ok(())
    }

    /// Current path of `field` inside entry `id` of `array`.
    pub fn field_path(&self, array: &str, id: EntryId, field: &str) -> Result<FieldPath> {
        self.field_array(array)?
            .field_path(id, field)
            .map_err(shape_error)
    }

    fn array_mut(&mut self, name: &str) -> Result<&mut FieldArray> {
        self.state.field_array_mut(name).map_err(shape_error)
    }

    fn publish(&mut self) {
        self.state.errors = self.validate();
    }
}

fn shape_error(err: FormError) -> FormError {
    error!(%err, "form shape error");
    err
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldKind, FieldSchema};
    use std::cell::RefCell;
    use std::rc::Rc;

    fn schema() -> FormSchema {
        FormSchema::new(
            "Test",
            vec![
                FieldSchema::new("name", "Name", FieldKind::Text).required("name required"),
                FieldSchema::new(
                    "tags",
                    "Tags",
                    FieldKind::Array {
                        element: vec![FieldSchema::new("value", "Tag", FieldKind::Text)
                            .required("tag required")],
                    },
                ),
            ],
        )
    }

    #[test]
    fn set_is_visible_without_validating() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        session.set("name", "").unwrap();
        assert!(session.errors().is_empty());

        let binding = session.bind("name").unwrap();
        assert!(binding.is_touched());
        assert_eq!(binding.text(), "");
    }

    #[test]
    fn shape_errors_are_returned() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        assert!(matches!(session.bind("missing"), Err(FormError::UnknownField(_))));
        assert!(matches!(session.bind("tags"), Err(FormError::NotBindable(_))));
        assert!(matches!(
            session.bind("tags.0.value"),
            Err(FormError::IndexOutOfRange { index: 0, len: 0, .. })
        ));
        assert!(matches!(session.bind("tags.."), Err(FormError::InvalidPath(_))));
        assert!(matches!(session.append("name"), Err(FormError::UnknownArray(_))));
    }

    #[test]
    fn structural_changes_republish_errors() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        let id = session.append("tags").unwrap();
        assert_eq!(session.errors().element("tags", 0, "value"), Some("tag required"));
        assert_eq!(session.errors().field("name"), Some("name required"));

        session.remove("tags", id).unwrap();
        assert!(session.errors().element("tags", 0, "value").is_none());
    }

    #[test]
    fn visible_error_waits_for_touch_or_submit() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        session.revalidate();
        let name = FieldPath::key("name");
        assert!(session.errors().message(&name).is_some());
        assert_eq!(session.visible_error(&name), None);

        session.submit();
        assert_eq!(session.visible_error(&name), Some("name required"));
    }

    #[test]
    fn touched_field_shows_its_error_before_submit() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        session.set("name", "").unwrap();
        session.revalidate();

        assert_eq!(session.submit_count(), 0);
        assert_eq!(session.visible_error(&FieldPath::key("name")), Some("name required"));
    }

    #[test]
    fn touched_element_error_follows_its_entry() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        let first = session.append("tags").unwrap();
        let second = session.append("tags").unwrap();
        session.set("tags.1.value", "").unwrap();

        session.remove("tags", first).unwrap();
        let third = session.append("tags").unwrap();

        assert_eq!(
            session.field_path("tags", second, "value").unwrap(),
            FieldPath::element("tags", 0, "value")
        );
        assert_eq!(
            session.visible_error(&FieldPath::element("tags", 0, "value")),
            Some("tag required")
        );
        assert_eq!(
            session.field_path("tags", third, "value").unwrap(),
            FieldPath::element("tags", 1, "value")
        );
        assert_eq!(session.visible_error(&FieldPath::element("tags", 1, "value")), None);
        assert!(matches!(
            session.field_path("tags", first, "value"),
            Err(FormError::UnknownEntry { .. })
        ));
    }

    #[test]
    fn failed_load_keeps_current_state() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        session.set("name", "Ana").unwrap();
        let id = session.append("tags").unwrap();
        session.set("tags.0.value", "x").unwrap();

        let mut unknown_key = ValueTree::new();
        unknown_key.insert("age", "3");
        unknown_key.insert("name", "Bea");
        assert!(matches!(
            session.load(&unknown_key),
            Err(FormError::UnknownField(_))
        ));

        let mut foreign_element = ValueTree::new();
        foreign_element.insert("tags", vec![crate::value::record([("bogus", "zzz")])]);
        assert!(matches!(
            session.load(&foreign_element),
            Err(FormError::UnknownField(_))
        ));

        assert_eq!(session.values().field("name"), Some(&Value::from("Ana")));
        assert_eq!(session.field_array("tags").unwrap().ids(), &[id]);
        assert!(session.bind("name").unwrap().is_touched());
    }

    #[test]
    fn sink_runs_once_per_successful_submit() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let seen = Rc::clone(&seen);
            move |values: &ValueTree| seen.borrow_mut().push(values.clone())
        };
        let mut session = FormSession::new(schema(), sink);

        assert_eq!(session.submit(), SubmitOutcome::Invalid);
        assert!(seen.borrow().is_empty());

        session.set("name", "Ana").unwrap();
        assert_eq!(session.submit(), SubmitOutcome::Submitted);
        assert_eq!(session.submit(), SubmitOutcome::Submitted);
        assert_eq!(seen.borrow().len(), 2);
        assert_eq!(session.submit_count(), 3);
    }

    #[test]
    fn reset_and_load_restore_a_starting_point() {
        let mut session = FormSession::new(schema(), |_: &ValueTree| {});
        session.set("name", "Ana").unwrap();
        session.append("tags").unwrap();
        session.submit();

        session.reset();
        assert_eq!(session.submit_count(), 0);
        assert!(session.values().field("name").is_none());
        assert!(session.field_array("tags").unwrap().is_empty());

        let mut initial = ValueTree::new();
        initial.insert("name", "Bea");
        initial.insert(
            "tags",
            vec![crate::value::record([("value", "x")])],
        );
        session.load(&initial).unwrap();
        assert_eq!(session.values(), initial);
        assert!(!session.bind("name").unwrap().is_touched());
    }
}
