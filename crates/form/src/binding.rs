//! Field binding: the read/write accessor pair a control renders through.
//!
//! A control never owns its value. It reads `value()` and reports edits with
//! `set()`; both go straight to the session state, so the displayed value and
//! the validated value cannot drift apart. Writing never validates.

use tracing::trace;

use crate::array::EntryId;
use crate::errors::Result;
use crate::path::FieldPath;
use crate::state::{FormState, Target};
use crate::value::Value;

pub struct FieldBinding<'a> {
    state: &'a mut FormState,
    target: Target,
}

impl<'a> FieldBinding<'a> {
    pub(crate) fn new(state: &'a mut FormState, target: Target) -> Self {
        Self { state, target }
    }

    /// Path of the bound leaf right now. For array elements this follows the
    /// entry when entries before it are removed.
    pub fn path(&self) -> Option<FieldPath> {
        self.state.path_of(&self.target)
    }

    /// Identity of the bound array entry; `None` for scalar fields.
    pub fn entry_id(&self) -> Option<EntryId> {
        match &self.target {
            Target::Element { id, .. } => Some(*id),
            Target::Scalar(_) => None,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.state.read(&self.target)
    }

    /// Text content, or `""` for absent and non-text values.
    pub fn text(&self) -> &str {
        self.value().and_then(Value::as_text).unwrap_or("")
    }

    /// Checkbox state; absent counts as unchecked.
    pub fn checked(&self) -> bool {
        self.value().and_then(Value::as_bool).unwrap_or(false)
    }

    /// Commit a new value. Visible to the next read and the next validation.
    /// Marks the field touched.
    pub fn set(&mut self, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        trace!(target_field = ?self.target, %value, "field set");
        self.state.write(&self.target, value)
    }

    pub fn is_touched(&self) -> bool {
        self.state.is_touched(&self.target)
    }

    /// This field's own message from the last validation, if any.
    pub fn error(&self) -> Option<&str> {
        let path = self.path()?;
        self.state.errors.message(&path)
    }
}
