//! Field array manager.
//!
//! Entries live in an arena keyed by a stable [`EntryId`]; the list order is
//! kept separately. A positional index is only ever derived from that order,
//! so removing or moving one entry re-numbers the others without touching
//! their identity, their record or their per-entry UI state (touched flags).
//! Renderers should key repeated controls by `EntryId`, never by index.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use tracing::debug;
use uuid::Uuid;

use crate::errors::{FormError, Result};
use crate::path::{FieldPath, Segment};
use crate::value::{Record, Value};

/// Opaque identity of one array entry. Never reused within a process.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntryId(Uuid);

impl EntryId {
    fn fresh() -> Self {
        EntryId(Uuid::new_v4())
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrayStatus {
    Empty,
    NonEmpty,
}

#[derive(Debug, Clone)]
struct ArrayEntry {
    record: Record,
    touched: BTreeSet<String>,
}

/// Read-only view of one entry at its current position.
#[derive(Debug, Clone, Copy)]
pub struct EntryView<'a> {
    pub id: EntryId,
    pub index: usize,
    pub record: &'a Record,
    array: &'a str,
}

impl EntryView<'_> {
    /// `<array>.<index>`
    pub fn path(&self) -> FieldPath {
        FieldPath::new(vec![
            Segment::Key(self.array.to_string()),
            Segment::Index(self.index),
        ])
    }

    /// `<array>.<index>.<field>`
    pub fn field_path(&self, field: &str) -> FieldPath {
        FieldPath::element(self.array, self.index, field)
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.record.get(field)
    }
}

/// Ordered, identity-keyed list of records for one array field.
#[derive(Debug, Clone)]
pub struct FieldArray {
    name: String,
    template: Record,
    slots: HashMap<EntryId, ArrayEntry>,
    order: Vec<EntryId>,
}

impl FieldArray {
    /// `template` is the record every appended entry starts from.
    pub fn new(name: impl Into<String>, template: Record) -> Self {
        Self {
            name: name.into(),
            template,
            slots: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn status(&self) -> ArrayStatus {
        if self.order.is_empty() {
            ArrayStatus::Empty
        } else {
            ArrayStatus::NonEmpty
        }
    }

    /// Add an entry at the end with the template record.
    pub fn append(&mut self) -> EntryId {
        let index = self.order.len();
        self.insert_at(index, self.template.clone())
    }

    /// Add an entry at `index`, shifting later entries back.
    pub fn insert(&mut self, index: usize) -> Result<EntryId> {
        if index > self.order.len() {
            return Err(self.out_of_range(index));
        }
        Ok(self.insert_at(index, self.template.clone()))
    }

    fn insert_at(&mut self, index: usize, record: Record) -> EntryId {
        let id = EntryId::fresh();
        self.slots.insert(
            id,
            ArrayEntry {
                record,
                touched: BTreeSet::new(),
            },
        );
        self.order.insert(index, id);
        debug!(array = %self.name, %id, index, len = self.order.len(), "entry added");
        id
    }

    /// Remove exactly the entry with `id` and return its record.
    pub fn remove(&mut self, id: EntryId) -> Result<Record> {
        let index = self.require(id)?;
        self.order.remove(index);
        let entry = self
            .slots
            .remove(&id)
            .ok_or_else(|| self.unknown_entry(id))?;
        debug!(array = %self.name, %id, index, len = self.order.len(), "entry removed");
        Ok(entry.record)
    }

    /// Move an entry to position `to` (clamped to the last position).
    pub fn move_entry(&mut self, id: EntryId, to: usize) -> Result<()> {
        let from = self.require(id)?;
        let to = to.min(self.order.len() - 1);
        let moved = self.order.remove(from);
        self.order.insert(to, moved);
        debug!(array = %self.name, %id, from, to, "entry moved");
        Ok(())
    }

    pub fn swap(&mut self, a: EntryId, b: EntryId) -> Result<()> {
        let ia = self.require(a)?;
        let ib = self.require(b)?;
        self.order.swap(ia, ib);
        debug!(array = %self.name, %a, %b, "entries swapped");
        Ok(())
    }

    /// Drop every entry and start over from `records`, each with a new id.
    ///
    /// Every record is laid over the template first, so missing element
    /// fields get their default. A key that is not an element field rejects
    /// the whole call and leaves the array as it was.
    pub fn replace(&mut self, records: impl IntoIterator<Item = Record>) -> Result<Vec<EntryId>> {
        let records = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| self.conform(index, record))
            .collect::<Result<Vec<_>>>()?;
        self.clear();
        Ok(records
            .into_iter()
            .map(|record| {
                let index = self.order.len();
                self.insert_at(index, record)
            })
            .collect())
    }

    fn conform(&self, index: usize, record: Record) -> Result<Record> {
        let mut full = self.template.clone();
        for (field, value) in record {
            if !self.template.contains_key(&field) {
                return Err(FormError::UnknownField(FieldPath::element(
                    &self.name, index, &field,
                )));
            }
            full.insert(field, value);
        }
        Ok(full)
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.order.clear();
    }

    pub fn contains(&self, id: EntryId) -> bool {
        self.slots.contains_key(&id)
    }

    pub fn index_of(&self, id: EntryId) -> Option<usize> {
        self.order.iter().position(|e| *e == id)
    }

    pub fn id_at(&self, index: usize) -> Option<EntryId> {
        self.order.get(index).copied()
    }

    pub fn ids(&self) -> &[EntryId] {
        &self.order
    }

    pub fn get(&self, id: EntryId) -> Option<&Record> {
        self.slots.get(&id).map(|e| &e.record)
    }

    /// Entries in list order with freshly derived indices.
    pub fn entries(&self) -> impl Iterator<Item = EntryView<'_>> {
        self.order.iter().enumerate().filter_map(move |(index, id)| {
            self.slots.get(id).map(|entry| EntryView {
                id: *id,
                index,
                record: &entry.record,
                array: &self.name,
            })
        })
    }

    /// Current path of `field` inside entry `id`.
    pub fn field_path(&self, id: EntryId, field: &str) -> Result<FieldPath> {
        let index = self.require(id)?;
        Ok(FieldPath::element(&self.name, index, field))
    }

    /// Records in list order, as they appear in the value tree.
    pub fn records(&self) -> Vec<Record> {
        self.entries().map(|e| e.record.clone()).collect()
    }

    pub(crate) fn value(&self, id: EntryId, field: &str) -> Option<&Value> {
        self.slots.get(&id).and_then(|e| e.record.get(field))
    }

    pub(crate) fn set_value(&mut self, id: EntryId, field: &str, value: Value) -> Result<()> {
        let entry = self
            .slots
            .get_mut(&id)
            .ok_or_else(|| FormError::UnknownEntry {
                array: self.name.clone(),
                id,
            })?;
        entry.record.insert(field.to_string(), value);
        entry.touched.insert(field.to_string());
        Ok(())
    }

    pub fn is_touched(&self, id: EntryId, field: &str) -> bool {
        self.slots
            .get(&id)
            .is_some_and(|e| e.touched.contains(field))
    }

    fn require(&self, id: EntryId) -> Result<usize> {
        self.index_of(id).ok_or_else(|| self.unknown_entry(id))
    }

    fn unknown_entry(&self, id: EntryId) -> FormError {
        FormError::UnknownEntry {
            array: self.name.clone(),
            id,
        }
    }

    fn out_of_range(&self, index: usize) -> FormError {
        FormError::IndexOutOfRange {
            array: self.name.clone(),
            index,
            len: self.order.len(),
        }
    }
}
