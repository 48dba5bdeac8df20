use thiserror::Error;

use crate::array::EntryId;
use crate::path::FieldPath;

/// Shape errors: the renderer asked for something the schema does not have.
///
/// These are integration defects, never user-facing validation results.
/// Validation failures are data and live in [`crate::ErrorTree`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormError {
    #[error("invalid field path: {0:?}")]
    InvalidPath(String),

    #[error("unknown field: {0}")]
    UnknownField(FieldPath),

    #[error("index {index} out of range for `{array}` (len {len})")]
    IndexOutOfRange {
        array: String,
        index: usize,
        len: usize,
    },

    #[error("not bindable: {0} (array fields are changed through append/remove)")]
    NotBindable(FieldPath),

    #[error("unknown array field: {0}")]
    UnknownArray(String),

    #[error("unknown entry {id} in `{array}`")]
    UnknownEntry { array: String, id: EntryId },

    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T, E = FormError> = std::result::Result<T, E>;
