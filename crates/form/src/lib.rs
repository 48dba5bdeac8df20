//! Form state and dynamic field-array validation engine.
//!
//! - [`FormSchema`] / [`FieldSchema`] / [`Rule`]: declarative constraints
//! - [`FormSession`]: values, errors, bindings, array operations and submit
//! - [`FieldArray`]: identity-keyed list entries with derived positions
//! - [`contact`]: the contact form built from [`config::ContactTexts`]

pub mod array;
pub mod binding;
pub mod config;
pub mod contact;
mod error_tree;
mod errors;
pub mod field;
pub mod path;
pub mod rule;
pub mod schema;
pub mod session;
mod state;
pub mod value;

pub use array::{ArrayStatus, EntryId, EntryView, FieldArray};
pub use binding::FieldBinding;
pub use error_tree::ErrorTree;
pub use errors::{FormError, Result};
pub use field::{Choice, FieldKind, FieldSchema};
pub use path::{FieldPath, IntoFieldPath, Segment};
pub use rule::{Rule, Stage};
pub use schema::FormSchema;
pub use session::{FormSession, SubmitOutcome, SubmitSink};
pub use value::{Record, Value, ValueTree, record};
