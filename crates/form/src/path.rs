use std::fmt;
use std::str::FromStr;

use crate::errors::FormError;

/// One step of a [`FieldPath`]: a property name or a positional index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(k) => write!(f, "{k}"),
            Segment::Index(i) => write!(f, "{i}"),
        }
    }
}

/// Dotted path into the value tree, e.g. `categories.0.value`.
///
/// Index segments are positions, not identities: the same entry gets a new
/// path whenever the array in front of it changes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath(Vec<Segment>);

impl FieldPath {
    pub fn new(segments: impl Into<Vec<Segment>>) -> Self {
        FieldPath(segments.into())
    }

    /// Single-segment path for a top-level field.
    pub fn key(name: impl Into<String>) -> Self {
        FieldPath(vec![Segment::Key(name.into())])
    }

    /// `<array>.<index>.<field>`
    pub fn element(array: &str, index: usize, field: &str) -> Self {
        FieldPath(vec![
            Segment::Key(array.to_string()),
            Segment::Index(index),
            Segment::Key(field.to_string()),
        ])
    }

    pub fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub fn child(&self, segment: Segment) -> Self {
        let mut next = self.clone();
        next.push(segment);
        next
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.0.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl FromStr for FieldPath {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(FormError::InvalidPath(s.to_string()));
        }
        let mut segments = Vec::new();
        for part in s.split('.') {
            if part.is_empty() {
                return Err(FormError::InvalidPath(s.to_string()));
            }
            if part.chars().all(|c| c.is_ascii_digit()) {
                let index = part
                    .parse::<usize>()
                    .map_err(|_| FormError::InvalidPath(s.to_string()))?;
                segments.push(Segment::Index(index));
            } else {
                segments.push(Segment::Key(part.to_string()));
            }
        }
        Ok(FieldPath(segments))
    }
}

/// Anything a renderer may hand to `bind`: parsed paths or dotted strings.
pub trait IntoFieldPath {
    fn into_field_path(self) -> Result<FieldPath, FormError>;
}

impl IntoFieldPath for FieldPath {
    fn into_field_path(self) -> Result<FieldPath, FormError> {
        Ok(self)
    }
}

impl IntoFieldPath for &FieldPath {
    fn into_field_path(self) -> Result<FieldPath, FormError> {
        Ok(self.clone())
    }
}

impl IntoFieldPath for &str {
    fn into_field_path(self) -> Result<FieldPath, FormError> {
        self.parse()
    }
}

impl IntoFieldPath for String {
    fn into_field_path(self) -> Result<FieldPath, FormError> {
        self.parse()
    }
}

impl IntoFieldPath for &String {
    fn into_field_path(self) -> Result<FieldPath, FormError> {
        self.parse()
    }
}
