//! The contact form: schema construction from texts and the session wrapper
//! with category operations.
//!
//! Fields:
//! - `name`       text, required
//! - `email`      text, required
//! - `country`    selector, required, one of the supplied country names
//! - `gender`     selector, required, one of male / female / other
//! - `question`   text area, required, at least 10 characters
//! - `tycs`       checkbox, must be checked
//! - `categories` list of `{ value }`, at least one entry, each value one of
//!   the configured category options

use std::ops::{Deref, DerefMut};

use strum::{Display, EnumIter, EnumString, IntoEnumIterator};

use crate::array::{EntryId, FieldArray};
use crate::binding::FieldBinding;
use crate::config::ContactTexts;
use crate::errors::Result;
use crate::field::{Choice, FieldKind, FieldSchema};
use crate::schema::FormSchema;
use crate::session::{FormSession, SubmitSink};
use crate::value::Record;

pub const NAME: &str = "name";
pub const EMAIL: &str = "email";
pub const COUNTRY: &str = "country";
pub const GENDER: &str = "gender";
pub const QUESTION: &str = "question";
pub const TYCS: &str = "tycs";
pub const CATEGORIES: &str = "categories";
/// Field inside each category entry.
pub const CATEGORY_VALUE: &str = "value";

pub const QUESTION_MIN_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    fn label(self, texts: &ContactTexts) -> &str {
        match self {
            Gender::Male => &texts.fields.male,
            Gender::Female => &texts.fields.female,
            Gender::Other => &texts.fields.other,
        }
    }
}

/// Build the contact schema. Pure: the same texts and countries always give
/// the same schema, so switching language never touches validation logic.
pub fn contact_schema(texts: &ContactTexts, countries: &[String]) -> FormSchema {
    let labels = &texts.fields;
    let errors = &texts.errors;

    let genders: Vec<Choice> = Gender::iter()
        .map(|g| Choice::new(g.to_string(), g.label(texts)))
        .collect();
    let category_choices: Vec<Choice> = labels
        .categories_options
        .iter()
        .map(|o| Choice::plain(o.clone()))
        .collect();

    FormSchema::new(
        texts.title.clone(),
        vec![
            FieldSchema::new(NAME, &labels.name, FieldKind::Text).required(&errors.name),
            FieldSchema::new(EMAIL, &labels.email, FieldKind::Text).required(&errors.email),
            FieldSchema::new(
                COUNTRY,
                &labels.country,
                FieldKind::Select {
                    options: countries.iter().map(|c| Choice::plain(c.clone())).collect(),
                },
            )
            .required(&errors.country)
            .one_of(countries.iter().cloned(), &errors.country),
            FieldSchema::new(GENDER, &labels.gender, FieldKind::Select { options: genders })
                .required(&errors.gender)
                .one_of(Gender::iter().map(|g| g.to_string()), &errors.gender),
            FieldSchema::new(QUESTION, &labels.question, FieldKind::TextArea)
                .required(&errors.question)
                .min_length(QUESTION_MIN_LENGTH, &errors.question),
            FieldSchema::new(
                CATEGORIES,
                &labels.categories,
                FieldKind::Array {
                    element: vec![FieldSchema::new(
                        CATEGORY_VALUE,
                        &labels.categories,
                        FieldKind::Select {
                            options: category_choices,
                        },
                    )
                    .one_of(labels.categories_options.iter().cloned(), &errors.categories)],
                },
            )
            .min_items(1, &errors.categories),
            FieldSchema::new(TYCS, &labels.tycs, FieldKind::Bool)
                .default_value(false)
                .required(&errors.tycs),
        ],
    )
}

/// Contact form session with category helpers. Everything else is reachable
/// through the wrapped [`FormSession`].
pub struct ContactForm {
    session: FormSession,
}

impl ContactForm {
    pub fn new(texts: &ContactTexts, countries: &[String], sink: impl SubmitSink + 'static) -> Self {
        Self {
            session: FormSession::new(contact_schema(texts, countries), sink),
        }
    }

    pub fn categories(&self) -> Result<&FieldArray> {
        self.session.field_array(CATEGORIES)
    }

    pub fn append_category(&mut self) -> Result<EntryId> {
        self.session.append(CATEGORIES)
    }

    pub fn remove_category(&mut self, id: EntryId) -> Result<Record> {
        self.session.remove(CATEGORIES, id)
    }

    /// Bind the `value` of the category entry `id`, wherever it sits now.
    pub fn bind_category(&mut self, id: EntryId) -> Result<FieldBinding<'_>> {
        let path = self.session.field_path(CATEGORIES, id, CATEGORY_VALUE)?;
        self.session.bind(path)
    }
}

impl Deref for ContactForm {
    type Target = FormSession;

    fn deref(&self) -> &Self::Target {
        &self.session
    }
}

impl DerefMut for ContactForm {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.session
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn gender_values_are_lowercase() {
        let values: Vec<String> = Gender::iter().map(|g| g.to_string()).collect();
        assert_eq!(values, vec!["male", "female", "other"]);
        assert_eq!(Gender::from_str("female").unwrap(), Gender::Female);
    }
}
