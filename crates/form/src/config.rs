//! Externally supplied texts and option lists.
//!
//! The engine only consumes these as data when building a schema; choosing
//! a locale or falling back to another one is up to the renderer.
//! Files are RON, matching the rest of the workspace:
//!
//! ```ron
//! (
//!     title: "Contact",
//!     fields: (name: "Name", email: "Email", /* .. */ categories_options: ["A", "B"]),
//!     errors: (name: "Please enter your name", /* .. */),
//!     send_button: "Send",
//! )
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::errors::{FormError, Result};

/// Labels of the contact form controls, plus the category options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLabels {
    pub name: String,
    pub email: String,
    pub country: String,
    pub gender: String,
    pub male: String,
    pub female: String,
    pub other: String,
    pub question: String,
    pub categories: String,
    pub categories_options: Vec<String>,
    pub tycs: String,
}

/// One message per field; each message belongs to exactly one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorMessages {
    pub name: String,
    pub email: String,
    pub country: String,
    pub gender: String,
    pub question: String,
    pub tycs: String,
    pub categories: String,
}

/// Every user-facing string of the contact form in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactTexts {
    pub title: String,
    pub fields: FieldLabels,
    pub errors: ErrorMessages,
    pub send_button: String,
}

impl ContactTexts {
    pub fn from_ron_str(s: &str) -> Result<Self> {
        parse_ron(s)
    }
}

/// Texts for every supported locale plus the one to fall back to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleTexts {
    pub default_locale: String,
    pub locales: BTreeMap<String, ContactTexts>,
}

impl LocaleTexts {
    /// Parse and check that the default locale is present.
    pub fn from_ron_str(s: &str) -> Result<Self> {
        let texts: Self = parse_ron(s)?;
        if !texts.locales.contains_key(&texts.default_locale) {
            return Err(FormError::Config(format!(
                "default locale `{}` has no texts",
                texts.default_locale
            )));
        }
        Ok(texts)
    }

    /// Texts for `locale`, or the default locale's texts when `locale` is
    /// missing or unknown. Returns `None` only if the default itself is absent.
    pub fn resolve(&self, locale: Option<&str>) -> Option<&ContactTexts> {
        if let Some(locale) = locale {
            match self.locales.get(locale) {
                Some(texts) => return Some(texts),
                None => warn!(
                    locale,
                    fallback = %self.default_locale,
                    "unknown locale, using default"
                ),
            }
        }
        self.locales.get(&self.default_locale)
    }

    pub fn locale_names(&self) -> impl Iterator<Item = &str> {
        self.locales.keys().map(String::as_str)
    }
}

/// Valid country names for the country selector.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountryList(pub Vec<String>);

impl CountryList {
    pub fn from_ron_str(s: &str) -> Result<Self> {
        parse_ron(s)
    }

    pub fn names(&self) -> &[String] {
        &self.0
    }
}

/// Parse any configuration document from RON.
pub fn parse_ron<T: DeserializeOwned>(s: &str) -> Result<T> {
    ron::from_str(s).map_err(|e| FormError::Config(e.to_string()))
}
