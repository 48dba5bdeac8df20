//! Declarative constraints attached to a field.
//!
//! Each rule is a tagged variant carrying its own message; a single
//! interpreter ([`Rule::check`]) decides pass/fail. Rules never look at other
//! fields and never fail on malformed input: a value of the wrong shape is
//! simply a failed check.

use std::sync::Arc;

use derivative::Derivative;

use crate::value::Value;

/// Custom predicate over a (possibly absent) field value.
pub type Predicate = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

/// Evaluation order within one field. Lower stages run first and the first
/// failing rule wins for that field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Stage {
    Presence,
    Membership,
    Shape,
    Custom,
    List,
}

#[derive(Clone, Derivative)]
#[derivative(Debug)]
pub enum Rule {
    /// Absent, `""`, `false` and `[]` all count as missing.
    Required { message: String },
    OneOf { options: Vec<String>, message: String },
    /// Minimum length in characters.
    MinLength { min: usize, message: String },
    Custom {
        message: String,
        #[derivative(Debug = "ignore")]
        predicate: Predicate,
    },
    /// Minimum entry count of a field array. An absent list counts as empty.
    MinItems { min: usize, message: String },
}

impl Rule {
    pub fn required(message: impl Into<String>) -> Self {
        Rule::Required {
            message: message.into(),
        }
    }

    pub fn one_of<S: Into<String>>(
        options: impl IntoIterator<Item = S>,
        message: impl Into<String>,
    ) -> Self {
        Rule::OneOf {
            options: options.into_iter().map(Into::into).collect(),
            message: message.into(),
        }
    }

    pub fn min_length(min: usize, message: impl Into<String>) -> Self {
        Rule::MinLength {
            min,
            message: message.into(),
        }
    }

    pub fn custom(
        message: impl Into<String>,
        predicate: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Rule::Custom {
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn min_items(min: usize, message: impl Into<String>) -> Self {
        Rule::MinItems {
            min,
            message: message.into(),
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Rule::Required { .. } => Stage::Presence,
            Rule::OneOf { .. } => Stage::Membership,
            Rule::MinLength { .. } => Stage::Shape,
            Rule::Custom { .. } => Stage::Custom,
            Rule::MinItems { .. } => Stage::List,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Rule::Required { message }
            | Rule::OneOf { message, .. }
            | Rule::MinLength { message, .. }
            | Rule::Custom { message, .. }
            | Rule::MinItems { message, .. } => message,
        }
    }

    /// Returns the rule's message when `value` violates it.
    pub fn check(&self, value: Option<&Value>) -> Result<(), &str> {
        let ok = match self {
            Rule::Required { .. } => match value {
                None => false,
                Some(Value::Text(s)) => !s.is_empty(),
                Some(Value::Bool(b)) => *b,
                Some(Value::List(items)) => !items.is_empty(),
            },
            Rule::OneOf { options, .. } => match value {
                None => true,
                Some(Value::Text(s)) => options.iter().any(|o| o == s),
                Some(_) => false,
            },
            Rule::MinLength { min, .. } => match value {
                None => true,
                Some(Value::Text(s)) => s.chars().count() >= *min,
                Some(_) => false,
            },
            Rule::Custom { predicate, .. } => (predicate)(value),
            Rule::MinItems { min, .. } => match value {
                None => *min == 0,
                Some(Value::List(items)) => items.len() >= *min,
                Some(_) => false,
            },
        };
        if ok { Ok(()) } else { Err(self.message()) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::record;

    #[test]
    fn required_rejects_missing_empty_and_false() {
        let rule = Rule::required("needed");
        assert_eq!(rule.check(None), Err("needed"));
        assert_eq!(rule.check(Some(&Value::from(""))), Err("needed"));
        assert_eq!(rule.check(Some(&Value::from(false))), Err("needed"));
        assert!(rule.check(Some(&Value::from(" "))).is_ok());
        assert!(rule.check(Some(&Value::from(true))).is_ok());
    }

    #[test]
    fn one_of_skips_absent_but_rejects_empty() {
        let rule = Rule::one_of(["male", "female", "other"], "pick one");
        assert!(rule.check(None).is_ok());
        assert!(rule.check(Some(&Value::from("other"))).is_ok());
        assert_eq!(rule.check(Some(&Value::from(""))), Err("pick one"));
        assert_eq!(rule.check(Some(&Value::from("Other"))), Err("pick one"));
        assert_eq!(rule.check(Some(&Value::from(true))), Err("pick one"));
    }

    #[test]
    fn min_length_counts_chars() {
        let rule = Rule::min_length(3, "too short");
        assert!(rule.check(Some(&Value::from("äöü"))).is_ok());
        assert_eq!(rule.check(Some(&Value::from("ab"))), Err("too short"));
    }

    #[test]
    fn custom_sees_absent_values() {
        let rule = Rule::custom("accept the terms", |v| v == Some(&Value::Bool(true)));
        assert_eq!(rule.check(None), Err("accept the terms"));
        assert_eq!(rule.check(Some(&Value::from(false))), Err("accept the terms"));
        assert!(rule.check(Some(&Value::from(true))).is_ok());
    }

    #[test]
    fn min_items_treats_absent_as_empty() {
        let rule = Rule::min_items(1, "at least one");
        assert_eq!(rule.check(None), Err("at least one"));
        assert_eq!(rule.check(Some(&Value::List(vec![]))), Err("at least one"));
        let one = Value::List(vec![record([("value", "")])]);
        assert!(rule.check(Some(&one)).is_ok());
    }

    #[test]
    fn stages_are_ordered() {
        assert!(Stage::Presence < Stage::Membership);
        assert!(Stage::Shape < Stage::Custom);
        assert!(Stage::Custom < Stage::List);
    }
}
