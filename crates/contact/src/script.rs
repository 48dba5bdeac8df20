//! Scripted user actions, replayed against a contact form.
//!
//! ```ron
//! [
//!     Set(path: "name", value: "Ana"),
//!     AppendCategory,
//!     Set(path: "categories.0.value", value: "A"),
//!     RemoveCategory(0),
//!     Submit,
//!     Render,
//! ]
//! ```

use color_eyre::Result;
use color_eyre::eyre::{WrapErr, eyre};
use form::contact::ContactForm;
use form::Value;
use serde::Deserialize;
use tracing::{debug, info};

use crate::render::render;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub enum Action {
    /// Type into / pick / tick the control at `path`.
    Set { path: String, value: Value },
    AppendCategory,
    /// Remove the category entry shown at this position.
    RemoveCategory(usize),
    Submit,
    Reset,
    Render,
}

pub fn parse(s: &str) -> Result<Vec<Action>> {
    ron::from_str(s).wrap_err("invalid action script")
}

/// Run every action in order and return what was rendered. `Submit` renders
/// the form right after so the outcome is visible.
pub fn run(form: &mut ContactForm, actions: &[Action], send_button: &str) -> Result<String> {
    let mut out = String::new();
    for (step, action) in actions.iter().enumerate() {
        debug!(step, ?action, "script action");
        match action {
            Action::Set { path, value } => {
                form.set(path.as_str(), value.clone())
                    .wrap_err_with(|| format!("step {step}: cannot set `{path}`"))?;
            }
            Action::AppendCategory => {
                form.append_category()?;
            }
            Action::RemoveCategory(index) => {
                let id = form
                    .categories()?
                    .id_at(*index)
                    .ok_or_else(|| eyre!("step {step}: no category at position {index}"))?;
                form.remove_category(id)?;
            }
            Action::Submit => {
                let outcome = form.submit();
                info!(step, submitted = outcome.is_submitted(), "submit");
                out.push_str(&render(form, send_button));
            }
            Action::Reset => form.reset(),
            Action::Render => out.push_str(&render(form, send_button)),
        }
    }
    info!(
        steps = actions.len(),
        valid = form.is_valid(),
        submits = form.submit_count(),
        "script finished"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use form::config::LocaleTexts;
    use form::ValueTree;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;
    use std::rc::Rc;

    const TEXTS: &str = include_str!("../assets/texts.ron");

    fn contact_form() -> (ContactForm, Rc<RefCell<Vec<ValueTree>>>) {
        let locales = LocaleTexts::from_ron_str(TEXTS).unwrap();
        let texts = locales.resolve(Some("en")).unwrap();
        let countries = vec!["France".to_string(), "Spain".to_string()];
        let sent = Rc::new(RefCell::new(Vec::new()));
        let sink = {
            let sent = Rc::clone(&sent);
            move |values: &ValueTree| sent.borrow_mut().push(values.clone())
        };
        (ContactForm::new(texts, &countries, sink), sent)
    }

    #[test]
    fn parses_actions() {
        let actions = parse(
            r#"[Set(path: "tycs", value: true), AppendCategory, RemoveCategory(0), Submit]"#,
        )
        .unwrap();
        assert_eq!(
            actions,
            vec![
                Action::Set {
                    path: "tycs".into(),
                    value: Value::Bool(true)
                },
                Action::AppendCategory,
                Action::RemoveCategory(0),
                Action::Submit,
            ]
        );
    }

    #[test]
    fn remove_by_position_targets_current_entry() {
        let (mut form, _) = contact_form();
        let actions = parse(
            r#"[
                AppendCategory, AppendCategory, AppendCategory,
                Set(path: "categories.0.value", value: "Sales"),
                Set(path: "categories.1.value", value: "Support"),
                Set(path: "categories.2.value", value: "Other"),
                RemoveCategory(1),
            ]"#,
        )
        .unwrap();
        run(&mut form, &actions, "Send").unwrap();
        assert!(!form.is_valid());

        let values: Vec<_> = form
            .categories()
            .unwrap()
            .entries()
            .map(|e| e.value("value").and_then(Value::as_text).unwrap_or("").to_string())
            .collect();
        assert_eq!(values, vec!["Sales", "Other"]);
    }

    #[test]
    fn complete_script_reaches_the_sink() {
        let (mut form, sent) = contact_form();
        let actions = parse(
            r#"[
                Set(path: "name", value: "Ana"),
                Set(path: "email", value: "ana@example.com"),
                Set(path: "country", value: "Spain"),
                Set(path: "gender", value: "female"),
                Set(path: "question", value: "How do refunds work?"),
                AppendCategory,
                Set(path: "categories.0.value", value: "Support"),
                Set(path: "tycs", value: true),
                Submit,
            ]"#,
        )
        .unwrap();
        let out = run(&mut form, &actions, "Send").unwrap();

        assert_eq!(sent.borrow().len(), 1);
        assert!(form.is_valid());
        assert!(!out.contains("  ! "));
    }

    #[test]
    fn removing_a_missing_position_fails() {
        let (mut form, _) = contact_form();
        let err = run(&mut form, &[Action::RemoveCategory(3)], "Send").unwrap_err();
        assert!(err.to_string().contains("no category at position 3"));
    }
}
