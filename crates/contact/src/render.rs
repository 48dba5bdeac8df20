//! Plain-text rendering of a form session.
//!
//! Controls are dumb: each one shows the bound value and the error the
//! session says is visible. Nothing here decides validity.

use std::fmt::Write;

use form::{FieldKind, FieldPath, FieldSchema, FormSession, Value};

const MARK_ON: &str = "[x]";
const MARK_OFF: &str = "[ ]";

pub fn render(session: &FormSession, send_button: &str) -> String {
    let mut out = String::new();
    let schema = session.schema();
    let values = session.values();

    let _ = writeln!(out, "== {} ==", schema.title);
    for field in &schema.fields {
        let path = FieldPath::key(field.name.clone());
        match &field.kind {
            FieldKind::Array { .. } => render_array(&mut out, session, field),
            kind => {
                let shown = display_value(kind, values.field(&field.name));
                let _ = writeln!(out, "{}: {shown}", field.label);
            }
        }
        if let Some(message) = session.visible_error(&path) {
            let _ = writeln!(out, "  ! {message}");
        }
    }
    let _ = writeln!(out, "< {send_button} >");
    out
}

fn render_array(out: &mut String, session: &FormSession, field: &FieldSchema) {
    let _ = writeln!(out, "{}:", field.label);
    let Ok(array) = session.field_array(&field.name) else {
        return;
    };
    for entry in array.entries() {
        let _ = write!(out, "  #{} ({})", entry.index, short_id(&entry.id.to_string()));
        for element in field.element_fields() {
            let shown = display_value(&element.kind, entry.value(&element.name));
            let _ = write!(out, " {shown}");
        }
        let _ = writeln!(out);
        for element in field.element_fields() {
            if let Some(message) = session.visible_error(&entry.field_path(&element.name)) {
                let _ = writeln!(out, "    ! {message}");
            }
        }
    }
}

fn display_value(kind: &FieldKind, value: Option<&Value>) -> String {
    match kind {
        FieldKind::Bool => {
            let checked = value.and_then(Value::as_bool).unwrap_or(false);
            let mark = if checked { MARK_ON } else { MARK_OFF };
            mark.to_string()
        }
        FieldKind::Select { options } => {
            let text = value.and_then(Value::as_text).unwrap_or("");
            options
                .iter()
                .find(|choice| choice.value == text)
                .map(|choice| format!("<{}>", choice.label))
                .unwrap_or_else(|| "<->".to_string())
        }
        _ => format!("\"{}\"", value.and_then(Value::as_text).unwrap_or("")),
    }
}

fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
