//! Decides whether a raw cell value counts as present.
//!
//! Upstream serializers sometimes emit the strings `"null"` or `"undefined"`
//! instead of a real absence. Those placeholders are folded into absence
//! here and nowhere else; everything past this boundary sees `Option<String>`.

use serde_json::Value;

const NULL_LIKE: [&str; 2] = ["null", "undefined"];

pub fn has_content(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::String(s)) => text_has_content(s),
        Some(_) => true,
    }
}

pub(crate) fn text_has_content(text: &str) -> bool {
    if text.trim().is_empty() {
        return false;
    }
    // Placeholders only match exactly; padded ones are real text.
    !NULL_LIKE
        .iter()
        .any(|placeholder| text.eq_ignore_ascii_case(placeholder))
}

pub fn content_text(value: Option<&Value>) -> Option<String> {
    if !has_content(value) {
        return None;
    }
    value.map(raw_text)
}

pub fn raw_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}
