//! Mapping of remote error bodies back onto local form fields.
//!
//! Remote services report rejections in several shapes:
//!
//! - `{"message": ["title should not be empty", ...], "statusCode": 400}`
//! - `{"message": "Could not find any entity ...", "statusCode": 400}`
//! - `{"errors": {"username": ["already taken"]}}`
//! - `{"title": ["too short"], "non_field_errors": [...]}`
//!
//! A [`FieldMap`] turns any of these into [`FieldErrors`] keyed by the local
//! form's field names. Anything that cannot be attributed to a field ends up
//! under [`NON_FIELD_ERRORS`].

use serde_json::Value;

use crate::error::{FieldErrors, NON_FIELD_ERRORS};

/// Keys that describe the response itself rather than a field.
const ENVELOPE_KEYS: &[&str] = &["statusCode", "status", "error", "success", "path", "timestamp"];

/// Keys that carry form-level messages.
const FORM_LEVEL_KEYS: &[&str] = &["non_field_errors", "detail", NON_FIELD_ERRORS];

/// Remote field name -> local form field name.
#[derive(Debug, Clone, Copy)]
pub struct FieldMap {
    entries: &'static [(&'static str, &'static str)],
}

impl FieldMap {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self { entries }
    }

    /// Local field for a remote field name, if the remote field is known.
    pub fn form_field(&self, remote: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(r, _)| *r == remote)
            .map(|(_, local)| *local)
    }

    /// Map a parsed error body onto form fields.
    pub fn map_body(&self, body: &Value) -> FieldErrors {
        let mut errors = FieldErrors::new();

        match body {
            Value::Object(obj) => {
                // a detailed `errors` object beats the envelope's summary message
                if let Some(nested @ Value::Object(_)) = obj.get("errors") {
                    errors.extend(self.map_body(nested));
                    if !errors.is_empty() {
                        return errors;
                    }
                }

                if let Some(message) = obj.get("message") {
                    for text in flatten_messages(message) {
                        let field = self.field_for_message(&text);
                        errors.add(field, text);
                    }
                } else {
                    for (key, value) in obj {
                        if key == "errors" || ENVELOPE_KEYS.contains(&key.as_str()) {
                            continue;
                        }
                        let field = if FORM_LEVEL_KEYS.contains(&key.as_str()) {
                            NON_FIELD_ERRORS
                        } else {
                            self.form_field(key).unwrap_or(NON_FIELD_ERRORS)
                        };
                        for text in flatten_messages(value) {
                            if field == NON_FIELD_ERRORS && !FORM_LEVEL_KEYS.contains(&key.as_str()) {
                                errors.add(field, format!("{key}: {text}"));
                            } else {
                                errors.add(field, text);
                            }
                        }
                    }
                }
            }
            other => {
                for text in flatten_messages(other) {
                    errors.add(NON_FIELD_ERRORS, text);
                }
            }
        }

        errors
    }

    /// First word of a free-text message that names a known remote field.
    fn field_for_message(&self, message: &str) -> &'static str {
        message
            .split(|c: char| c.is_whitespace() || c == ',' || c == '.' || c == ':')
            .filter(|word| !word.is_empty())
            .find_map(|word| self.form_field(word))
            .unwrap_or(NON_FIELD_ERRORS)
    }
}

fn flatten_messages(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::String(s) => vec![s.clone()],
        Value::Array(items) => items.iter().flat_map(flatten_messages).collect(),
        other => vec![other.to_string()],
    }
}
