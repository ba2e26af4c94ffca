//! Field-level validation errors shared by every write path.
//!
//! Payload structs derive [`validator::Validate`] for per-field rules. Rules that span several
//! fields are checked by hand and recorded on the same [`FieldErrors`] map, so callers always
//! see one JSON object keyed by field name. Errors on nested lists are keyed by the item index:
//! `{"experiences": {"1": {"employer": ["..."]}}}`.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

pub(crate) const REQUIRED: &str = "This field is required.";
pub(crate) const BLANK: &str = "This field may not be blank.";

/// Validation failures keyed by field, nested for list and struct fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(Map<String, Value>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience constructor for a single failing field.
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.add(field, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        push_message(&mut self.0, field, message.into());
    }

    /// Record a failure on `field` of the `index`-th item of the list `list`.
    pub fn add_nested(&mut self, list: &str, index: usize, field: &str, message: impl Into<String>) {
        let entry = self
            .0
            .entry(list.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !entry.is_object() {
            *entry = Value::Object(Map::new());
        }
        if let Value::Object(items) = entry {
            let item = items
                .entry(index.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(fields) = item {
                push_message(fields, field, message.into());
            }
        }
    }

    /// Fold errors produced by a `Validate` derive into this map.
    pub fn merge(&mut self, errors: &ValidationErrors) {
        merge_into(&mut self.0, errors);
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Messages recorded directly on a top-level field.
    pub fn messages(&self, field: &str) -> Vec<String> {
        match self.0.get(field) {
            Some(Value::Array(values)) => values
                .iter()
                .filter_map(|value| value.as_str().map(str::to_string))
                .collect(),
            _ => Vec::new(),
        }
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<ValidationErrors> for FieldErrors {
    fn from(errors: ValidationErrors) -> Self {
        let mut converted = FieldErrors::new();
        converted.merge(&errors);
        converted
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<&str> = self.fields().collect();
        write!(f, "invalid fields: {}", fields.join(", "))
    }
}

impl std::error::Error for FieldErrors {}

fn push_message(map: &mut Map<String, Value>, field: &str, message: String) {
    let entry = map
        .entry(field.to_string())
        .or_insert_with(|| Value::Array(Vec::new()));
    match entry {
        Value::Array(messages) => messages.push(Value::String(message)),
        other => *other = Value::Array(vec![Value::String(message)]),
    }
}

fn merge_into(map: &mut Map<String, Value>, errors: &ValidationErrors) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        match kind {
            ValidationErrorsKind::Field(list) => {
                for error in list {
                    push_message(map, &field, describe(error));
                }
            }
            ValidationErrorsKind::Struct(inner) => {
                let nested = nested_object(map, &field);
                merge_into(nested, inner);
            }
            ValidationErrorsKind::List(items) => {
                let nested = nested_object(map, &field);
                for (index, inner) in items {
                    let item = nested_object(nested, &index.to_string());
                    merge_into(item, inner);
                }
            }
        }
    }
}

fn nested_object<'a>(map: &'a mut Map<String, Value>, key: &str) -> &'a mut Map<String, Value> {
    let entry = map
        .entry(key.to_string())
        .or_insert_with(|| Value::Object(Map::new()));
    if !entry.is_object() {
        *entry = Value::Object(Map::new());
    }
    match entry {
        Value::Object(inner) => inner,
        _ => unreachable!("entry was just replaced with an object"),
    }
}

fn describe(error: &ValidationError) -> String {
    match &error.message {
        Some(message) => message.to_string(),
        None => match &*error.code {
            "email" => "Enter a valid email address.".to_string(),
            "range" => "Ensure this value is within the allowed range.".to_string(),
            "length" => "Ensure this field has a valid length.".to_string(),
            code => format!("Invalid value ({code})."),
        },
    }
}

/// Count of digits in a phone number once separators are ignored, or `None` when the number
/// contains characters other than digits, `+`, spaces, `-`, and parentheses.
pub(crate) fn phone_digits(raw: &str) -> Option<usize> {
    let mut digits = 0;
    for ch in raw.chars() {
        match ch {
            '0'..='9' => digits += 1,
            '+' | ' ' | '-' | '(' | ')' => {}
            _ => return None,
        }
    }
    Some(digits)
}

pub(crate) fn check_phone(errors: &mut FieldErrors, field: &str, raw: &str) {
    match phone_digits(raw) {
        Some(count) if (7..=15).contains(&count) => {}
        _ => errors.add(field, "Enter a valid phone number."),
    }
}

pub(crate) fn check_not_blank(errors: &mut FieldErrors, field: &str, raw: Option<&str>) {
    if let Some(value) = raw {
        if value.trim().is_empty() {
            errors.add(field, BLANK);
        }
    }
}
