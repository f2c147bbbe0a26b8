//! Validation: per-kind rules and the ordered error set.
//!
//! [`validate`] is a pure function from (value, schema node, path) to a list
//! of [`ValidationError`]s. It recurses into declared object properties and
//! array element schemas, concatenating child errors; a container only
//! carries an error of its own when one of its direct constraints fails.
//!
//! Two consecutive passes over the same inputs produce identical error
//! lists — validation reads nothing but its arguments.

use std::collections::BTreeMap;

use regex::Regex;
use tracing::trace;

use crate::path::Path;
use crate::schema::resolve::effective_kind;
use crate::schema::{FieldKind, SchemaNode};
use crate::value::{format_number as fmt_bound, Value};

// ---------------------------------------------------------------------------
// ValidationError
// ---------------------------------------------------------------------------

/// One validation failure: the path of the offending field and a
/// user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Path of the field the error belongs to.
    pub path: Path,
    /// User-facing message, displayed inline next to the field.
    pub message: String,
}

impl ValidationError {
    /// Create an error at `path`.
    pub fn new(path: Path, message: impl Into<String>) -> Self {
        Self {
            path,
            message: message.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ErrorSet
// ---------------------------------------------------------------------------

/// The current validation result: an ordered map from path to message.
///
/// A full validation pass replaces the whole set; a scoped pass replaces
/// only the keys under the edited path, leaving unrelated errors untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorSet {
    errors: BTreeMap<Path, String>,
}

impl ErrorSet {
    /// An empty error set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entire set with the given errors.
    pub fn replace_all(&mut self, errors: Vec<ValidationError>) {
        self.errors = errors.into_iter().map(|e| (e.path, e.message)).collect();
    }

    /// Replace only the errors at or under `scope` with the given errors,
    /// leaving errors outside the scope untouched.
    pub fn merge_scoped(&mut self, scope: &Path, errors: Vec<ValidationError>) {
        self.errors.retain(|path, _| !path.starts_with(scope));
        self.errors
            .extend(errors.into_iter().map(|e| (e.path, e.message)));
    }

    /// The message at `path`, if that field has an error.
    pub fn get(&self, path: &Path) -> Option<&str> {
        self.errors.get(path).map(String::as_str)
    }

    /// Whether any error exists at or under `path`.
    pub fn any_under(&self, path: &Path) -> bool {
        self.errors.keys().any(|p| p.starts_with(path))
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Number of errors.
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate over (path, message) pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.errors.iter().map(|(p, m)| (p, m.as_str()))
    }

    /// Drop every error.
    pub fn clear(&mut self) {
        self.errors.clear();
    }
}

// ---------------------------------------------------------------------------
// Validation rules
// ---------------------------------------------------------------------------

/// Validate `value` against `schema`, reporting errors relative to `path`.
///
/// With no schema there are no declared constraints and the result is empty.
pub fn validate(value: &Value, schema: Option<&SchemaNode>, path: &Path) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let Some(schema) = schema else {
        return errors;
    };
    validate_node(value, schema, path, &mut errors);
    trace!(path = %path, errors = errors.len(), "validated subtree");
    errors
}

fn validate_node(
    value: &Value,
    schema: &SchemaNode,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    if schema.required && is_missing(value) {
        // Exactly one error for a missing required field; no point piling
        // length/bounds errors onto an empty value.
        errors.push(ValidationError::new(path.clone(), "is required"));
        return;
    }

    match effective_kind(Some(schema), value) {
        FieldKind::Number => validate_number(value, schema, path, errors),
        FieldKind::Text => validate_text(value, schema, path, errors),
        FieldKind::Boolean => validate_boolean(value, path, errors),
        FieldKind::Enum => validate_enum(value, schema, path, errors),
        FieldKind::Object => {
            if let Value::Object(map) = value {
                let null = Value::Null;
                for (key, child_schema) in &schema.properties {
                    let child = map.get(key).unwrap_or(&null);
                    validate_node(child, child_schema, &path.join(key.as_str()), errors);
                }
            }
        }
        FieldKind::Array => {
            if let Value::Array(items) = value {
                if let Some(item_schema) = schema.item_schema() {
                    for (index, item) in items.iter().enumerate() {
                        validate_node(item, item_schema, &path.join(index), errors);
                    }
                }
            }
        }
        FieldKind::Function | FieldKind::Unknown => {}
    }
}

fn validate_number(
    value: &Value,
    schema: &SchemaNode,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    let n = match value {
        Value::Number(n) => *n,
        Value::Null => return,
        _ => {
            errors.push(ValidationError::new(path.clone(), "must be a number"));
            return;
        }
    };
    if let Some(min) = schema.min {
        if n < min {
            errors.push(ValidationError::new(
                path.clone(),
                format!("must be at least {}", fmt_bound(min)),
            ));
        }
    }
    if let Some(max) = schema.max {
        if n > max {
            errors.push(ValidationError::new(
                path.clone(),
                format!("must be at most {}", fmt_bound(max)),
            ));
        }
    }
}

fn validate_text(
    value: &Value,
    schema: &SchemaNode,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    let text = match value {
        Value::Text(t) => t,
        Value::Null => return,
        _ => {
            errors.push(ValidationError::new(path.clone(), "must be text"));
            return;
        }
    };
    let length = text.chars().count() as f64;
    if let Some(min) = schema.min {
        if length < min {
            errors.push(ValidationError::new(
                path.clone(),
                format!("must be at least {} characters", fmt_bound(min)),
            ));
        }
    }
    if let Some(max) = schema.max {
        if length > max {
            errors.push(ValidationError::new(
                path.clone(),
                format!("must be at most {} characters", fmt_bound(max)),
            ));
        }
    }
    if let Some(pattern) = &schema.pattern {
        // An unparseable pattern disables the constraint rather than failing
        // the field for a schema author's mistake.
        if let Ok(re) = Regex::new(pattern) {
            if !re.is_match(text) {
                errors.push(ValidationError::new(
                    path.clone(),
                    "does not match the expected pattern",
                ));
            }
        }
    }
}

fn validate_boolean(value: &Value, path: &Path, errors: &mut Vec<ValidationError>) {
    match value {
        Value::Bool(_) | Value::Null => {}
        _ => errors.push(ValidationError::new(path.clone(), "must be true or false")),
    }
}

fn validate_enum(
    value: &Value,
    schema: &SchemaNode,
    path: &Path,
    errors: &mut Vec<ValidationError>,
) {
    let text = match value {
        Value::Text(t) => t,
        Value::Null => return,
        _ => {
            errors.push(ValidationError::new(
                path.clone(),
                format!("must be one of: {}", schema.options.join(", ")),
            ));
            return;
        }
    };
    if !schema.options.iter().any(|o| o == text) {
        errors.push(ValidationError::new(
            path.clone(),
            format!("must be one of: {}", schema.options.join(", ")),
        ));
    }
}

/// Whether a value counts as "missing" for the required rule: null, empty
/// text, or an empty array.
fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Text(t) => t.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

// ===========================================================================
// Tests
// ===========================================================================
