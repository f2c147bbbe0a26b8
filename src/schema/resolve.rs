//! Schema resolution: effective kind, simple-array detection, defaults.
//!
//! The renderer and validator never trust a declared kind blindly. A schema
//! claiming a container kind for a value of a different shape resolves to
//! the value-inferred kind instead, so recursion always matches the data it
//! walks (value shape over declared shape).

use crate::path::{Path, Segment};
use crate::value::Value;

use super::{FieldKind, SchemaNode};

/// Infer a field kind from a value's runtime shape.
pub fn infer_kind(value: &Value) -> FieldKind {
    match value {
        Value::Null => FieldKind::Unknown,
        Value::Bool(_) => FieldKind::Boolean,
        Value::Number(_) => FieldKind::Number,
        Value::Text(_) => FieldKind::Text,
        Value::Array(_) => FieldKind::Array,
        Value::Object(_) => FieldKind::Object,
        Value::Function(_) => FieldKind::Function,
    }
}

/// Resolve the kind to render and validate a field as.
///
/// Declared kind wins, except when a declared container kind (object/array)
/// contradicts a non-null value of another shape — then the inferred kind
/// wins. A null value never contradicts a declaration (there is nothing to
/// recurse into either way).
pub fn effective_kind(schema: Option<&SchemaNode>, value: &Value) -> FieldKind {
    let Some(declared) = schema.and_then(|s| s.kind) else {
        return infer_kind(value);
    };
    match declared {
        FieldKind::Object if !value.is_object() && !value.is_null() => infer_kind(value),
        FieldKind::Array if !value.is_array() && !value.is_null() => infer_kind(value),
        kind => kind,
    }
}

/// Whether an array renders as a compact "simple array" (inline add/remove
/// of primitive items) rather than one sub-form per item.
///
/// True when no element schema is declared and every item is a primitive of
/// the same shape. An empty array with no element schema is simple.
pub fn is_simple_array(items: &[Value], item_schema: Option<&SchemaNode>) -> bool {
    if item_schema.is_some() {
        return false;
    }
    let mut kinds = items.iter().map(infer_kind);
    let Some(first) = kinds.next() else {
        return true;
    };
    let primitive = matches!(
        first,
        FieldKind::Text | FieldKind::Number | FieldKind::Boolean
    );
    primitive && kinds.all(|k| k == first)
}

/// Produce a default value for a field described by `schema`.
///
/// Used when appending array items without an explicit value. An explicit
/// schema default wins; otherwise the declared kind picks a zero value
/// (empty text, lower bound or 0, false, first enum option, empty
/// container, defaults of each declared property for objects). With no
/// schema at all the default is `Null`.
pub fn default_for(schema: Option<&SchemaNode>) -> Value {
    let Some(schema) = schema else {
        return Value::Null;
    };
    if let Some(default) = &schema.default {
        return default.clone();
    }
    match schema.kind {
        Some(FieldKind::Text) => Value::Text(String::new()),
        Some(FieldKind::Number) => Value::Number(schema.min.unwrap_or(0.0)),
        Some(FieldKind::Boolean) => Value::Bool(false),
        Some(FieldKind::Enum) => schema
            .options
            .first()
            .map(|o| Value::Text(o.clone()))
            .unwrap_or(Value::Null),
        Some(FieldKind::Object) => {
            let map = schema
                .properties
                .iter()
                .map(|(key, child)| (key.clone(), default_for(Some(child))))
                .collect();
            Value::Object(map)
        }
        Some(FieldKind::Array) => Value::array(),
        Some(FieldKind::Function) | Some(FieldKind::Unknown) | None => Value::Null,
    }
}

/// Walk the schema tree to the node describing `path`.
///
/// Key segments descend through object properties, index segments through
/// the element schema. Returns `None` as soon as the schema stops
/// describing the path (undeclared keys are legal in the value tree).
pub fn schema_at<'a>(schema: Option<&'a SchemaNode>, path: &Path) -> Option<&'a SchemaNode> {
    let mut current = schema?;
    for segment in path.segments() {
        current = match segment {
            Segment::Key(key) => current.property(key)?,
            Segment::Index(_) => current.item_schema()?,
        };
    }
    Some(current)
}

// ===========================================================================
// Tests
// ===========================================================================
