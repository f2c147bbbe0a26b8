//! Schema types: FieldKind, SchemaNode.
//!
//! A [`SchemaNode`] declares the expected shape and constraints of one field:
//! its kind, label override, required/readonly flags, numeric or length
//! bounds, enum options, default value, and nested schemas for objects and
//! arrays. Schemas are optional everywhere — a field with no declaration
//! renders and validates from the value's runtime shape alone.

pub mod resolve;

use indexmap::IndexMap;

use crate::value::Value;

/// Ordered map of property schemas for object nodes.
pub type SchemaMap = IndexMap<String, SchemaNode>;

// ---------------------------------------------------------------------------
// FieldKind
// ---------------------------------------------------------------------------

/// The kind of a field, declared by schema or inferred from the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Free-form text.
    Text,
    /// Numeric value.
    Number,
    /// True/false toggle.
    Boolean,
    /// One of a closed set of string options.
    Enum,
    /// Nested key-value section.
    Object,
    /// Ordered sequence of items.
    Array,
    /// Invokable host action.
    Function,
    /// Anything the editor cannot interpret; rendered read-only.
    Unknown,
}

impl FieldKind {
    /// Parse a declared type name. Unrecognized names map to `Unknown`
    /// rather than erroring (value shape wins at render time anyway).
    pub fn from_name(name: &str) -> FieldKind {
        match name {
            "string" | "text" => FieldKind::Text,
            "number" => FieldKind::Number,
            "boolean" | "bool" => FieldKind::Boolean,
            "enum" => FieldKind::Enum,
            "object" => FieldKind::Object,
            "array" => FieldKind::Array,
            "function" => FieldKind::Function,
            _ => FieldKind::Unknown,
        }
    }
}

// ---------------------------------------------------------------------------
// SchemaNode
// ---------------------------------------------------------------------------

/// Declarative description of one expected field.
///
/// Constructed with builder methods in the usual widget style:
///
/// ```
/// use kvform::schema::SchemaNode;
///
/// let schema = SchemaNode::object()
///     .with_property("name", SchemaNode::text().required(true))
///     .with_property("age", SchemaNode::number().with_min(0.0).with_max(120.0));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SchemaNode {
    /// Declared kind. `None` means "infer from the value".
    pub kind: Option<FieldKind>,
    /// Label override; otherwise the label derives from the key.
    pub label: Option<String>,
    /// Whether a missing/empty value is an error.
    pub required: bool,
    /// Whether the field renders without an editable control.
    pub readonly: bool,
    /// Lower bound: numeric value for numbers, length for text.
    pub min: Option<f64>,
    /// Upper bound: numeric value for numbers, length for text.
    pub max: Option<f64>,
    /// Regex the full text value must match.
    pub pattern: Option<String>,
    /// Options for enum fields.
    pub options: Vec<String>,
    /// Default value, used when generating new array items.
    pub default: Option<Value>,
    /// Property schemas for object fields.
    pub properties: SchemaMap,
    /// Element schema for array fields.
    pub items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// A schema node with no declared kind (infer everything).
    pub fn new() -> Self {
        Self::default()
    }

    fn of_kind(kind: FieldKind) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    /// A text field.
    pub fn text() -> Self {
        Self::of_kind(FieldKind::Text)
    }

    /// A numeric field.
    pub fn number() -> Self {
        Self::of_kind(FieldKind::Number)
    }

    /// A boolean field.
    pub fn boolean() -> Self {
        Self::of_kind(FieldKind::Boolean)
    }

    /// An enum field over the given options.
    pub fn enumeration(options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let mut node = Self::of_kind(FieldKind::Enum);
        node.options = options.into_iter().map(Into::into).collect();
        node
    }

    /// A nested object section.
    pub fn object() -> Self {
        Self::of_kind(FieldKind::Object)
    }

    /// An array field with an element schema.
    pub fn array(items: SchemaNode) -> Self {
        let mut node = Self::of_kind(FieldKind::Array);
        node.items = Some(Box::new(items));
        node
    }

    /// An invokable action field.
    pub fn function() -> Self {
        Self::of_kind(FieldKind::Function)
    }

    /// Set the label override (builder).
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the required flag (builder).
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the readonly flag (builder).
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// Set the lower bound (builder).
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Set the upper bound (builder).
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Set the text pattern (builder). The pattern is compiled lazily at
    /// validation time; an invalid pattern disables the constraint.
    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Set the default value (builder).
    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Add a property schema for an object field (builder).
    pub fn with_property(mut self, key: impl Into<String>, schema: SchemaNode) -> Self {
        self.properties.insert(key.into(), schema);
        self
    }

    /// Set the element schema for an array field (builder).
    pub fn with_items(mut self, items: SchemaNode) -> Self {
        self.items = Some(Box::new(items));
        self
    }

    /// Look up the schema for an object property.
    pub fn property(&self, key: &str) -> Option<&SchemaNode> {
        self.properties.get(key)
    }

    /// The element schema for array items, if declared.
    pub fn item_schema(&self) -> Option<&SchemaNode> {
        self.items.as_deref()
    }

    /// Load a schema from a declarative JSON description.
    ///
    /// ```json
    /// {
    ///   "type": "object",
    ///   "properties": {
    ///     "name": { "type": "string", "required": true },
    ///     "age": { "type": "number", "min": 0, "max": 120 }
    ///   }
    /// }
    /// ```
    ///
    /// Malformed declarations degrade instead of erroring: an unknown type
    /// name becomes `Unknown`, non-object input yields an empty schema.
    pub fn from_json(json: &serde_json::Value) -> SchemaNode {
        let Some(map) = json.as_object() else {
            return SchemaNode::new();
        };

        let mut node = SchemaNode::new();
        node.kind = map
            .get("type")
            .and_then(|t| t.as_str())
            .map(FieldKind::from_name);
        node.label = map
            .get("label")
            .and_then(|l| l.as_str())
            .map(str::to_owned);
        node.required = map
            .get("required")
            .and_then(|r| r.as_bool())
            .unwrap_or(false);
        node.readonly = map
            .get("readonly")
            .and_then(|r| r.as_bool())
            .unwrap_or(false);
        node.min = map.get("min").and_then(|n| n.as_f64());
        node.max = map.get("max").and_then(|n| n.as_f64());
        node.pattern = map
            .get("pattern")
            .and_then(|p| p.as_str())
            .map(str::to_owned);
        if let Some(options) = map.get("options").and_then(|o| o.as_array()) {
            node.options = options
                .iter()
                .filter_map(|o| o.as_str().map(str::to_owned))
                .collect();
        }
        node.default = map.get("default").cloned().map(Value::from);
        if let Some(properties) = map.get("properties").and_then(|p| p.as_object()) {
            for (key, child) in properties {
                node.properties
                    .insert(key.clone(), SchemaNode::from_json(child));
            }
        }
        if let Some(items) = map.get("items") {
            node.items = Some(Box::new(SchemaNode::from_json(items)));
        }
        node
    }
}

// ===========================================================================
// Tests
// ===========================================================================
