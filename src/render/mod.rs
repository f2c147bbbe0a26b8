//! Renderer: projects (value, schema, errors, UI state) into a field tree.
//!
//! [`build`] is a pure projection — it reads its arguments and produces a
//! [`FieldTree`] whose shape mirrors the value tree, decorated with labels,
//! controls matched to each field's effective kind, inline errors, and
//! collapse/focus flags. Scoped updates ([`patch_field`],
//! [`rebuild_subtree`]) edit the tree in place so sibling subtrees survive
//! a field edit untouched.

pub mod field;
pub mod label;
pub mod tree;

use std::collections::BTreeSet;

use crate::path::Path;
use crate::schema::resolve::{effective_kind, is_simple_array};
use crate::schema::{FieldKind, SchemaNode};
use crate::validate::ErrorSet;
use crate::value::Value;

use self::field::{FieldControl, FieldNode};
use self::label::{humanize, item_label};
use self::tree::{FieldId, FieldTree};

// ---------------------------------------------------------------------------
// UiState
// ---------------------------------------------------------------------------

/// Ephemeral display state, kept apart from the value tree.
///
/// Collapse and focus are addressed by path; they reset on external
/// value/schema replacement and re-key on structural array mutations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UiState {
    /// Paths of currently collapsed sections.
    pub collapsed: BTreeSet<Path>,
    /// Path of the field holding focus, if any.
    pub focused: Option<Path>,
    /// Global read-only display flag.
    pub read_only: bool,
}

impl UiState {
    /// Drop collapse and focus state. The read-only flag is configuration
    /// and survives.
    pub fn reset(&mut self) {
        self.collapsed.clear();
        self.focused = None;
    }
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Pick the input control for a value and its (optional) schema node.
pub fn control_for(value: &Value, schema: Option<&SchemaNode>) -> FieldControl {
    match effective_kind(schema, value) {
        FieldKind::Text => FieldControl::Text {
            value: value.display_text(),
        },
        FieldKind::Number => {
            let n = value.as_number();
            let min = schema.and_then(|s| s.min);
            let max = schema.and_then(|s| s.max);
            match (min, max) {
                // Both bounds declared: slider paired with a number readout.
                (Some(min), Some(max)) => FieldControl::Slider {
                    value: n.unwrap_or(min),
                    min,
                    max,
                },
                (min, max) => FieldControl::NumberInput { value: n, min, max },
            }
        }
        FieldKind::Boolean => FieldControl::Checkbox {
            checked: value.as_bool().unwrap_or(false),
        },
        FieldKind::Enum => FieldControl::Select {
            options: schema.map(|s| s.options.clone()).unwrap_or_default(),
            selected: value.as_text().map(str::to_owned),
        },
        FieldKind::Function => match value {
            Value::Function(name) => FieldControl::ActionButton {
                action: name.clone(),
            },
            // Declared function without a function value: nothing to invoke.
            _ => FieldControl::StaticText {
                text: value.display_text(),
            },
        },
        FieldKind::Object => FieldControl::Section,
        FieldKind::Array => {
            let item_schema = schema.and_then(|s| s.item_schema());
            match value.as_array() {
                Some(items) => FieldControl::ArrayList {
                    simple: is_simple_array(items, item_schema),
                    len: items.len(),
                },
                None => FieldControl::ArrayList {
                    simple: item_schema.is_none(),
                    len: 0,
                },
            }
        }
        FieldKind::Unknown => FieldControl::StaticText {
            text: value.display_text(),
        },
    }
}

/// Build the full field tree for a value/schema pair.
///
/// The root node is a container labeled `root`; the editor overrides the
/// label with its header title when one is configured.
pub fn build(
    value: &Value,
    schema: Option<&SchemaNode>,
    errors: &ErrorSet,
    ui: &UiState,
) -> FieldTree {
    let mut tree = FieldTree::new();
    let root_path = Path::root();
    let root = tree.insert(make_node(&root_path, "root", value, schema, errors, ui));
    build_children(&mut tree, root, &root_path, value, schema, errors, ui);
    tree
}

/// Build (recursively) the child fields of a container node.
fn build_children(
    tree: &mut FieldTree,
    parent: FieldId,
    path: &Path,
    value: &Value,
    schema: Option<&SchemaNode>,
    errors: &ErrorSet,
    ui: &UiState,
) {
    match (effective_kind(schema, value), value) {
        (FieldKind::Object, Value::Object(map)) => {
            // Value keys first (mirroring the value tree), then
            // schema-declared keys the value is missing, so required fields
            // show up for the user to fill.
            let mut keys: Vec<&String> = map.keys().collect();
            if let Some(schema) = schema {
                for key in schema.properties.keys() {
                    if !map.contains_key(key) {
                        keys.push(key);
                    }
                }
            }
            let null = Value::Null;
            for key in keys {
                let child_path = path.join(key.as_str());
                let child_schema = schema.and_then(|s| s.property(key));
                let child_value = map.get(key).unwrap_or(&null);
                let label = child_schema
                    .and_then(|s| s.label.clone())
                    .unwrap_or_else(|| humanize(key));
                let id = tree.insert_child(
                    parent,
                    make_node(&child_path, label, child_value, child_schema, errors, ui),
                );
                build_children(tree, id, &child_path, child_value, child_schema, errors, ui);
            }
        }
        (FieldKind::Array, Value::Array(items)) => {
            let item_schema = schema.and_then(|s| s.item_schema());
            for (index, item) in items.iter().enumerate() {
                let child_path = path.join(index);
                let label = item_schema
                    .and_then(|s| s.label.clone())
                    .unwrap_or_else(|| item_label(index));
                let id = tree.insert_child(
                    parent,
                    make_node(&child_path, label, item, item_schema, errors, ui),
                );
                build_children(tree, id, &child_path, item, item_schema, errors, ui);
            }
        }
        _ => {}
    }
}

fn make_node(
    path: &Path,
    label: impl Into<String>,
    value: &Value,
    schema: Option<&SchemaNode>,
    errors: &ErrorSet,
    ui: &UiState,
) -> FieldNode {
    let control = control_for(value, schema);
    let readonly = ui.read_only
        || schema.map(|s| s.readonly).unwrap_or(false)
        || matches!(control, FieldControl::StaticText { .. });
    FieldNode::new(path.clone(), label, control)
        .with_error(errors.get(path).map(str::to_owned))
        .collapsed(ui.collapsed.contains(path))
        .focused(ui.focused.as_ref() == Some(path))
        .readonly(readonly)
}

// ---------------------------------------------------------------------------
// Scoped updates
// ---------------------------------------------------------------------------

/// Update one field's control and error text in place after a leaf edit.
///
/// Never rebuilds children or siblings. Returns `false` if no field is
/// rendered at `path` (the caller falls back to a rebuild).
pub fn patch_field(
    tree: &mut FieldTree,
    path: &Path,
    value: &Value,
    schema: Option<&SchemaNode>,
    error: Option<&str>,
) -> bool {
    let Some(id) = tree.id_at(path) else {
        return false;
    };
    let control = control_for(value, schema);
    if let Some(node) = tree.get_mut(id) {
        node.control = control;
        node.error = error.map(str::to_owned);
        true
    } else {
        false
    }
}

/// Rebuild the subtree rooted at `path` (used after structural mutations,
/// where index shifts invalidate every later sibling's path).
pub fn rebuild_subtree(
    tree: &mut FieldTree,
    path: &Path,
    value: &Value,
    schema: Option<&SchemaNode>,
    errors: &ErrorSet,
    ui: &UiState,
) -> bool {
    let Some(id) = tree.id_at(path) else {
        return false;
    };
    tree.remove_children(id);
    if let Some(node) = tree.get_mut(id) {
        node.control = control_for(value, schema);
        node.error = errors.get(path).map(str::to_owned);
        node.collapsed = ui.collapsed.contains(path);
    }
    build_children(tree, id, path, value, schema, errors, ui);
    true
}

/// Refresh every node's inline error from the error set (after a full
/// validation pass).
pub fn apply_errors(tree: &mut FieldTree, errors: &ErrorSet) {
    for id in tree.walk() {
        if let Some(node) = tree.get_mut(id) {
            node.error = errors.get(&node.path).map(str::to_owned);
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validate::{validate, ValidationError};
    use crate::value::ValueMap;
    use pretty_assertions::assert_eq;

    fn p(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn person_schema() -> SchemaNode {
        SchemaNode::object()
            .with_property("name", SchemaNode::text().required(true))
            .with_property("age", SchemaNode::number().with_min(0.0).with_max(120.0))
            .with_property(
                "color",
                SchemaNode::enumeration(["red", "blue"]).with_label("Favorite color"),
            )
    }

    fn person(name: &str, age: f64) -> Value {
        let mut map = ValueMap::new();
        map.insert("name".into(), Value::from(name));
        map.insert("age".into(), Value::Number(age));
        map.insert("color".into(), Value::from("red"));
        Value::Object(map)
    }

    fn build_person(value: &Value, schema: &SchemaNode) -> FieldTree {
        let mut errors = ErrorSet::new();
        errors.replace_all(validate(value, Some(schema), &Path::root()));
        build(value, Some(schema), &errors, &UiState::default())
    }

    // ── control_for ──────────────────────────────────────────────────

    #[test]
    fn controls_match_kinds() {
        assert_eq!(
            control_for(&Value::from("x"), None),
            FieldControl::Text { value: "x".into() }
        );
        assert_eq!(
            control_for(&Value::Bool(true), None),
            FieldControl::Checkbox { checked: true }
        );
        assert_eq!(control_for(&Value::object(), None), FieldControl::Section);
        assert_eq!(
            control_for(&Value::Function("save".into()), None),
            FieldControl::ActionButton { action: "save".into() }
        );
        assert_eq!(
            control_for(&Value::Null, None),
            FieldControl::StaticText { text: "".into() }
        );
    }

    #[test]
    fn bounded_number_gets_slider() {
        let schema = SchemaNode::number().with_min(0.0).with_max(120.0);
        assert_eq!(
            control_for(&Value::from(30), Some(&schema)),
            FieldControl::Slider { value: 30.0, min: 0.0, max: 120.0 }
        );
    }

    #[test]
    fn half_bounded_number_gets_plain_input() {
        let schema = SchemaNode::number().with_min(0.0);
        assert_eq!(
            control_for(&Value::from(30), Some(&schema)),
            FieldControl::NumberInput { value: Some(30.0), min: Some(0.0), max: None }
        );
    }

    #[test]
    fn simple_array_control() {
        let value = Value::Array(vec![Value::from("a"), Value::from("b")]);
        assert_eq!(
            control_for(&value, None),
            FieldControl::ArrayList { simple: true, len: 2 }
        );
    }

    #[test]
    fn declared_function_without_function_value_is_static() {
        let schema = SchemaNode::function();
        assert_eq!(
            control_for(&Value::from("not a fn"), Some(&schema)),
            FieldControl::StaticText { text: "not a fn".into() }
        );
    }

    // ── build ────────────────────────────────────────────────────────

    #[test]
    fn build_mirrors_value_shape() {
        let schema = person_schema();
        let tree = build_person(&person("Ada", 30.0), &schema);
        let output = tree.render_to_string();
        assert_eq!(
            output,
            "root: [section]\n  Name: [text] \"Ada\"\n  Age: [slider 0..120] 30\n  Favorite color: [select] red"
        );
    }

    #[test]
    fn build_annotates_errors_inline() {
        let schema = person_schema();
        let tree = build_person(&person("", 200.0), &schema);
        let output = tree.render_to_string();
        assert!(output.contains("Name: [text] \"\"  !! is required"));
        assert!(output.contains("Age: [slider 0..120] 200  !! must be at most 120"));
    }

    #[test]
    fn build_includes_schema_only_keys() {
        // Value has no `name`; the schema declares it, so it renders (and
        // carries its required error).
        let schema = person_schema();
        let value = Value::object();
        let tree = build_person(&value, &schema);
        let node = tree.node_at(&p("name")).unwrap();
        assert_eq!(node.error.as_deref(), Some("is required"));
    }

    #[test]
    fn build_without_schema_infers_everything() {
        let mut map = ValueMap::new();
        map.insert("title".into(), Value::from("hello"));
        map.insert("done".into(), Value::Bool(false));
        let tree = build(
            &Value::Object(map),
            None,
            &ErrorSet::new(),
            &UiState::default(),
        );
        assert_eq!(
            tree.render_to_string(),
            "root: [section]\n  Title: [text] \"hello\"\n  Done: [checkbox] false"
        );
    }

    #[test]
    fn build_array_items_as_subforms() {
        let schema = SchemaNode::object().with_property(
            "people",
            SchemaNode::array(SchemaNode::object().with_property("name", SchemaNode::text())),
        );
        let mut item = ValueMap::new();
        item.insert("name".into(), Value::from("Ada"));
        let mut root = ValueMap::new();
        root.insert("people".into(), Value::Array(vec![Value::Object(item)]));
        let tree = build_person(&Value::Object(root), &schema);
        assert_eq!(
            tree.render_to_string(),
            "root: [section]\n  People: [array] 1 item\n    Item 1: [section]\n      Name: [text] \"Ada\""
        );
    }

    #[test]
    fn build_honors_collapse_and_focus() {
        let schema = person_schema();
        let value = person("Ada", 30.0);
        let mut ui = UiState::default();
        ui.collapsed.insert(Path::root());
        ui.focused = Some(p("name"));
        let tree = build(&value, Some(&schema), &ErrorSet::new(), &ui);
        assert!(tree.node_at(&Path::root()).unwrap().collapsed);
        assert!(tree.node_at(&p("name")).unwrap().focused);
        assert!(!tree.node_at(&p("age")).unwrap().focused);
    }

    #[test]
    fn build_readonly_flags() {
        let schema =
            SchemaNode::object().with_property("id", SchemaNode::text().readonly(true));
        let mut map = ValueMap::new();
        map.insert("id".into(), Value::from("x1"));
        let value = Value::Object(map);

        let tree = build(&value, Some(&schema), &ErrorSet::new(), &UiState::default());
        assert!(tree.node_at(&p("id")).unwrap().readonly);

        let ui = UiState { read_only: true, ..UiState::default() };
        let tree = build(&value, Some(&schema), &ErrorSet::new(), &ui);
        assert!(tree.node_at(&Path::root()).unwrap().readonly);
    }

    // ── patch_field ──────────────────────────────────────────────────

    #[test]
    fn patch_updates_value_and_error_in_place() {
        let schema = person_schema();
        let mut tree = build_person(&person("", 30.0), &schema);
        assert!(tree.node_at(&p("name")).unwrap().error.is_some());

        let patched = patch_field(
            &mut tree,
            &p("name"),
            &Value::from("Ada"),
            schema.property("name"),
            None,
        );
        assert!(patched);
        let node = tree.node_at(&p("name")).unwrap();
        assert_eq!(node.control, FieldControl::Text { value: "Ada".into() });
        assert!(node.error.is_none());
    }

    #[test]
    fn patch_leaves_siblings_untouched() {
        let schema = person_schema();
        let mut tree = build_person(&person("Ada", 30.0), &schema);
        let age_before = tree.node_at(&p("age")).unwrap().clone();
        patch_field(&mut tree, &p("name"), &Value::from("Grace"), None, None);
        assert_eq!(tree.node_at(&p("age")).unwrap(), &age_before);
    }

    #[test]
    fn patch_unknown_path_is_false() {
        let schema = person_schema();
        let mut tree = build_person(&person("Ada", 30.0), &schema);
        assert!(!patch_field(&mut tree, &p("missing"), &Value::Null, None, None));
    }

    // ── rebuild_subtree ──────────────────────────────────────────────

    #[test]
    fn rebuild_regenerates_array_children() {
        let mut root = ValueMap::new();
        root.insert(
            "tags".into(),
            Value::Array(vec![Value::from("a"), Value::from("b")]),
        );
        let mut value = Value::Object(root);
        let mut tree = build(&value, None, &ErrorSet::new(), &UiState::default());
        assert_eq!(tree.children(tree.id_at(&p("tags")).unwrap()).len(), 2);

        // Append an item, then rebuild only the array subtree.
        if let Some(Value::Array(items)) = value.get_mut(&p("tags")) {
            items.push(Value::from("c"));
        }
        let rebuilt = rebuild_subtree(
            &mut tree,
            &p("tags"),
            value.get(&p("tags")).unwrap(),
            None,
            &ErrorSet::new(),
            &UiState::default(),
        );
        assert!(rebuilt);
        assert_eq!(tree.children(tree.id_at(&p("tags")).unwrap()).len(), 3);
        assert!(tree.node_at(&p("tags[2]")).is_some());
        let node = tree.node_at(&p("tags")).unwrap();
        assert_eq!(node.control, FieldControl::ArrayList { simple: true, len: 3 });
    }

    // ── apply_errors ─────────────────────────────────────────────────

    #[test]
    fn apply_errors_refreshes_annotations() {
        let schema = person_schema();
        let mut tree = build_person(&person("Ada", 30.0), &schema);
        let mut errors = ErrorSet::new();
        errors.replace_all(vec![ValidationError::new(p("age"), "out of range")]);
        apply_errors(&mut tree, &errors);
        assert_eq!(
            tree.node_at(&p("age")).unwrap().error.as_deref(),
            Some("out of range")
        );
        assert!(tree.node_at(&p("name")).unwrap().error.is_none());
    }
}
