//! Field node types: FieldControl, FieldNode.

use crate::path::Path;
use crate::value::format_number;

/// The input control a field renders with, matched to its effective kind.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldControl {
    /// Free-form text input.
    Text {
        /// Current display value.
        value: String,
    },
    /// Plain number input, optionally bounded on one side.
    NumberInput {
        /// Current numeric value; `None` when the value is null or not a
        /// number (the host shows an empty input).
        value: Option<f64>,
        /// Declared lower bound, if any.
        min: Option<f64>,
        /// Declared upper bound, if any.
        max: Option<f64>,
    },
    /// Slider paired with a number readout. Used when both bounds are
    /// declared.
    Slider {
        /// Current numeric value.
        value: f64,
        /// Declared lower bound.
        min: f64,
        /// Declared upper bound.
        max: f64,
    },
    /// True/false toggle.
    Checkbox {
        /// Current checked state.
        checked: bool,
    },
    /// Closed option list.
    Select {
        /// The declared options.
        options: Vec<String>,
        /// Currently selected option, if the value matches one.
        selected: Option<String>,
    },
    /// Invoke-only button for function fields.
    ActionButton {
        /// The action name passed back to the host on invocation.
        action: String,
    },
    /// Nested object section with a collapse affordance.
    Section,
    /// Array container with add/remove/move affordances.
    ArrayList {
        /// Compact inline rendering for homogeneous primitive items.
        simple: bool,
        /// Current item count.
        len: usize,
    },
    /// Read-only display for unknown/passthrough values.
    StaticText {
        /// Display text.
        text: String,
    },
}

impl FieldControl {
    /// Whether this control is a container (section or array list).
    pub fn is_container(&self) -> bool {
        matches!(self, FieldControl::Section | FieldControl::ArrayList { .. })
    }

    /// Short name of the control type, for logs and outlines.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldControl::Text { .. } => "text",
            FieldControl::NumberInput { .. } => "number",
            FieldControl::Slider { .. } => "slider",
            FieldControl::Checkbox { .. } => "checkbox",
            FieldControl::Select { .. } => "select",
            FieldControl::ActionButton { .. } => "button",
            FieldControl::Section => "section",
            FieldControl::ArrayList { .. } => "array",
            FieldControl::StaticText { .. } => "static",
        }
    }
}

// ---------------------------------------------------------------------------
// FieldNode
// ---------------------------------------------------------------------------

/// One rendered field: a label, a control, and display state.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldNode {
    /// Path of the value this field edits.
    pub path: Path,
    /// Display label.
    pub label: String,
    /// The input control.
    pub control: FieldControl,
    /// Inline validation error, if the field currently has one.
    pub error: Option<String>,
    /// Whether a section/array field is collapsed.
    pub collapsed: bool,
    /// Whether this field currently holds focus.
    pub focused: bool,
    /// Whether the field renders without an editable control.
    pub readonly: bool,
}

impl FieldNode {
    /// Create a field node with the given path, label, and control.
    pub fn new(path: Path, label: impl Into<String>, control: FieldControl) -> Self {
        Self {
            path,
            label: label.into(),
            control,
            error: None,
            collapsed: false,
            focused: false,
            readonly: false,
        }
    }

    /// Set the inline error (builder).
    pub fn with_error(mut self, error: Option<String>) -> Self {
        self.error = error;
        self
    }

    /// Set the collapsed flag (builder).
    pub fn collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = collapsed;
        self
    }

    /// Set the focused flag (builder).
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set the readonly flag (builder).
    pub fn readonly(mut self, readonly: bool) -> Self {
        self.readonly = readonly;
        self
    }

    /// One-line outline rendering of this field, without indentation.
    ///
    /// Format: `Label: [control] value`, with `  !! message` appended when
    /// an error is present. Used by the tree outline and snapshot tests.
    pub fn outline(&self) -> String {
        let body = match &self.control {
            FieldControl::Text { value } => format!("[text] \"{value}\""),
            FieldControl::NumberInput {
                value: Some(n), ..
            } => format!("[number] {}", format_number(*n)),
            FieldControl::NumberInput { value: None, .. } => "[number]".to_owned(),
            FieldControl::Slider { value, min, max } => format!(
                "[slider {}..{}] {}",
                format_number(*min),
                format_number(*max),
                format_number(*value)
            ),
            FieldControl::Checkbox { checked } => format!("[checkbox] {checked}"),
            FieldControl::Select {
                selected: Some(s), ..
            } => format!("[select] {s}"),
            FieldControl::Select { selected: None, .. } => "[select]".to_owned(),
            FieldControl::ActionButton { action } => format!("[button] {action}"),
            FieldControl::Section if self.collapsed => "[section collapsed]".to_owned(),
            FieldControl::Section => "[section]".to_owned(),
            FieldControl::ArrayList { simple, len } => {
                let plural = if *len == 1 { "item" } else { "items" };
                let mut tag = String::from("array");
                if *simple {
                    tag.push_str(" simple");
                }
                if self.collapsed {
                    tag.push_str(" collapsed");
                }
                format!("[{tag}] {len} {plural}")
            }
            FieldControl::StaticText { text } if text.is_empty() => "[static]".to_owned(),
            FieldControl::StaticText { text } => format!("[static] {text}"),
        };
        match &self.error {
            Some(message) => format!("{}: {body}  !! {message}", self.label),
            None => format!("{}: {body}", self.label),
        }
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn node(control: FieldControl) -> FieldNode {
        FieldNode::new(Path::root(), "Label", control)
    }

    // ── FieldControl ─────────────────────────────────────────────────

    #[test]
    fn container_probe() {
        assert!(FieldControl::Section.is_container());
        assert!(FieldControl::ArrayList { simple: false, len: 0 }.is_container());
        assert!(!FieldControl::Text { value: "".into() }.is_container());
    }

    #[test]
    fn type_names() {
        assert_eq!(FieldControl::Section.type_name(), "section");
        assert_eq!(
            FieldControl::Slider { value: 1.0, min: 0.0, max: 2.0 }.type_name(),
            "slider"
        );
    }

    // ── Builders ─────────────────────────────────────────────────────

    #[test]
    fn new_defaults() {
        let n = node(FieldControl::Section);
        assert!(n.error.is_none());
        assert!(!n.collapsed);
        assert!(!n.focused);
        assert!(!n.readonly);
    }

    #[test]
    fn builder_flags() {
        let n = node(FieldControl::Section)
            .collapsed(true)
            .focused(true)
            .readonly(true)
            .with_error(Some("bad".into()));
        assert!(n.collapsed && n.focused && n.readonly);
        assert_eq!(n.error.as_deref(), Some("bad"));
    }

    // ── Outline ──────────────────────────────────────────────────────

    #[test]
    fn outline_text() {
        let n = node(FieldControl::Text { value: "Ada".into() });
        assert_eq!(n.outline(), "Label: [text] \"Ada\"");
    }

    #[test]
    fn outline_number_with_and_without_value() {
        let n = node(FieldControl::NumberInput { value: Some(30.0), min: None, max: None });
        assert_eq!(n.outline(), "Label: [number] 30");
        let n = node(FieldControl::NumberInput { value: None, min: None, max: None });
        assert_eq!(n.outline(), "Label: [number]");
    }

    #[test]
    fn outline_slider() {
        let n = node(FieldControl::Slider { value: 30.0, min: 0.0, max: 120.0 });
        assert_eq!(n.outline(), "Label: [slider 0..120] 30");
    }

    #[test]
    fn outline_checkbox_and_select() {
        let n = node(FieldControl::Checkbox { checked: true });
        assert_eq!(n.outline(), "Label: [checkbox] true");
        let n = node(FieldControl::Select {
            options: vec!["red".into(), "blue".into()],
            selected: Some("red".into()),
        });
        assert_eq!(n.outline(), "Label: [select] red");
    }

    #[test]
    fn outline_section_collapsed() {
        let n = node(FieldControl::Section).collapsed(true);
        assert_eq!(n.outline(), "Label: [section collapsed]");
    }

    #[test]
    fn outline_array_pluralizes() {
        let n = node(FieldControl::ArrayList { simple: true, len: 1 });
        assert_eq!(n.outline(), "Label: [array simple] 1 item");
        let n = node(FieldControl::ArrayList { simple: false, len: 2 });
        assert_eq!(n.outline(), "Label: [array] 2 items");
    }

    #[test]
    fn outline_array_collapsed() {
        let n = node(FieldControl::ArrayList { simple: false, len: 3 }).collapsed(true);
        assert_eq!(n.outline(), "Label: [array collapsed] 3 items");
    }

    #[test]
    fn outline_error_suffix() {
        let n = node(FieldControl::Text { value: "".into() })
            .with_error(Some("is required".into()));
        assert_eq!(n.outline(), "Label: [text] \"\"  !! is required");
    }
}
