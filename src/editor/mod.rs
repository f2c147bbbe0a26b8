//! The editor facade: value, schema, errors, UI state, and the field tree
//! behind one mutation API.
//!
//! [`KeyValueEditor`] owns every piece of state and keeps them consistent:
//! each successful mutation updates the value tree, revalidates the edited
//! scope, patches the rendered field tree, and emits exactly one
//! [`EditorEvent::Changed`] carrying the affected path, the new value, and
//! a full snapshot. All of that happens synchronously inside the mutating
//! call; the host drains events with [`KeyValueEditor::take_events`]
//! whenever it likes.

pub mod throttle;

use std::time::{Duration, Instant};

use tracing::debug;

use crate::event::{EditorEvent, EventQueue};
use crate::path::{Path, Segment};
use crate::render::tree::FieldTree;
use crate::render::{self, UiState};
use crate::schema::resolve::{default_for, schema_at};
use crate::schema::SchemaNode;
use crate::theme::ThemeMode;
use crate::validate::{validate, ErrorSet};
use crate::value::Value;

use self::throttle::EditThrottle;

// ---------------------------------------------------------------------------
// MoveDirection
// ---------------------------------------------------------------------------

/// Direction for [`KeyValueEditor::move_array_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    /// Toward index zero.
    Up,
    /// Toward the end of the array.
    Down,
}

// ---------------------------------------------------------------------------
// KeyValueEditor
// ---------------------------------------------------------------------------

/// Schema-driven editor over a tree of key/value data.
///
/// # Examples
///
/// ```
/// use kvform::editor::KeyValueEditor;
/// use kvform::schema::SchemaNode;
/// use kvform::value::Value;
///
/// let schema = SchemaNode::object()
///     .with_property("name", SchemaNode::text().required(true));
/// let mut editor = KeyValueEditor::new().with_schema(schema);
/// editor.update_value("name", Value::from("Ada"));
/// assert!(editor.is_valid());
/// ```
pub struct KeyValueEditor {
    value: Value,
    schema: Option<SchemaNode>,
    errors: ErrorSet,
    ui: UiState,
    tree: FieldTree,
    throttle: EditThrottle,
    events: EventQueue,
    title: Option<String>,
    compact: bool,
    theme: ThemeMode,
}

impl KeyValueEditor {
    /// Create an editor over an empty object with no schema.
    pub fn new() -> Self {
        let mut editor = Self {
            value: Value::object(),
            schema: None,
            errors: ErrorSet::new(),
            ui: UiState::default(),
            tree: FieldTree::new(),
            throttle: EditThrottle::default(),
            events: EventQueue::new(),
            title: None,
            compact: false,
            theme: ThemeMode::default(),
        };
        editor.rebuild();
        editor
    }

    // --- builders ---

    /// Set the initial value tree. Does not emit an event.
    pub fn with_value(mut self, value: impl Into<Value>) -> Self {
        self.value = value.into();
        self.revalidate_all();
        self.rebuild();
        self
    }

    /// Set the schema.
    pub fn with_schema(mut self, schema: SchemaNode) -> Self {
        self.schema = Some(schema);
        self.revalidate_all();
        self.rebuild();
        self
    }

    /// Set the header title, shown as the root field's label.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self.apply_title();
        self
    }

    /// Set the global read-only flag.
    pub fn read_only(mut self, read_only: bool) -> Self {
        self.ui.read_only = read_only;
        self.rebuild();
        self
    }

    /// Set the compact display flag.
    pub fn compact(mut self, compact: bool) -> Self {
        self.compact = compact;
        self
    }

    /// Set the theme mode.
    pub fn with_theme(mut self, theme: ThemeMode) -> Self {
        self.theme = theme;
        self
    }

    /// Set the coalescing window for throttled edits.
    pub fn with_throttle_window(mut self, window: Duration) -> Self {
        self.throttle = EditThrottle::new(window);
        self
    }

    // --- value and schema ---

    /// The current value tree.
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Replace the entire value tree.
    ///
    /// Collapse and focus state reset (the old paths no longer describe the
    /// new tree), the whole tree revalidates and re-renders, and a single
    /// `Changed` event is emitted at the root.
    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
        self.ui.reset();
        self.throttle.flush_all();
        self.revalidate_all();
        self.rebuild();
        debug!("value tree replaced");
        self.emit_changed(Path::root());
    }

    /// The current schema, if one is set.
    pub fn schema(&self) -> Option<&SchemaNode> {
        self.schema.as_ref()
    }

    /// Replace the schema. The value tree is untouched and no event is
    /// emitted, but everything revalidates and re-renders against the new
    /// declarations.
    pub fn set_schema(&mut self, schema: Option<SchemaNode>) {
        self.schema = schema;
        self.ui.reset();
        self.revalidate_all();
        self.rebuild();
        debug!("schema replaced");
    }

    // --- reads ---

    /// The value at `path`, if it exists.
    pub fn get(&self, path: &Path) -> Option<&Value> {
        self.value.get(path)
    }

    /// The current validation errors.
    pub fn errors(&self) -> &ErrorSet {
        &self.errors
    }

    /// The rendered field tree.
    pub fn field_tree(&self) -> &FieldTree {
        &self.tree
    }

    /// Render the field tree as an indented plain-text outline.
    pub fn render_to_string(&self) -> String {
        self.tree.render_to_string()
    }

    // --- mutation ---

    /// Set the value at `path`.
    ///
    /// Returns `false` without touching anything when the path does not
    /// resolve to a settable location (missing intermediate, array index
    /// out of bounds, non-container parent) or when the field is read-only.
    /// On success the edited scope revalidates, the rendered field patches
    /// in place, and one `Changed` event is emitted.
    pub fn set(&mut self, path: &Path, value: impl Into<Value>) -> bool {
        if self.is_read_only_at(path) {
            return false;
        }
        let value = value.into();
        if !self.value.set(path, value.clone()) {
            return false;
        }
        debug!(path = %path, "set value");
        self.revalidate_scope(path);
        self.refresh_field(path);
        self.emit_changed(path.clone());
        true
    }

    /// Set a top-level key. Shorthand for [`KeyValueEditor::set`] with a
    /// single-key path.
    pub fn update_value(&mut self, key: &str, value: impl Into<Value>) -> bool {
        let path = Path::from_segments([Segment::key(key)]);
        self.set(&path, value)
    }

    /// Set the value at a path given in string form (`"user.tags[0]"`).
    ///
    /// Returns `false` if the string does not parse as a path.
    pub fn update_value_by_path(&mut self, path: &str, value: impl Into<Value>) -> bool {
        match path.parse::<Path>() {
            Ok(path) => self.set(&path, value),
            Err(_) => false,
        }
    }

    /// Append an item to the array at `path`.
    ///
    /// With no explicit item the element schema's default is used (`Null`
    /// when no element schema is declared). Returns `false` if `path` does
    /// not hold an array.
    pub fn add_array_item(&mut self, path: &Path, item: Option<Value>) -> bool {
        if self.is_read_only_at(path) {
            return false;
        }
        let item_schema = schema_at(self.schema.as_ref(), path).and_then(|s| s.item_schema());
        let item = item.unwrap_or_else(|| default_for(item_schema));
        let Some(Value::Array(items)) = self.value.get_mut(path) else {
            return false;
        };
        items.push(item);
        debug!(path = %path, len = items.len(), "array item appended");
        self.after_array_mutation(path);
        true
    }

    /// Remove the item at `index` from the array at `path`.
    ///
    /// An out-of-bounds index is a silent no-op returning `false`. Collapse
    /// and focus state for later items re-keys down by one so it stays with
    /// the item it described.
    pub fn remove_array_item(&mut self, path: &Path, index: usize) -> bool {
        if self.is_read_only_at(path) {
            return false;
        }
        let Some(Value::Array(items)) = self.value.get_mut(path) else {
            return false;
        };
        if index >= items.len() {
            return false;
        }
        items.remove(index);
        debug!(path = %path, index, "array item removed");
        self.rekey_ui(path, |j| {
            if j == index {
                None
            } else if j > index {
                Some(j - 1)
            } else {
                Some(j)
            }
        });
        self.after_array_mutation(path);
        true
    }

    /// Move the item at `index` one step up or down, swapping it with its
    /// neighbor. Moving the first item up or the last item down is a no-op
    /// returning `false`. Collapse and focus state swaps along with the
    /// items.
    pub fn move_array_item(&mut self, path: &Path, index: usize, direction: MoveDirection) -> bool {
        if self.is_read_only_at(path) {
            return false;
        }
        let Some(Value::Array(items)) = self.value.get_mut(path) else {
            return false;
        };
        let other = match direction {
            MoveDirection::Up if index > 0 && index < items.len() => index - 1,
            MoveDirection::Down if index + 1 < items.len() => index + 1,
            _ => return false,
        };
        items.swap(index, other);
        debug!(path = %path, from = index, to = other, "array item moved");
        self.rekey_ui(path, |j| {
            if j == index {
                Some(other)
            } else if j == other {
                Some(index)
            } else {
                Some(j)
            }
        });
        self.after_array_mutation(path);
        true
    }

    /// Invoke the action field at `path`.
    ///
    /// Emits [`EditorEvent::FunctionInvoked`] carrying the action's name.
    /// The value tree is not touched and no `Changed` event is emitted.
    /// Returns `false` if `path` does not hold a function value.
    pub fn call_function(&mut self, path: &Path) -> bool {
        if self.is_read_only_at(path) {
            return false;
        }
        let Some(Value::Function(name)) = self.value.get(path) else {
            return false;
        };
        let name = name.clone();
        debug!(path = %path, name = %name, "function invoked");
        self.events.push(EditorEvent::FunctionInvoked {
            path: path.clone(),
            name,
        });
        true
    }

    /// Set a number field from a slider, clamping to the schema's declared
    /// bounds.
    pub fn set_slider_value(&mut self, path: &Path, value: f64) -> bool {
        let mut clamped = value;
        if let Some(schema) = schema_at(self.schema.as_ref(), path) {
            if let Some(min) = schema.min {
                clamped = clamped.max(min);
            }
            if let Some(max) = schema.max {
                clamped = clamped.min(max);
            }
        }
        self.set(path, Value::Number(clamped))
    }

    /// Set a number field from raw input text.
    ///
    /// Parseable input commits a number; anything else commits the raw text
    /// so the validator can report it instead of silently dropping the
    /// keystrokes.
    pub fn set_number_input(&mut self, path: &Path, raw: &str) -> bool {
        let value = match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_owned()),
        };
        self.set(path, value)
    }

    // --- throttled edits ---

    /// Queue a keystroke-level edit for `path` without committing it.
    ///
    /// A newer edit to the same path supersedes the older one. Nothing
    /// validates or renders until the edit flushes.
    pub fn queue_edit(&mut self, path: Path, value: impl Into<Value>, now: Instant) {
        self.throttle.queue(path, value.into(), now);
    }

    /// Commit every queued edit whose coalescing window has elapsed at
    /// `now`. Returns the number of edits committed.
    pub fn flush_due(&mut self, now: Instant) -> usize {
        let due = self.throttle.flush_due(now);
        let mut committed = 0;
        for (path, value) in due {
            if self.set(&path, value) {
                committed += 1;
            }
        }
        committed
    }

    /// Commit every queued edit immediately (blur, teardown). Returns the
    /// number of edits committed.
    pub fn flush_pending(&mut self) -> usize {
        let pending = self.throttle.flush_all();
        let mut committed = 0;
        for (path, value) in pending {
            if self.set(&path, value) {
                committed += 1;
            }
        }
        committed
    }

    /// The earliest deadline among queued edits, for hosts scheduling a
    /// wakeup to call [`KeyValueEditor::flush_due`].
    pub fn next_flush_deadline(&self) -> Option<Instant> {
        self.throttle.next_deadline()
    }

    // --- validation ---

    /// Run a full validation pass, replacing the error set and refreshing
    /// every field's inline error.
    pub fn validate(&mut self) -> &ErrorSet {
        self.revalidate_all();
        render::apply_errors(&mut self.tree, &self.errors);
        &self.errors
    }

    /// Whether a full validation pass reports no errors.
    pub fn is_valid(&mut self) -> bool {
        self.validate().is_empty()
    }

    // --- UI state ---

    /// Toggle the collapsed state of the section at `path`. Returns the new
    /// state.
    pub fn toggle_collapsed(&mut self, path: &Path) -> bool {
        let collapsed = if self.ui.collapsed.remove(path) {
            false
        } else {
            self.ui.collapsed.insert(path.clone());
            true
        };
        if let Some(id) = self.tree.id_at(path) {
            if let Some(node) = self.tree.get_mut(id) {
                node.collapsed = collapsed;
            }
        }
        collapsed
    }

    /// Move focus to `path`, or clear it with `None`.
    pub fn focus_field(&mut self, path: Option<Path>) {
        if let Some(old) = self.ui.focused.take() {
            if let Some(id) = self.tree.id_at(&old) {
                if let Some(node) = self.tree.get_mut(id) {
                    node.focused = false;
                }
            }
        }
        if let Some(path) = path {
            if let Some(id) = self.tree.id_at(&path) {
                if let Some(node) = self.tree.get_mut(id) {
                    node.focused = true;
                }
            }
            self.ui.focused = Some(path);
        }
    }

    /// Surface a context-menu gesture on the field at `path` to the host.
    pub fn request_context_menu(&mut self, path: &Path) {
        self.events.push(EditorEvent::ContextMenu { path: path.clone() });
    }

    /// Drain every pending event.
    pub fn take_events(&mut self) -> Vec<EditorEvent> {
        self.events.drain()
    }

    // --- display configuration ---

    /// The header title, if set.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Set or clear the header title.
    pub fn set_title(&mut self, title: Option<String>) {
        self.title = title;
        self.apply_title();
    }

    /// Whether compact display is on.
    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Set the compact display flag. Display-only; field structure does not
    /// change.
    pub fn set_compact(&mut self, compact: bool) {
        self.compact = compact;
    }

    /// The current theme mode.
    pub fn theme(&self) -> ThemeMode {
        self.theme
    }

    /// Set the theme mode. Display-only.
    pub fn set_theme(&mut self, theme: ThemeMode) {
        self.theme = theme;
    }

    /// Whether the global read-only flag is on.
    pub fn is_read_only(&self) -> bool {
        self.ui.read_only
    }

    /// Set the global read-only flag and re-render.
    pub fn set_read_only(&mut self, read_only: bool) {
        if self.ui.read_only != read_only {
            self.ui.read_only = read_only;
            self.rebuild();
        }
    }

    // --- internals ---

    fn is_read_only_at(&self, path: &Path) -> bool {
        self.ui.read_only
            || schema_at(self.schema.as_ref(), path)
                .map(|s| s.readonly)
                .unwrap_or(false)
    }

    fn revalidate_all(&mut self) {
        self.errors.replace_all(validate(
            &self.value,
            self.schema.as_ref(),
            &Path::root(),
        ));
    }

    /// Revalidate only the subtree at `path`, leaving errors elsewhere
    /// untouched.
    fn revalidate_scope(&mut self, path: &Path) {
        let schema = schema_at(self.schema.as_ref(), path);
        let scoped = match self.value.get(path) {
            Some(value) => validate(value, schema, path),
            None => Vec::new(),
        };
        self.errors.merge_scoped(path, scoped);
    }

    /// Patch the rendered field at `path` after a value change, falling
    /// back to a full rebuild when the field is not rendered yet (a freshly
    /// created key, or a path under a collapsed rebuild boundary).
    fn refresh_field(&mut self, path: &Path) {
        let schema = schema_at(self.schema.as_ref(), path);
        let Some(value) = self.value.get(path) else {
            self.rebuild();
            return;
        };
        let patched = if value.is_object() || value.is_array() {
            let value = value.clone();
            render::rebuild_subtree(&mut self.tree, path, &value, schema, &self.errors, &self.ui)
        } else {
            let value = value.clone();
            // A leaf may be replacing a container; drop any children the old
            // value had rendered so the tree keeps mirroring the value tree.
            if let Some(id) = self.tree.id_at(path) {
                self.tree.remove_children(id);
            }
            render::patch_field(&mut self.tree, path, &value, schema, self.errors.get(path))
        };
        if !patched {
            self.rebuild();
        }
    }

    /// Rebuild the array's subtree and emit the change, after the value
    /// mutation and UI re-keying are done.
    fn after_array_mutation(&mut self, path: &Path) {
        self.revalidate_scope(path);
        let value = self
            .value
            .get(path)
            .cloned()
            .unwrap_or(Value::Null);
        let rebuilt = render::rebuild_subtree(
            &mut self.tree,
            path,
            &value,
            schema_at(self.schema.as_ref(), path),
            &self.errors,
            &self.ui,
        );
        if !rebuilt {
            self.rebuild();
        }
        self.emit_changed(path.clone());
    }

    /// Re-key collapse and focus paths under `array` through `map`, which
    /// takes an old item index and returns the new one (`None` drops the
    /// state).
    fn rekey_ui(&mut self, array: &Path, map: impl Fn(usize) -> Option<usize>) {
        let collapsed = std::mem::take(&mut self.ui.collapsed);
        self.ui.collapsed = collapsed
            .into_iter()
            .filter_map(|path| remap_item_path(&path, array, &map))
            .collect();
        if let Some(focused) = self.ui.focused.take() {
            self.ui.focused = remap_item_path(&focused, array, &map);
        }
    }

    fn rebuild(&mut self) {
        self.tree = render::build(
            &self.value,
            self.schema.as_ref(),
            &self.errors,
            &self.ui,
        );
        self.apply_title();
    }

    fn apply_title(&mut self) {
        let Some(title) = self.title.clone() else {
            return;
        };
        if let Some(root) = self.tree.root() {
            if let Some(node) = self.tree.get_mut(root) {
                node.label = title;
            }
        }
    }

    fn emit_changed(&mut self, path: Path) {
        let value = self.value.get(&path).cloned().unwrap_or(Value::Null);
        self.events.push(EditorEvent::Changed {
            path,
            value,
            snapshot: self.value.clone(),
        });
    }
}

impl Default for KeyValueEditor {
    fn default() -> Self {
        Self::new()
    }
}

/// Remap a UI-state path after a structural mutation of the array at
/// `array`. Paths outside the array pass through; paths at or under an
/// item index go through `map`.
fn remap_item_path(
    path: &Path,
    array: &Path,
    map: &impl Fn(usize) -> Option<usize>,
) -> Option<Path> {
    if path.len() <= array.len() || !path.starts_with(array) {
        return Some(path.clone());
    }
    let mut segments = path.segments().to_vec();
    let slot = array.len();
    if let Segment::Index(j) = segments[slot] {
        segments[slot] = Segment::Index(map(j)?);
    }
    Some(Path::from_segments(segments))
}

// ===========================================================================
// Tests
// ===========================================================================
