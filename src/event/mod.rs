//! Editor events and the drain-based queue.
//!
//! Every successful mutation emits exactly one [`EditorEvent::Changed`],
//! synchronously, carrying both the affected path/value and a full snapshot
//! of the value tree so hosts can persist either way. Context-menu requests
//! and function invocations surface as their own event types. The host
//! drains the queue whenever it likes; the editor never blocks on it.

use std::collections::VecDeque;

use crate::path::Path;
use crate::value::Value;

// ---------------------------------------------------------------------------
// EditorEvent
// ---------------------------------------------------------------------------

/// A notification emitted by the editor for host consumption.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// A mutation went through the update/validate/render pipeline.
    Changed {
        /// Path affected by the mutation. For structural array operations
        /// this is the array itself (index shifts touch every later item).
        path: Path,
        /// The new value at `path`.
        value: Value,
        /// Full copy of the value tree after the mutation.
        snapshot: Value,
    },
    /// The host intercepted a context-menu gesture on a field.
    ContextMenu {
        /// Path of the field under the gesture.
        path: Path,
    },
    /// An action field was invoked. No payload — a pure host-side trigger.
    FunctionInvoked {
        /// Path of the action field.
        path: Path,
        /// The action name stored in the value tree.
        name: String,
    },
}

impl EditorEvent {
    /// Human-readable name for this event type, for debug/logging purposes.
    pub fn event_name(&self) -> &'static str {
        match self {
            EditorEvent::Changed { .. } => "Changed",
            EditorEvent::ContextMenu { .. } => "ContextMenu",
            EditorEvent::FunctionInvoked { .. } => "FunctionInvoked",
        }
    }
}

// ---------------------------------------------------------------------------
// EventQueue
// ---------------------------------------------------------------------------

/// Queue of pending editor events.
///
/// Events are enqueued via `push` and drained for processing via `drain`.
/// The queue does not itself deliver events — that responsibility belongs
/// to the host, which drains after calling into the editor.
#[derive(Debug, Default)]
pub struct EventQueue {
    queue: VecDeque<EditorEvent>,
}

impl EventQueue {
    /// Create a new, empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue an event for later processing.
    pub fn push(&mut self, event: EditorEvent) {
        self.queue.push_back(event);
    }

    /// Drain all pending events and return them as a `Vec`.
    ///
    /// The queue is empty after this call.
    pub fn drain(&mut self) -> Vec<EditorEvent> {
        self.queue.drain(..).collect()
    }

    /// Number of pending events.
    pub fn pending_count(&self) -> usize {
        self.queue.len()
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

// ===========================================================================
// Tests
// ===========================================================================
