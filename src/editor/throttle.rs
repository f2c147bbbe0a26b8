//! Per-path edit coalescing.
//!
//! Text and number inputs fire on every keystroke; committing each one
//! would validate and notify mid-word. [`EditThrottle`] holds the latest
//! pending value per path with a deadline. A newer edit to the same path
//! supersedes the old one and resets the deadline; edits to different
//! paths are independent. There is no timer task — the editor asks for
//! due edits with an explicit `now`, which keeps tests synchronous.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use crate::path::Path;
use crate::value::Value;

/// Default coalescing window.
pub const DEFAULT_WINDOW: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct PendingEdit {
    value: Value,
    deadline: Instant,
}

/// Coalesces rapid edits per path before commit.
#[derive(Debug)]
pub struct EditThrottle {
    window: Duration,
    pending: BTreeMap<Path, PendingEdit>,
}

impl EditThrottle {
    /// Create a throttle with the given coalescing window.
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: BTreeMap::new(),
        }
    }

    /// The coalescing window.
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Record an edit at `path`. Supersedes any pending edit for the same
    /// path and resets its deadline to `now + window`.
    pub fn queue(&mut self, path: Path, value: Value, now: Instant) {
        self.pending.insert(
            path,
            PendingEdit {
                value,
                deadline: now + self.window,
            },
        );
    }

    /// Take every edit whose window has elapsed at `now`, in path order.
    pub fn flush_due(&mut self, now: Instant) -> Vec<(Path, Value)> {
        let due: Vec<Path> = self
            .pending
            .iter()
            .filter(|(_, edit)| edit.deadline <= now)
            .map(|(path, _)| path.clone())
            .collect();
        due.into_iter()
            .map(|path| {
                let edit = self.pending.remove(&path).expect("due edit must exist");
                (path, edit.value)
            })
            .collect()
    }

    /// Take every pending edit regardless of deadline (blur, teardown).
    pub fn flush_all(&mut self) -> Vec<(Path, Value)> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(path, edit)| (path, edit.value))
            .collect()
    }

    /// Whether an edit is pending at `path`.
    pub fn has_pending(&self, path: &Path) -> bool {
        self.pending.contains_key(path)
    }

    /// Number of pending edits.
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// The earliest deadline among pending edits, for hosts that schedule
    /// a wakeup.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.values().map(|edit| edit.deadline).min()
    }
}

impl Default for EditThrottle {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW)
    }
}

// ===========================================================================
// Tests
// ===========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Path {
        s.parse().unwrap()
    }

    fn throttle_ms(ms: u64) -> EditThrottle {
        EditThrottle::new(Duration::from_millis(ms))
    }

    #[test]
    fn not_due_before_window() {
        let mut throttle = throttle_ms(100);
        let start = Instant::now();
        throttle.queue(p("a"), Value::from("x"), start);
        assert!(throttle.flush_due(start).is_empty());
        assert!(throttle
            .flush_due(start + Duration::from_millis(99))
            .is_empty());
        assert!(throttle.has_pending(&p("a")));
    }

    #[test]
    fn due_after_window() {
        let mut throttle = throttle_ms(100);
        let start = Instant::now();
        throttle.queue(p("a"), Value::from("x"), start);
        let flushed = throttle.flush_due(start + Duration::from_millis(100));
        assert_eq!(flushed, vec![(p("a"), Value::from("x"))]);
        assert!(!throttle.has_pending(&p("a")));
    }

    #[test]
    fn newer_edit_supersedes_and_resets_deadline() {
        let mut throttle = throttle_ms(100);
        let start = Instant::now();
        throttle.queue(p("a"), Value::from("h"), start);
        throttle.queue(p("a"), Value::from("he"), start + Duration::from_millis(50));

        // At t=100 the original deadline has passed, but the newer edit
        // reset it to t=150.
        assert!(throttle
            .flush_due(start + Duration::from_millis(100))
            .is_empty());
        let flushed = throttle.flush_due(start + Duration::from_millis(150));
        assert_eq!(flushed, vec![(p("a"), Value::from("he"))]);
    }

    #[test]
    fn paths_are_independent() {
        let mut throttle = throttle_ms(100);
        let start = Instant::now();
        throttle.queue(p("a"), Value::from(1), start);
        throttle.queue(p("b"), Value::from(2), start + Duration::from_millis(80));

        let flushed = throttle.flush_due(start + Duration::from_millis(110));
        assert_eq!(flushed, vec![(p("a"), Value::from(1))]);
        assert_eq!(throttle.pending_count(), 1);
    }

    #[test]
    fn flush_all_ignores_deadlines() {
        let mut throttle = throttle_ms(100);
        let start = Instant::now();
        throttle.queue(p("b"), Value::from(2), start);
        throttle.queue(p("a"), Value::from(1), start);
        let flushed = throttle.flush_all();
        // Path order.
        assert_eq!(
            flushed,
            vec![(p("a"), Value::from(1)), (p("b"), Value::from(2))]
        );
        assert_eq!(throttle.pending_count(), 0);
    }

    #[test]
    fn next_deadline_is_earliest() {
        let mut throttle = throttle_ms(100);
        let start = Instant::now();
        assert!(throttle.next_deadline().is_none());
        throttle.queue(p("a"), Value::Null, start + Duration::from_millis(50));
        throttle.queue(p("b"), Value::Null, start);
        assert_eq!(
            throttle.next_deadline(),
            Some(start + Duration::from_millis(100))
        );
    }
}
