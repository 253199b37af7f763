//! Byte-budgeted undo/redo history of document snapshots.
//!
//! The buffer is an ordered sequence plus a write cursor, not a fixed-size
//! ring: snapshots are whole HTML documents of very different lengths, so the
//! bound is a byte budget with front-eviction rather than an entry count.

/// Default memory budget for retained snapshots: 5 MiB.
pub const DEFAULT_HISTORY_BUDGET_BYTES: usize = 5 * 1024 * 1024;

/// The buffer never evicts below this many entries, so undo stays possible
/// even when a single snapshot exceeds the whole budget.
pub const MIN_RETAINED_ENTRIES: usize = 2;

/// A full document snapshot plus its encoded size.
#[derive(Debug, Clone)]
struct HistoryEntry {
    snapshot: String,
    /// UTF-8 byte length of `snapshot`. Byte size, not character count,
    /// bounds memory correctly for multi-byte content.
    bytes: usize,
}

impl HistoryEntry {
    fn new(snapshot: &str) -> Self {
        Self {
            snapshot: snapshot.to_string(),
            bytes: snapshot.len(),
        }
    }
}

/// Undo/redo stack of document snapshots under a byte budget.
///
/// `push` discards any entries beyond the cursor (a new edit invalidates the
/// redo tail), appends, then evicts from the front until the cumulative byte
/// size fits the budget or only [`MIN_RETAINED_ENTRIES`] remain - the floor
/// always wins over the budget.
#[derive(Debug)]
pub struct HistoryBuffer {
    entries: Vec<HistoryEntry>,
    /// Index of the entry representing the current document state.
    cursor: usize,
    budget_bytes: usize,
}

impl HistoryBuffer {
    /// Creates an empty buffer with the default 5 MiB budget.
    pub fn new() -> Self {
        Self::with_budget(DEFAULT_HISTORY_BUDGET_BYTES)
    }

    /// Creates an empty buffer with an explicit byte budget.
    pub fn with_budget(budget_bytes: usize) -> Self {
        Self {
            entries: Vec::new(),
            cursor: 0,
            budget_bytes,
        }
    }

    /// Records a new snapshot as the current state.
    ///
    /// Entries ahead of the cursor are discarded first (standard undo-stack
    /// semantics), then the snapshot is appended and the budget enforced.
    pub fn push(&mut self, snapshot: &str) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push(HistoryEntry::new(snapshot));
        self.cursor = self.entries.len() - 1;
        self.evict_over_budget();
    }

    /// Moves the cursor back one position and returns that snapshot.
    ///
    /// Returns `None` when the cursor is already at position 0 (no state is
    /// changed).
    pub fn undo(&mut self) -> Option<&str> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        Some(&self.entries[self.cursor].snapshot)
    }

    /// Moves the cursor forward one position and returns that snapshot.
    ///
    /// The forward tail exists only until the next `push` overwrites it.
    pub fn redo(&mut self) -> Option<&str> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        Some(&self.entries[self.cursor].snapshot)
    }

    /// True when at least one older snapshot is retained.
    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    /// True when the cursor sits behind a not-yet-overwritten redo tail.
    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.cursor + 1 < self.entries.len()
    }

    /// The snapshot at the cursor, if any.
    pub fn current(&self) -> Option<&str> {
        self.entries.get(self.cursor).map(|e| e.snapshot.as_str())
    }

    /// Number of retained snapshots.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nothing has been pushed yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cumulative byte size of all retained snapshots.
    pub fn total_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.bytes).sum()
    }

    /// Evicts the oldest entries until the budget fits or only the floor
    /// remains. Only called after a push, so the cursor is at the back and
    /// stays valid as long as the floor holds.
    fn evict_over_budget(&mut self) {
        while self.total_bytes() > self.budget_bytes && self.entries.len() > MIN_RETAINED_ENTRIES {
            self.entries.remove(0);
            self.cursor -= 1;
        }
        if self.total_bytes() > self.budget_bytes {
            tracing::debug!(
                retained = self.entries.len(),
                bytes = self.total_bytes(),
                "history floor overrides byte budget"
            );
        }
    }
}

impl Default for HistoryBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_at_position_zero_is_a_noop() {
        let mut buffer = HistoryBuffer::new();
        assert!(buffer.undo().is_none());

        buffer.push("v0");
        assert!(!buffer.can_undo());
        assert!(buffer.undo().is_none());
        assert_eq!(buffer.current(), Some("v0"));
    }

    #[test]
    fn push_then_undo_round_trips_byte_for_byte() {
        let mut buffer = HistoryBuffer::new();
        let before = "<p>caf\u{e9} \u{1f600}</p>";
        buffer.push(before);
        buffer.push("<p>replaced</p>");

        assert_eq!(buffer.undo(), Some(before));
    }

    #[test]
    fn push_discards_the_redo_tail() {
        let mut buffer = HistoryBuffer::new();
        buffer.push("v0");
        buffer.push("v1");
        buffer.push("v2");

        buffer.undo();
        buffer.undo();
        assert!(buffer.can_redo());

        buffer.push("v1b");
        assert!(!buffer.can_redo());
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.current(), Some("v1b"));
    }

    #[test]
    fn redo_walks_forward_after_undo() {
        let mut buffer = HistoryBuffer::new();
        buffer.push("v0");
        buffer.push("v1");

        assert_eq!(buffer.undo(), Some("v0"));
        assert_eq!(buffer.redo(), Some("v1"));
        assert!(!buffer.can_redo());
    }

    #[test]
    fn byte_budget_evicts_from_the_front() {
        // Budget fits roughly two and a half 40-byte snapshots.
        let mut buffer = HistoryBuffer::with_budget(100);
        let snapshot = "x".repeat(40);
        buffer.push(&snapshot);
        buffer.push(&snapshot);
        buffer.push(&snapshot);

        assert!(buffer.total_bytes() <= 100);
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.current(), Some(snapshot.as_str()));
        assert!(buffer.can_undo());
    }

    #[test]
    fn floor_of_two_entries_wins_over_the_budget() {
        let mut buffer = HistoryBuffer::with_budget(10);
        let huge = "y".repeat(1000);
        buffer.push("small");
        buffer.push(&huge);

        // Both entries exceed the budget together, yet neither is evicted.
        assert_eq!(buffer.len(), MIN_RETAINED_ENTRIES);
        assert!(buffer.total_bytes() > 10);
        assert_eq!(buffer.undo(), Some("small"));
    }

    #[test]
    fn budget_counts_encoded_bytes_not_characters() {
        // Four-byte scorpions: 10 chars but 40 bytes each.
        let multibyte = "\u{1f982}".repeat(10);
        assert_eq!(multibyte.chars().count(), 10);
        assert_eq!(multibyte.len(), 40);

        let mut buffer = HistoryBuffer::with_budget(100);
        buffer.push(&multibyte);
        buffer.push(&multibyte);
        buffer.push(&multibyte);

        // 120 bytes of snapshots exceed the budget even though only 30
        // characters are stored.
        assert_eq!(buffer.len(), 2);
        assert_eq!(buffer.total_bytes(), 80);
    }

    #[test]
    fn total_never_exceeds_budget_across_long_sequences() {
        let mut buffer = HistoryBuffer::with_budget(500);
        for i in 0..50 {
            buffer.push(&format!("<section>{}</section>", "z".repeat(i * 7)));
            assert!(
                buffer.total_bytes() <= 500 || buffer.len() == MIN_RETAINED_ENTRIES,
                "budget violated with {} entries of {} bytes",
                buffer.len(),
                buffer.total_bytes()
            );
        }
    }
}
