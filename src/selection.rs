//! Ordered selection of names. Single source of truth for both the picker and the chart.

use std::collections::HashSet;

use crate::catalog::{SelectionKey, SetTag};

/// Result of a toggle: the entry was appended or removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Added,
    Removed,
}

/// Holds the selected `(id, set)` pairs in insertion order. Insertion order
/// drives badge truncation and chart legend order. Uniqueness is enforced on
/// insert; no upper bound is enforced here (badge truncation is a UI concern).
#[derive(Debug, Default)]
pub struct SelectionStore {
    entries: Vec<SelectionKey>,
    /// Names that have already triggered the low-frequency advisory.
    advised: HashSet<SelectionKey>,
}

impl SelectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[SelectionKey] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: SelectionKey) -> bool {
        self.entries.contains(&key)
    }

    /// Remove the key if present, else append it to the end.
    pub fn toggle(&mut self, key: SelectionKey) -> ToggleOutcome {
        if let Some(pos) = self.entries.iter().position(|&k| k == key) {
            self.entries.remove(pos);
            ToggleOutcome::Removed
        } else {
            self.entries.push(key);
            ToggleOutcome::Added
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keep only the first `max_count` entries in insertion order
    /// (dismissing the overflow badge).
    pub fn trim_to(&mut self, max_count: usize) {
        self.entries.truncate(max_count);
    }

    /// Remove the most recently added entry (Backspace in an empty search box).
    pub fn pop_last(&mut self) -> Option<SelectionKey> {
        self.entries.pop()
    }

    /// Drop every entry belonging to `set`. Precondition-restoring step when a
    /// set toggle is turned off; entries of the other set are untouched.
    pub fn remove_set(&mut self, set: SetTag) {
        self.entries.retain(|k| k.set != set);
    }

    /// True the first time this key asks for the low-frequency advisory.
    /// Selecting a name with fewer than 20 occurrences is permitted, but the
    /// user is told once that its per-year series will not be shown.
    pub fn first_advisory(&mut self, key: SelectionKey) -> bool {
        self.advised.insert(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(id: u32, set: SetTag) -> SelectionKey {
        SelectionKey { id, set }
    }

    #[test]
    fn toggle_appends_then_removes() {
        let mut store = SelectionStore::new();
        assert_eq!(store.toggle(key(85, SetTag::Simple)), ToggleOutcome::Added);
        assert_eq!(store.toggle(key(419, SetTag::Simple)), ToggleOutcome::Added);
        assert_eq!(
            store.entries(),
            &[key(85, SetTag::Simple), key(419, SetTag::Simple)]
        );
        assert_eq!(
            store.toggle(key(85, SetTag::Simple)),
            ToggleOutcome::Removed
        );
        assert_eq!(store.entries(), &[key(419, SetTag::Simple)]);
    }

    #[test]
    fn double_toggle_moves_entry_to_end() {
        let mut store = SelectionStore::new();
        store.toggle(key(1, SetTag::Simple));
        store.toggle(key(2, SetTag::Simple));
        store.toggle(key(1, SetTag::Simple));
        store.toggle(key(1, SetTag::Simple));
        assert_eq!(
            store.entries(),
            &[key(2, SetTag::Simple), key(1, SetTag::Simple)]
        );
    }

    #[test]
    fn same_id_different_set_is_distinct() {
        let mut store = SelectionStore::new();
        store.toggle(key(7, SetTag::Simple));
        store.toggle(key(7, SetTag::Complex));
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn remove_set_leaves_other_set_untouched() {
        let mut store = SelectionStore::new();
        store.toggle(key(1, SetTag::Simple));
        store.toggle(key(2, SetTag::Complex));
        store.toggle(key(3, SetTag::Simple));
        store.remove_set(SetTag::Simple);
        assert_eq!(store.entries(), &[key(2, SetTag::Complex)]);
    }

    #[test]
    fn trim_to_keeps_insertion_order_prefix() {
        let mut store = SelectionStore::new();
        for id in 0..5 {
            store.toggle(key(id, SetTag::Simple));
        }
        store.trim_to(3);
        assert_eq!(
            store.entries(),
            &[
                key(0, SetTag::Simple),
                key(1, SetTag::Simple),
                key(2, SetTag::Simple)
            ]
        );
    }

    #[test]
    fn clear_empties_selection() {
        let mut store = SelectionStore::new();
        store.toggle(key(1, SetTag::Simple));
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn pop_last_removes_most_recent() {
        let mut store = SelectionStore::new();
        store.toggle(key(1, SetTag::Simple));
        store.toggle(key(2, SetTag::Simple));
        assert_eq!(store.pop_last(), Some(key(2, SetTag::Simple)));
        assert_eq!(store.entries(), &[key(1, SetTag::Simple)]);
    }

    #[test]
    fn advisory_fires_once_per_name() {
        let mut store = SelectionStore::new();
        assert!(store.first_advisory(key(9, SetTag::Simple)));
        assert!(!store.first_advisory(key(9, SetTag::Simple)));
        // Deselecting and reselecting does not re-advise.
        store.toggle(key(9, SetTag::Simple));
        store.toggle(key(9, SetTag::Simple));
        assert!(!store.first_advisory(key(9, SetTag::Simple)));
        assert!(store.first_advisory(key(9, SetTag::Complex)));
    }
}
