//! Undo/redo manager with command batching
//!
//! History is snapshot based: each entry holds the template as it was before
//! a mutation.

use crate::{EditError, Result};
use card_model::CardTemplate;
use std::time::{Duration, Instant};

/// Default maximum number of undo entries
pub const DEFAULT_MAX_UNDO_ENTRIES: usize = 100;

/// An entry in the undo stack
#[derive(Debug, Clone)]
struct UndoEntry {
    /// Template before the mutation
    snapshot: CardTemplate,
    /// Display name of the mutation
    label: String,
    /// Batch key; consecutive entries with the same key are merged
    merge_key: Option<String>,
    /// When this entry was last touched
    timestamp: Instant,
}

/// Manages undo and redo stacks
#[derive(Debug, Clone)]
pub struct UndoManager {
    undo_stack: Vec<UndoEntry>,
    redo_stack: Vec<(CardTemplate, String)>,
    max_entries: usize,
    /// Mutations with the same merge key within this window form one step
    batch_threshold: Duration,
}

impl UndoManager {
    pub fn new() -> Self {
        Self::with_limits(DEFAULT_MAX_UNDO_ENTRIES, Duration::from_millis(500))
    }

    /// Create with custom limits
    pub fn with_limits(max_entries: usize, batch_threshold: Duration) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries,
            batch_threshold,
        }
    }

    /// Record the template as it was before a mutation
    pub fn push(&mut self, snapshot: CardTemplate, label: &str, merge_key: Option<String>) {
        // A new mutation invalidates the redo branch
        self.redo_stack.clear();

        let now = Instant::now();
        if let (Some(last), Some(key)) = (self.undo_stack.last_mut(), merge_key.as_ref()) {
            if last.merge_key.as_ref() == Some(key)
                && now.duration_since(last.timestamp) < self.batch_threshold
            {
                // Keep the older snapshot so one undo reverts the whole batch
                last.timestamp = now;
                return;
            }
        }

        self.undo_stack.push(UndoEntry {
            snapshot,
            label: label.to_string(),
            merge_key,
            timestamp: now,
        });

        if self.undo_stack.len() > self.max_entries {
            let excess = self.undo_stack.len() - self.max_entries;
            self.undo_stack.drain(..excess);
        }
    }

    /// Step back: returns the previous template and remembers `current` for redo
    pub fn undo(&mut self, current: CardTemplate) -> Result<CardTemplate> {
        let entry = self.undo_stack.pop().ok_or(EditError::UndoStackEmpty)?;
        self.redo_stack.push((current, entry.label));
        Ok(entry.snapshot)
    }

    /// Step forward: returns the template undone last and remembers `current` for undo
    pub fn redo(&mut self, current: CardTemplate) -> Result<CardTemplate> {
        let (next, label) = self.redo_stack.pop().ok_or(EditError::RedoStackEmpty)?;
        self.undo_stack.push(UndoEntry {
            snapshot: current,
            label,
            merge_key: None,
            timestamp: Instant::now(),
        });
        Ok(next)
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Label of the step `undo` would revert
    pub fn undo_label(&self) -> Option<&str> {
        self.undo_stack.last().map(|e| e.label.as_str())
    }

    /// Label of the step `redo` would reapply
    pub fn redo_label(&self) -> Option<&str> {
        self.redo_stack.last().map(|(_, label)| label.as_str())
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    /// Clear all undo/redo history
    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}

impl Default for UndoManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> CardTemplate {
        CardTemplate::new(name, "").with_id("t")
    }

    #[test]
    fn test_undo_redo_cycle() {
        let mut history = UndoManager::new();
        history.push(named("v1"), "Edit", None);

        let restored = history.undo(named("v2")).unwrap();
        assert_eq!(restored.name, "v1");
        assert_eq!(history.redo_label(), Some("Edit"));

        let again = history.redo(restored).unwrap();
        assert_eq!(again.name, "v2");
        assert!(history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_push_clears_redo() {
        let mut history = UndoManager::new();
        history.push(named("v1"), "Edit", None);
        history.undo(named("v2")).unwrap();
        assert!(history.can_redo());

        history.push(named("v1"), "Edit", None);
        assert!(!history.can_redo());
        assert!(matches!(history.redo(named("x")), Err(EditError::RedoStackEmpty)));
    }

    #[test]
    fn test_bounded_history() {
        let mut history = UndoManager::new();
        for i in 0..150 {
            history.push(named(&format!("v{}", i)), "Edit", None);
        }
        assert_eq!(history.undo_len(), DEFAULT_MAX_UNDO_ENTRIES);

        let mut last = named("current");
        for _ in 0..DEFAULT_MAX_UNDO_ENTRIES {
            last = history.undo(last).unwrap();
        }
        assert_eq!(last.name, "v50");
        assert!(matches!(history.undo(last), Err(EditError::UndoStackEmpty)));
    }

    #[test]
    fn test_batched_moves_undo_together() {
        let mut history = UndoManager::with_limits(10, Duration::from_secs(60));
        history.push(named("before-drag"), "Move Field", Some("move:a".into()));
        history.push(named("mid-drag"), "Move Field", Some("move:a".into()));
        history.push(named("other"), "Move Field", Some("move:b".into()));
        assert_eq!(history.undo_len(), 2);

        history.undo(named("now")).unwrap();
        assert_eq!(history.undo(named("x")).unwrap().name, "before-drag");
    }
}
