//! Undo/redo manager

use crate::{EditError, Result};
use doc_model::Transaction;

/// An entry in the undo stack
#[derive(Debug, Clone)]
struct UndoEntry {
    /// The original transaction (for redo)
    transaction: Transaction,
    /// The transaction restoring the state before it (for undo)
    inverse: Transaction,
}

/// Manages undo and redo stacks
#[derive(Debug, Clone)]
pub struct UndoManager {
    /// Transactions that can be undone
    undo_stack: Vec<UndoEntry>,
    /// Transactions that can be redone
    redo_stack: Vec<Transaction>,
    /// Maximum number of undo entries
    max_entries: usize,
}

impl UndoManager {
    /// Create a new undo manager
    pub fn new() -> Self {
        Self::with_limit(100)
    }

    /// Create with a custom entry limit
    pub fn with_limit(max_entries: usize) -> Self {
        Self {
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Record a newly applied transaction. Clears the redo stack.
    pub fn push(&mut self, transaction: Transaction, inverse: Transaction) {
        self.redo_stack.clear();
        self.record(transaction, inverse);
    }

    /// Record a transaction re-applied by redo, keeping the rest of the redo stack
    pub fn record_redone(&mut self, transaction: Transaction, inverse: Transaction) {
        self.record(transaction, inverse);
    }

    fn record(&mut self, transaction: Transaction, inverse: Transaction) {
        self.undo_stack.push(UndoEntry {
            transaction,
            inverse,
        });

        // Enforce max entries
        while self.undo_stack.len() > self.max_entries {
            self.undo_stack.remove(0);
        }
    }

    /// Pop the last entry for undo, returning its inverse
    pub fn pop_undo(&mut self) -> Result<Transaction> {
        let entry = self.undo_stack.pop().ok_or(EditError::UndoStackEmpty)?;
        self.redo_stack.push(entry.transaction);
        Ok(entry.inverse)
    }

    /// Pop a transaction for redo
    pub fn pop_redo(&mut self) -> Result<Transaction> {
        self.redo_stack.pop().ok_or(EditError::RedoStackEmpty)
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Number of undoable entries
    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
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

    fn replace(from: usize, to: usize, text: &str) -> Transaction {
        let mut tr = Transaction::new();
        tr.replace_text(from, to, text);
        tr
    }

    #[test]
    fn test_empty_stacks() {
        let mut manager = UndoManager::new();
        assert!(matches!(manager.pop_undo(), Err(EditError::UndoStackEmpty)));
        assert!(matches!(manager.pop_redo(), Err(EditError::RedoStackEmpty)));
    }

    #[test]
    fn test_push_clears_redo() {
        let mut manager = UndoManager::new();
        manager.push(replace(0, 1, "a"), replace(0, 1, "b"));
        manager.pop_undo().unwrap();
        assert!(manager.can_redo());

        manager.push(replace(0, 1, "c"), replace(0, 1, "d"));
        assert!(!manager.can_redo());
    }

    #[test]
    fn test_limit_drops_oldest() {
        let mut manager = UndoManager::with_limit(2);
        manager.push(replace(0, 1, "1"), replace(0, 1, "a"));
        manager.push(replace(0, 1, "2"), replace(0, 1, "b"));
        manager.push(replace(0, 1, "3"), replace(0, 1, "c"));
        assert_eq!(manager.undo_len(), 2);

        assert_eq!(manager.pop_undo().unwrap(), replace(0, 1, "c"));
        assert_eq!(manager.pop_undo().unwrap(), replace(0, 1, "b"));
        assert!(!manager.can_undo());
    }
}
