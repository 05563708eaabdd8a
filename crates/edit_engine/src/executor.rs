//! Transaction execution engine

use crate::{Result, UndoManager};
use doc_model::{DocumentTree, Transaction};

/// Owns the document and applies transactions to it
#[derive(Debug, Clone)]
pub struct EditingEngine {
    /// Current document tree
    tree: DocumentTree,
    /// Undo manager
    undo_manager: UndoManager,
}

impl EditingEngine {
    /// Create a new editing engine with an empty document
    pub fn new() -> Self {
        Self::with_tree(DocumentTree::default())
    }

    /// Create an editing engine with a specific document tree
    pub fn with_tree(tree: DocumentTree) -> Self {
        Self {
            tree,
            undo_manager: UndoManager::new(),
        }
    }

    /// Replace the undo manager with one holding at most `limit` entries
    pub fn with_undo_limit(mut self, limit: usize) -> Self {
        self.undo_manager = UndoManager::with_limit(limit);
        self
    }

    /// Get the current document tree
    pub fn tree(&self) -> &DocumentTree {
        &self.tree
    }

    /// Apply a transaction.
    ///
    /// The document is replaced only once every step has succeeded. When the
    /// transaction asks for it, it is recorded for undo.
    pub fn dispatch(&mut self, transaction: Transaction) -> Result<()> {
        if transaction.is_empty() {
            return Ok(());
        }

        let applied = transaction.apply(&self.tree)?;
        if transaction.adds_to_history() {
            self.undo_manager.push(transaction, applied.inverse);
        }
        self.tree = applied.tree;

        Ok(())
    }

    /// Undo the last recorded transaction
    pub fn undo(&mut self) -> Result<()> {
        let inverse = self.undo_manager.pop_undo()?;
        let applied = inverse.apply(&self.tree)?;
        self.tree = applied.tree;

        Ok(())
    }

    /// Redo the last undone transaction
    pub fn redo(&mut self) -> Result<()> {
        let transaction = self.undo_manager.pop_redo()?;
        let applied = transaction.apply(&self.tree)?;
        self.undo_manager.record_redone(transaction, applied.inverse);
        self.tree = applied.tree;

        Ok(())
    }

    /// Check if undo is available
    pub fn can_undo(&self) -> bool {
        self.undo_manager.can_undo()
    }

    /// Check if redo is available
    pub fn can_redo(&self) -> bool {
        self.undo_manager.can_redo()
    }
}

impl Default for EditingEngine {
    fn default() -> Self {
        Self::new()
    }
}
