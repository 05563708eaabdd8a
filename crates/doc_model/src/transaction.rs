//! Edit transactions
//!
//! A transaction is an ordered list of steps. Each step addresses the
//! document as left by the steps before it, so a caller replacing several
//! ranges emits them from the highest position down. Applying a transaction
//! works on a copy of the tree: either every step succeeds and the new tree
//! is returned, or the original is left as it was.

use crate::{DocumentTree, Mark, MarkSpan, MarkType, Result};
use serde::{Deserialize, Serialize};

/// A single edit step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    /// Add a mark over `[from, to)`
    AddMark { from: usize, to: usize, mark: Mark },
    /// Remove marks of a type over `[from, to)`
    RemoveMark {
        from: usize,
        to: usize,
        mark_type: MarkType,
    },
    /// Replace the content of `[from, to)` with literal text
    ReplaceText { from: usize, to: usize, text: String },
    /// Reset marks of a type over `[from, to)` to a recorded state
    RestoreMarks {
        from: usize,
        to: usize,
        mark_type: MarkType,
        spans: Vec<MarkSpan>,
    },
}

impl Step {
    /// Apply this step in place and return the step that undoes it
    fn apply(&self, tree: &mut DocumentTree) -> Result<Step> {
        match self {
            Step::AddMark { from, to, mark } => {
                let inverse = Self::snapshot_marks(tree, *from, *to, mark.mark_type)?;
                tree.add_mark(*from, *to, mark)?;
                Ok(inverse)
            }
            Step::RemoveMark { from, to, mark_type } => {
                let inverse = Self::snapshot_marks(tree, *from, *to, *mark_type)?;
                tree.remove_mark(*from, *to, *mark_type)?;
                Ok(inverse)
            }
            Step::ReplaceText { from, to, text } => {
                let removed = tree.replace_text(*from, *to, text)?;
                Ok(Step::ReplaceText {
                    from: *from,
                    to: from + text.chars().count(),
                    text: removed,
                })
            }
            Step::RestoreMarks {
                from,
                to,
                mark_type,
                spans,
            } => {
                let inverse = Self::snapshot_marks(tree, *from, *to, *mark_type)?;
                tree.remove_mark(*from, *to, *mark_type)?;
                for span in spans {
                    tree.add_mark(span.from, span.to, &span.mark)?;
                }
                Ok(inverse)
            }
        }
    }

    /// Record the marks of a type over a range so they can be restored
    fn snapshot_marks(tree: &DocumentTree, from: usize, to: usize, mark_type: MarkType) -> Result<Step> {
        Ok(Step::RestoreMarks {
            from,
            to,
            mark_type,
            spans: tree.block_marks_in(from, to, mark_type)?,
        })
    }

    /// Check if this step changes text rather than marks
    pub fn changes_text(&self) -> bool {
        matches!(self, Step::ReplaceText { .. })
    }
}

/// The outcome of applying a transaction
#[derive(Debug, Clone)]
pub struct Applied {
    /// The document after every step
    pub tree: DocumentTree,
    /// A transaction that restores the previous state when applied to `tree`
    pub inverse: Transaction,
}

/// An ordered, atomically applied list of steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    steps: Vec<Step>,
    add_to_history: bool,
}

impl Transaction {
    /// Create an empty transaction that will be recorded in undo history
    pub fn new() -> Self {
        Self {
            steps: Vec::new(),
            add_to_history: true,
        }
    }

    /// Set whether the engine records this transaction for undo
    pub fn add_to_history(mut self, value: bool) -> Self {
        self.add_to_history = value;
        self
    }

    /// Whether the engine records this transaction for undo
    pub fn adds_to_history(&self) -> bool {
        self.add_to_history
    }

    /// Queue a mark addition
    pub fn add_mark(&mut self, from: usize, to: usize, mark: Mark) -> &mut Self {
        self.steps.push(Step::AddMark { from, to, mark });
        self
    }

    /// Queue a mark removal
    pub fn remove_mark(&mut self, from: usize, to: usize, mark_type: MarkType) -> &mut Self {
        self.steps.push(Step::RemoveMark {
            from,
            to,
            mark_type,
        });
        self
    }

    /// Queue a text replacement
    pub fn replace_text(&mut self, from: usize, to: usize, text: impl Into<String>) -> &mut Self {
        self.steps.push(Step::ReplaceText {
            from,
            to,
            text: text.into(),
        });
        self
    }

    /// Steps in application order
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Check if the transaction has no steps
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Check if any step changes text
    pub fn changes_text(&self) -> bool {
        self.steps.iter().any(Step::changes_text)
    }

    /// Apply every step to a copy of `tree`
    pub fn apply(&self, tree: &DocumentTree) -> Result<Applied> {
        let mut new_tree = tree.clone();
        let mut inverse_steps = Vec::with_capacity(self.steps.len());

        for step in &self.steps {
            inverse_steps.push(step.apply(&mut new_tree)?);
        }
        inverse_steps.reverse();

        if !self.steps.is_empty() {
            new_tree.document.increment_version();
        }

        Ok(Applied {
            tree: new_tree,
            inverse: Transaction {
                steps: inverse_steps,
                add_to_history: self.add_to_history,
            },
        })
    }
}

impl Default for Transaction {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::HighlightColor;

    #[test]
    fn test_descending_replacements_keep_positions_valid() {
        let tree = DocumentTree::from_plain_text("ABAB");
        let mut tr = Transaction::new();
        tr.replace_text(2, 4, "X").replace_text(0, 2, "X");

        let applied = tr.apply(&tree).unwrap();
        assert_eq!(applied.tree.text_content(), "XX");
    }

    #[test]
    fn test_failed_step_leaves_tree_untouched() {
        let tree = DocumentTree::from_plain_text("hello");
        let mut tr = Transaction::new();
        tr.replace_text(0, 1, "J").replace_text(4, 40, "!");

        assert!(tr.apply(&tree).is_err());
        assert_eq!(tree.text_content(), "hello");
    }

    #[test]
    fn test_inverse_restores_text() {
        let tree = DocumentTree::from_plain_text("中文很美，中文");
        let mut tr = Transaction::new();
        tr.replace_text(5, 7, "汉语").replace_text(0, 2, "汉语");

        let applied = tr.apply(&tree).unwrap();
        assert_eq!(applied.tree.text_content(), "汉语很美，汉语");

        let undone = applied.inverse.apply(&applied.tree).unwrap();
        assert_eq!(undone.tree.text_content(), "中文很美，中文");
    }

    #[test]
    fn test_inverse_restores_previous_marks() {
        let mut tree = DocumentTree::from_plain_text("abcdef");
        tree.add_mark(0, 3, &Mark::search(HighlightColor::Search)).unwrap();

        let mut tr = Transaction::new().add_to_history(false);
        tr.add_mark(1, 5, Mark::search(HighlightColor::Current));
        let applied = tr.apply(&tree).unwrap();
        assert!(!applied.inverse.adds_to_history());

        let undone = applied.inverse.apply(&applied.tree).unwrap();
        assert_eq!(
            undone.tree.marked_ranges(MarkType::SearchHighlight),
            tree.marked_ranges(MarkType::SearchHighlight)
        );
    }

    #[test]
    fn test_changes_text() {
        let mut tr = Transaction::new();
        tr.add_mark(0, 1, Mark::search(HighlightColor::Search));
        assert!(!tr.changes_text());
        tr.replace_text(0, 1, "x");
        assert!(tr.changes_text());
    }

    #[test]
    fn test_version_bumped_once_per_transaction() {
        let tree = DocumentTree::from_plain_text("abc");
        let version = tree.document.version();
        let mut tr = Transaction::new();
        tr.add_mark(0, 1, Mark::search(HighlightColor::Search))
            .add_mark(1, 2, Mark::search(HighlightColor::Search));
        let applied = tr.apply(&tree).unwrap();
        assert_eq!(applied.tree.document.version(), version + 1);
    }

    #[test]
    fn test_mark_inverse_records_only_its_block() {
        let mut tree = DocumentTree::from_plain_text("ab\ncd\nef");
        tree.add_mark(0, 2, &Mark::search(HighlightColor::Search)).unwrap();
        tree.add_mark(6, 8, &Mark::search(HighlightColor::Search)).unwrap();

        let mut tr = Transaction::new();
        tr.add_mark(3, 5, Mark::search(HighlightColor::Current));
        let applied = tr.apply(&tree).unwrap();

        match applied.inverse.steps() {
            [Step::RestoreMarks { from, to, spans, .. }] => {
                assert_eq!((*from, *to), (3, 5));
                assert!(spans.is_empty());
            }
            other => panic!("unexpected inverse {:?}", other),
        }

        let undone = applied.inverse.apply(&applied.tree).unwrap();
        assert_eq!(
            undone.tree.marked_ranges(MarkType::SearchHighlight),
            tree.marked_ranges(MarkType::SearchHighlight)
        );
    }
}
