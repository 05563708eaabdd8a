//! Match navigator - a circular cursor over an ordered match list

use crate::{apply_highlights, Match};
use doc_model::{HighlightColor, Mark, Transaction};

/// Queue highlights so that `matches[index]` is the only current match.
///
/// Every match is reset to `search` first, then the chosen one is marked
/// `current`. Returns false, queuing nothing, when `index` is out of range.
pub fn highlight_current(tr: &mut Transaction, matches: &[Match], index: usize) -> bool {
    let Some(current) = matches.get(index) else {
        return false;
    };
    apply_highlights(tr, matches, HighlightColor::Search);
    tr.add_mark(current.from, current.to, Mark::search(HighlightColor::Current));
    true
}

/// Ordered matches plus the index of the current one
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchNavigator {
    matches: Vec<Match>,
    /// `None` when there is no current match
    cursor: Option<usize>,
}

impl MatchNavigator {
    /// Start navigating a fresh match list at its first match
    pub fn new(matches: Vec<Match>) -> Self {
        let cursor = if matches.is_empty() { None } else { Some(0) };
        Self { matches, cursor }
    }

    /// All matches in document order
    pub fn matches(&self) -> &[Match] {
        &self.matches
    }

    /// Index of the current match
    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The current match
    pub fn current(&self) -> Option<&Match> {
        self.cursor.and_then(|i| self.matches.get(i))
    }

    pub fn len(&self) -> usize {
        self.matches.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matches.is_empty()
    }

    /// Advance circularly. No-op on an empty list.
    pub fn next(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let index = match self.cursor {
            Some(c) => (c + 1) % self.matches.len(),
            None => 0,
        };
        self.cursor = Some(index);
        Some(index)
    }

    /// Retreat circularly. No-op on an empty list.
    pub fn prev(&mut self) -> Option<usize> {
        if self.matches.is_empty() {
            return None;
        }
        let index = match self.cursor {
            Some(0) | None => self.matches.len() - 1,
            Some(c) => c - 1,
        };
        self.cursor = Some(index);
        Some(index)
    }

    /// Jump to a specific match. Returns false if out of range.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.matches.len() {
            return false;
        }
        self.cursor = Some(index);
        true
    }

    /// Swap in a recomputed match list, keeping the cursor where possible.
    ///
    /// A cursor that no longer fits falls back to the first match, or to no
    /// current match when the list is empty.
    pub fn replace_matches(&mut self, matches: Vec<Match>, preferred: Option<usize>) {
        self.cursor = match preferred {
            Some(i) if i < matches.len() => Some(i),
            _ if !matches.is_empty() => Some(0),
            _ => None,
        };
        self.matches = matches;
    }

    /// Forget all matches
    pub fn clear(&mut self) {
        self.matches.clear();
        self.cursor = None;
    }

    /// Counter text such as `2 / 5`
    pub fn label(&self) -> String {
        let shown = self.cursor.map_or(0, |c| c + 1);
        format!("{} / {}", shown, self.matches.len())
    }

    /// A history-less transaction showing the current match, if there is one
    pub fn current_highlight(&self) -> Option<Transaction> {
        let index = self.cursor?;
        let mut tr = Transaction::new().add_to_history(false);
        highlight_current(&mut tr, &self.matches, index).then_some(tr)
    }
}
