//! Highlight applier
//!
//! Search highlights are `SearchHighlight` marks. They never change text, so
//! match positions stay valid across highlight transactions. Highlight
//! transactions are kept out of undo history.

use crate::Match;
use doc_model::{DocumentTree, HighlightColor, Mark, MarkType, Transaction};

/// Queue a highlight of `color` over each match
pub fn apply_highlights(tr: &mut Transaction, matches: &[Match], color: HighlightColor) {
    for m in matches {
        tr.add_mark(m.from, m.to, Mark::search(color));
    }
}

/// A history-less transaction highlighting every match, or None when there are none
pub fn highlight_transaction(matches: &[Match], color: HighlightColor) -> Option<Transaction> {
    if matches.is_empty() {
        return None;
    }
    let mut tr = Transaction::new().add_to_history(false);
    apply_highlights(&mut tr, matches, color);
    Some(tr)
}

/// A transaction removing every search highlight, whatever its color.
///
/// Returns None when the document carries no search highlights.
pub fn clear_highlights(tree: &DocumentTree) -> Option<Transaction> {
    let spans = tree.marked_ranges(MarkType::SearchHighlight);
    if spans.is_empty() {
        return None;
    }

    let mut tr = Transaction::new().add_to_history(false);
    for span in spans {
        tr.remove_mark(span.from, span.to, MarkType::SearchHighlight);
    }
    Some(tr)
}
