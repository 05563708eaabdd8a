//! Text scanner
//!
//! Walks the text leaves of a document and reports every case-insensitive
//! occurrence of a query, including occurrences that overlap each other.
//!
//! Comparison is over Unicode scalar values with simple lowercase folding:
//! a char whose lowercase form is a single char folds to it, any other char
//! is compared as is. Folding therefore never changes the number of chars,
//! so a match is always exactly as long as the query and maps back onto the
//! document without drift. Han characters have no case and compare exactly.

use doc_model::DocumentTree;
use serde::{Deserialize, Serialize};

/// A located occurrence of a query
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Match {
    /// Start position (inclusive)
    pub from: usize,
    /// End position (exclusive)
    pub to: usize,
    /// The matched text as it appears in the document
    pub text: String,
}

impl Match {
    /// Create a new match
    pub fn new(from: usize, to: usize, text: impl Into<String>) -> Self {
        Self {
            from,
            to,
            text: text.into(),
        }
    }

    /// Number of positions covered
    pub fn len(&self) -> usize {
        self.to - self.from
    }

    /// Check if the match covers nothing
    pub fn is_empty(&self) -> bool {
        self.from == self.to
    }

    /// Check if two matches share any position
    pub fn overlaps(&self, other: &Match) -> bool {
        self.from < other.to && other.from < self.to
    }
}

/// Fold a char for comparison
pub fn fold_char(c: char) -> char {
    let mut lower = c.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(folded), None) => folded,
        _ => c,
    }
}

/// Find all matches of `query` in document order.
///
/// Empty and whitespace-only queries match nothing.
pub fn scan(tree: &DocumentTree, query: &str) -> Vec<Match> {
    if query.trim().is_empty() {
        return Vec::new();
    }

    let needle: Vec<char> = query.chars().map(fold_char).collect();
    let mut matches = Vec::new();

    for leaf in tree.text_leaves() {
        let original: Vec<char> = leaf.text.chars().collect();
        let folded: Vec<char> = original.iter().copied().map(fold_char).collect();

        for offset in find_all(&folded, &needle) {
            let end = offset + needle.len();
            matches.push(Match {
                from: leaf.base + offset,
                to: leaf.base + end,
                text: original[offset..end].iter().collect(),
            });
        }
    }

    tracing::debug!("Scan for {:?} found {} matches", query, matches.len());
    matches
}

/// Offsets of every occurrence; after a hit at `i` the search resumes at `i + 1`
fn find_all(haystack: &[char], needle: &[char]) -> Vec<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return Vec::new();
    }

    haystack
        .windows(needle.len())
        .enumerate()
        .filter(|(_, window)| *window == needle)
        .map(|(offset, _)| offset)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::BlockKind;

    #[test]
    fn test_overlapping_occurrences() {
        let tree = DocumentTree::from_plain_text("aaa");
        let matches = scan(&tree, "aa");
        assert_eq!(matches, vec![Match::new(0, 2, "aa"), Match::new(1, 3, "aa")]);
    }

    #[test]
    fn test_blank_queries_match_nothing() {
        let tree = DocumentTree::from_plain_text("a b  c");
        assert!(scan(&tree, "").is_empty());
        assert!(scan(&tree, " ").is_empty());
        assert!(scan(&tree, "\t\n").is_empty());
    }

    #[test]
    fn test_case_insensitive_preserves_document_case() {
        let tree = DocumentTree::from_plain_text("Hello hello HELLO");
        let matches = scan(&tree, "hELLo");
        let texts: Vec<&str> = matches.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["Hello", "hello", "HELLO"]);
        assert_eq!(matches[1].from, 6);
    }

    #[test]
    fn test_chinese_positions_count_chars() {
        let tree = DocumentTree::from_plain_text("我爱中文编辑器，中文很美");
        let matches = scan(&tree, "中文");
        assert_eq!(
            matches,
            vec![Match::new(2, 4, "中文"), Match::new(8, 10, "中文")]
        );
    }

    #[test]
    fn test_matches_across_paragraphs_use_absolute_positions() {
        let mut tree = DocumentTree::new();
        tree.push_block(BlockKind::Heading(2), "中文文本编辑器");
        tree.push_block(BlockKind::Paragraph, "编辑器");
        let matches = scan(&tree, "编辑器");
        // heading occupies 0..8 (7 chars plus its boundary)
        assert_eq!(
            matches,
            vec![Match::new(4, 7, "编辑器"), Match::new(8, 11, "编辑器")]
        );
    }

    #[test]
    fn test_no_cross_paragraph_matches() {
        let tree = DocumentTree::from_plain_text("ab\ncd");
        assert!(scan(&tree, "bc").is_empty());
        assert!(scan(&tree, "b\nc").is_empty());
    }

    #[test]
    fn test_fold_keeps_length() {
        // 'İ' lowercases to two chars, so it is compared unfolded
        assert_eq!(fold_char('İ'), 'İ');
        assert_eq!(fold_char('Ä'), 'ä');
        assert_eq!(fold_char('中'), '中');

        let tree = DocumentTree::from_plain_text("İstanbul ÄRGER");
        assert_eq!(scan(&tree, "istanbul").len(), 0);
        assert_eq!(scan(&tree, "İstanbul"), vec![Match::new(0, 8, "İstanbul")]);
        assert_eq!(scan(&tree, "ärger"), vec![Match::new(9, 14, "ÄRGER")]);
    }

    #[test]
    fn test_whitespace_and_punctuation_are_significant() {
        let tree = DocumentTree::from_plain_text("中文，编辑 器");
        assert!(scan(&tree, "中文,").is_empty());
        assert_eq!(scan(&tree, "中文，").len(), 1);
        assert!(scan(&tree, "编辑器").is_empty());
    }
}
