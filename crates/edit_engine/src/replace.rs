//! Replace engine
//!
//! Every replacement in a transaction is emitted from the highest position
//! down. A step only shifts text after its own range, so positions recorded
//! before the transaction stay valid for every step that follows, except the
//! end of a match overlapping the step before it, which gets clamped.

use crate::Match;
use doc_model::Transaction;

/// Check that a replacement has something other than whitespace
fn is_blank(replacement: &str) -> bool {
    replacement.trim().is_empty()
}

/// Build one transaction replacing every match with `replacement`.
///
/// Matches are emitted from the last to the first. When a match overlaps
/// the one emitted just before it, its end is clamped to the end of that
/// replacement, so overlapping groups collapse into one replacement.
/// Returns None for no matches or a blank replacement.
pub fn replace_all_transaction(matches: &[Match], replacement: &str) -> Option<Transaction> {
    if matches.is_empty() || is_blank(replacement) {
        return None;
    }

    let mut ordered: Vec<&Match> = matches.iter().collect();
    ordered.sort_by(|a, b| b.from.cmp(&a.from));
    let repl_len = replacement.chars().count();

    let mut tr = Transaction::new();
    let mut prev: Option<&Match> = None;
    for m in ordered {
        let to = match prev {
            Some(p) if m.overlaps(p) => m.to.min(p.from + repl_len),
            _ => m.to,
        };
        tr.replace_text(m.from, to, replacement);
        prev = Some(m);
    }
    Some(tr)
}

/// Build a single-step transaction replacing `matches[index]`
pub fn replace_current_transaction(
    matches: &[Match],
    index: usize,
    replacement: &str,
) -> Option<Transaction> {
    if is_blank(replacement) {
        return None;
    }
    let m = matches.get(index)?;
    let mut tr = Transaction::new();
    tr.replace_text(m.from, m.to, replacement);
    Some(tr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan;
    use doc_model::{DocumentTree, Step};
    use proptest::prelude::*;

    fn replace_all(text: &str, query: &str, replacement: &str) -> String {
        let tree = DocumentTree::from_plain_text(text);
        let matches = scan(&tree, query);
        match replace_all_transaction(&matches, replacement) {
            Some(tr) => tr.apply(&tree).unwrap().tree.text_content(),
            None => tree.text_content(),
        }
    }

    /// Apply the replacements back to front on a flat char buffer
    fn flat_reference(text: &str, matches: &[Match], replacement: &str) -> String {
        let mut chars: Vec<char> = text.chars().collect();
        let repl: Vec<char> = replacement.chars().collect();
        let mut prev_from: Option<usize> = None;
        for m in matches.iter().rev() {
            let to = match prev_from {
                Some(p) if p < m.to => m.to.min(p + repl.len()),
                _ => m.to,
            };
            chars.splice(m.from..to, repl.iter().copied());
            prev_from = Some(m.from);
        }
        chars.into_iter().collect()
    }

    /// Apply disjoint replacements front to back, tracking the drift by hand
    fn ascending_reference(text: &str, matches: &[Match], replacement: &str) -> String {
        let mut chars: Vec<char> = text.chars().collect();
        let repl: Vec<char> = replacement.chars().collect();
        let mut delta: isize = 0;
        for m in matches {
            let from = (m.from as isize + delta) as usize;
            let to = (m.to as isize + delta) as usize;
            chars.splice(from..to, repl.iter().copied());
            delta += repl.len() as isize - m.len() as isize;
        }
        chars.into_iter().collect()
    }

    #[test]
    fn test_replace_all_descending() {
        let tree = DocumentTree::from_plain_text("ABAB");
        let matches = scan(&tree, "AB");
        let tr = replace_all_transaction(&matches, "X").unwrap();

        let froms: Vec<usize> = tr
            .steps()
            .iter()
            .map(|step| match step {
                Step::ReplaceText { from, .. } => *from,
                other => panic!("unexpected step {:?}", other),
            })
            .collect();
        assert_eq!(froms, vec![2, 0]);
        assert!(tr.adds_to_history());
        assert_eq!(tr.apply(&tree).unwrap().tree.text_content(), "XX");
    }

    #[test]
    fn test_replace_all_chinese() {
        assert_eq!(
            replace_all("我爱中文编辑器，中文很美", "中文", "汉语"),
            "我爱汉语编辑器，汉语很美"
        );
    }

    #[test]
    fn test_replace_all_overlapping_collapses_group() {
        assert_eq!(replace_all("aaa", "aa", "X"), "X");
        assert_eq!(replace_all("aaaab", "aaa", "X"), "Xb");
        assert_eq!(replace_all("aaaa", "aa", "X"), "X");
        assert_eq!(replace_all("baab aab", "aa", "X"), "bXb Xb");
    }

    #[test]
    fn test_replace_all_overlapping_ranges_are_clamped() {
        let tree = DocumentTree::from_plain_text("aaa");
        let matches = scan(&tree, "aa");
        let tr = replace_all_transaction(&matches, "X").unwrap();

        let ranges: Vec<(usize, usize)> = tr
            .steps()
            .iter()
            .map(|step| match step {
                Step::ReplaceText { from, to, .. } => (*from, *to),
                other => panic!("unexpected step {:?}", other),
            })
            .collect();
        assert_eq!(ranges, vec![(1, 3), (0, 2)]);
    }

    #[test]
    fn test_replace_all_across_paragraphs() {
        assert_eq!(replace_all("ab\nab", "AB", "longer"), "longer\nlonger");
    }

    #[test]
    fn test_empty_inputs_are_none() {
        assert!(replace_all_transaction(&[], "x").is_none());
        assert!(replace_all_transaction(&[Match::new(0, 1, "a")], "").is_none());
        assert!(replace_all_transaction(&[Match::new(0, 1, "a")], " \t ").is_none());
        assert!(replace_current_transaction(&[Match::new(0, 1, "a")], 0, "").is_none());
        assert!(replace_current_transaction(&[Match::new(0, 1, "a")], 0, "  ").is_none());
        assert!(replace_current_transaction(&[Match::new(0, 1, "a")], 1, "x").is_none());
    }

    #[test]
    fn test_replace_current_single_step() {
        let tree = DocumentTree::from_plain_text("中文很美，中文");
        let matches = scan(&tree, "中文");
        let tr = replace_current_transaction(&matches, 1, "汉语言").unwrap();
        assert_eq!(tr.steps().len(), 1);
        assert_eq!(
            tr.apply(&tree).unwrap().tree.text_content(),
            "中文很美，汉语言"
        );
    }

    proptest! {
        #[test]
        fn prop_replace_all_matches_flat_reference(
            text in "[abAB ]{0,24}",
            query in "[ab]{1,3}",
            replacement in "[xyz]{1,4}",
        ) {
            let tree = DocumentTree::from_plain_text(&text);
            let matches = scan(&tree, &query);
            let actual = match replace_all_transaction(&matches, &replacement) {
                Some(tr) => tr.apply(&tree).unwrap().tree.text_content(),
                None => text.clone(),
            };
            prop_assert_eq!(&actual, &flat_reference(&text, &matches, &replacement));

            let disjoint = matches.windows(2).all(|pair| !pair[0].overlaps(&pair[1]));
            if disjoint {
                prop_assert_eq!(actual, ascending_reference(&text, &matches, &replacement));
            }
        }
    }
}
