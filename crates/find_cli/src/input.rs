//! Input parsing
//!
//! Files ending in `.html` or `.htm` are parsed as HTML, keeping formatting
//! and highlight spans. Anything else is plain text with one paragraph per
//! line, where a line starting with `#` is a heading whose level is the
//! number of leading `#`s.

use anyhow::{Context, Result};
use doc_model::{BlockKind, DocumentTree};
use std::path::Path;

/// Build a document from file contents, choosing the parser by extension
pub fn load_document(path: &Path, text: &str) -> Result<DocumentTree> {
    let is_html = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("html") || ext.eq_ignore_ascii_case("htm"));

    if is_html {
        DocumentTree::from_html(text)
            .with_context(|| format!("Failed to parse HTML in {}", path.display()))
    } else {
        Ok(parse_document(text))
    }
}

/// Build a document from plain text
pub fn parse_document(text: &str) -> DocumentTree {
    let mut tree = DocumentTree::new();
    for line in text.lines() {
        let (kind, content) = classify_line(line);
        tree.push_block(kind, content);
    }
    if tree.paragraphs().next().is_none() {
        return DocumentTree::with_empty_paragraph();
    }
    tree
}

fn classify_line(line: &str) -> (BlockKind, &str) {
    let level = line.chars().take_while(|c| *c == '#').count();
    if level == 0 {
        return (BlockKind::Paragraph, line);
    }
    let rest = &line[level..];
    let content = rest.strip_prefix(' ').unwrap_or(rest);
    (BlockKind::Heading(level.min(6) as u8), content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use doc_model::MarkType;

    #[test]
    fn test_headings_and_paragraphs() {
        let tree = parse_document("# 中文编辑器\n正文\n### 小节");
        let kinds: Vec<BlockKind> = tree.paragraphs().map(|p| p.kind).collect();
        assert_eq!(
            kinds,
            vec![BlockKind::Heading(1), BlockKind::Paragraph, BlockKind::Heading(3)]
        );
        assert_eq!(tree.text_content(), "中文编辑器\n正文\n小节");
    }

    #[test]
    fn test_html_files_keep_highlights() {
        let html = "<p>我爱<span data-search-highlight=\"\" data-color=\"replace\">汉语</span></p>";
        let tree = load_document(Path::new("notes.HTML"), html).unwrap();
        assert_eq!(tree.text_content(), "我爱汉语");
        assert!(tree.has_mark(MarkType::SearchHighlight));

        let tree = load_document(Path::new("notes.txt"), html).unwrap();
        assert_eq!(tree.text_content(), html);

        assert!(load_document(Path::new("bad.htm"), "<p>x</u>").is_err());
    }

    #[test]
    fn test_empty_input_has_one_paragraph() {
        let tree = parse_document("");
        assert_eq!(tree.paragraphs().count(), 1);
        assert_eq!(tree.content_size(), 1);
    }
}
