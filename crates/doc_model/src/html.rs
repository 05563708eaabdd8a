//! HTML rendering and parsing of a document tree
//!
//! Marks render as spans carrying data attributes so a stylesheet can color
//! them, e.g.
//! `<span data-search-highlight="" data-color="current" data-type="current" class="bg-editor-highlight-current">`.
//!
//! Parsing reads the same shape back: `<p>` and `<h1>`..`<h6>` blocks,
//! `<strong>`/`<b>`, `<em>`/`<i>` and `<u>` formatting, and mark spans
//! recognised by their data attribute. Other elements are transparent.

use crate::{
    BlockKind, DocumentTree, HighlightColor, Mark, MarkType, Node, NodeId, Result, Run, RunStyle,
};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

impl DocumentTree {
    /// Render the document as an HTML fragment
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        for para in self.paragraphs() {
            let tag = para.kind.html_tag();
            html.push('<');
            html.push_str(&tag);
            html.push('>');
            for run in para.children().iter().filter_map(|id| self.get_run(*id)) {
                render_run(run, &mut html);
            }
            html.push_str("</");
            html.push_str(&tag);
            html.push('>');
        }
        html
    }
}

/// An element open while parsing
enum Open {
    Block,
    Bold,
    Italic,
    Underline,
    Mark(Mark),
    Other,
}

impl DocumentTree {
    /// Parse an HTML fragment produced by [`to_html`](Self::to_html) or an
    /// editor using the same mark spans.
    ///
    /// Text outside any block starts a paragraph. An empty fragment yields
    /// one empty paragraph.
    pub fn from_html(html: &str) -> Result<Self> {
        let mut reader = Reader::from_str(html);
        let mut tree = DocumentTree::new();
        let mut stack: Vec<Open> = Vec::new();
        let mut block: Option<NodeId> = None;

        loop {
            match reader.read_event()? {
                Event::Start(ref e) => {
                    let open = match block_kind(e) {
                        Some(kind) => {
                            block = Some(tree.push_block(kind, ""));
                            Open::Block
                        }
                        None => inline_element(e)?,
                    };
                    stack.push(open);
                }
                Event::Empty(ref e) => {
                    if let Some(kind) = block_kind(e) {
                        tree.push_block(kind, "");
                        block = None;
                    }
                }
                Event::End(_) => {
                    if let Some(Open::Block) = stack.pop() {
                        block = None;
                    }
                }
                Event::Text(ref e) => {
                    let text = e.unescape()?;
                    let para_id = match block {
                        Some(id) => id,
                        None if text.trim().is_empty() => continue,
                        None => {
                            let id = tree.push_block(BlockKind::Paragraph, "");
                            block = Some(id);
                            id
                        }
                    };
                    if !text.is_empty() {
                        tree.insert_run(parsed_run(&text, &stack), para_id, None)?;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if tree.paragraphs().next().is_none() {
            tree.push_block(BlockKind::Paragraph, "");
        }
        let para_ids: Vec<NodeId> = tree.paragraphs().map(|p| p.id()).collect();
        for para_id in para_ids {
            tree.normalize_paragraph(para_id)?;
        }
        Ok(tree)
    }
}

fn block_kind(e: &BytesStart) -> Option<BlockKind> {
    match e.local_name().as_ref() {
        b"p" => Some(BlockKind::Paragraph),
        [b'h', level @ b'1'..=b'6'] => Some(BlockKind::Heading(level - b'0')),
        _ => None,
    }
}

fn inline_element(e: &BytesStart) -> Result<Open> {
    Ok(match e.local_name().as_ref() {
        b"strong" | b"b" => Open::Bold,
        b"em" | b"i" => Open::Italic,
        b"u" => Open::Underline,
        b"span" => span_mark(e)?.map_or(Open::Other, Open::Mark),
        _ => Open::Other,
    })
}

/// Read a highlight mark from a span, using the mark defaults for any
/// missing `data-color` or `data-type`
fn span_mark(e: &BytesStart) -> Result<Option<Mark>> {
    let mut mark_type = None;
    let mut color = None;
    let mut tag = None;

    for attr in e.html_attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"data-search-highlight" => mark_type = Some(MarkType::SearchHighlight),
            b"data-level-highlight" => mark_type = Some(MarkType::LevelHighlight),
            b"data-color" => color = Some(HighlightColor::parse(&attr.unescape_value()?)),
            b"data-type" => tag = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    Ok(mark_type.map(|mark_type| {
        let mut mark = Mark::default_for(mark_type);
        if let Some(color) = color {
            mark.color = color;
        }
        if let Some(tag) = tag {
            mark.tag = tag;
        }
        mark
    }))
}

/// A run for text nested inside the open elements
fn parsed_run(text: &str, stack: &[Open]) -> Run {
    let has = |want: fn(&Open) -> bool| stack.iter().any(want).then_some(true);
    let style = RunStyle {
        bold: has(|o| matches!(o, Open::Bold)),
        italic: has(|o| matches!(o, Open::Italic)),
        underline: has(|o| matches!(o, Open::Underline)),
    };

    let mut run = Run::with_style(text, style);
    for open in stack {
        if let Open::Mark(mark) = open {
            run.add_mark(mark.clone());
        }
    }
    run
}

fn render_run(run: &Run, out: &mut String) {
    let mut inner = escape_html(&run.text);
    if run.style.underline == Some(true) {
        inner = format!("<u>{}</u>", inner);
    }
    if run.style.italic == Some(true) {
        inner = format!("<em>{}</em>", inner);
    }
    if run.style.bold == Some(true) {
        inner = format!("<strong>{}</strong>", inner);
    }
    // Marks are sorted by type, so the search highlight ends up outermost
    for mark in run.marks().iter().rev() {
        inner = format!("{}{}</span>", open_mark_tag(mark), inner);
    }
    out.push_str(&inner);
}

fn open_mark_tag(mark: &Mark) -> String {
    format!(
        "<span {}=\"\" data-color=\"{}\" data-type=\"{}\" class=\"{}\">",
        mark.mark_type.data_attribute(),
        mark.color.as_str(),
        escape_html(&mark.tag),
        mark.css_class()
    )
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
