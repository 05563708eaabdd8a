//! Document tree storage and the flattened position space
//!
//! Positions address the whole document as one sequence. Every `char` of a
//! run takes one position, and every paragraph adds one closing boundary
//! position after its content, so the first run of the first paragraph
//! starts at 0 and no edit range can silently cross a block.

use crate::{
    BlockKind, DocModelError, Document, Mark, MarkSpan, MarkType, Node, NodeId,
    Paragraph, Result, Run, RunStyle,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Storage for different node types
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NodeStorage {
    pub paragraphs: HashMap<NodeId, Paragraph>,
    pub runs: HashMap<NodeId, Run>,
}

/// A text-bearing leaf together with its absolute base position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextLeaf<'a> {
    pub run_id: NodeId,
    pub base: usize,
    pub text: &'a str,
}

/// Where a paragraph sits in the position space
#[derive(Debug, Clone, Copy)]
struct BlockSpan {
    id: NodeId,
    start: usize,
    content_len: usize,
}

/// The complete document tree structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTree {
    /// The root document
    pub document: Document,
    /// Storage for all nodes
    pub nodes: NodeStorage,
    /// Bumped whenever text content changes; mark changes leave it alone
    #[serde(default)]
    text_version: u64,
}

impl DocumentTree {
    /// Create a new empty document tree
    pub fn new() -> Self {
        Self {
            document: Document::new(),
            nodes: NodeStorage::default(),
            text_version: 0,
        }
    }

    /// Create a document tree with a single empty paragraph
    pub fn with_empty_paragraph() -> Self {
        let mut tree = Self::new();
        tree.push_block(BlockKind::Paragraph, "");
        tree
    }

    /// Build a document with one paragraph per line
    pub fn from_plain_text(text: &str) -> Self {
        let mut tree = Self::new();
        for line in text.lines() {
            tree.push_block(BlockKind::Paragraph, line);
        }
        tree
    }

    /// Append a block holding a single unformatted run
    pub fn push_block(&mut self, kind: BlockKind, text: &str) -> NodeId {
        let mut para = Paragraph::with_kind(kind);
        let para_id = para.id();
        para.set_parent(Some(self.document.id()));

        if !text.is_empty() {
            let mut run = Run::new(text);
            run.set_parent(Some(para_id));
            para.add_child(run.id());
            self.nodes.runs.insert(run.id(), run);
        }

        self.nodes.paragraphs.insert(para_id, para);
        self.document.add_body_child(para_id);
        self.text_version += 1;
        para_id
    }

    /// Counter that changes whenever the document text changes
    pub fn text_version(&self) -> u64 {
        self.text_version
    }

    /// Get a paragraph by ID
    pub fn get_paragraph(&self, id: NodeId) -> Option<&Paragraph> {
        self.nodes.paragraphs.get(&id)
    }

    /// Get a run by ID
    pub fn get_run(&self, id: NodeId) -> Option<&Run> {
        self.nodes.runs.get(&id)
    }

    /// Insert a run into a paragraph
    pub fn insert_run(&mut self, mut run: Run, para_id: NodeId, index: Option<usize>) -> Result<NodeId> {
        let run_id = run.id();
        run.set_parent(Some(para_id));

        let para = self
            .nodes
            .paragraphs
            .get_mut(&para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?;

        match index {
            Some(idx) if idx <= para.children().len() => para.insert_child(idx, run_id),
            Some(idx) => {
                return Err(DocModelError::InvalidOperation(format!(
                    "Run index {} out of bounds",
                    idx
                )))
            }
            None => para.add_child(run_id),
        }

        self.nodes.runs.insert(run_id, run);
        self.text_version += 1;
        Ok(run_id)
    }

    /// Iterate over all paragraphs in document order
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.document
            .children()
            .iter()
            .filter_map(|id| self.nodes.paragraphs.get(id))
    }

    /// Text of a single paragraph
    pub fn paragraph_text(&self, para_id: NodeId) -> String {
        let Some(para) = self.get_paragraph(para_id) else {
            return String::new();
        };
        para.children()
            .iter()
            .filter_map(|id| self.nodes.runs.get(id))
            .map(|run| run.text.as_str())
            .collect()
    }

    /// Document text with paragraphs separated by newlines
    pub fn text_content(&self) -> String {
        self.paragraphs()
            .map(|para| self.paragraph_text(para.id()))
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn block_spans(&self) -> impl Iterator<Item = BlockSpan> + '_ {
        let mut pos = 0;
        self.paragraphs().map(move |para| {
            let content_len: usize = para
                .children()
                .iter()
                .filter_map(|id| self.nodes.runs.get(id))
                .map(Run::char_len)
                .sum();
            let span = BlockSpan {
                id: para.id(),
                start: pos,
                content_len,
            };
            pos += content_len + 1;
            span
        })
    }

    /// Total number of positions in the document
    pub fn content_size(&self) -> usize {
        self.block_spans().map(|s| s.content_len + 1).sum()
    }

    /// All text-bearing leaves in document order with their base positions
    pub fn text_leaves(&self) -> Vec<TextLeaf<'_>> {
        let mut leaves = Vec::new();
        let mut pos = 0;
        for para in self.paragraphs() {
            for run in para.children().iter().filter_map(|id| self.nodes.runs.get(id)) {
                leaves.push(TextLeaf {
                    run_id: run.id(),
                    base: pos,
                    text: &run.text,
                });
                pos += run.char_len();
            }
            pos += 1;
        }
        leaves
    }

    /// Text covered by `[from, to)`
    pub fn text_between(&self, from: usize, to: usize) -> Result<String> {
        let (para_id, start, end) = self.locate(from, to)?;
        Ok(self
            .paragraph_text(para_id)
            .chars()
            .skip(start)
            .take(end - start)
            .collect())
    }

    /// Resolve a range to a paragraph and offsets within its content
    fn locate(&self, from: usize, to: usize) -> Result<(NodeId, usize, usize)> {
        let invalid = DocModelError::InvalidRange { from, to };
        if from > to {
            return Err(invalid);
        }

        for span in self.block_spans() {
            let end = span.start + span.content_len;
            if from >= span.start && from <= end {
                if to > end {
                    return Err(invalid);
                }
                return Ok((span.id, from - span.start, to - span.start));
            }
        }
        Err(invalid)
    }

    /// (run id, offset in paragraph, char length) for each run of a paragraph
    fn run_offsets(&self, para_id: NodeId) -> Result<Vec<(NodeId, usize, usize)>> {
        let para = self
            .get_paragraph(para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?;

        let mut offsets = Vec::with_capacity(para.children().len());
        let mut offset = 0;
        for &run_id in para.children() {
            let run = self
                .nodes
                .runs
                .get(&run_id)
                .ok_or(DocModelError::NodeNotFound(run_id.as_uuid()))?;
            let len = run.char_len();
            offsets.push((run_id, offset, len));
            offset += len;
        }
        Ok(offsets)
    }

    /// Split the run that straddles `offset` so a run boundary falls there
    fn split_at(&mut self, para_id: NodeId, offset: usize) -> Result<()> {
        let straddling = self
            .run_offsets(para_id)?
            .into_iter()
            .enumerate()
            .find(|(_, (_, start, len))| offset > *start && offset < start + len);

        let Some((index, (run_id, start, _))) = straddling else {
            return Ok(());
        };

        let run = self
            .nodes
            .runs
            .get_mut(&run_id)
            .ok_or(DocModelError::NodeNotFound(run_id.as_uuid()))?;
        let mut tail = run.split_off(offset - start);
        tail.set_parent(Some(para_id));
        let tail_id = tail.id();
        self.nodes.runs.insert(tail_id, tail);

        let para = self
            .nodes
            .paragraphs
            .get_mut(&para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?;
        para.insert_child(index + 1, tail_id);
        Ok(())
    }

    /// Split runs so `[start, end)` is covered exactly by whole runs.
    ///
    /// Returns the child index where the range begins and the covered runs.
    fn isolate(&mut self, para_id: NodeId, start: usize, end: usize) -> Result<(usize, Vec<NodeId>)> {
        self.split_at(para_id, start)?;
        self.split_at(para_id, end)?;

        let offsets = self.run_offsets(para_id)?;
        let index = offsets
            .iter()
            .position(|&(_, s, _)| s >= start)
            .unwrap_or(offsets.len());
        let covered = offsets
            .iter()
            .filter(|&&(_, s, len)| len > 0 && s >= start && s + len <= end)
            .map(|&(id, _, _)| id)
            .collect();
        Ok((index, covered))
    }

    /// Formatting in effect at an offset: the run containing it, else the run ending there
    fn style_at(&self, para_id: NodeId, offset: usize) -> Result<RunStyle> {
        let offsets = self.run_offsets(para_id)?;
        let found = offsets
            .iter()
            .find(|&&(_, s, len)| offset >= s && offset < s + len)
            .or_else(|| offsets.iter().rev().find(|&&(_, s, len)| s + len == offset));

        Ok(found
            .and_then(|&(id, _, _)| self.nodes.runs.get(&id))
            .map(|run| run.style.clone())
            .unwrap_or_default())
    }

    /// Add a mark over `[from, to)`, replacing marks of the same type there
    pub fn add_mark(&mut self, from: usize, to: usize, mark: &Mark) -> Result<()> {
        let (para_id, start, end) = self.locate(from, to)?;
        if start == end {
            return Ok(());
        }

        let (_, covered) = self.isolate(para_id, start, end)?;
        for id in covered {
            if let Some(run) = self.nodes.runs.get_mut(&id) {
                run.add_mark(mark.clone());
            }
        }
        self.normalize_paragraph(para_id)
    }

    /// Remove marks of a type over `[from, to)`
    pub fn remove_mark(&mut self, from: usize, to: usize, mark_type: MarkType) -> Result<()> {
        let (para_id, start, end) = self.locate(from, to)?;
        if start == end {
            return Ok(());
        }

        let (_, covered) = self.isolate(para_id, start, end)?;
        for id in covered {
            if let Some(run) = self.nodes.runs.get_mut(&id) {
                run.remove_mark(mark_type);
            }
        }
        self.normalize_paragraph(para_id)
    }

    /// Replace the content of `[from, to)` with literal text.
    ///
    /// The new text takes the formatting of the run at `from` and carries no
    /// marks. Returns the text that was removed.
    pub fn replace_text(&mut self, from: usize, to: usize, text: &str) -> Result<String> {
        let (para_id, start, end) = self.locate(from, to)?;
        let style = self.style_at(para_id, start)?;
        let (index, covered) = self.isolate(para_id, start, end)?;

        let mut removed = String::new();
        for id in &covered {
            if let Some(run) = self.nodes.runs.remove(id) {
                removed.push_str(&run.text);
            }
        }

        let para = self
            .nodes
            .paragraphs
            .get_mut(&para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?;
        for id in &covered {
            para.remove_child(*id);
        }

        if !text.is_empty() {
            let mut run = Run::with_style(text, style);
            run.set_parent(Some(para_id));
            para.insert_child(index, run.id());
            self.nodes.runs.insert(run.id(), run);
        }

        self.normalize_paragraph(para_id)?;
        if removed != text {
            self.text_version += 1;
        }
        Ok(removed)
    }

    /// Marks of a type inside `[from, to)`, clipped to the range.
    ///
    /// Adjacent spans carrying an identical mark are reported as one.
    pub fn marks_in(&self, from: usize, to: usize, mark_type: MarkType) -> Vec<MarkSpan> {
        let mut spans = Vec::new();
        for leaf in self.text_leaves() {
            let Some(mark) = self.get_run(leaf.run_id).and_then(|r| r.mark(mark_type)) else {
                continue;
            };
            let leaf_end = leaf.base + leaf.text.chars().count();
            push_span(&mut spans, leaf.base.max(from), leaf_end.min(to), mark);
        }
        spans
    }

    /// Like [`marks_in`](Self::marks_in) for a range inside one block.
    ///
    /// Only the runs of the block holding the range are visited.
    pub fn block_marks_in(&self, from: usize, to: usize, mark_type: MarkType) -> Result<Vec<MarkSpan>> {
        let (para_id, start, end) = self.locate(from, to)?;
        let block_start = from - start;

        let mut spans = Vec::new();
        for (run_id, offset, len) in self.run_offsets(para_id)? {
            if offset >= end {
                break;
            }
            let Some(mark) = self.get_run(run_id).and_then(|r| r.mark(mark_type)) else {
                continue;
            };
            push_span(
                &mut spans,
                block_start + offset.max(start),
                block_start + (offset + len).min(end),
                mark,
            );
        }
        Ok(spans)
    }

    /// Every span of a mark type in the document
    pub fn marked_ranges(&self, mark_type: MarkType) -> Vec<MarkSpan> {
        self.marks_in(0, self.content_size(), mark_type)
    }

    /// Check whether any run carries a mark of this type
    pub fn has_mark(&self, mark_type: MarkType) -> bool {
        self.nodes.runs.values().any(|run| run.mark(mark_type).is_some())
    }

    /// Drop empty runs and merge neighbours with identical formatting and marks
    pub(crate) fn normalize_paragraph(&mut self, para_id: NodeId) -> Result<()> {
        let child_ids = self
            .get_paragraph(para_id)
            .ok_or(DocModelError::NodeNotFound(para_id.as_uuid()))?
            .children()
            .to_vec();

        let mut kept: Vec<NodeId> = Vec::with_capacity(child_ids.len());
        for id in child_ids {
            let Some(run) = self.nodes.runs.remove(&id) else {
                return Err(DocModelError::TreeStructureError(format!(
                    "Paragraph {} references missing run {}",
                    para_id, id
                )));
            };
            if run.is_empty() {
                continue;
            }
            if let Some(prev) = kept.last().and_then(|prev_id| self.nodes.runs.get_mut(prev_id)) {
                if prev.same_formatting(&run) {
                    prev.text.push_str(&run.text);
                    continue;
                }
            }
            kept.push(id);
            self.nodes.runs.insert(id, run);
        }

        if let Some(para) = self.nodes.paragraphs.get_mut(&para_id) {
            para.set_children(kept);
        }
        Ok(())
    }
}

impl Default for DocumentTree {
    fn default() -> Self {
        Self::with_empty_paragraph()
    }
}

/// Append a clipped span, extending the previous one when it carries the same mark
fn push_span(spans: &mut Vec<MarkSpan>, from: usize, to: usize, mark: &Mark) {
    if from >= to {
        return;
    }
    if let Some(last) = spans.last_mut() {
        if last.to == from && last.mark == *mark {
            last.to = to;
            return;
        }
    }
    spans.push(MarkSpan {
        from,
        to,
        mark: mark.clone(),
    });
}
