//! Text run node - a contiguous span of text with consistent formatting and marks

use crate::{Mark, MarkType, Node, NodeId};
use serde::{Deserialize, Serialize};

/// Character formatting for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStyle {
    /// Bold override
    pub bold: Option<bool>,
    /// Italic override
    pub italic: Option<bool>,
    /// Underline override
    pub underline: Option<bool>,
}

impl RunStyle {
    /// Bold text
    pub fn bold() -> Self {
        Self {
            bold: Some(true),
            ..Default::default()
        }
    }
}

/// A text run - contiguous text with consistent formatting and marks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Run {
    id: NodeId,
    parent: Option<NodeId>,
    /// The text content of this run
    pub text: String,
    /// Formatting applied to this run
    pub style: RunStyle,
    /// Marks, kept sorted by mark type with at most one per type
    #[serde(default)]
    marks: Vec<Mark>,
}

impl Run {
    /// Create a new run with text content
    pub fn new(text: impl Into<String>) -> Self {
        Self::with_style(text, RunStyle::default())
    }

    /// Create a new run with text and style
    pub fn with_style(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            text: text.into(),
            style,
            marks: Vec::new(),
        }
    }

    /// Number of positions this run occupies (one per `char`)
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if this run is empty
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Marks on this run
    pub fn marks(&self) -> &[Mark] {
        &self.marks
    }

    /// The mark of a given type, if present
    pub fn mark(&self, mark_type: MarkType) -> Option<&Mark> {
        self.marks.iter().find(|m| m.mark_type == mark_type)
    }

    /// Add a mark, replacing any existing mark of the same type
    pub fn add_mark(&mut self, mark: Mark) {
        match self.marks.binary_search_by(|m| m.mark_type.cmp(&mark.mark_type)) {
            Ok(idx) => self.marks[idx] = mark,
            Err(idx) => self.marks.insert(idx, mark),
        }
    }

    /// Remove the mark of a given type. Returns true if one was removed.
    pub fn remove_mark(&mut self, mark_type: MarkType) -> bool {
        let before = self.marks.len();
        self.marks.retain(|m| m.mark_type != mark_type);
        self.marks.len() != before
    }

    /// Check if two runs can be merged into one
    pub fn same_formatting(&self, other: &Run) -> bool {
        self.style == other.style && self.marks == other.marks
    }

    /// Split this run at a character offset.
    ///
    /// `self` keeps the text before `char_offset`; the returned run (with a
    /// fresh ID, same style and marks, no parent) holds the rest.
    pub fn split_off(&mut self, char_offset: usize) -> Run {
        let byte_offset = self
            .text
            .char_indices()
            .nth(char_offset)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len());
        let tail = self.text.split_off(byte_offset);

        Run {
            id: NodeId::new(),
            parent: None,
            text: tail,
            style: self.style.clone(),
            marks: self.marks.clone(),
        }
    }
}

impl Node for Run {
    fn id(&self) -> NodeId {
        self.id
    }

    fn children(&self) -> &[NodeId] {
        &[]
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}
