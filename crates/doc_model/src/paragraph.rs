//! Paragraph node - a block of content containing runs

use crate::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// What kind of block a paragraph renders as
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    #[default]
    Paragraph,
    /// Heading level, clamped to 1..=6 when rendered
    Heading(u8),
}

impl BlockKind {
    /// HTML tag name for this block
    pub fn html_tag(&self) -> String {
        match self {
            BlockKind::Paragraph => "p".to_string(),
            BlockKind::Heading(level) => format!("h{}", (*level).clamp(1, 6)),
        }
    }
}

/// A paragraph containing text runs
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    id: NodeId,
    parent: Option<NodeId>,
    /// IDs of child runs
    children: Vec<NodeId>,
    /// Block kind
    pub kind: BlockKind,
}

impl Paragraph {
    /// Create a new empty paragraph
    pub fn new() -> Self {
        Self::with_kind(BlockKind::Paragraph)
    }

    /// Create an empty block of the given kind
    pub fn with_kind(kind: BlockKind) -> Self {
        Self {
            id: NodeId::new(),
            parent: None,
            children: Vec::new(),
            kind,
        }
    }

    /// Add a child run ID
    pub fn add_child(&mut self, child_id: NodeId) {
        self.children.push(child_id);
    }

    /// Insert a child at a specific index
    pub fn insert_child(&mut self, index: usize, child_id: NodeId) {
        self.children.insert(index, child_id);
    }

    /// Remove a child by ID
    pub fn remove_child(&mut self, child_id: NodeId) -> bool {
        match self.child_index(child_id) {
            Some(pos) => {
                self.children.remove(pos);
                true
            }
            None => false,
        }
    }

    /// Replace the child list wholesale (used by normalization)
    pub(crate) fn set_children(&mut self, children: Vec<NodeId>) {
        self.children = children;
    }

    /// Index of a child run within this paragraph
    pub fn child_index(&self, child_id: NodeId) -> Option<usize> {
        self.children.iter().position(|&id| id == child_id)
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Paragraph {
    fn id(&self) -> NodeId {
        self.id
    }

    fn children(&self) -> &[NodeId] {
        &self.children
    }

    fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_tag_is_clamped() {
        assert_eq!(BlockKind::Paragraph.html_tag(), "p");
        assert_eq!(BlockKind::Heading(2).html_tag(), "h2");
        assert_eq!(BlockKind::Heading(0).html_tag(), "h1");
        assert_eq!(BlockKind::Heading(9).html_tag(), "h6");
    }

    #[test]
    fn test_child_bookkeeping() {
        let mut para = Paragraph::new();
        let a = NodeId::new();
        let b = NodeId::new();
        para.add_child(a);
        para.insert_child(0, b);
        assert_eq!(para.children(), &[b, a]);
        assert_eq!(para.child_index(a), Some(1));
        assert!(para.remove_child(b));
        assert!(!para.remove_child(b));
        assert_eq!(para.children(), &[a]);
    }
}
