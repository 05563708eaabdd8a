//! Document root node

use crate::{Node, NodeId};
use serde::{Deserialize, Serialize};

/// The root document node
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    id: NodeId,
    /// IDs of top-level blocks, in document order
    body_children: Vec<NodeId>,
    /// Bumped on every structural or committed change
    version: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            id: NodeId::new(),
            body_children: Vec::new(),
            version: 0,
        }
    }

    /// Get the document version
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Increment version after a change
    pub fn increment_version(&mut self) {
        self.version += 1;
    }

    /// Add a block to the end of the body
    pub fn add_body_child(&mut self, child_id: NodeId) {
        self.body_children.push(child_id);
        self.increment_version();
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Node for Document {
    fn id(&self) -> NodeId {
        self.id
    }

    fn children(&self) -> &[NodeId] {
        &self.body_children
    }

    fn parent(&self) -> Option<NodeId> {
        None
    }

    fn set_parent(&mut self, _parent: Option<NodeId>) {
        // The document is always the root
    }
}
