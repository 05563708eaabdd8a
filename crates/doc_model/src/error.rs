//! Error types for document model operations

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum DocModelError {
    #[error("Node not found: {0}")]
    NodeNotFound(Uuid),

    /// The range is reversed, out of bounds, or crosses a block boundary
    #[error("Invalid range: {from}..{to}")]
    InvalidRange { from: usize, to: usize },

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    #[error("Tree structure error: {0}")]
    TreeStructureError(String),

    #[error("HTML parse error: {0}")]
    HtmlParse(String),
}

impl From<quick_xml::Error> for DocModelError {
    fn from(err: quick_xml::Error) -> Self {
        DocModelError::HtmlParse(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for DocModelError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        DocModelError::HtmlParse(format!("Attribute error: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, DocModelError>;
