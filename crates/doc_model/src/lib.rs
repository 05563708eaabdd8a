//! Document Model - document tree, positions, marks and transactions
//!
//! This crate provides the structured document that the search engine reads
//! and edits: a `Document → Paragraph → Run` tree addressed by flat integer
//! positions, inline marks on runs, and atomic edit transactions.

mod node;
mod document;
mod paragraph;
mod run;
mod mark;
mod tree;
mod transaction;
mod html;
mod error;

pub use node::*;
pub use document::*;
pub use paragraph::*;
pub use run::*;
pub use mark::*;
pub use tree::*;
pub use transaction::*;
pub use error::*;
