//! Edit Engine - search, highlight, navigation and replace over a document
//!
//! This crate finds case-insensitive matches in a `doc_model` document,
//! shows them as highlight marks, moves a current-match cursor through them
//! and replaces them, applying every change as a transaction through an
//! editing engine with undo/redo.

mod error;
mod scanner;
mod highlight;
mod navigator;
mod viewport;
mod replace;
mod undo;
mod executor;
mod session;
pub mod settings;

pub use error::*;
pub use scanner::*;
pub use highlight::*;
pub use navigator::*;
pub use viewport::*;
pub use replace::*;
pub use undo::*;
pub use executor::*;
pub use session::*;
pub use settings::{SearchSettings, SettingsManager};
