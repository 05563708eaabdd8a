//! Inline marks - annotations attached to text runs
//!
//! Two mark types exist: `SearchHighlight`, used for transient search,
//! current-match and replaced-text highlighting, and `LevelHighlight`, a
//! separate annotation layer whose default color is the `invalid` sentinel.
//! A run carries at most one mark of each type.

use serde::{Deserialize, Serialize};

/// The kind of a mark. Clearing and querying work per mark type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkType {
    SearchHighlight,
    LevelHighlight,
}

impl MarkType {
    /// The data attribute that flags a rendered span as this mark type
    pub fn data_attribute(&self) -> &'static str {
        match self {
            MarkType::SearchHighlight => "data-search-highlight",
            MarkType::LevelHighlight => "data-level-highlight",
        }
    }
}

/// Highlight category carried in a mark's `color` attribute
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HighlightColor {
    #[default]
    Search,
    Current,
    Replace,
    /// Sentinel for annotations that do not represent a valid category
    Invalid,
}

impl HighlightColor {
    /// Attribute value for this color
    pub fn as_str(&self) -> &'static str {
        match self {
            HighlightColor::Search => "search",
            HighlightColor::Current => "current",
            HighlightColor::Replace => "replace",
            HighlightColor::Invalid => "invalid",
        }
    }

    /// Parse an attribute value; anything unknown is `Invalid`
    pub fn parse(value: &str) -> Self {
        match value {
            "search" => HighlightColor::Search,
            "current" => HighlightColor::Current,
            "replace" => HighlightColor::Replace,
            _ => HighlightColor::Invalid,
        }
    }
}

impl std::fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An inline mark with its attributes
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Mark {
    pub mark_type: MarkType,
    pub color: HighlightColor,
    /// The `type` attribute. Mirrors the color for search highlights.
    #[serde(rename = "type")]
    pub tag: String,
}

impl Mark {
    /// A search highlight of the given category
    pub fn search(color: HighlightColor) -> Self {
        Self {
            mark_type: MarkType::SearchHighlight,
            color,
            tag: color.as_str().to_string(),
        }
    }

    /// A level highlight of the given category
    pub fn level(color: HighlightColor) -> Self {
        Self {
            mark_type: MarkType::LevelHighlight,
            color,
            tag: "level".to_string(),
        }
    }

    /// A mark of the given type with default attributes
    pub fn default_for(mark_type: MarkType) -> Self {
        match mark_type {
            MarkType::SearchHighlight => Self::search(HighlightColor::Search),
            MarkType::LevelHighlight => Self::level(HighlightColor::Invalid),
        }
    }

    /// CSS class used when rendering this mark
    pub fn css_class(&self) -> &'static str {
        match (self.mark_type, self.color) {
            (MarkType::SearchHighlight, HighlightColor::Replace) => "bg-editor-highlight-replace",
            (MarkType::SearchHighlight, HighlightColor::Current) => "bg-editor-highlight-current",
            (MarkType::LevelHighlight, HighlightColor::Invalid) => "bg-editor-highlight-invalid",
            _ => "bg-editor-highlight-search",
        }
    }
}

/// A mark covering an absolute position range `[from, to)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkSpan {
    pub from: usize,
    pub to: usize,
    pub mark: Mark,
}
