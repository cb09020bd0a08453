//! Reference token types shared by the matcher and renderer.
//!
//! A chat message decomposes into an ordered run of [`Segment`]s:
//! literal text and recognized references. Concatenating the segments
//! in order reproduces the message byte for byte.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// =============================================================================
// Types
// =============================================================================

/// Kind of chat reference detected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefKind {
    GliderDivePlot,
    GliderDive,
    Glider,
    DivePlot,
    Dive,
    Plot,
    Link,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::GliderDivePlot => "glider_dive_plot",
            RefKind::GliderDive => "glider_dive",
            RefKind::Glider => "glider",
            RefKind::DivePlot => "dive_plot",
            RefKind::Dive => "dive",
            RefKind::Plot => "plot",
            RefKind::Link => "link",
        }
    }
}

/// A single recognized reference
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RefMatch {
    pub kind: RefKind,
    /// Byte offset of the first matched character
    pub start: usize,
    /// Byte offset one past the last matched character
    pub end: usize,
    /// Exact matched substring; doubles as the visible label
    pub text: String,
    /// Captured fields: "glider", "dive", "plot" for reference forms,
    /// "text", "url" for links
    pub captures: HashMap<String, String>,
}

impl RefMatch {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Captured field by name
    pub fn capture(&self, name: &str) -> Option<&str> {
        self.captures.get(name).map(String::as_str)
    }
}

/// One piece of the lossless decomposition of a message
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Segment {
    Literal {
        start: usize,
        end: usize,
        text: String,
    },
    Reference(RefMatch),
}

impl Segment {
    /// The raw input text this segment covers
    pub fn text(&self) -> &str {
        match self {
            Segment::Literal { text, .. } => text,
            Segment::Reference(m) => &m.text,
        }
    }
}

/// Per-kind reference counts for one message
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnnotateStats {
    pub glider_dive_plots: usize,
    pub glider_dives: usize,
    pub gliders: usize,
    pub dive_plots: usize,
    pub dives: usize,
    pub plots: usize,
    pub links: usize,
    pub literal_bytes: usize,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_as_str() {
        assert_eq!(RefKind::GliderDivePlot.as_str(), "glider_dive_plot");
        assert_eq!(RefKind::Dive.as_str(), "dive");
        assert_eq!(RefKind::Link.as_str(), "link");
    }

    #[test]
    fn test_capture_lookup() {
        let mut captures = HashMap::new();
        captures.insert("dive".to_string(), "45".to_string());
        let m = RefMatch {
            kind: RefKind::Dive,
            start: 0,
            end: 3,
            text: "#45".to_string(),
            captures,
        };
        assert_eq!(m.len(), 3);
        assert!(!m.is_empty());
        assert_eq!(m.capture("dive"), Some("45"));
        assert_eq!(m.capture("plot"), None);
    }

    #[test]
    fn test_segment_text() {
        let literal = Segment::Literal {
            start: 0,
            end: 6,
            text: "hello ".to_string(),
        };
        assert_eq!(literal.text(), "hello ");
    }
}
