//! Block-level markdown elements
//!
//! This module defines the structured representation of a rendered page
//! at the block level (paragraphs, headings, lists, code blocks, etc.)

use super::inline::Inline;
use super::types::{Alignment, CalloutKind};

/// Block-level markdown element
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBlock {
    /// A heading with level, anchor id and inline content
    Heading {
        /// Heading level (1 = h1, 2 = h2, etc.)
        level: usize,
        /// Anchor id derived from the heading text
        id: String,
        /// Inline content of the heading
        content: Vec<Inline>,
    },

    /// A paragraph of inline content
    Paragraph(Vec<Inline>),

    /// A fenced or indented code block
    CodeBlock {
        /// Position among the page's code blocks (used for copy targets)
        index: usize,
        /// Language tag from the opening fence, if any
        language: Option<String>,
        /// Verbatim code text
        code: String,
    },

    /// A plain block quote containing other blocks
    BlockQuote(Vec<RenderedBlock>),

    /// A visually distinct callout (warning/info/danger/...)
    Callout {
        /// Callout style
        kind: CalloutKind,
        /// Header text; defaults to the kind's title
        title: String,
        /// Callout body
        blocks: Vec<RenderedBlock>,
    },

    /// An ordered or unordered list
    List {
        /// Starting number for ordered lists, None for unordered lists
        start: Option<u64>,
        /// List items
        items: Vec<ListItem>,
    },

    /// A pipe table
    Table {
        /// Column alignment specifications
        alignments: Vec<Alignment>,
        /// Header row cells
        headers: Vec<Vec<Inline>>,
        /// Data rows; the `---|---` separator row never appears here
        rows: Vec<Vec<Vec<Inline>>>,
    },

    /// A horizontal rule (thematic break)
    Rule,

    /// Raw HTML block, passed through as-is
    Html(String),
}

/// A list item, which may contain multiple blocks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListItem {
    /// Task list state: Some(checked) for `- [ ]` / `- [x]` items
    pub task_list: Option<bool>,

    /// The content of the list item
    pub content: Vec<RenderedBlock>,
}

impl ListItem {
    /// Create a new empty list item
    pub fn new() -> Self {
        Self::default()
    }
}
