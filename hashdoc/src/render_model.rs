//! Render model for documentation pages
//!
//! A page goes through one synchronous pass: the raw markdown is split by
//! the fence-aware segment scanner, tokenized into blocks, headings are
//! collected for the table of contents and the blocks are written out as
//! HTML. Nothing is cached between passes.

use crate::fetch::FetchError;
use crate::html_renderer;

// Submodules
mod blocks;
mod error;
mod heading;
mod inline;
mod parser;
mod segment;
mod types;

// Re-export public types
pub use blocks::{ListItem, RenderedBlock};
pub use error::RenderWarning;
pub use heading::{
    duplicate_heading_ids, extract_headings, headings_from_blocks, slugify, HeadingEntry,
    MAX_TOC_LEVEL,
};
pub use inline::{Inline, InlineBuilder, InlineContainer};
pub use parser::{markdown_options, parse_blocks, LinkReferences, MarkdownParser, ParseOutput};
pub use segment::{split_segments, Segment, SegmentOutput};
pub use types::{Alignment, CalloutKind};

/// Options controlling how a page is rendered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Open absolute links in a new tab
    pub external_links_new_tab: bool,

    /// Deepest heading level listed in the table of contents (1..=4)
    pub toc_max_level: usize,

    /// Emit copy buttons on code blocks
    pub copy_buttons: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            external_links_new_tab: true,
            toc_max_level: MAX_TOC_LEVEL,
            copy_buttons: true,
        }
    }
}

/// Verbatim text of one code block, exposed for copy-to-clipboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeSnippet {
    /// Index matching the `code-{index}` element id
    pub index: usize,
    /// Language tag, if any
    pub language: Option<String>,
    /// Exact source text between the fences
    pub code: String,
}

/// Outcome of producing a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    /// The document was fetched and rendered
    Rendered,
    /// The document does not exist
    NotFound,
    /// The document could not be fetched
    Unavailable,
}

/// Why a page shows the fallback block instead of content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// The document does not exist
    NotFound,
    /// The document could not be fetched
    Unavailable,
}

impl Fallback {
    /// Classify a failed fetch
    pub fn for_error(err: &FetchError) -> Self {
        if err.is_not_found() {
            Fallback::NotFound
        } else {
            Fallback::Unavailable
        }
    }
}

impl From<Fallback> for PageStatus {
    fn from(fallback: Fallback) -> Self {
        match fallback {
            Fallback::NotFound => PageStatus::NotFound,
            Fallback::Unavailable => PageStatus::Unavailable,
        }
    }
}

/// A fully rendered documentation page
#[derive(Debug, Clone)]
pub struct RenderedPage {
    /// Whether this is real content or the fallback block
    pub status: PageStatus,

    /// Table of contents entries
    pub headings: Vec<HeadingEntry>,

    /// Parsed blocks in document order
    pub blocks: Vec<RenderedBlock>,

    /// Copy texts for every code block, by index
    pub code_blocks: Vec<CodeSnippet>,

    /// Non-fatal problems found in the document
    pub warnings: Vec<RenderWarning>,

    /// HTML fragment for the page body
    pub html: String,
}

impl RenderedPage {
    /// Whether the page shows the fallback message instead of content
    pub fn is_fallback(&self) -> bool {
        self.status != PageStatus::Rendered
    }

    /// Copy text for the code block with the given index
    pub fn copy_text(&self, index: usize) -> Option<&str> {
        self.code_blocks
            .iter()
            .find(|snippet| snippet.index == index)
            .map(|snippet| snippet.code.as_str())
    }

    /// Compose a page from already parsed blocks
    ///
    /// `warnings` holds problems found while parsing; duplicate heading ids
    /// are added here.
    pub fn from_blocks(
        blocks: Vec<RenderedBlock>,
        mut warnings: Vec<RenderWarning>,
        options: &RenderOptions,
    ) -> Self {
        let headings = headings_from_blocks(&blocks);
        warnings.extend(duplicate_heading_ids(&headings));

        let mut code_blocks = Vec::new();
        collect_code_blocks(&blocks, &mut code_blocks);

        for warning in &warnings {
            log::debug!("Render warning: {}", warning);
        }

        let html = html_renderer::render_blocks(&blocks, options);

        Self {
            status: PageStatus::Rendered,
            headings,
            blocks,
            code_blocks,
            warnings,
            html,
        }
    }

    /// The fallback page shown instead of content
    pub fn fallback(fallback: Fallback) -> Self {
        Self {
            status: fallback.into(),
            headings: Vec::new(),
            blocks: Vec::new(),
            code_blocks: Vec::new(),
            warnings: Vec::new(),
            html: html_renderer::render_fallback(fallback),
        }
    }
}

/// Render a markdown document into a page
///
/// # Parameters
/// * `document` - Raw markdown text of one documentation page
/// * `options` - Rendering options
///
/// # Returns
/// * `RenderedPage` - Always succeeds; malformed input is reported in `warnings`
pub fn render_document(document: &str, options: &RenderOptions) -> RenderedPage {
    let ParseOutput { blocks, warnings } = parse_blocks(document);
    RenderedPage::from_blocks(blocks, warnings, options)
}

/// Render the result of fetching a document
///
/// A failed fetch produces the fallback page instead of content. No retry
/// is attempted here.
pub fn render_fetched(
    result: Result<String, FetchError>,
    options: &RenderOptions,
) -> RenderedPage {
    match result {
        Ok(document) => render_document(&document, options),
        Err(err) => {
            log::warn!("Showing fallback page: {}", err);
            RenderedPage::fallback(Fallback::for_error(&err))
        }
    }
}

fn collect_code_blocks(blocks: &[RenderedBlock], out: &mut Vec<CodeSnippet>) {
    for block in blocks {
        match block {
            RenderedBlock::CodeBlock {
                index,
                language,
                code,
            } => out.push(CodeSnippet {
                index: *index,
                language: language.clone(),
                code: code.clone(),
            }),
            RenderedBlock::BlockQuote(inner) | RenderedBlock::Callout { blocks: inner, .. } => {
                collect_code_blocks(inner, out)
            }
            RenderedBlock::List { items, .. } => {
                for item in items {
                    collect_code_blocks(&item.content, out);
                }
            }
            _ => {}
        }
    }
}
