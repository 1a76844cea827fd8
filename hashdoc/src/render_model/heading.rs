//! Heading extraction and anchor slugs
//!
//! Headings are taken from the same token stream the renderer uses, so a
//! `#` line inside a code fence is never mistaken for a heading.

use super::blocks::RenderedBlock;
use super::error::RenderWarning;
use super::inline::Inline;
use super::parser::parse_blocks;
use itertools::Itertools;

/// Deepest heading level that appears in the table of contents
pub const MAX_TOC_LEVEL: usize = 4;

/// One entry of a page's table of contents
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeadingEntry {
    /// Heading level, 1..=4
    pub level: usize,
    /// Plain heading text with formatting markers removed
    pub text: String,
    /// Anchor id
    pub id: String,
}

/// Generate an anchor slug from heading text
///
/// Lowercases the text and drops every character that is neither
/// alphanumeric nor whitespace, so `-` and `_` disappear as well. Runs of
/// whitespace between the remaining words become a single `-`, and no
/// hyphen is left at either end.
///
/// # Examples
///
/// ```
/// use hashdoc::render_model::slugify;
///
/// assert_eq!(slugify("Getting Started"), "getting-started");
/// assert_eq!(slugify("What's new in v2?"), "whats-new-in-v2");
/// assert_eq!(slugify("snake_case_name"), "snakecasename");
/// ```
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    let mut pending_hyphen = false;

    for c in text.chars() {
        if c.is_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.extend(c.to_lowercase());
        } else if c.is_whitespace() {
            pending_hyphen = true;
        }
    }

    slug
}

/// Extract the table of contents entries of a document
///
/// Only levels 1 through 4 are reported; deeper headings are ignored.
/// Headings inside callouts are included, headings nested in lists or
/// block quotes are not.
pub fn extract_headings(document: &str) -> Vec<HeadingEntry> {
    headings_from_blocks(&parse_blocks(document).blocks)
}

/// Collect heading entries from already parsed blocks
pub fn headings_from_blocks(blocks: &[RenderedBlock]) -> Vec<HeadingEntry> {
    let mut headings = Vec::new();
    collect_headings(blocks, &mut headings);
    headings
}

fn collect_headings(blocks: &[RenderedBlock], headings: &mut Vec<HeadingEntry>) {
    for block in blocks {
        match block {
            RenderedBlock::Heading { level, id, content } if *level <= MAX_TOC_LEVEL => {
                headings.push(HeadingEntry {
                    level: *level,
                    text: Inline::plain_text(content).trim().to_string(),
                    id: id.clone(),
                });
            }
            RenderedBlock::Callout { blocks, .. } => collect_headings(blocks, headings),
            _ => {}
        }
    }
}

/// Report anchor ids shared by more than one heading, in order of first use
pub fn duplicate_heading_ids(headings: &[HeadingEntry]) -> Vec<RenderWarning> {
    let counts = headings.iter().map(|h| h.id.as_str()).counts();

    headings
        .iter()
        .map(|h| h.id.as_str())
        .unique()
        .filter(|id| counts[id] > 1)
        .map(|id| RenderWarning::DuplicateHeadingId {
            id: id.to_string(),
            count: counts[id],
        })
        .collect()
}
