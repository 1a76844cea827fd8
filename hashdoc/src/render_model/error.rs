//! Diagnostics produced while rendering a document
//!
//! Rendering never fails. Malformed input degrades into imperfect markup and
//! records one of these warnings so callers (and `hashdoc check`) can see it.

use thiserror::Error;

/// Non-fatal problems found in a document
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderWarning {
    /// A code fence was opened but never closed; the rest of the document is code
    #[error("line {line}: code fence is never closed, remainder of document rendered as code")]
    UnterminatedCodeFence {
        /// 1-based line number of the opening fence
        line: usize,
    },

    /// A `:::kind` callout was opened but never closed
    #[error("line {line}: callout is never closed, it extends to the end of the document")]
    UnterminatedCallout {
        /// 1-based line number of the opening marker
        line: usize,
    },

    /// A `:::` marker names a kind that is not recognised
    #[error("line {line}: unknown callout kind '{kind}', rendered as plain text")]
    UnknownCalloutKind {
        /// 1-based line number of the marker
        line: usize,
        /// Kind name as written
        kind: String,
    },

    /// Two headings slugify to the same anchor id
    #[error("duplicate heading id '{id}' ({count} headings share it)")]
    DuplicateHeadingId {
        /// The shared anchor id
        id: String,
        /// Number of headings with this id
        count: usize,
    },
}
