//! Fence-aware line scanner
//!
//! Splits a document into plain markdown segments and callout segments
//! before the token parser sees it. pulldown-cmark has no container syntax,
//! so `:::kind` blocks and glyph-prefixed callout lines are carved out here.
//!
//! The scanner tracks code fence state (outside / inside) so that markers
//! appearing inside a fenced code block are left alone.

use super::error::RenderWarning;
use super::types::CalloutKind;

/// Glyphs that turn a line into a single-line callout, longest first
const CALLOUT_GLYPHS: &[(&str, CalloutKind)] = &[
    ("\u{26A0}\u{FE0F}", CalloutKind::Warning),
    ("\u{26A0}", CalloutKind::Warning),
    ("\u{2139}\u{FE0F}", CalloutKind::Info),
    ("\u{2139}", CalloutKind::Info),
    ("\u{1F6A8}", CalloutKind::Danger),
    ("\u{26D4}", CalloutKind::Danger),
    ("\u{1F4A1}", CalloutKind::Tip),
    ("\u{1F4DD}", CalloutKind::Note),
];

/// A contiguous piece of the document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Ordinary markdown, handed to the token parser as-is
    Markdown(String),

    /// A callout container and its body
    Callout {
        /// Callout style
        kind: CalloutKind,
        /// Title written after the kind (`:::warning Heads up`)
        title: Option<String>,
        /// Nested segments of the callout body
        body: Vec<Segment>,
    },
}

/// Result of scanning a document
#[derive(Debug, Default)]
pub struct SegmentOutput {
    /// Segments in document order
    pub segments: Vec<Segment>,
    /// Problems found while scanning
    pub warnings: Vec<RenderWarning>,
}

/// Code fence currently open
struct OpenFence {
    marker: char,
    length: usize,
    line: usize,
}

/// Callout container currently open
struct OpenCallout {
    kind: CalloutKind,
    title: Option<String>,
    line: usize,
    segments: Vec<Segment>,
}

/// Scanner state
#[derive(Default)]
struct Scanner {
    root: Vec<Segment>,
    callouts: Vec<OpenCallout>,
    buffer: String,
    fence: Option<OpenFence>,
    warnings: Vec<RenderWarning>,
}

/// Split a document into markdown and callout segments
pub fn split_segments(document: &str) -> SegmentOutput {
    let mut scanner = Scanner::default();

    for (index, raw_line) in document.split_inclusive('\n').enumerate() {
        scanner.process_line(index + 1, raw_line);
    }

    scanner.finish()
}

impl Scanner {
    fn process_line(&mut self, line_number: usize, raw_line: &str) {
        let line = raw_line.trim_end_matches(['\n', '\r']);

        if let Some(fence) = &self.fence {
            if closes_fence(line, fence.marker, fence.length) {
                self.fence = None;
            }
            self.buffer.push_str(raw_line);
            return;
        }

        if let Some((marker, length)) = opens_fence(line) {
            self.fence = Some(OpenFence {
                marker,
                length,
                line: line_number,
            });
            self.buffer.push_str(raw_line);
            return;
        }

        let container = line
            .trim()
            .strip_prefix(":::")
            .filter(|_| !is_indented_code(line));
        if let Some(rest) = container {
            if self.handle_container_marker(line_number, rest) {
                return;
            }
        } else if let Some((kind, text)) = glyph_callout(line) {
            self.flush();
            let mut body = text.to_string();
            body.push('\n');
            self.current().push(Segment::Callout {
                kind,
                title: None,
                body: vec![Segment::Markdown(body)],
            });
            return;
        }

        self.buffer.push_str(raw_line);
    }

    /// Handle a `:::` line. Returns false when the line should be kept as text.
    fn handle_container_marker(&mut self, line_number: usize, rest: &str) -> bool {
        let rest = rest.trim_start_matches(':').trim();

        if rest.is_empty() {
            if self.callouts.is_empty() {
                return false;
            }
            self.flush();
            self.close_callout();
            return true;
        }

        let (name, title) = match rest.split_once(char::is_whitespace) {
            Some((name, title)) => (name, Some(title.trim().to_string())),
            None => (rest, None),
        };

        let Some(kind) = CalloutKind::from_name(name) else {
            self.warnings.push(RenderWarning::UnknownCalloutKind {
                line: line_number,
                kind: name.to_string(),
            });
            return false;
        };

        self.flush();
        self.callouts.push(OpenCallout {
            kind,
            title: title.filter(|t| !t.is_empty()),
            line: line_number,
            segments: Vec::new(),
        });
        true
    }

    /// Segment list of the innermost open callout, or the root
    fn current(&mut self) -> &mut Vec<Segment> {
        match self.callouts.last_mut() {
            Some(callout) => &mut callout.segments,
            None => &mut self.root,
        }
    }

    /// Move buffered markdown into the current segment list
    fn flush(&mut self) {
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            return;
        }
        let text = std::mem::take(&mut self.buffer);
        self.current().push(Segment::Markdown(text));
    }

    fn close_callout(&mut self) {
        let Some(callout) = self.callouts.pop() else {
            return;
        };
        self.current().push(Segment::Callout {
            kind: callout.kind,
            title: callout.title,
            body: callout.segments,
        });
    }

    fn finish(mut self) -> SegmentOutput {
        if let Some(fence) = self.fence.take() {
            self.warnings
                .push(RenderWarning::UnterminatedCodeFence { line: fence.line });
        }

        self.flush();
        while let Some(line) = self.callouts.last().map(|c| c.line) {
            self.warnings
                .push(RenderWarning::UnterminatedCallout { line });
            self.close_callout();
        }

        SegmentOutput {
            segments: self.root,
            warnings: self.warnings,
        }
    }
}

/// Columns of leading whitespace, with tabs advancing to the next multiple of 4
fn indent_columns(line: &str) -> usize {
    let mut columns = 0;
    for ch in line.chars() {
        match ch {
            ' ' => columns += 1,
            '\t' => columns += 4 - columns % 4,
            _ => break,
        }
    }
    columns
}

/// Four or more columns of indentation start an indented code line
fn is_indented_code(line: &str) -> bool {
    indent_columns(line) >= 4
}

/// Detect an opening code fence, returning the fence character and run length
fn opens_fence(line: &str) -> Option<(char, usize)> {
    if is_indented_code(line) {
        return None;
    }

    let trimmed = line.trim_start();
    let marker = trimmed.chars().next()?;
    if marker != '`' && marker != '~' {
        return None;
    }

    let length = trimmed.chars().take_while(|&c| c == marker).count();
    if length < 3 {
        return None;
    }

    // Backtick fences may not carry backticks in their info string
    if marker == '`' && trimmed[length..].contains('`') {
        return None;
    }

    Some((marker, length))
}

/// Whether a line closes a fence opened with `marker` repeated `length` times
fn closes_fence(line: &str, marker: char, length: usize) -> bool {
    if is_indented_code(line) {
        return false;
    }

    let trimmed = line.trim();
    trimmed.len() >= length && trimmed.chars().all(|c| c == marker)
}

/// Detect a glyph-prefixed callout line
fn glyph_callout(line: &str) -> Option<(CalloutKind, &str)> {
    if is_indented_code(line) {
        return None;
    }

    let trimmed = line.trim_start();
    CALLOUT_GLYPHS.iter().find_map(|(glyph, kind)| {
        let rest = trimmed.strip_prefix(glyph)?.trim();
        (!rest.is_empty()).then_some((*kind, rest))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn markdown(text: &str) -> Segment {
        Segment::Markdown(text.to_string())
    }

    #[test]
    fn test_plain_document_is_one_segment() {
        let output = split_segments("# Title\n\nBody text.\n");

        assert_eq!(output.segments, vec![markdown("# Title\n\nBody text.\n")]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_container_callout() {
        // Arrange
        let doc = "Intro\n\n:::warning\nRotate your API key.\n:::\n\nOutro\n";

        // Act
        let output = split_segments(doc);

        // Assert
        assert_eq!(
            output.segments,
            vec![
                markdown("Intro\n\n"),
                Segment::Callout {
                    kind: CalloutKind::Warning,
                    title: None,
                    body: vec![markdown("Rotate your API key.\n")],
                },
                markdown("\nOutro\n"),
            ]
        );
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_container_callout_with_title() {
        let output = split_segments(":::info Rate limits\n60 requests per minute.\n:::\n");

        match &output.segments[0] {
            Segment::Callout { kind, title, .. } => {
                assert_eq!(*kind, CalloutKind::Info);
                assert_eq!(title.as_deref(), Some("Rate limits"));
            }
            other => panic!("Expected callout, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_callouts() {
        let doc = ":::danger\nOuter\n:::tip\nInner\n:::\n:::\n";

        let output = split_segments(doc);

        assert_eq!(
            output.segments,
            vec![Segment::Callout {
                kind: CalloutKind::Danger,
                title: None,
                body: vec![
                    markdown("Outer\n"),
                    Segment::Callout {
                        kind: CalloutKind::Tip,
                        title: None,
                        body: vec![markdown("Inner\n")],
                    },
                ],
            }]
        );
    }

    #[test]
    fn test_markers_inside_code_fence_are_ignored() {
        let doc = "```text\n:::warning\n\u{26A0}\u{FE0F} not a callout\n```\n";

        let output = split_segments(doc);

        assert_eq!(output.segments, vec![markdown(doc)]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_tilde_fence_not_closed_by_backticks() {
        let doc = "~~~\n```\n:::info\n~~~\n";

        let output = split_segments(doc);

        assert_eq!(output.segments, vec![markdown(doc)]);
    }

    #[test]
    fn test_unterminated_code_fence_swallows_rest() {
        // Arrange
        let doc = "Text\n\n```python\nprint(1)\n:::warning\n";

        // Act
        let output = split_segments(doc);

        // Assert: everything stays in one markdown segment and a warning is recorded
        assert_eq!(output.segments, vec![markdown(doc)]);
        assert_eq!(
            output.warnings,
            vec![RenderWarning::UnterminatedCodeFence { line: 3 }]
        );
    }

    #[test]
    fn test_unterminated_callout_runs_to_end() {
        let output = split_segments("Before\n:::danger\nNever closed\n");

        assert_eq!(
            output.segments,
            vec![
                markdown("Before\n"),
                Segment::Callout {
                    kind: CalloutKind::Danger,
                    title: None,
                    body: vec![markdown("Never closed\n")],
                },
            ]
        );
        assert_eq!(
            output.warnings,
            vec![RenderWarning::UnterminatedCallout { line: 2 }]
        );
    }

    #[test]
    fn test_unknown_kind_is_kept_as_text() {
        let output = split_segments(":::details\nBody\n:::\n");

        assert_eq!(output.segments, vec![markdown(":::details\nBody\n:::\n")]);
        assert_eq!(
            output.warnings,
            vec![RenderWarning::UnknownCalloutKind {
                line: 1,
                kind: "details".to_string(),
            }]
        );
    }

    #[test]
    fn test_glyph_line_callout() {
        let output = split_segments("\u{26A0}\u{FE0F} Keys are shown once.\nNext line\n");

        assert_eq!(
            output.segments,
            vec![
                Segment::Callout {
                    kind: CalloutKind::Warning,
                    title: None,
                    body: vec![markdown("Keys are shown once.\n")],
                },
                markdown("Next line\n"),
            ]
        );
    }

    #[test]
    fn test_indented_glyph_is_code() {
        let doc = "    \u{2139}\u{FE0F} indented\n";

        let output = split_segments(doc);

        assert_eq!(output.segments, vec![markdown(doc)]);
    }

    #[test]
    fn test_fence_detection() {
        assert_eq!(opens_fence("```rust"), Some(('`', 3)));
        assert_eq!(opens_fence("~~~~"), Some(('~', 4)));
        assert_eq!(opens_fence("``not a fence"), None);
        assert_eq!(opens_fence("``` a`b"), None);
        assert!(closes_fence("````", '`', 3));
        assert!(!closes_fence("``", '`', 3));
        assert!(!closes_fence("``` python", '`', 3));
    }

    #[test]
    fn test_fence_indented_four_columns_is_not_a_fence() {
        assert_eq!(opens_fence("   ```"), Some(('`', 3)));
        assert_eq!(opens_fence("    ```"), None);
        assert_eq!(opens_fence("\t```"), None);
        assert_eq!(opens_fence("  \t~~~"), None);
        assert!(closes_fence("   ```", '`', 3));
        assert!(!closes_fence("    ```", '`', 3));
        assert!(!closes_fence("\t```", '`', 3));
    }

    #[test]
    fn test_indented_fence_line_does_not_hide_callout() {
        // Arrange: the backticks are indented code, not an opening fence
        let doc = "Example:\n\n    ```\n\n:::warning\nCareful\n:::\n";

        // Act
        let output = split_segments(doc);

        // Assert
        assert!(output.warnings.is_empty());
        assert_eq!(
            output.segments,
            vec![
                markdown("Example:\n\n    ```\n\n"),
                Segment::Callout {
                    kind: CalloutKind::Warning,
                    title: None,
                    body: vec![markdown("Careful\n")],
                },
            ]
        );
    }

    #[test]
    fn test_indented_closing_fence_keeps_fence_open() {
        let doc = "```\ncode\n    ```\n:::info\n```\n";

        let output = split_segments(doc);

        assert_eq!(output.segments, vec![markdown(doc)]);
        assert!(output.warnings.is_empty());
    }

    #[test]
    fn test_indented_container_marker_is_text() {
        let doc = "    :::warning\n";

        let output = split_segments(doc);

        assert_eq!(output.segments, vec![markdown(doc)]);
        assert!(output.warnings.is_empty());
    }
}
