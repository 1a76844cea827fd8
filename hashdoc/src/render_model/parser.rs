//! Markdown event stream parser
//!
//! Converts pulldown-cmark's event stream into structured blocks with inline
//! content trees.

use super::blocks::{ListItem, RenderedBlock};
use super::error::RenderWarning;
use super::heading::slugify;
use super::inline::{Inline, InlineBuilder, InlineContainer};
use super::segment::{split_segments, Segment, SegmentOutput};
use super::types::{Alignment, CalloutKind};
use pulldown_cmark::{BrokenLink, CodeBlockKind, CowStr, Event, Options, Tag, TagEnd};
use std::collections::HashMap;

/// Blocks and diagnostics for one document
#[derive(Debug, Default)]
pub struct ParseOutput {
    /// Top-level blocks in document order
    pub blocks: Vec<RenderedBlock>,
    /// Non-fatal problems found while parsing
    pub warnings: Vec<RenderWarning>,
}

/// Parse a whole document, including callout containers
///
/// The document is first split by the fence-aware segment scanner; each
/// markdown segment then goes through the token parser. Code block indices
/// keep counting across segments so every code block on the page is unique.
pub fn parse_blocks(document: &str) -> ParseOutput {
    let SegmentOutput { segments, warnings } = split_segments(document);
    let references = LinkReferences::collect(document);

    let mut code_index = 0;
    let blocks = parse_segments(&segments, &references, &mut code_index);

    log::debug!(
        "Parsed {} top-level blocks, {} code blocks, {} warnings",
        blocks.len(),
        code_index,
        warnings.len()
    );

    ParseOutput { blocks, warnings }
}

fn parse_segments(
    segments: &[Segment],
    references: &LinkReferences,
    code_index: &mut usize,
) -> Vec<RenderedBlock> {
    let mut blocks = Vec::new();

    for segment in segments {
        match segment {
            Segment::Markdown(text) => {
                let (parsed, next_index) =
                    MarkdownParser::starting_at(*code_index).run(text, references);
                *code_index = next_index;
                blocks.extend(parsed);
            }
            Segment::Callout { kind, title, body } => {
                blocks.push(RenderedBlock::Callout {
                    kind: *kind,
                    title: title.clone().unwrap_or_else(|| kind.title().to_string()),
                    blocks: parse_segments(body, references, code_index),
                });
            }
        }
    }

    blocks
}

/// Link reference definitions of a whole document
///
/// Callouts split a page into separately parsed segments, so a definition at
/// the bottom of the page must still resolve inside an earlier segment.
#[derive(Debug, Default)]
pub struct LinkReferences {
    /// Normalized label to (destination, title)
    definitions: HashMap<String, (String, String)>,
}

impl LinkReferences {
    /// Collect every reference definition in `document`
    pub fn collect(document: &str) -> Self {
        let parser = pulldown_cmark::Parser::new_ext(document, markdown_options());
        let mut definitions = HashMap::new();
        for (label, def) in parser.reference_definitions().iter() {
            // The first definition of a label wins
            definitions
                .entry(normalize_label(label))
                .or_insert_with(|| {
                    (
                        def.dest.to_string(),
                        def.title.as_deref().unwrap_or_default().to_string(),
                    )
                });
        }
        Self { definitions }
    }

    /// Look up a reference label, ignoring case and inner whitespace
    pub fn resolve(&self, label: &str) -> Option<(&str, &str)> {
        self.definitions
            .get(&normalize_label(label))
            .map(|(dest, title)| (dest.as_str(), title.as_str()))
    }
}

fn normalize_label(label: &str) -> String {
    label
        .trim_start_matches('[')
        .trim_end_matches(']')
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Markdown extensions enabled for documentation pages
pub fn markdown_options() -> Options {
    Options::ENABLE_TABLES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_GFM
        | Options::ENABLE_HEADING_ATTRIBUTES
}

/// Parser state for converting markdown events to blocks
pub struct MarkdownParser {
    /// Inline content being built for the current paragraph/heading/cell
    inlines: InlineBuilder,

    /// Stack of open block containers (quotes, lists, list items)
    containers: Vec<BlockContext>,

    /// Stack of table contexts
    table_stack: Vec<TableContext>,

    /// Heading being built: (level, explicit id)
    heading: Option<(usize, Option<String>)>,

    /// Code block being built
    code: Option<CodeContext>,

    /// Raw HTML block being built
    html: Option<String>,

    /// Index the next code block will receive
    next_code_index: usize,

    /// Completed top-level blocks
    blocks: Vec<RenderedBlock>,
}

/// An open block container
enum BlockContext {
    /// Block quote, or a GitHub alert when `callout` is set
    BlockQuote {
        callout: Option<CalloutKind>,
        blocks: Vec<RenderedBlock>,
    },
    /// List collecting its items
    List(ListContext),
    /// List item collecting its blocks
    Item(ListItem),
}

/// Context for building a list
struct ListContext {
    /// Starting number for ordered lists
    start: Option<u64>,
    /// Completed list items
    items: Vec<ListItem>,
}

/// Context for building a table
struct TableContext {
    /// Column alignments
    alignments: Vec<Alignment>,
    /// Header row cells
    headers: Vec<Vec<Inline>>,
    /// Data rows
    rows: Vec<Vec<Vec<Inline>>>,
    /// Current row being built
    current_row: Vec<Vec<Inline>>,
}

/// Context for building a code block
struct CodeContext {
    language: Option<String>,
    text: String,
    /// Source lines end in CRLF
    crlf: bool,
}

impl MarkdownParser {
    /// Create a new parser
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a parser whose first code block gets `code_index`
    pub fn starting_at(code_index: usize) -> Self {
        Self {
            inlines: InlineBuilder::new(),
            containers: Vec::new(),
            table_stack: Vec::new(),
            heading: None,
            code: None,
            html: None,
            next_code_index: code_index,
            blocks: Vec::new(),
        }
    }

    /// Parse markdown content into blocks
    ///
    /// No callout container handling happens here; use [`parse_blocks`] for
    /// full documents.
    pub fn parse(content: &str) -> Vec<RenderedBlock> {
        Self::new().run(content, &LinkReferences::default()).0
    }

    /// Parse content, returning the blocks and the next free code index
    ///
    /// References missing from `content` itself are looked up in `references`.
    fn run(mut self, content: &str, references: &LinkReferences) -> (Vec<RenderedBlock>, usize) {
        let parser = pulldown_cmark::Parser::new_with_broken_link_callback(
            content,
            markdown_options(),
            Some(|link: BrokenLink<'_>| {
                references.resolve(&link.reference).map(|(dest, title)| {
                    (
                        CowStr::from(dest.to_string()),
                        CowStr::from(title.to_string()),
                    )
                })
            }),
        );

        for (event, range) in parser.into_offset_iter() {
            let opens_code = matches!(event, Event::Start(Tag::CodeBlock(_)));
            self.process_event(event);
            if opens_code {
                // pulldown-cmark hands code text over with LF line endings
                if let Some(code) = self.code.as_mut() {
                    code.crlf = content.get(range).is_some_and(|raw| raw.contains("\r\n"));
                }
            }
        }

        self.finalize();

        (self.blocks, self.next_code_index)
    }

    /// Process a single markdown event
    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.handle_start_tag(tag),
            Event::End(tag_end) => self.handle_end_tag(tag_end),
            Event::Text(text) => self.handle_text(&text),
            Event::Code(code) => self.inlines.push(Inline::Code(code.to_string())),
            Event::Html(html) => self.handle_html(&html),
            Event::InlineHtml(html) => self.inlines.push(Inline::Html(html.to_string())),
            Event::SoftBreak => self.inlines.push(Inline::SoftBreak),
            Event::HardBreak => self.inlines.push(Inline::HardBreak),
            Event::Rule => {
                self.flush_inlines();
                self.add_block(RenderedBlock::Rule);
            }
            Event::TaskListMarker(checked) => self.handle_task_marker(checked),
            // Footnotes and math are not enabled in `markdown_options`
            _ => {}
        }
    }

    /// Handle opening tags
    fn handle_start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.flush_inlines(),
            Tag::Heading { level, id, .. } => {
                self.flush_inlines();
                self.heading = Some((level as usize, id.map(|id| id.to_string())));
            }
            Tag::BlockQuote(kind) => {
                self.flush_inlines();
                self.containers.push(BlockContext::BlockQuote {
                    callout: kind.map(CalloutKind::from_blockquote_kind),
                    blocks: Vec::new(),
                });
            }
            Tag::CodeBlock(kind) => {
                self.flush_inlines();
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| lang.to_string()),
                    CodeBlockKind::Indented => None,
                };
                self.code = Some(CodeContext {
                    language,
                    text: String::new(),
                    crlf: false,
                });
            }
            Tag::HtmlBlock => {
                self.flush_inlines();
                self.html = Some(String::new());
            }
            Tag::List(start) => {
                self.flush_inlines();
                self.containers.push(BlockContext::List(ListContext {
                    start,
                    items: Vec::new(),
                }));
            }
            Tag::Item => {
                self.flush_inlines();
                self.containers.push(BlockContext::Item(ListItem::new()));
            }
            Tag::Table(alignments) => {
                self.flush_inlines();
                self.table_stack.push(TableContext {
                    alignments: alignments.into_iter().map(Alignment::from).collect(),
                    headers: Vec::new(),
                    rows: Vec::new(),
                    current_row: Vec::new(),
                });
            }
            Tag::TableHead | Tag::TableRow | Tag::TableCell => {}
            Tag::Emphasis => self.inlines.open(InlineContainer::Emphasis),
            Tag::Strong => self.inlines.open(InlineContainer::Strong),
            Tag::Strikethrough => self.inlines.open(InlineContainer::Strikethrough),
            Tag::Link {
                dest_url, title, ..
            } => self.inlines.open(InlineContainer::Link {
                url: dest_url.to_string(),
                title: non_empty(&title),
            }),
            Tag::Image {
                dest_url, title, ..
            } => self.inlines.open(InlineContainer::Image {
                url: dest_url.to_string(),
                title: non_empty(&title),
            }),
            _ => {}
        }
    }

    /// Handle closing tags
    fn handle_end_tag(&mut self, tag_end: TagEnd) {
        match tag_end {
            TagEnd::Paragraph => self.flush_inlines(),
            TagEnd::Heading(_) => self.finish_heading(),
            TagEnd::BlockQuote(_) => self.finish_blockquote(),
            TagEnd::CodeBlock => self.finish_code_block(),
            TagEnd::HtmlBlock => {
                if let Some(html) = self.html.take() {
                    self.add_block(RenderedBlock::Html(html));
                }
            }
            TagEnd::List(_) => self.finish_list(),
            TagEnd::Item => self.finish_list_item(),
            TagEnd::Table => self.finish_table(),
            TagEnd::TableHead => {
                if let Some(table_ctx) = self.table_stack.last_mut() {
                    table_ctx.headers = std::mem::take(&mut table_ctx.current_row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table_ctx) = self.table_stack.last_mut() {
                    let row = std::mem::take(&mut table_ctx.current_row);
                    table_ctx.rows.push(row);
                }
            }
            TagEnd::TableCell => self.finish_table_cell(),
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image => self.inlines.close(),
            _ => {}
        }
    }

    /// Handle text content
    fn handle_text(&mut self, text: &str) {
        if let Some(code) = self.code.as_mut() {
            code.text.push_str(text);
            return;
        }

        if text.is_empty() {
            return;
        }

        self.inlines.push(Inline::Text(text.to_string()));
    }

    /// Handle an HTML event (block-level HTML arrives line by line)
    fn handle_html(&mut self, html: &str) {
        match self.html.as_mut() {
            Some(buffer) => buffer.push_str(html),
            None => self.add_block(RenderedBlock::Html(html.to_string())),
        }
    }

    /// Handle task list marker
    fn handle_task_marker(&mut self, checked: bool) {
        if let Some(BlockContext::Item(item)) = self.containers.last_mut() {
            item.task_list = Some(checked);
        }
    }

    /// Finish a heading
    fn finish_heading(&mut self) {
        let content = self.inlines.finish();
        let Some((level, explicit_id)) = self.heading.take() else {
            return;
        };

        let id = explicit_id.unwrap_or_else(|| slugify(Inline::plain_text(&content).trim()));
        self.add_block(RenderedBlock::Heading { level, id, content });
    }

    /// Finish a code block
    fn finish_code_block(&mut self) {
        let Some(CodeContext {
            language,
            mut text,
            crlf,
        }) = self.code.take()
        else {
            return;
        };

        if crlf {
            text = restore_crlf(&text);
        }

        // The copy text excludes the final line terminator before the closing fence
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }

        let index = self.next_code_index;
        self.next_code_index += 1;
        self.add_block(RenderedBlock::CodeBlock {
            index,
            language: language.filter(|lang| !lang.is_empty()),
            code: text,
        });
    }

    /// Finish a blockquote
    fn finish_blockquote(&mut self) {
        self.flush_inlines();

        let Some(BlockContext::BlockQuote { callout, blocks }) = self.containers.pop() else {
            return;
        };

        let block = match callout {
            Some(kind) => RenderedBlock::Callout {
                kind,
                title: kind.title().to_string(),
                blocks,
            },
            None => RenderedBlock::BlockQuote(blocks),
        };
        self.add_block(block);
    }

    /// Finish a list
    fn finish_list(&mut self) {
        self.flush_inlines();

        let Some(BlockContext::List(list_ctx)) = self.containers.pop() else {
            return;
        };

        self.add_block(RenderedBlock::List {
            start: list_ctx.start,
            items: list_ctx.items,
        });
    }

    /// Finish a list item
    fn finish_list_item(&mut self) {
        // Tight list items carry their text without a paragraph
        self.flush_inlines();

        let Some(BlockContext::Item(item)) = self.containers.pop() else {
            return;
        };

        if let Some(BlockContext::List(list_ctx)) = self.containers.last_mut() {
            list_ctx.items.push(item);
        }
    }

    /// Finish a table
    fn finish_table(&mut self) {
        let Some(table_ctx) = self.table_stack.pop() else {
            return;
        };

        self.add_block(RenderedBlock::Table {
            alignments: table_ctx.alignments,
            headers: table_ctx.headers,
            rows: table_ctx.rows,
        });
    }

    /// Finish a table cell
    fn finish_table_cell(&mut self) {
        let cell = self.inlines.finish();
        if let Some(table_ctx) = self.table_stack.last_mut() {
            table_ctx.current_row.push(cell);
        }
    }

    /// Turn pending inline content into a paragraph
    fn flush_inlines(&mut self) {
        if self.inlines.is_empty() {
            return;
        }

        let content = self.inlines.finish();
        if !content.is_empty() {
            self.add_block(RenderedBlock::Paragraph(content));
        }
    }

    /// Add a block to the innermost open container
    fn add_block(&mut self, block: RenderedBlock) {
        match self.containers.last_mut() {
            Some(BlockContext::BlockQuote { blocks, .. }) => blocks.push(block),
            Some(BlockContext::Item(item)) => item.content.push(block),
            // Lists only hold items; anything else belongs to the parent
            Some(BlockContext::List(_)) | None => self.blocks.push(block),
        }
    }

    /// Finalize parsing
    fn finalize(&mut self) {
        self.flush_inlines();

        // pulldown-cmark balances its tags, this only guards truncated input
        while let Some(context) = self.containers.last() {
            match context {
                BlockContext::BlockQuote { .. } => self.finish_blockquote(),
                BlockContext::List(_) => self.finish_list(),
                BlockContext::Item(_) => self.finish_list_item(),
            }
        }
    }
}

impl Default for MarkdownParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Turn every bare `\n` back into `\r\n`
fn restore_crlf(text: &str) -> String {
    let mut restored = String::with_capacity(text.len() + text.len() / 16);
    let mut previous = None;
    for ch in text.chars() {
        if ch == '\n' && previous != Some('\r') {
            restored.push('\r');
        }
        restored.push(ch);
        previous = Some(ch);
    }
    restored
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}
