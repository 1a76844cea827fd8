//! HTML renderer for documentation pages
//!
//! This module turns parsed blocks into HTML with:
//! - Anchored headings matching the table of contents
//! - Code blocks with a language label and a copy button
//! - Styled callouts for warnings, tips and notes
//! - A fallback block when the page could not be fetched

use crate::render_model::{
    Alignment, Fallback, HeadingEntry, Inline, ListItem, RenderOptions, RenderedBlock,
    RenderedPage,
};
use std::fs;
use std::io::Write;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing an HTML page
#[derive(Error, Debug)]
pub enum HtmlExportError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Render blocks into an HTML fragment
///
/// # Parameters
/// * `blocks` - Parsed blocks in document order
/// * `options` - Rendering options
///
/// # Returns
/// * `String` - HTML fragment for the page body
pub fn render_blocks(blocks: &[RenderedBlock], options: &RenderOptions) -> String {
    let mut output = String::new();
    for block in blocks {
        write_block(&mut output, block, options);
    }
    output
}

/// Render a nested table of contents navigation
///
/// Headings deeper than `max_level` are left out. Skipped levels are
/// nested without intermediate entries.
pub fn render_toc(headings: &[HeadingEntry], max_level: usize) -> String {
    let entries: Vec<&HeadingEntry> = headings.iter().filter(|h| h.level <= max_level).collect();
    let Some(base) = entries.iter().map(|h| h.level).min() else {
        return String::new();
    };

    let mut output = String::from("<nav class=\"toc\">\n<ul>\n");
    let mut depth = 0;
    let mut item_open = false;

    for entry in entries {
        let target = entry.level - base;

        if depth < target {
            // Nested lists live inside the currently open item
            while depth < target {
                if !item_open {
                    output.push_str("<li>");
                }
                output.push_str("\n<ul>\n");
                depth += 1;
                item_open = false;
            }
        } else {
            if item_open {
                output.push_str("</li>\n");
            }
            while depth > target {
                output.push_str("</ul>\n</li>\n");
                depth -= 1;
            }
        }

        output.push_str(&format!(
            "<li class=\"toc-level-{}\"><a href=\"#{}\">{}</a>",
            entry.level,
            escape_html(&entry.id),
            escape_html(&entry.text)
        ));
        item_open = true;
    }

    if item_open {
        output.push_str("</li>\n");
    }
    while depth > 0 {
        output.push_str("</ul>\n</li>\n");
        depth -= 1;
    }

    output.push_str("</ul>\n</nav>\n");
    output
}

/// Render the block shown instead of content when a page is unavailable
pub fn render_fallback(fallback: Fallback) -> String {
    match fallback {
        Fallback::NotFound => concat!(
            "<div class=\"doc-fallback doc-not-found\">\n",
            "<h2>Page not found</h2>\n",
            "<p>The requested documentation page was not found.</p>\n",
            "</div>\n"
        )
        .to_string(),
        Fallback::Unavailable => concat!(
            "<div class=\"doc-fallback doc-unavailable\">\n",
            "<h2>Content not available</h2>\n",
            "<p>This documentation page could not be loaded. Please try again later.</p>\n",
            "</div>\n"
        )
        .to_string(),
    }
}

/// Render a complete HTML document with navigation, styles and copy script
pub fn render_standalone_page(
    title: &str,
    page: &RenderedPage,
    options: &RenderOptions,
) -> String {
    let mut output = String::new();

    write_html_header(&mut output, title);

    output.push_str("<body>\n");
    output.push_str("<div class=\"layout\">\n");

    let toc = render_toc(&page.headings, options.toc_max_level);
    if !toc.is_empty() {
        output.push_str("<aside class=\"sidebar\">\n");
        output.push_str(&toc);
        output.push_str("</aside>\n");
    }

    output.push_str("<main class=\"content\">\n");
    output.push_str(&page.html);
    output.push_str("</main>\n");
    output.push_str("</div>\n");

    if options.copy_buttons && !page.code_blocks.is_empty() {
        output.push_str("<script>\n");
        output.push_str(COPY_SCRIPT);
        output.push_str("</script>\n");
    }

    output.push_str("</body>\n");
    output.push_str("</html>\n");
    output
}

/// Write a standalone HTML page to disk
///
/// # Parameters
/// * `output_path` - Path where the HTML file will be written
/// * `title` - Page title
/// * `page` - Rendered page
/// * `options` - Rendering options
///
/// # Returns
/// * `Ok(())` - Successfully written
/// * `Err(HtmlExportError)` - Error creating directories or writing the file
pub fn write_standalone_page(
    output_path: &Path,
    title: &str,
    page: &RenderedPage,
    options: &RenderOptions,
) -> Result<(), HtmlExportError> {
    let output = render_standalone_page(title, page, options);

    // Create parent directories if they don't exist
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = fs::File::create(output_path)?;
    file.write_all(output.as_bytes())?;

    Ok(())
}

/// Write HTML header with CSS styling
fn write_html_header(output: &mut String, title: &str) {
    output.push_str("<!DOCTYPE html>\n");
    output.push_str("<html lang=\"en\">\n");
    output.push_str("<head>\n");
    output.push_str("<meta charset=\"UTF-8\">\n");
    output.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    output.push_str(&format!("<title>{}</title>\n", escape_html(title)));
    output.push_str("<style>\n");
    output.push_str(CSS_STYLES);
    output.push_str("</style>\n");
    output.push_str("</head>\n");
}

/// Write a single block to the output
fn write_block(output: &mut String, block: &RenderedBlock, options: &RenderOptions) {
    match block {
        RenderedBlock::Heading { level, id, content } => {
            let h_level = (*level).min(6);
            if id.is_empty() {
                output.push_str(&format!(
                    "<h{}>{}</h{}>\n",
                    h_level,
                    inline_to_html(content, options),
                    h_level
                ));
            } else {
                let id = escape_html(id);
                output.push_str(&format!(
                    "<h{} id=\"{}\">{}<a class=\"heading-anchor\" href=\"#{}\" aria-hidden=\"true\">#</a></h{}>\n",
                    h_level,
                    id,
                    inline_to_html(content, options),
                    id,
                    h_level
                ));
            }
        }

        RenderedBlock::Paragraph(content) => {
            output.push_str(&format!("<p>{}</p>\n", inline_to_html(content, options)));
        }

        RenderedBlock::CodeBlock {
            index,
            language,
            code,
        } => write_code_block(output, *index, language.as_deref(), code, options),

        RenderedBlock::BlockQuote(blocks) => {
            output.push_str("<blockquote>\n");
            for inner_block in blocks {
                write_block(output, inner_block, options);
            }
            output.push_str("</blockquote>\n");
        }

        RenderedBlock::Callout {
            kind,
            title,
            blocks,
        } => {
            output.push_str(&format!(
                "<div class=\"callout {}\" role=\"note\">\n<p class=\"callout-title\">{}</p>\n",
                kind.css_class(),
                escape_html(title)
            ));
            for inner_block in blocks {
                write_block(output, inner_block, options);
            }
            output.push_str("</div>\n");
        }

        RenderedBlock::List { start, items } => write_list(output, *start, items, options),

        RenderedBlock::Table {
            alignments,
            headers,
            rows,
        } => write_table(output, alignments, headers, rows, options),

        RenderedBlock::Rule => {
            output.push_str("<hr>\n");
        }

        RenderedBlock::Html(html) => {
            output.push_str(html);
            if !html.ends_with('\n') {
                output.push('\n');
            }
        }
    }
}

/// Write a code block with its language label and copy button
fn write_code_block(
    output: &mut String,
    index: usize,
    language: Option<&str>,
    code: &str,
    options: &RenderOptions,
) {
    let element_id = format!("code-{}", index);

    match language {
        Some(lang) => output.push_str(&format!(
            "<div class=\"code-block\" data-language=\"{}\">\n",
            escape_html(lang)
        )),
        None => output.push_str("<div class=\"code-block\">\n"),
    }

    if language.is_some() || options.copy_buttons {
        output.push_str("<div class=\"code-header\">");
        if let Some(lang) = language {
            output.push_str(&format!(
                "<span class=\"code-language\">{}</span>",
                escape_html(lang)
            ));
        }
        if options.copy_buttons {
            output.push_str(&format!(
                "<button class=\"copy-button\" type=\"button\" data-copy-target=\"{}\">Copy</button>",
                element_id
            ));
        }
        output.push_str("</div>\n");
    }

    match language {
        Some(lang) => output.push_str(&format!(
            "<pre><code id=\"{}\" class=\"language-{}\">{}</code></pre>\n",
            element_id,
            escape_html(lang),
            escape_html(code)
        )),
        None => output.push_str(&format!(
            "<pre><code id=\"{}\">{}</code></pre>\n",
            element_id,
            escape_html(code)
        )),
    }

    output.push_str("</div>\n");
}

/// Convert inline content to an HTML string
pub fn inline_to_html(inlines: &[Inline], options: &RenderOptions) -> String {
    let mut result = String::new();
    for inline in inlines {
        write_inline(&mut result, inline, options);
    }
    result
}

fn write_inline(output: &mut String, inline: &Inline, options: &RenderOptions) {
    match inline {
        Inline::Text(text) => output.push_str(&escape_html(text)),
        Inline::Code(code) => output.push_str(&format!("<code>{}</code>", escape_html(code))),
        Inline::Strong(children) => {
            output.push_str(&format!("<strong>{}</strong>", inline_to_html(children, options)));
        }
        Inline::Emphasis(children) => {
            output.push_str(&format!("<em>{}</em>", inline_to_html(children, options)));
        }
        Inline::Strikethrough(children) => {
            output.push_str(&format!("<del>{}</del>", inline_to_html(children, options)));
        }
        Inline::Link {
            url,
            title,
            children,
        } => {
            output.push_str(&format!("<a href=\"{}\"", escape_html(url)));
            if let Some(link_title) = title {
                output.push_str(&format!(" title=\"{}\"", escape_html(link_title)));
            }
            if options.external_links_new_tab && is_external_link(url) {
                output.push_str(" target=\"_blank\" rel=\"noopener noreferrer\"");
            }
            output.push_str(&format!(">{}</a>", inline_to_html(children, options)));
        }
        Inline::Image { url, title, alt } => {
            output.push_str(&format!(
                "<img src=\"{}\" alt=\"{}\"",
                escape_html(url),
                escape_html(alt)
            ));
            if let Some(image_title) = title {
                output.push_str(&format!(" title=\"{}\"", escape_html(image_title)));
            }
            output.push('>');
        }
        Inline::SoftBreak => output.push('\n'),
        Inline::HardBreak => output.push_str("<br>\n"),
        Inline::Html(html) => output.push_str(html),
    }
}

/// Whether a link points outside the documentation site
pub fn is_external_link(url: &str) -> bool {
    let lower = url.trim_start().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("mailto:")
}

/// Write a list to output
fn write_list(
    output: &mut String,
    start: Option<u64>,
    items: &[ListItem],
    options: &RenderOptions,
) {
    match start {
        Some(1) => output.push_str("<ol>\n"),
        Some(start_num) => output.push_str(&format!("<ol start=\"{}\">\n", start_num)),
        None => {
            let is_task_list = items.iter().any(|item| item.task_list.is_some());
            if is_task_list {
                output.push_str("<ul class=\"task-list\">\n");
            } else {
                output.push_str("<ul>\n");
            }
        }
    }

    for item in items {
        write_list_item(output, item, options);
    }

    if start.is_some() {
        output.push_str("</ol>\n");
    } else {
        output.push_str("</ul>\n");
    }
}

/// Write a single list item to output
fn write_list_item(output: &mut String, item: &ListItem, options: &RenderOptions) {
    if let Some(checked) = item.task_list {
        let checkbox = if checked {
            "<input type=\"checkbox\" checked disabled>"
        } else {
            "<input type=\"checkbox\" disabled>"
        };
        output.push_str(&format!("<li class=\"task-list-item\">{} ", checkbox));
    } else {
        output.push_str("<li>");
    }

    // Write first paragraph inline with <li>
    let mut blocks = item.content.iter();
    if let Some(first_block) = blocks.next() {
        match first_block {
            RenderedBlock::Paragraph(content) => {
                output.push_str(&inline_to_html(content, options));
                if item.content.len() > 1 {
                    output.push('\n');
                }
            }
            other => {
                output.push('\n');
                write_block(output, other, options);
            }
        }
    }

    for block in blocks {
        write_block(output, block, options);
    }

    output.push_str("</li>\n");
}

/// Write a table as HTML
fn write_table(
    output: &mut String,
    alignments: &[Alignment],
    headers: &[Vec<Inline>],
    rows: &[Vec<Vec<Inline>>],
    options: &RenderOptions,
) {
    output.push_str("<table>\n<thead>\n<tr>\n");

    for (i, header) in headers.iter().enumerate() {
        let align = alignments.get(i).copied().unwrap_or(Alignment::None);
        output.push_str(&format!(
            "<th{}>{}</th>\n",
            get_align_attr(align),
            inline_to_html(header, options)
        ));
    }

    output.push_str("</tr>\n</thead>\n<tbody>\n");

    for row in rows {
        output.push_str("<tr>\n");
        for (i, cell) in row.iter().enumerate() {
            let align = alignments.get(i).copied().unwrap_or(Alignment::None);
            output.push_str(&format!(
                "<td{}>{}</td>\n",
                get_align_attr(align),
                inline_to_html(cell, options)
            ));
        }
        output.push_str("</tr>\n");
    }

    output.push_str("</tbody>\n</table>\n");
}

/// Get HTML align attribute for table cells
fn get_align_attr(align: Alignment) -> &'static str {
    match align {
        Alignment::Left => " style=\"text-align: left;\"",
        Alignment::Center => " style=\"text-align: center;\"",
        Alignment::Right => " style=\"text-align: right;\"",
        Alignment::None => "",
    }
}

/// Escape HTML special characters
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Copies the text of the code element named by a button's data attribute
const COPY_SCRIPT: &str = r#"
document.addEventListener('click', function (event) {
    var button = event.target.closest('.copy-button');
    if (!button) {
        return;
    }
    var code = document.getElementById(button.dataset.copyTarget);
    if (!code || !navigator.clipboard) {
        return;
    }
    navigator.clipboard.writeText(code.textContent).then(function () {
        button.textContent = 'Copied';
        setTimeout(function () {
            button.textContent = 'Copy';
        }, 2000);
    });
});
"#;

/// Documentation page styles
const CSS_STYLES: &str = r#"
* {
    margin: 0;
    padding: 0;
    box-sizing: border-box;
}

body {
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Roboto', 'Oxygen',
                 'Ubuntu', 'Cantarell', 'Fira Sans', 'Droid Sans', 'Helvetica Neue',
                 sans-serif;
    line-height: 1.6;
    color: #1f2328;
    background-color: #f6f8fa;
}

.layout {
    display: flex;
    max-width: 1200px;
    margin: 0 auto;
    gap: 32px;
    padding: 32px 20px;
}

.sidebar {
    flex: 0 0 240px;
    position: sticky;
    top: 32px;
    align-self: flex-start;
    max-height: calc(100vh - 64px);
    overflow-y: auto;
}

.toc ul {
    list-style: none;
    padding-left: 12px;
}

.toc > ul {
    padding-left: 0;
}

.toc li {
    margin: 4px 0;
    font-size: 0.92em;
}

.toc a {
    color: #57606a;
}

.content {
    flex: 1;
    min-width: 0;
    background: white;
    padding: 48px;
    border-radius: 8px;
    box-shadow: 0 1px 3px rgba(0, 0, 0, 0.08);
}

h1, h2, h3, h4, h5, h6 {
    margin-top: 28px;
    margin-bottom: 14px;
    font-weight: 600;
    scroll-margin-top: 24px;
}

h1 {
    font-size: 2.2em;
    margin-top: 0;
    border-bottom: 2px solid #e1e4e8;
    padding-bottom: 8px;
}

h2 {
    font-size: 1.6em;
}

h3 {
    font-size: 1.3em;
}

.heading-anchor {
    margin-left: 8px;
    color: #8c959f;
    opacity: 0;
}

h1:hover .heading-anchor,
h2:hover .heading-anchor,
h3:hover .heading-anchor,
h4:hover .heading-anchor {
    opacity: 1;
}

p {
    margin-bottom: 16px;
}

strong {
    font-weight: 600;
}

del {
    text-decoration: line-through;
    color: #888;
}

code {
    font-family: 'JetBrains Mono', 'Monaco', 'Menlo', 'Consolas', monospace;
    background-color: #eff1f3;
    padding: 2px 6px;
    border-radius: 4px;
    font-size: 0.88em;
}

.code-block {
    margin-bottom: 16px;
    border: 1px solid #d0d7de;
    border-radius: 6px;
    overflow: hidden;
}

.code-header {
    display: flex;
    justify-content: space-between;
    align-items: center;
    padding: 6px 12px;
    background-color: #eaeef2;
    font-size: 0.8em;
    color: #57606a;
}

.copy-button {
    margin-left: auto;
    border: 1px solid #d0d7de;
    background: white;
    border-radius: 4px;
    padding: 2px 10px;
    cursor: pointer;
}

pre {
    background-color: #f6f8fa;
    padding: 16px;
    overflow-x: auto;
}

pre code {
    background: none;
    padding: 0;
    font-size: 0.88em;
    line-height: 1.45;
}

blockquote {
    border-left: 4px solid #d0d7de;
    padding-left: 16px;
    margin: 16px 0;
    color: #57606a;
}

.callout {
    margin: 16px 0;
    padding: 12px 16px;
    border-left: 4px solid;
    border-radius: 6px;
}

.callout-title {
    font-weight: 600;
    margin-bottom: 6px;
}

.callout-note {
    border-color: #0969da;
    background-color: #ddf4ff;
}

.callout-info {
    border-color: #8250df;
    background-color: #fbefff;
}

.callout-tip {
    border-color: #1a7f37;
    background-color: #dafbe1;
}

.callout-warning {
    border-color: #9a6700;
    background-color: #fff8c5;
}

.callout-danger {
    border-color: #cf222e;
    background-color: #ffebe9;
}

ul, ol {
    margin-bottom: 16px;
    padding-left: 30px;
}

li {
    margin-bottom: 6px;
}

ul.task-list {
    list-style: none;
    padding-left: 0;
}

.task-list-item input[type="checkbox"] {
    margin-right: 8px;
}

table {
    width: 100%;
    border-collapse: collapse;
    margin-bottom: 20px;
    font-size: 0.95em;
}

thead {
    background-color: #f6f8fa;
}

th {
    padding: 10px 12px;
    text-align: left;
    font-weight: 600;
    border-bottom: 2px solid #d0d7de;
}

td {
    padding: 8px 12px;
    border-bottom: 1px solid #d0d7de;
}

img {
    max-width: 100%;
    height: auto;
}

hr {
    border: none;
    border-top: 2px solid #e1e4e8;
    margin: 32px 0;
}

a {
    color: #0969da;
    text-decoration: none;
}

a:hover {
    text-decoration: underline;
}

.doc-fallback {
    text-align: center;
    padding: 64px 16px;
    color: #57606a;
}

@media screen and (max-width: 768px) {
    .layout {
        flex-direction: column;
    }

    .sidebar {
        position: static;
        max-height: none;
    }

    .content {
        padding: 24px 16px;
    }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render_model::{render_document, CalloutKind};

    fn options() -> RenderOptions {
        RenderOptions::default()
    }

    fn text(value: &str) -> Inline {
        Inline::Text(value.to_string())
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<div>"), "&lt;div&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html("\"quoted\""), "&quot;quoted&quot;");
    }

    #[test]
    fn test_inline_bold_wraps_italic() {
        let inlines = vec![Inline::Strong(vec![
            text("bold "),
            Inline::Emphasis(vec![text("and italic")]),
            text(" text"),
        ])];

        assert_eq!(
            inline_to_html(&inlines, &options()),
            "<strong>bold <em>and italic</em> text</strong>"
        );
    }

    #[test]
    fn test_inline_code_is_escaped_not_formatted() {
        let inlines = vec![Inline::Code("<b>**x**</b>".to_string())];

        assert_eq!(
            inline_to_html(&inlines, &options()),
            "<code>&lt;b&gt;**x**&lt;/b&gt;</code>"
        );
    }

    #[test]
    fn test_external_link_opens_new_tab() {
        let inlines = vec![Inline::Link {
            url: "https://hashub.dev".to_string(),
            title: None,
            children: vec![text("Hashub")],
        }];

        assert_eq!(
            inline_to_html(&inlines, &options()),
            "<a href=\"https://hashub.dev\" target=\"_blank\" rel=\"noopener noreferrer\">Hashub</a>"
        );
    }

    #[test]
    fn test_relative_link_stays_in_tab() {
        let inlines = vec![Inline::Link {
            url: "/docs/ocr".to_string(),
            title: Some("OCR".to_string()),
            children: vec![text("OCR guide")],
        }];

        assert_eq!(
            inline_to_html(&inlines, &options()),
            "<a href=\"/docs/ocr\" title=\"OCR\">OCR guide</a>"
        );
    }

    #[test]
    fn test_new_tab_can_be_disabled() {
        let options = RenderOptions {
            external_links_new_tab: false,
            ..RenderOptions::default()
        };
        let inlines = vec![Inline::Link {
            url: "https://hashub.dev".to_string(),
            title: None,
            children: vec![text("Hashub")],
        }];

        assert_eq!(
            inline_to_html(&inlines, &options),
            "<a href=\"https://hashub.dev\">Hashub</a>"
        );
    }

    #[test]
    fn test_is_external_link() {
        assert!(is_external_link("https://example.com"));
        assert!(is_external_link("HTTP://EXAMPLE.COM"));
        assert!(is_external_link("mailto:support@hashub.dev"));
        assert!(!is_external_link("#authentication"));
        assert!(!is_external_link("../guides/embeddings.md"));
    }

    #[test]
    fn test_code_block_markup() {
        let blocks = vec![RenderedBlock::CodeBlock {
            index: 0,
            language: Some("python".to_string()),
            code: "print(\"<hi>\")".to_string(),
        }];

        let html = render_blocks(&blocks, &options());

        assert_eq!(
            html,
            concat!(
                "<div class=\"code-block\" data-language=\"python\">\n",
                "<div class=\"code-header\"><span class=\"code-language\">python</span>",
                "<button class=\"copy-button\" type=\"button\" data-copy-target=\"code-0\">Copy</button></div>\n",
                "<pre><code id=\"code-0\" class=\"language-python\">print(&quot;&lt;hi&gt;&quot;)</code></pre>\n",
                "</div>\n"
            )
        );
    }

    #[test]
    fn test_code_block_without_copy_button_or_language() {
        let options = RenderOptions {
            copy_buttons: false,
            ..RenderOptions::default()
        };
        let blocks = vec![RenderedBlock::CodeBlock {
            index: 3,
            language: None,
            code: "plain".to_string(),
        }];

        let html = render_blocks(&blocks, &options);

        assert_eq!(
            html,
            "<div class=\"code-block\">\n<pre><code id=\"code-3\">plain</code></pre>\n</div>\n"
        );
    }

    #[test]
    fn test_heading_has_anchor() {
        let blocks = vec![RenderedBlock::Heading {
            level: 2,
            id: "install".to_string(),
            content: vec![text("Install")],
        }];

        assert_eq!(
            render_blocks(&blocks, &options()),
            "<h2 id=\"install\">Install<a class=\"heading-anchor\" href=\"#install\" aria-hidden=\"true\">#</a></h2>\n"
        );
    }

    #[test]
    fn test_callout_markup() {
        let blocks = vec![RenderedBlock::Callout {
            kind: CalloutKind::Warning,
            title: "Warning".to_string(),
            blocks: vec![RenderedBlock::Paragraph(vec![text("Careful")])],
        }];

        assert_eq!(
            render_blocks(&blocks, &options()),
            "<div class=\"callout callout-warning\" role=\"note\">\n<p class=\"callout-title\">Warning</p>\n<p>Careful</p>\n</div>\n"
        );
    }

    #[test]
    fn test_table_markup_has_no_separator_row() {
        let page = render_document("| A | B |\n|---|---|\n| 1 | 2 |", &options());

        assert_eq!(
            page.html,
            concat!(
                "<table>\n<thead>\n<tr>\n<th>A</th>\n<th>B</th>\n</tr>\n</thead>\n",
                "<tbody>\n<tr>\n<td>1</td>\n<td>2</td>\n</tr>\n</tbody>\n</table>\n"
            )
        );
    }

    #[test]
    fn test_ordered_list_start_attribute() {
        let page = render_document("1. one\n2. two", &options());
        assert!(page.html.starts_with("<ol>\n<li>one</li>\n"));

        let page = render_document("5. five", &options());
        assert!(page.html.starts_with("<ol start=\"5\">\n"));
    }

    #[test]
    fn test_task_list_markup() {
        let page = render_document("- [x] done\n- [ ] todo", &options());

        assert!(page.html.contains("<ul class=\"task-list\">"));
        assert!(page
            .html
            .contains("<li class=\"task-list-item\"><input type=\"checkbox\" checked disabled> done</li>"));
    }

    #[test]
    fn test_render_toc_nesting() {
        // Arrange
        let headings = vec![
            HeadingEntry {
                level: 1,
                text: "Guide".to_string(),
                id: "guide".to_string(),
            },
            HeadingEntry {
                level: 2,
                text: "Setup".to_string(),
                id: "setup".to_string(),
            },
            HeadingEntry {
                level: 1,
                text: "FAQ".to_string(),
                id: "faq".to_string(),
            },
        ];

        // Act
        let toc = render_toc(&headings, 4);

        // Assert
        assert_eq!(
            toc,
            concat!(
                "<nav class=\"toc\">\n<ul>\n",
                "<li class=\"toc-level-1\"><a href=\"#guide\">Guide</a>\n<ul>\n",
                "<li class=\"toc-level-2\"><a href=\"#setup\">Setup</a></li>\n",
                "</ul>\n</li>\n",
                "<li class=\"toc-level-1\"><a href=\"#faq\">FAQ</a></li>\n",
                "</ul>\n</nav>\n"
            )
        );
    }

    #[test]
    fn test_render_toc_empty() {
        assert_eq!(render_toc(&[], 4), "");
    }

    #[test]
    fn test_render_toc_respects_max_level() {
        let headings = vec![
            HeadingEntry {
                level: 2,
                text: "Shown".to_string(),
                id: "shown".to_string(),
            },
            HeadingEntry {
                level: 3,
                text: "Hidden".to_string(),
                id: "hidden".to_string(),
            },
        ];

        let toc = render_toc(&headings, 2);

        assert!(toc.contains("#shown"));
        assert!(!toc.contains("#hidden"));
    }

    #[test]
    fn test_fallback_messages() {
        assert!(render_fallback(Fallback::NotFound).contains("Page not found"));
        assert!(render_fallback(Fallback::Unavailable).contains("Content not available"));
    }

    #[test]
    fn test_standalone_page_includes_toc_and_script() {
        let page = render_document("# Intro\n\n```sh\nhashub login\n```\n", &options());

        let html = render_standalone_page("Intro", &page, &options());

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Intro</title>"));
        assert!(html.contains("<nav class=\"toc\">"));
        assert!(html.contains("navigator.clipboard.writeText"));
    }
}
