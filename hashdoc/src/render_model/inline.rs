//! Inline content representation
//!
//! Inline spans are kept as a tree rather than flat runs so that nested
//! formatting (`**bold *and italic* text**`) renders with the same nesting
//! it was written with.

/// A piece of inline content inside a paragraph, heading, list item or cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    /// Plain text (unescaped)
    Text(String),

    /// Inline code span; contents are never re-interpreted
    Code(String),

    /// Strong emphasis (`**text**`)
    Strong(Vec<Inline>),

    /// Emphasis (`*text*`)
    Emphasis(Vec<Inline>),

    /// Strikethrough (`~~text~~`)
    Strikethrough(Vec<Inline>),

    /// Hyperlink
    Link {
        /// Link destination as written
        url: String,
        /// Optional link title
        title: Option<String>,
        /// Link label content
        children: Vec<Inline>,
    },

    /// Inline image
    Image {
        /// Image source
        url: String,
        /// Optional image title
        title: Option<String>,
        /// Alternative text (plain text of the label)
        alt: String,
    },

    /// Single newline inside a paragraph
    SoftBreak,

    /// Explicit line break
    HardBreak,

    /// Raw inline HTML, passed through
    Html(String),
}

impl Inline {
    /// Concatenate the visible text of a sequence of inlines
    ///
    /// Formatting markers are dropped; breaks become a single space and raw
    /// HTML contributes nothing.
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            inline.collect_text(&mut out);
        }
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Inline::Text(text) | Inline::Code(text) => out.push_str(text),
            Inline::Strong(children)
            | Inline::Emphasis(children)
            | Inline::Strikethrough(children)
            | Inline::Link { children, .. } => {
                for child in children {
                    child.collect_text(out);
                }
            }
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::SoftBreak | Inline::HardBreak => out.push(' '),
            Inline::Html(_) => {}
        }
    }
}

/// Container currently open on the builder stack
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InlineContainer {
    Strong,
    Emphasis,
    Strikethrough,
    Link { url: String, title: Option<String> },
    Image { url: String, title: Option<String> },
}

/// Stack-based builder for inline trees
///
/// Start tags open a container, end tags close the innermost one. Content
/// pushed while a container is open becomes its child.
#[derive(Debug, Default)]
pub struct InlineBuilder {
    root: Vec<Inline>,
    stack: Vec<(InlineContainer, Vec<Inline>)>,
}

impl InlineBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an inline to the innermost open container
    pub fn push(&mut self, inline: Inline) {
        // Merge adjacent text so "a" "b" from entity splitting stays one node
        let target = match self.stack.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        };
        if let (Inline::Text(new), Some(Inline::Text(existing))) = (&inline, target.last_mut()) {
            existing.push_str(new);
            return;
        }
        target.push(inline);
    }

    /// Open a new container
    pub fn open(&mut self, container: InlineContainer) {
        self.stack.push((container, Vec::new()));
    }

    /// Close the innermost container and attach it to its parent
    pub fn close(&mut self) {
        let Some((container, children)) = self.stack.pop() else {
            return;
        };
        let inline = match container {
            InlineContainer::Strong => Inline::Strong(children),
            InlineContainer::Emphasis => Inline::Emphasis(children),
            InlineContainer::Strikethrough => Inline::Strikethrough(children),
            InlineContainer::Link { url, title } => Inline::Link {
                url,
                title,
                children,
            },
            InlineContainer::Image { url, title } => Inline::Image {
                url,
                title,
                alt: Inline::plain_text(&children),
            },
        };
        self.push(inline);
    }

    /// Whether nothing has been pushed yet
    pub fn is_empty(&self) -> bool {
        self.root.is_empty() && self.stack.is_empty()
    }

    /// Close any containers left open and return the finished tree
    pub fn finish(&mut self) -> Vec<Inline> {
        while !self.stack.is_empty() {
            self.close();
        }
        std::mem::take(&mut self.root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_nests_emphasis_inside_strong() {
        // Arrange
        let mut builder = InlineBuilder::new();

        // Act: **bold *and italic* text**
        builder.open(InlineContainer::Strong);
        builder.push(Inline::Text("bold ".to_string()));
        builder.open(InlineContainer::Emphasis);
        builder.push(Inline::Text("and italic".to_string()));
        builder.close();
        builder.push(Inline::Text(" text".to_string()));
        builder.close();
        let tree = builder.finish();

        // Assert
        assert_eq!(
            tree,
            vec![Inline::Strong(vec![
                Inline::Text("bold ".to_string()),
                Inline::Emphasis(vec![Inline::Text("and italic".to_string())]),
                Inline::Text(" text".to_string()),
            ])]
        );
    }

    #[test]
    fn test_builder_merges_adjacent_text() {
        let mut builder = InlineBuilder::new();
        builder.push(Inline::Text("a".to_string()));
        builder.push(Inline::Text("b".to_string()));

        assert_eq!(builder.finish(), vec![Inline::Text("ab".to_string())]);
    }

    #[test]
    fn test_finish_closes_unbalanced_containers() {
        let mut builder = InlineBuilder::new();
        builder.open(InlineContainer::Emphasis);
        builder.push(Inline::Text("dangling".to_string()));

        let tree = builder.finish();

        assert_eq!(
            tree,
            vec![Inline::Emphasis(vec![Inline::Text("dangling".to_string())])]
        );
        assert!(builder.is_empty());
    }

    #[test]
    fn test_image_alt_text_is_flattened() {
        let mut builder = InlineBuilder::new();
        builder.open(InlineContainer::Image {
            url: "logo.png".to_string(),
            title: None,
        });
        builder.push(Inline::Text("Hashub ".to_string()));
        builder.push(Inline::Code("logo".to_string()));
        builder.close();

        match &builder.finish()[0] {
            Inline::Image { alt, .. } => assert_eq!(alt, "Hashub logo"),
            other => panic!("Expected image, got {:?}", other),
        }
    }

    #[test]
    fn test_plain_text_drops_markup() {
        let inlines = vec![
            Inline::Text("Use ".to_string()),
            Inline::Strong(vec![Inline::Code("embed()".to_string())]),
            Inline::SoftBreak,
            Inline::Html("<br>".to_string()),
            Inline::Text("now".to_string()),
        ];

        assert_eq!(Inline::plain_text(&inlines), "Use embed() now");
    }
}
