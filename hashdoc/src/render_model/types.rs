//! Shared type definitions

/// Table cell alignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(align: pulldown_cmark::Alignment) -> Self {
        match align {
            pulldown_cmark::Alignment::None => Alignment::None,
            pulldown_cmark::Alignment::Left => Alignment::Left,
            pulldown_cmark::Alignment::Center => Alignment::Center,
            pulldown_cmark::Alignment::Right => Alignment::Right,
        }
    }
}

/// Visual style of a callout block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalloutKind {
    Note,
    Info,
    Tip,
    Warning,
    Danger,
}

impl CalloutKind {
    /// Parse the kind name used after a `:::` container marker
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "note" => Some(Self::Note),
            "info" => Some(Self::Info),
            "tip" => Some(Self::Tip),
            "warning" => Some(Self::Warning),
            "danger" => Some(Self::Danger),
            _ => None,
        }
    }

    /// Map a GitHub alert blockquote kind onto a callout kind
    pub fn from_blockquote_kind(kind: pulldown_cmark::BlockQuoteKind) -> Self {
        match kind {
            pulldown_cmark::BlockQuoteKind::Note => Self::Note,
            pulldown_cmark::BlockQuoteKind::Tip => Self::Tip,
            pulldown_cmark::BlockQuoteKind::Important => Self::Info,
            pulldown_cmark::BlockQuoteKind::Warning => Self::Warning,
            pulldown_cmark::BlockQuoteKind::Caution => Self::Danger,
        }
    }

    /// Default title shown in the callout header
    pub fn title(self) -> &'static str {
        match self {
            Self::Note => "Note",
            Self::Info => "Info",
            Self::Tip => "Tip",
            Self::Warning => "Warning",
            Self::Danger => "Danger",
        }
    }

    /// CSS class applied to the callout container
    pub fn css_class(self) -> &'static str {
        match self {
            Self::Note => "callout-note",
            Self::Info => "callout-info",
            Self::Tip => "callout-tip",
            Self::Warning => "callout-warning",
            Self::Danger => "callout-danger",
        }
    }
}
