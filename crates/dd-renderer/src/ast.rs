//! Syntax tree consumed by the renderer.
//!
//! Built once from markup by [`crate::parse_document`] and never mutated
//! afterwards.

use crate::directive::{
    BoxOptions, ImgOptions, SetStyleOptions, SlideOptions, TextStyleOptions, TitleOptions,
};

/// Node kinds.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// Root of a parsed document or directive body.
    Document,
    Heading {
        level: u8,
    },
    Paragraph,
    /// Inline content of a tight list item.
    BlockText,
    Text(String),
    Emphasis,
    Strong,
    CodeSpan(String),
    /// Hard line break.
    LineBreak,
    /// Markdown image `![alt](src)`.
    Image {
        src: String,
    },
    BlockCode {
        language: Option<String>,
        code: String,
    },
    List {
        ordered: bool,
    },
    ListItem {
        /// Nesting depth, starting at 1.
        level: u8,
    },
    BlockQuote,
    Table,
    TableHead,
    TableBody,
    TableRow,
    TableCell,
    Box(BoxOptions),
    Img(ImgOptions),
    Title(TitleOptions),
    Slide(SlideOptions),
    TextStyle(TextStyleOptions),
    SetStyle(SetStyleOptions),
    /// Markup the renderer has no handler for (links, rules, HTML, ...).
    Unsupported(&'static str),
}

impl NodeKind {
    /// Short name used in log messages.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Document => "document",
            Self::Heading { .. } => "heading",
            Self::Paragraph => "paragraph",
            Self::BlockText => "block_text",
            Self::Text(_) => "text",
            Self::Emphasis => "emphasis",
            Self::Strong => "strong",
            Self::CodeSpan(_) => "codespan",
            Self::LineBreak => "linebreak",
            Self::Image { .. } => "image",
            Self::BlockCode { .. } => "block_code",
            Self::List { .. } => "list",
            Self::ListItem { .. } => "list_item",
            Self::BlockQuote => "block_quote",
            Self::Table => "table",
            Self::TableHead => "table_head",
            Self::TableBody => "table_body",
            Self::TableRow => "table_row",
            Self::TableCell => "table_cell",
            Self::Box(_) => "box",
            Self::Img(_) => "img",
            Self::Title(_) => "title",
            Self::Slide(_) => "slide",
            Self::TextStyle(_) => "textstyle",
            Self::SetStyle(_) => "setstyle",
            Self::Unsupported(name) => name,
        }
    }
}

/// A syntax tree node.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    #[must_use]
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self { kind, children }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) | NodeKind::CodeSpan(text) => out.push_str(text),
            NodeKind::LineBreak => out.push('\n'),
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}
