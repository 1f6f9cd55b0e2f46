//! Bridge from pulldown-cmark events to the syntax tree.

use std::collections::HashMap;

use pulldown_cmark::{
    BrokenLink, CodeBlockKind, CowStr, Event, HeadingLevel, Options, Parser, Tag, TagEnd,
};

use crate::ast::{Node, NodeKind};
use crate::directive::{
    Block, BoxOptions, DirectiveArgs, DirectiveName, DirectiveOptions, ImgOptions,
    SetStyleOptions, SlideOptions, TextStyleOptions, TitleOptions, split_blocks,
};

/// Parse a document with directives enabled.
///
/// Markdown between directives is parsed chunk by chunk, so a block never
/// spans a directive: a list interrupted by one becomes two lists. Link
/// reference definitions are shared by the whole document.
///
/// # Example
///
/// ```
/// use dd_renderer::{NodeKind, parse_document};
///
/// let doc = parse_document("## Intro\n\n:::img[cat.png] width=2in\n");
/// assert_eq!(doc.children.len(), 2);
/// assert!(matches!(doc.children[1].kind, NodeKind::Img(_)));
/// ```
#[must_use]
pub fn parse_document(input: &str) -> Node {
    let blocks = split_blocks(input);
    let mut refs = LinkRefs::default();
    for block in &blocks {
        match block {
            Block::Markdown(text) => refs.collect(text),
            Block::Directive { body, .. } => refs.collect(body),
        }
    }

    let mut children = Vec::new();
    for block in blocks {
        match block {
            Block::Markdown(text) => children.extend(parse_with_refs(&text, &refs)),
            Block::Directive { name, args, body } => {
                children.push(directive_node(name, &args, &body, &refs));
            }
        }
    }
    Node::with_children(NodeKind::Document, children)
}

/// Parse plain markdown. Directive markers are ordinary text here.
#[must_use]
pub fn parse_markdown(input: &str) -> Vec<Node> {
    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(input, OPTIONS) {
        builder.event(event);
    }
    builder.finish()
}

const OPTIONS: Options = Options::ENABLE_TABLES;

/// Link reference definitions keyed by normalized label.
#[derive(Debug, Default)]
struct LinkRefs(HashMap<String, (String, String)>);

impl LinkRefs {
    /// Record the definitions in `input`. The first definition of a label wins.
    fn collect(&mut self, input: &str) {
        let parser = Parser::new_ext(input, OPTIONS);
        for (label, def) in parser.reference_definitions().iter() {
            let title = def.title.as_deref().unwrap_or_default().to_owned();
            self.0
                .entry(normalize_label(label))
                .or_insert_with(|| (def.dest.to_string(), title));
        }
    }

    fn resolve(&self, label: &str) -> Option<(String, String)> {
        self.0.get(&normalize_label(label)).cloned()
    }
}

fn normalize_label(label: &str) -> String {
    label
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Parse a markdown chunk, resolving references defined in other chunks.
fn parse_with_refs(input: &str, refs: &LinkRefs) -> Vec<Node> {
    let callback = |link: BrokenLink| {
        refs.resolve(&link.reference)
            .map(|(dest, title)| (CowStr::from(dest), CowStr::from(title)))
    };
    let parser = Parser::new_with_broken_link_callback(input, OPTIONS, Some(callback));
    let mut builder = TreeBuilder::new();
    for event in parser {
        builder.event(event);
    }
    builder.finish()
}

fn directive_node(
    name: DirectiveName,
    args: &DirectiveArgs,
    body: &str,
    refs: &LinkRefs,
) -> Node {
    let kind = match name {
        DirectiveName::Box => NodeKind::Box(BoxOptions::from_args(args)),
        DirectiveName::Img => NodeKind::Img(ImgOptions::from_args(args)),
        DirectiveName::Title => NodeKind::Title(TitleOptions::from_args(args)),
        DirectiveName::Slide => NodeKind::Slide(SlideOptions::from_args(args)),
        DirectiveName::TextStyle => NodeKind::TextStyle(TextStyleOptions::from_args(args)),
        DirectiveName::SetStyle => NodeKind::SetStyle(SetStyleOptions::from_args(args)),
    };
    let children = if name.has_body() {
        parse_with_refs(body, refs)
    } else {
        Vec::new()
    };
    Node::with_children(kind, children)
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}

/// Builds a tree from a flat event stream.
///
/// Two node kinds have no event of their own: `BlockText` wraps inline
/// content placed directly in a tight list item, and `TableBody` wraps the
/// rows following a table head.
struct TreeBuilder {
    stack: Vec<Node>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Node::new(NodeKind::Document)],
        }
    }

    fn finish(mut self) -> Vec<Node> {
        while self.stack.len() > 1 {
            self.close();
        }
        self.stack.pop().map(|root| root.children).unwrap_or_default()
    }

    fn top_kind(&self) -> Option<&NodeKind> {
        self.stack.last().map(|node| &node.kind)
    }

    fn open(&mut self, kind: NodeKind) {
        self.stack.push(Node::new(kind));
    }

    fn close(&mut self) {
        if self.stack.len() > 1
            && let Some(node) = self.stack.pop()
        {
            self.append(node);
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.children.push(node);
        }
    }

    fn open_block(&mut self, kind: NodeKind) {
        self.leave_inline();
        self.open(kind);
    }

    fn open_inline(&mut self, kind: NodeKind) {
        self.enter_inline();
        self.open(kind);
    }

    fn leaf_inline(&mut self, kind: NodeKind) {
        self.enter_inline();
        self.append(Node::new(kind));
    }

    fn enter_inline(&mut self) {
        if matches!(self.top_kind(), Some(NodeKind::ListItem { .. })) {
            self.open(NodeKind::BlockText);
        }
    }

    fn leave_inline(&mut self) {
        if matches!(self.top_kind(), Some(NodeKind::BlockText)) {
            self.close();
        }
    }

    fn list_depth(&self) -> u8 {
        let depth = self
            .stack
            .iter()
            .filter(|node| matches!(node.kind, NodeKind::List { .. }))
            .count();
        u8::try_from(depth).unwrap_or(u8::MAX)
    }

    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.leaf_inline(NodeKind::CodeSpan(code.into_string())),
            Event::SoftBreak => self.leaf_inline(NodeKind::Text("\n".to_owned())),
            Event::HardBreak => self.leaf_inline(NodeKind::LineBreak),
            Event::Html(_) => self.append(Node::new(NodeKind::Unsupported("html"))),
            Event::InlineHtml(_) => self.leaf_inline(NodeKind::Unsupported("inline_html")),
            Event::Rule => {
                self.leave_inline();
                self.append(Node::new(NodeKind::Unsupported("thematic_break")));
            }
            Event::TaskListMarker(_)
            | Event::FootnoteReference(_)
            | Event::InlineMath(_)
            | Event::DisplayMath(_) => {
                self.leaf_inline(NodeKind::Unsupported("extension"));
            }
        }
    }

    fn text(&mut self, text: &str) {
        if let Some(Node {
            kind: NodeKind::BlockCode { code, .. },
            ..
        }) = self.stack.last_mut()
        {
            code.push_str(text);
            return;
        }
        self.leaf_inline(NodeKind::Text(text.to_owned()));
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open_block(NodeKind::Paragraph),
            Tag::Heading { level, .. } => self.open_block(NodeKind::Heading {
                level: heading_level(level),
            }),
            Tag::BlockQuote(_) => self.open_block(NodeKind::BlockQuote),
            Tag::CodeBlock(kind) => {
                let language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(str::to_owned),
                    CodeBlockKind::Indented => None,
                };
                self.open_block(NodeKind::BlockCode {
                    language,
                    code: String::new(),
                });
            }
            Tag::List(start) => self.open_block(NodeKind::List {
                ordered: start.is_some(),
            }),
            Tag::Item => {
                let level = self.list_depth();
                self.open_block(NodeKind::ListItem { level });
            }
            Tag::Table(_) => self.open_block(NodeKind::Table),
            Tag::TableHead => self.open(NodeKind::TableHead),
            Tag::TableRow => {
                if matches!(self.top_kind(), Some(NodeKind::Table)) {
                    self.open(NodeKind::TableBody);
                }
                self.open(NodeKind::TableRow);
            }
            Tag::TableCell => self.open(NodeKind::TableCell),
            Tag::Emphasis => self.open_inline(NodeKind::Emphasis),
            Tag::Strong => self.open_inline(NodeKind::Strong),
            Tag::Image { dest_url, .. } => self.open_inline(NodeKind::Image {
                src: dest_url.into_string(),
            }),
            Tag::Link { .. } => self.open_inline(NodeKind::Unsupported("link")),
            Tag::Strikethrough => self.open_inline(NodeKind::Unsupported("strikethrough")),
            Tag::Superscript => self.open_inline(NodeKind::Unsupported("superscript")),
            Tag::Subscript => self.open_inline(NodeKind::Unsupported("subscript")),
            Tag::HtmlBlock => self.open_block(NodeKind::Unsupported("html_block")),
            Tag::FootnoteDefinition(_) => {
                self.open_block(NodeKind::Unsupported("footnote_definition"));
            }
            Tag::DefinitionList | Tag::DefinitionListTitle | Tag::DefinitionListDefinition => {
                self.open_block(NodeKind::Unsupported("definition_list"));
            }
            Tag::MetadataBlock(_) => self.open_block(NodeKind::Unsupported("metadata")),
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        let inline = matches!(
            tag,
            TagEnd::Emphasis
                | TagEnd::Strong
                | TagEnd::Image
                | TagEnd::Link
                | TagEnd::Strikethrough
                | TagEnd::Superscript
                | TagEnd::Subscript
        );
        if !inline {
            self.leave_inline();
        }
        if tag == TagEnd::Table && matches!(self.top_kind(), Some(NodeKind::TableBody)) {
            self.close();
        }
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn text(s: &str) -> Node {
        Node::new(NodeKind::Text(s.to_owned()))
    }

    fn kinds(nodes: &[Node]) -> Vec<&'static str> {
        nodes.iter().map(|n| n.kind.name()).collect()
    }

    #[test]
    fn test_heading_and_paragraph() {
        let nodes = parse_markdown("# Title\n\nHello *world*\n");
        assert_eq!(kinds(&nodes), vec!["heading", "paragraph"]);
        assert_eq!(nodes[0].kind, NodeKind::Heading { level: 1 });
        assert_eq!(nodes[0].plain_text(), "Title");
        assert_eq!(
            nodes[1].children,
            vec![
                text("Hello "),
                Node::with_children(NodeKind::Emphasis, vec![text("world")]),
            ]
        );
    }

    #[test]
    fn test_soft_and_hard_breaks() {
        let nodes = parse_markdown("one\ntwo  \nthree\n");
        assert_eq!(
            nodes[0].children,
            vec![
                text("one"),
                text("\n"),
                text("two"),
                Node::new(NodeKind::LineBreak),
                text("three"),
            ]
        );
    }

    #[test]
    fn test_tight_list_wraps_block_text() {
        let nodes = parse_markdown("- a\n- b\n  1. c\n");
        assert_eq!(nodes[0].kind, NodeKind::List { ordered: false });
        let items = &nodes[0].children;
        assert_eq!(items[0].kind, NodeKind::ListItem { level: 1 });
        assert_eq!(
            items[0].children,
            vec![Node::with_children(NodeKind::BlockText, vec![text("a")])]
        );
        assert_eq!(kinds(&items[1].children), vec!["block_text", "list"]);
        let nested = &items[1].children[1];
        assert_eq!(nested.kind, NodeKind::List { ordered: true });
        assert_eq!(nested.children[0].kind, NodeKind::ListItem { level: 2 });
    }

    #[test]
    fn test_loose_list_uses_paragraphs() {
        let nodes = parse_markdown("- a\n\n- b\n");
        assert_eq!(kinds(&nodes[0].children[0].children), vec!["paragraph"]);
    }

    #[test]
    fn test_table_body_is_synthesized() {
        let nodes = parse_markdown("| A | B | C |\n|---|---|---|\n| 1 | 2 | 3 |\n| 4 | 5 | 6 |\n");
        let table = &nodes[0];
        assert_eq!(kinds(&table.children), vec!["table_head", "table_body"]);
        assert_eq!(table.children[0].children.len(), 3);
        assert_eq!(kinds(&table.children[1].children), vec!["table_row", "table_row"]);
        assert_eq!(table.children[1].children[1].children[2].plain_text(), "6");
    }

    #[test]
    fn test_code_block_language() {
        let nodes = parse_markdown("```python extra\nprint(1)\n```\n\n    indented\n");
        assert_eq!(
            nodes[0].kind,
            NodeKind::BlockCode {
                language: Some("python".to_owned()),
                code: "print(1)\n".to_owned(),
            }
        );
        assert_eq!(
            nodes[1].kind,
            NodeKind::BlockCode {
                language: None,
                code: "indented\n".to_owned(),
            }
        );
    }

    #[test]
    fn test_image_and_link() {
        let nodes = parse_markdown("![alt](pics/a.png) [site](http://x)\n");
        let children = &nodes[0].children;
        assert_eq!(
            children[0].kind,
            NodeKind::Image {
                src: "pics/a.png".to_owned()
            }
        );
        assert_eq!(children[2].kind, NodeKind::Unsupported("link"));
    }

    #[test]
    fn test_document_with_directives() {
        let doc = parse_document(
            "## Slide\n:::box width=50%\n    Inside *box*\n\n    :::img[nested.png]\nAfter\n",
        );
        assert_eq!(kinds(&doc.children), vec!["heading", "box", "paragraph"]);
        let body = &doc.children[1];
        assert_eq!(kinds(&body.children), vec!["paragraph", "paragraph"]);
        assert_eq!(body.children[1].plain_text(), ":::img[nested.png]");
    }

    #[test]
    fn test_link_reference_after_directive_resolves() {
        let doc = parse_document(
            "## A\n\nSee [docs][d].\n\n:::setstyle font_size=20\n\n[d]: http://example.com\n",
        );
        assert_eq!(kinds(&doc.children), vec!["heading", "paragraph", "setstyle"]);
        let paragraph = &doc.children[1].children;
        assert_eq!(paragraph[0], text("See "));
        assert_eq!(paragraph[1].kind, NodeKind::Unsupported("link"));
        assert_eq!(paragraph[1].plain_text(), "docs");
        assert_eq!(paragraph[2], text("."));
    }

    #[test]
    fn test_link_reference_resolves_inside_directive_body() {
        let doc = parse_document("[Site]: http://x\n:::box\n    Go to [site].\n");
        assert_eq!(kinds(&doc.children), vec!["box"]);
        let inner = &doc.children[0].children[0].children;
        assert_eq!(inner[1].kind, NodeKind::Unsupported("link"));
        assert_eq!(inner[1].plain_text(), "site");
    }

    #[test]
    fn test_unknown_link_reference_stays_text() {
        let doc = parse_document("See [nothing].\n");
        assert_eq!(doc.children[0].plain_text(), "See [nothing].");
    }

    #[test]
    fn test_directive_splits_list() {
        let doc = parse_document("1. one\n2. two\n:::setstyle font_size=20\n3. three\n");
        assert_eq!(kinds(&doc.children), vec!["list", "setstyle", "list"]);
        assert_eq!(doc.children[0].children.len(), 2);
        assert_eq!(doc.children[2].kind, NodeKind::List { ordered: true });
        assert_eq!(doc.children[2].children.len(), 1);
    }

    #[test]
    fn test_bodyless_directive_has_no_children() {
        let doc = parse_document(":::setstyle font_size=24\n");
        assert_eq!(doc.children.len(), 1);
        assert!(doc.children[0].children.is_empty());
        let NodeKind::SetStyle(options) = &doc.children[0].kind else {
            panic!("expected setstyle");
        };
        assert_eq!(options.font_size, Some(24.0));
    }
}
