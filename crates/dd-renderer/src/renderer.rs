//! Rendering visitor: walks the syntax tree once, depth first, and drives a
//! [`Presentation`].
//!
//! Level 1 and 2 headings open slides. Container nodes open layout scopes
//! and close them again on every exit path; content nodes emit paragraphs,
//! runs and pictures at the current cursor.

use std::borrow::Cow;
use std::path::Path;

use dd_deck::{Anchor, Bullet, Emu, Font, Margins, Rect, ShapeId, TextFrameRef};

use crate::ast::{Node, NodeKind};
use crate::backend::Presentation;
use crate::directive::{
    BoxOptions, Geometry, ImgOptions, SetStyleOptions, SlideOptions, TextStyleOptions,
    TitleOptions, VAlign,
};
use crate::error::RenderError;
use crate::highlight::{Highlighter, RegexHighlighter, Token};
use crate::layout::{Depths, LayoutContext};
use crate::length::{Length, SlideSize};
use crate::state::TableState;
use crate::style::Style;

/// Layout and font names used by the renderer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Layout of slides opened by level-1 headings.
    pub section_header_layout: String,
    /// Layout of slides opened by level-2 headings.
    pub title_and_content_layout: String,
    /// Font of code spans and code blocks.
    pub code_font: String,
    /// Font of block quotes.
    pub quote_font: String,
    /// Resolve `slide layout=...` before the slide is created instead of
    /// replacing the slide when the directive is reached.
    pub hoist_slide_directives: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            section_header_layout: "Section Header".to_owned(),
            title_and_content_layout: "Title and Content".to_owned(),
            code_font: "Courier".to_owned(),
            quote_font: "Comic Sans MS".to_owned(),
            hoist_slide_directives: false,
        }
    }
}

/// Renders syntax trees into a presentation.
///
/// # Example
///
/// ```
/// use dd_deck::{Deck, Template};
/// use dd_renderer::{RenderOptions, SlideRenderer, parse_document};
///
/// let mut deck = Deck::new(Template::builtin());
/// let doc = parse_document("## Agenda\n\n- Intro\n- Demo\n");
/// SlideRenderer::new(&mut deck, RenderOptions::default())
///     .render(&doc)
///     .unwrap();
///
/// assert_eq!(deck.title_text(0).unwrap(), "Agenda");
/// ```
pub struct SlideRenderer<'a, P: Presentation> {
    deck: &'a mut P,
    options: RenderOptions,
    highlighter: Box<dyn Highlighter + 'a>,
    layout: LayoutContext,
    slide: Option<usize>,
    table: Option<TableState>,
}

impl<'a, P: Presentation> SlideRenderer<'a, P> {
    pub fn new(deck: &'a mut P, options: RenderOptions) -> Self {
        Self {
            deck,
            options,
            highlighter: Box::new(RegexHighlighter::new()),
            layout: LayoutContext::new(),
            slide: None,
            table: None,
        }
    }

    /// Replace the code block highlighter.
    #[must_use]
    pub fn with_highlighter<H: Highlighter + 'a>(mut self, highlighter: H) -> Self {
        self.highlighter = Box::new(highlighter);
        self
    }

    /// Current depths of the bounds, cursor and style stacks.
    pub fn depths(&self) -> Depths {
        self.layout.depths()
    }

    /// Render a parsed document.
    ///
    /// The first failing node aborts the build. Scopes are closed on the
    /// way out, including the last slide's.
    pub fn render(&mut self, document: &Node) -> Result<(), RenderError> {
        let result = self.render_top_level(&document.children);
        let closed = self.close_slide();
        result.and(closed)
    }

    fn render_top_level(&mut self, nodes: &[Node]) -> Result<(), RenderError> {
        for (idx, node) in nodes.iter().enumerate() {
            match node.kind {
                NodeKind::Heading { level } => {
                    self.visit_heading(node, level, &nodes[idx + 1..])?;
                }
                _ => self.visit(node)?,
            }
        }
        Ok(())
    }

    fn visit_heading(
        &mut self,
        node: &Node,
        level: u8,
        following: &[Node],
    ) -> Result<(), RenderError> {
        let default_layout = match level {
            1 => &self.options.section_header_layout,
            2 => &self.options.title_and_content_layout,
            _ => {
                tracing::debug!(level, "Ignoring heading that does not open a slide");
                return Ok(());
            }
        };
        let hoisted = if self.options.hoist_slide_directives {
            hoisted_layout(following)
        } else {
            None
        };
        let layout = hoisted.unwrap_or(default_layout).clone();

        let title = node.plain_text();
        self.open_slide(&layout, &title)
            .map_err(|error| node_error(node, error))
    }

    fn visit_children(&mut self, nodes: &[Node]) -> Result<(), RenderError> {
        for node in nodes {
            self.visit(node)?;
        }
        Ok(())
    }

    fn visit(&mut self, node: &Node) -> Result<(), RenderError> {
        self.dispatch(node).map_err(|error| node_error(node, error))
    }

    fn dispatch(&mut self, node: &Node) -> Result<(), RenderError> {
        match &node.kind {
            NodeKind::Document | NodeKind::TableBody => self.visit_children(&node.children),
            NodeKind::Heading { level } => {
                tracing::warn!(level, "Ignoring heading nested in a container");
                Ok(())
            }
            NodeKind::Paragraph | NodeKind::BlockText => self.visit_paragraph(node),
            NodeKind::Text(text) => self.add_text(text, &Style::default()),
            NodeKind::Emphasis => self.add_text(
                &node.plain_text(),
                &Style {
                    italic: Some(true),
                    ..Style::default()
                },
            ),
            NodeKind::Strong => self.add_text(
                &node.plain_text(),
                &Style {
                    bold: Some(true),
                    ..Style::default()
                },
            ),
            NodeKind::CodeSpan(code) => self.add_text(
                code,
                &Style {
                    verbatim: Some(true),
                    fontname: Some(self.options.code_font.clone()),
                    ..Style::default()
                },
            ),
            NodeKind::LineBreak => {
                if self.layout.has_content_region() {
                    self.new_paragraph()?;
                }
                Ok(())
            }
            NodeKind::Image { src } => {
                self.add_picture("image", src, &Geometry::default(), None)
                    .map(drop)
            }
            NodeKind::BlockCode { language, code } => {
                self.visit_block_code(language.as_deref(), code)
            }
            NodeKind::List { ordered } => self.with_style(
                &Style {
                    list_order: Some(*ordered),
                    ..Style::default()
                },
                &node.children,
            ),
            NodeKind::ListItem { level } => self.with_style(
                &Style {
                    indent_level: Some(*level),
                    show_bullet: Some(true),
                    ..Style::default()
                },
                &node.children,
            ),
            NodeKind::BlockQuote => self.with_style(
                &Style {
                    italic: Some(true),
                    fontname: Some(self.options.quote_font.clone()),
                    ..Style::default()
                },
                &node.children,
            ),
            NodeKind::Table => self.visit_table(node),
            NodeKind::TableHead | NodeKind::TableRow => self.visit_row(node),
            NodeKind::TableCell => self.visit_cell(node),
            NodeKind::Box(options) => self.visit_box(node, options),
            NodeKind::Img(options) => self.visit_img(options),
            NodeKind::Title(options) => self.visit_title(options),
            NodeKind::Slide(options) => self.visit_slide(options),
            NodeKind::TextStyle(options) => {
                self.with_style(&text_style(options), &node.children)
            }
            NodeKind::SetStyle(options) => self.visit_setstyle(options),
            NodeKind::Unsupported(name) => {
                tracing::warn!(node = name, "No handler for node, skipping");
                Ok(())
            }
        }
    }

    fn slide_size(&self) -> SlideSize {
        self.deck.slide_size()
    }

    fn slide_rect(&self) -> Rect {
        let size = self.slide_size();
        Rect::sized(size.width, size.height)
    }

    fn require_slide(&self, what: &'static str) -> Result<usize, RenderError> {
        self.slide.ok_or(RenderError::NoActiveSlide(what))
    }

    fn open_slide(&mut self, layout: &str, title: &str) -> Result<(), RenderError> {
        self.close_slide()?;
        let slide = self.deck.add_slide(layout)?;
        self.deck.set_title(slide, title)?;
        let region = self.deck.content_region(slide)?;
        self.layout.open_slide(
            region.map(|(_, rect)| rect),
            region.map(|(shape, _)| TextFrameRef::shape(slide, shape)),
        );
        self.slide = Some(slide);
        tracing::debug!(slide, layout, title, "Opened slide");
        Ok(())
    }

    fn close_slide(&mut self) -> Result<(), RenderError> {
        if self.slide.take().is_some() {
            self.layout.close_slide()?;
        }
        Ok(())
    }

    /// Run `children` inside an inheriting style scope.
    fn with_style(&mut self, style: &Style, children: &[Node]) -> Result<(), RenderError> {
        self.layout.push_style(style);
        let result = self.visit_children(children);
        let closed = self.layout.pop_style();
        result.and(closed)
    }

    fn visit_paragraph(&mut self, node: &Node) -> Result<(), RenderError> {
        if !self.layout.has_content_region() {
            if self.slide.is_none() {
                tracing::warn!(node = node.kind.name(), "Dropping content before the first slide");
            } else {
                tracing::debug!(node = node.kind.name(), "Dropping content on slide without content region");
            }
            return Ok(());
        }
        self.new_paragraph()?;
        self.visit_children(&node.children)
    }

    /// Start a paragraph at the cursor, reusing the frame's first paragraph
    /// while the cursor is virgin.
    fn new_paragraph(&mut self) -> Result<(), RenderError> {
        let Some(cursor) = self.layout.cursor().copied() else {
            return Ok(());
        };
        let Some(target) = cursor.target else {
            return Ok(());
        };

        let paragraph = if cursor.virgin {
            self.deck.first_paragraph(target)?
        } else {
            self.deck.add_paragraph(target)?
        };

        let style = self.layout.style();
        if let Some(level) = style.indent_level {
            self.deck.set_paragraph_level(paragraph, level)?;
        }
        if style.show_bullet.is_some() {
            let bullet = if style.list_order == Some(true) {
                Bullet::AutoNumber
            } else {
                Bullet::Char('•')
            };
            self.deck.set_bullet(paragraph, bullet)?;
        }

        if let Some(cursor) = self.layout.cursor_mut() {
            cursor.virgin = false;
            cursor.paragraph = Some(paragraph);
        }
        Ok(())
    }

    /// Append a run, resolving each attribute from `explicit` first and the
    /// style frame second.
    fn add_text(&mut self, text: &str, explicit: &Style) -> Result<(), RenderError> {
        let paragraph = match self.layout.cursor().map(|c| (c.paragraph, c.target)) {
            Some((Some(paragraph), _)) => paragraph,
            Some((None, Some(_))) => {
                self.new_paragraph()?;
                match self.layout.cursor().and_then(|c| c.paragraph) {
                    Some(paragraph) => paragraph,
                    None => return Ok(()),
                }
            }
            _ => {
                tracing::debug!(text, "Dropping text outside a text frame");
                return Ok(());
            }
        };

        let style = explicit.resolve(&self.layout.style());
        let text = if style.verbatim == Some(false) {
            Cow::Owned(text.replace('\n', " "))
        } else {
            Cow::Borrowed(text)
        };
        let font = Font {
            italic: style.italic,
            bold: style.bold,
            underline: style.underline,
            name: style.fontname,
            size: style.font_size,
            color: style.color,
        };
        self.deck.add_run(paragraph, &text, font)?;
        Ok(())
    }

    fn visit_block_code(&mut self, language: Option<&str>, code: &str) -> Result<(), RenderError> {
        if !self.layout.has_content_region() {
            tracing::debug!("Dropping code block on slide without content region");
            return Ok(());
        }
        let style = Style {
            fontname: Some(self.options.code_font.clone()),
            ..Style::default()
        };
        self.layout.push_style(&style);
        let result = self.emit_code(language, code.trim_end_matches('\n'));
        let closed = self.layout.pop_style();
        result.and(closed)
    }

    fn emit_code(&mut self, language: Option<&str>, code: &str) -> Result<(), RenderError> {
        self.new_paragraph()?;
        let verbatim = Style {
            verbatim: Some(true),
            ..Style::default()
        };
        let Some(language) = language else {
            return self.add_text(code, &verbatim);
        };

        let mut tokens = self.highlighter.highlight(code, language)?;
        if tokens
            .last()
            .is_some_and(|t| !t.text.is_empty() && t.text.chars().all(|c| c == '\n'))
        {
            tokens.pop();
        }
        for Token { text, style } in tokens {
            if style.bg_color.is_some() || style.border.is_some() {
                tracing::debug!(text = %text, "Run background and border are not supported");
            }
            let explicit = Style {
                italic: style.italic,
                bold: style.bold,
                underline: style.underline,
                color: style.color,
                ..verbatim.clone()
            };
            self.add_text(&text, &explicit)?;
        }
        Ok(())
    }

    /// Add a picture at the current bounds. Without an explicit size the
    /// picture is fitted into the bounds along its binding dimension.
    fn add_picture(
        &mut self,
        what: &'static str,
        src: &str,
        geometry: &Geometry,
        rotation: Option<f64>,
    ) -> Result<ShapeId, RenderError> {
        let slide = self.require_slide(what)?;
        let size = self.slide_size();
        let base = self.layout.base_rect(self.slide_rect());
        let path = Path::new(src);

        let left = geometry.left.map_or(base.left, |l| l.resolve_for("left", size));
        let top = geometry.top.map_or(base.top, |l| l.resolve_for("top", size));
        let mut width = geometry.width.map(|l| l.resolve_for("width", size));
        let mut height = geometry.height.map(|l| l.resolve_for("height", size));

        if width.is_none() && height.is_none() && base.width > Emu::ZERO && base.height > Emu::ZERO
        {
            let (px_width, px_height) = self.deck.image_size(path)?;
            // Compare aspect ratios: the image is relatively taller than the
            // bounds when px_w / bounds_w <= px_h / bounds_h.
            let taller = f64::from(px_width) * base.height.as_f64()
                <= f64::from(px_height) * base.width.as_f64();
            if taller {
                height = Some(base.height);
            } else {
                width = Some(base.width);
            }
        }

        let shape = self
            .deck
            .add_picture(slide, path, left, top, width, height)?;
        if let Some(degrees) = rotation {
            self.deck.set_rotation(slide, shape, degrees)?;
        }
        tracing::debug!(slide, src, "Added picture");
        Ok(shape)
    }

    fn visit_img(&mut self, options: &ImgOptions) -> Result<(), RenderError> {
        self.add_picture("img", &options.src, &options.geometry, options.rotation)
            .map(drop)
    }

    fn visit_box(&mut self, node: &Node, options: &BoxOptions) -> Result<(), RenderError> {
        let slide = self.require_slide("box")?;
        let base = self.layout.base_rect(self.slide_rect());
        let rect = options.geometry.place(base, self.slide_size());

        let shape = self.deck.add_text_box(slide, rect)?;
        let frame = TextFrameRef::shape(slide, shape);
        self.deck.set_word_wrap(frame, None)?;

        let style = Style {
            bg_color: options.bg_color,
            bg_alpha: options.bg_alpha,
            valign: options.valign,
            font_size: options.font_size,
            column_widths: options.column_widths.clone(),
            ..Style::default()
        };
        let resolved = style.resolve(&self.layout.style());
        if let Some(color) = resolved.bg_color {
            self.deck.set_fill(slide, shape, color)?;
        }
        if let Some(alpha) = resolved.bg_alpha {
            self.deck.set_fill_alpha(slide, shape, alpha)?;
        }
        if let Some(valign) = resolved.valign {
            self.deck.set_anchor(frame, anchor(valign))?;
        }

        self.layout.open_box(rect, frame, &style);
        let result = self.visit_children(&node.children);
        let closed = self.layout.close_box();
        result.and(closed)
    }

    fn visit_table(&mut self, node: &Node) -> Result<(), RenderError> {
        let slide = self.require_slide("table")?;
        let count = |kind: &NodeKind| {
            node.children
                .iter()
                .find(|child| &child.kind == kind)
                .map_or(0, |child| child.children.len())
        };
        let columns = count(&NodeKind::TableHead);
        let rows = 1 + count(&NodeKind::TableBody);

        let base = self.layout.base_rect(self.slide_rect());
        let rect = Rect::new(base.left, base.top, base.width, Emu::ZERO);
        let shape = self.deck.add_table(slide, rows, columns, rect)?;
        tracing::debug!(slide, rows, columns, "Added table");

        if let Some(weights) = self.layout.style().column_widths {
            self.apply_column_widths(slide, shape, columns, base.width, &weights)?;
        }

        let previous = self.table.replace(TableState::new(slide, shape));
        let result = self.visit_children(&node.children);
        self.table = previous;
        result
    }

    fn apply_column_widths(
        &mut self,
        slide: usize,
        shape: ShapeId,
        columns: usize,
        table_width: Emu,
        weights: &[u32],
    ) -> Result<(), RenderError> {
        let total: u64 = weights.iter().map(|&w| u64::from(w)).sum();
        if total == 0 {
            tracing::warn!("Ignoring column widths that sum to zero");
            return Ok(());
        }
        if weights.len() != columns {
            tracing::warn!(
                weights = weights.len(),
                columns,
                "Column width count does not match table columns"
            );
        }
        #[allow(clippy::cast_precision_loss)]
        let total = total as f64;
        for (column, &weight) in weights.iter().take(columns).enumerate() {
            let width = Emu::scaled(f64::from(weight) / total * table_width.as_f64(), 1);
            self.deck.set_column_width(slide, shape, column, width)?;
        }
        Ok(())
    }

    fn visit_row(&mut self, node: &Node) -> Result<(), RenderError> {
        let Some(table) = self.table.as_mut() else {
            return Err(RenderError::NoActiveTable);
        };
        table.start_row();
        for cell in &node.children {
            self.visit(cell)?;
            if let Some(table) = self.table.as_mut() {
                table.next_cell();
            }
        }
        if let Some(table) = self.table.as_mut() {
            table.end_row();
        }
        Ok(())
    }

    fn visit_cell(&mut self, node: &Node) -> Result<(), RenderError> {
        let table = self.table.ok_or(RenderError::NoActiveTable)?;
        let (row, column) = table.cell();
        self.layout
            .open_cell(TextFrameRef::cell(table.slide, table.shape, row, column));
        let result = self
            .new_paragraph()
            .and_then(|()| self.visit_children(&node.children));
        let closed = self.layout.close_cell();
        result.and(closed)
    }

    fn visit_title(&mut self, options: &TitleOptions) -> Result<(), RenderError> {
        let slide = self.require_slide("title")?;
        let Some(shape) = self.deck.title_shape(slide)? else {
            tracing::warn!(slide, "Slide has no title to adjust");
            return Ok(());
        };
        let size = self.slide_size();

        let current = self.deck.shape_rect(slide, shape)?;
        let rect = options.geometry.place(current, size);
        self.deck.set_shape_rect(slide, shape, rect)?;

        if let Some(color) = options.bg_color {
            self.deck.set_fill(slide, shape, color)?;
        }

        let margin = |length: Option<Length>, key: &str| {
            length.map(|l| l.resolve_for(key, size))
        };
        let margins = Margins {
            left: margin(options.margin_left, "margin_left"),
            right: margin(options.margin_right, "margin_right"),
            top: margin(options.margin_top, "margin_top"),
            bottom: margin(options.margin_bottom, "margin_bottom"),
        };
        self.deck
            .set_margins(TextFrameRef::shape(slide, shape), margins)?;

        self.deck.bring_to_front(slide, shape)?;
        Ok(())
    }

    fn visit_slide(&mut self, options: &SlideOptions) -> Result<(), RenderError> {
        self.require_slide("slide")?;

        if let Some(layout) = &options.layout {
            if self.options.hoist_slide_directives {
                tracing::debug!(layout = %layout, "Slide layout already applied at creation");
            } else {
                self.replace_slide_layout(layout)?;
            }
        }

        if let Some(background) = &options.background {
            let slide = self.require_slide("slide")?;
            let size = self.slide_size();
            let geometry = &options.geometry;
            let left = geometry.left.map_or(Emu::ZERO, |l| l.resolve_for("left", size));
            let top = geometry.top.map_or(Emu::ZERO, |l| l.resolve_for("top", size));
            let width = geometry.width.map(|l| l.resolve_for("width", size));
            let height = geometry.height.map(|l| l.resolve_for("height", size));

            let shape =
                self.deck
                    .add_picture(slide, Path::new(background), left, top, width, height)?;
            self.deck.send_to_back(slide, shape)?;
            tracing::debug!(slide, background = %background, "Added slide background");
        }
        Ok(())
    }

    /// Drop the current slide and recreate it with another layout, keeping
    /// its title. Anything already placed on the slide is lost.
    fn replace_slide_layout(&mut self, layout: &str) -> Result<(), RenderError> {
        let slide = self.require_slide("slide")?;
        let title = self.deck.title(slide)?;
        self.close_slide()?;
        self.deck.remove_last_slide()?;
        tracing::debug!(slide, layout, "Replacing slide to change layout");
        self.open_slide(layout, &title)
    }

    fn visit_setstyle(&mut self, options: &SetStyleOptions) -> Result<(), RenderError> {
        if self.slide.is_none() {
            tracing::warn!("Ignoring setstyle before the first slide");
            return Ok(());
        }
        let style = Style {
            font_size: options.font_size,
            color: options.color,
            fontname: options.font_name.clone(),
            column_widths: options.column_widths.clone(),
            ..Style::default()
        };
        self.layout.set_style(&style)
    }
}

fn text_style(options: &TextStyleOptions) -> Style {
    Style {
        font_size: options.font_size,
        color: options.color,
        fontname: options.font_name.clone(),
        ..Style::default()
    }
}

fn anchor(valign: VAlign) -> Anchor {
    match valign {
        VAlign::Top => Anchor::Top,
        VAlign::Middle => Anchor::Middle,
        VAlign::Bottom => Anchor::Bottom,
    }
}

/// Layout named by the last `slide` directive before the next slide-opening
/// heading.
fn hoisted_layout(following: &[Node]) -> Option<&String> {
    following
        .iter()
        .take_while(|node| !matches!(node.kind, NodeKind::Heading { level: 1 | 2 }))
        .filter_map(|node| match &node.kind {
            NodeKind::Slide(options) => options.layout.as_ref(),
            _ => None,
        })
        .last()
}

/// Log a failing node once, at the innermost level, and wrap the error.
fn node_error(node: &Node, error: RenderError) -> RenderError {
    if matches!(error, RenderError::Node { .. }) {
        return error;
    }
    tracing::error!(node = node.kind.name(), %error, "Failed to render node");
    RenderError::Node {
        node: node.kind.name(),
        source: Box::new(error),
    }
}
