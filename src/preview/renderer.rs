//! Markdown Rendering for the Preview
//!
//! Two renderers share one comrak parse configuration:
//!
//! - [`ComrakRenderer`] produces the HTML fragment for the printable page and
//!   sits behind the [`MarkdownRenderer`] trait so it can be swapped out.
//! - [`NativeRenderer`] draws the parsed AST straight into egui, scaled by
//!   the preview zoom. It never touches external resources.

use std::collections::HashMap;

use eframe::egui::text::LayoutJob;
use eframe::egui::{self, FontId, RichText, Stroke, Ui, Vec2};

use crate::markdown::parser::{
    render_to_html, ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType, MarkdownOptions,
};
use crate::markdown::syntax::code_layout_job;
use crate::theme::Palette;

/// Body text size at zoom 1.0.
pub const BASE_FONT_SIZE: f32 = 16.0;

const INDENT_WIDTH: f32 = 20.0;

// ─────────────────────────────────────────────────────────────────────────────
// HTML
// ─────────────────────────────────────────────────────────────────────────────

/// Converts markdown text to an HTML fragment.
pub trait MarkdownRenderer {
    fn render_html(&self, text: &str) -> String;
}

/// GitHub-flavoured markdown through comrak.
#[derive(Debug, Clone, Default)]
pub struct ComrakRenderer {
    options: MarkdownOptions,
}

impl ComrakRenderer {
    pub fn new(options: MarkdownOptions) -> Self {
        Self { options }
    }
}

impl MarkdownRenderer for ComrakRenderer {
    fn render_html(&self, text: &str) -> String {
        render_to_html(text, &self.options)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Native
// ─────────────────────────────────────────────────────────────────────────────

/// Inline formatting accumulated from enclosing nodes, so `***x***` comes
/// out bold and italic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct InlineStyle {
    strong: bool,
    emphasis: bool,
    strikethrough: bool,
}

impl InlineStyle {
    fn with_strong(self) -> Self {
        Self {
            strong: true,
            ..self
        }
    }

    fn with_emphasis(self) -> Self {
        Self {
            emphasis: true,
            ..self
        }
    }

    fn with_strikethrough(self) -> Self {
        Self {
            strikethrough: true,
            ..self
        }
    }
}

/// Highlighted code blocks of one document, keyed by their first source line.
pub type CodeJobs = HashMap<usize, LayoutJob>;

/// Draws a [`MarkdownDocument`] into an egui `Ui`.
pub struct NativeRenderer<'a> {
    palette: &'a Palette,
    zoom: f32,
    dark: bool,
    code_jobs: Option<&'a CodeJobs>,
}

impl<'a> NativeRenderer<'a> {
    pub fn new(palette: &'a Palette, zoom: f32) -> Self {
        Self {
            palette,
            zoom,
            dark: palette.dark,
            code_jobs: None,
        }
    }

    /// Draw code blocks from `jobs` instead of highlighting them every frame.
    pub fn with_code_jobs(self, jobs: &'a CodeJobs) -> Self {
        Self {
            code_jobs: Some(jobs),
            ..self
        }
    }

    /// Highlight every code block of `document` at this zoom and palette.
    pub fn code_jobs(&self, document: &MarkdownDocument) -> CodeJobs {
        let mut jobs = CodeJobs::new();
        self.collect_code_jobs(&document.root, &mut jobs);
        jobs
    }

    fn collect_code_jobs(&self, node: &MarkdownNode, jobs: &mut CodeJobs) {
        match &node.node_type {
            MarkdownNodeType::CodeBlock { language, literal } => {
                jobs.insert(node.start_line, self.code_job(language, literal));
            }
            MarkdownNodeType::HtmlBlock(html) => {
                jobs.insert(node.start_line, self.code_job("html", html));
            }
            _ => {
                for child in &node.children {
                    self.collect_code_jobs(child, jobs);
                }
            }
        }
    }

    pub fn font_size(&self) -> f32 {
        BASE_FONT_SIZE * self.zoom
    }

    pub fn heading_size(&self, level: u8) -> f32 {
        let scale = match level {
            1 => 2.0,
            2 => 1.5,
            3 => 1.25,
            4 => 1.1,
            5 => 1.0,
            _ => 0.9,
        };
        self.font_size() * scale
    }

    pub fn show(&self, ui: &mut Ui, document: &MarkdownDocument) {
        ui.spacing_mut().item_spacing.y = 6.0 * self.zoom;
        for child in &document.root.children {
            self.block(ui, child, 0);
        }
    }

    fn block(&self, ui: &mut Ui, node: &MarkdownNode, indent: usize) {
        match &node.node_type {
            MarkdownNodeType::Heading { level } => {
                ui.add_space(self.font_size() * 0.5);
                let size = self.heading_size(*level);
                self.inline_run(ui, node, indent, size, InlineStyle::default().with_strong());
                if *level <= 2 {
                    self.rule(ui);
                }
            }
            MarkdownNodeType::Paragraph => {
                self.inline_run(ui, node, indent, self.font_size(), InlineStyle::default());
            }
            MarkdownNodeType::CodeBlock { language, literal } => {
                self.code_block(ui, node.start_line, language, literal, indent);
            }
            MarkdownNodeType::HtmlBlock(html) => {
                self.code_block(ui, node.start_line, "html", html, indent);
            }
            MarkdownNodeType::BlockQuote => self.blockquote(ui, node, indent),
            MarkdownNodeType::List { list_type, .. } => self.list(ui, node, *list_type, indent),
            MarkdownNodeType::ThematicBreak => self.rule(ui),
            MarkdownNodeType::Table { .. } => self.table(ui, node),
            MarkdownNodeType::FootnoteDefinition(name) => {
                ui.horizontal(|ui| {
                    ui.add_space(indent as f32 * INDENT_WIDTH);
                    ui.label(
                        RichText::new(format!("[{}]", name))
                            .size(self.font_size() * 0.85)
                            .color(self.palette.muted),
                    );
                    ui.vertical(|ui| {
                        for child in &node.children {
                            self.block(ui, child, 0);
                        }
                    });
                });
            }
            MarkdownNodeType::Skipped => {}
            _ if node.is_block() => {
                for child in &node.children {
                    self.block(ui, child, indent);
                }
            }
            // Stray inline content at block level
            _ => self.inline_run(ui, node, indent, self.font_size(), InlineStyle::default()),
        }
    }

    fn inline_run(
        &self,
        ui: &mut Ui,
        node: &MarkdownNode,
        indent: usize,
        size: f32,
        style: InlineStyle,
    ) {
        ui.horizontal_wrapped(|ui| {
            ui.spacing_mut().item_spacing.x = 0.0;
            ui.add_space(indent as f32 * INDENT_WIDTH);
            for child in &node.children {
                self.inline(ui, child, size, style);
            }
        });
    }

    fn inline(&self, ui: &mut Ui, node: &MarkdownNode, size: f32, style: InlineStyle) {
        match &node.node_type {
            MarkdownNodeType::Text(text) => {
                ui.label(self.styled(text, size, style));
            }
            MarkdownNodeType::Code(code) => {
                ui.label(
                    RichText::new(code)
                        .font(FontId::monospace(size * 0.9))
                        .color(self.palette.code_fg)
                        .background_color(self.palette.code_bg),
                );
            }
            MarkdownNodeType::Strong => self.inline_children(ui, node, size, style.with_strong()),
            MarkdownNodeType::Emphasis => {
                self.inline_children(ui, node, size, style.with_emphasis())
            }
            MarkdownNodeType::Strikethrough => {
                self.inline_children(ui, node, size, style.with_strikethrough())
            }
            MarkdownNodeType::Link { url } => {
                let text = node.text_content();
                let label = if text.is_empty() { url.clone() } else { text };
                ui.hyperlink_to(
                    RichText::new(label).size(size).color(self.palette.accent),
                    url,
                )
                .on_hover_text(url);
            }
            MarkdownNodeType::Image { url, title } => {
                let alt = node.text_content();
                let label = format!("[image: {}]", if alt.is_empty() { url } else { &alt });
                let response =
                    ui.hyperlink_to(RichText::new(label).size(size).color(self.palette.accent), url);
                if !title.is_empty() {
                    response.on_hover_text(title);
                }
            }
            MarkdownNodeType::FootnoteReference(name) => {
                ui.label(
                    RichText::new(format!("[{}]", name))
                        .size(size * 0.75)
                        .color(self.palette.accent),
                );
            }
            MarkdownNodeType::HtmlInline(html) => {
                ui.label(
                    RichText::new(html)
                        .font(FontId::monospace(size * 0.9))
                        .color(self.palette.muted),
                );
            }
            MarkdownNodeType::SoftBreak => {
                ui.label(RichText::new(" ").size(size));
            }
            MarkdownNodeType::LineBreak => ui.end_row(),
            _ => self.inline_children(ui, node, size, style),
        }
    }

    fn inline_children(&self, ui: &mut Ui, node: &MarkdownNode, size: f32, style: InlineStyle) {
        for child in &node.children {
            self.inline(ui, child, size, style);
        }
    }

    fn styled(&self, text: &str, size: f32, style: InlineStyle) -> RichText {
        let mut rich = RichText::new(text).size(size).color(self.palette.text);
        if style.strong {
            // No bold face in egui's default fonts
            rich = rich.strong().color(self.palette.strong);
        }
        if style.emphasis {
            rich = rich.italics();
        }
        if style.strikethrough {
            rich = rich.strikethrough();
        }
        rich
    }

    fn code_job(&self, language: &str, code: &str) -> LayoutJob {
        code_layout_job(
            code.trim_end_matches('\n'),
            language,
            self.dark,
            self.palette.code_fg,
            self.font_size() * 0.85,
        )
    }

    fn code_block(
        &self,
        ui: &mut Ui,
        start_line: usize,
        language: &str,
        code: &str,
        indent: usize,
    ) {
        let job = match self.code_jobs.and_then(|jobs| jobs.get(&start_line)) {
            Some(job) => job.clone(),
            None => self.code_job(language, code),
        };
        ui.horizontal(|ui| {
            ui.add_space(indent as f32 * INDENT_WIDTH);
            egui::Frame::none()
                .fill(self.palette.code_bg)
                .stroke(Stroke::new(1.0, self.palette.border))
                .inner_margin(10.0 * self.zoom)
                .rounding(6.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(job);
                });
        });
    }

    fn blockquote(&self, ui: &mut Ui, node: &MarkdownNode, indent: usize) {
        let quoted = Palette {
            text: self.palette.muted,
            strong: self.palette.muted,
            ..*self.palette
        };
        let inner_renderer = NativeRenderer {
            palette: &quoted,
            zoom: self.zoom,
            dark: self.dark,
            code_jobs: self.code_jobs,
        };
        ui.horizontal(|ui| {
            ui.add_space(indent as f32 * INDENT_WIDTH);
            let left = ui.cursor().left();
            ui.add_space(12.0);
            let inner = ui.vertical(|ui| {
                for child in &node.children {
                    inner_renderer.block(ui, child, 0);
                }
            });
            let rect = inner.response.rect;
            let bar = egui::Rect::from_min_max(
                egui::pos2(left, rect.top()),
                egui::pos2(left + 4.0, rect.bottom()),
            );
            ui.painter().rect_filled(bar, 0.0, self.palette.border);
        });
    }

    fn list(&self, ui: &mut Ui, node: &MarkdownNode, list_type: ListType, indent: usize) {
        for (index, item) in node.children.iter().enumerate() {
            let marker = match item.node_type {
                MarkdownNodeType::TaskItem { checked } => task_marker(checked).to_string(),
                _ => list_marker(list_type, index),
            };
            ui.horizontal(|ui| {
                ui.add_space(indent as f32 * INDENT_WIDTH + 4.0);
                ui.label(
                    RichText::new(marker)
                        .size(self.font_size())
                        .color(self.palette.accent),
                );
                ui.vertical(|ui| {
                    for child in &item.children {
                        match child.node_type {
                            // Checkbox state lives on its own node in some comrak versions
                            MarkdownNodeType::TaskItem { .. } if child.children.is_empty() => {}
                            _ => self.block(ui, child, 0),
                        }
                    }
                });
            });
        }
    }

    fn table(&self, ui: &mut Ui, node: &MarkdownNode) {
        egui::Frame::none()
            .stroke(Stroke::new(1.0, self.palette.border))
            .inner_margin(6.0)
            .show(ui, |ui| {
                egui::Grid::new(("preview_table", node.start_line))
                    .striped(true)
                    .spacing(Vec2::new(16.0 * self.zoom, 6.0 * self.zoom))
                    .show(ui, |ui| {
                        for row in &node.children {
                            let header =
                                matches!(row.node_type, MarkdownNodeType::TableRow { header: true });
                            let style = if header {
                                InlineStyle::default().with_strong()
                            } else {
                                InlineStyle::default()
                            };
                            for cell in &row.children {
                                ui.horizontal_wrapped(|ui| {
                                    ui.spacing_mut().item_spacing.x = 0.0;
                                    self.inline_children(ui, cell, self.font_size(), style);
                                });
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    fn rule(&self, ui: &mut Ui) {
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(ui.available_width(), 1.0), egui::Sense::hover());
        ui.painter().rect_filled(rect, 0.0, self.palette.border);
        ui.add_space(4.0);
    }
}

fn list_marker(list_type: ListType, index: usize) -> String {
    match list_type {
        ListType::Bullet => "•".to_string(),
        ListType::Ordered { start, delimiter } => format!("{}{}", start + index, delimiter),
    }
}

fn task_marker(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markdown::parser::parse_markdown;

    #[test]
    fn test_comrak_renderer_gfm() {
        let renderer = ComrakRenderer::default();
        let html = renderer.render_html("| a |\n|---|\n| 1 |\n\n~~x~~ https://example.com");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>x</del>"));
        assert!(html.contains("<a href=\"https://example.com\">"));
    }

    #[test]
    fn test_renderer_is_swappable() {
        struct Plain;
        impl MarkdownRenderer for Plain {
            fn render_html(&self, text: &str) -> String {
                format!("<pre>{}</pre>", text)
            }
        }
        let renderers: Vec<Box<dyn MarkdownRenderer>> =
            vec![Box::new(ComrakRenderer::default()), Box::new(Plain)];
        assert!(renderers[1].render_html("x").starts_with("<pre>"));
        assert!(renderers[0].render_html("# x").contains("<h1>"));
    }

    #[test]
    fn test_font_sizes_follow_zoom() {
        let palette = Palette::light();
        let normal = NativeRenderer::new(&palette, 1.0);
        let zoomed = NativeRenderer::new(&palette, 2.0);
        assert_eq!(normal.font_size(), BASE_FONT_SIZE);
        assert_eq!(zoomed.font_size(), BASE_FONT_SIZE * 2.0);
        assert!(normal.heading_size(1) > normal.heading_size(2));
        assert_eq!(zoomed.heading_size(1), normal.heading_size(1) * 2.0);
    }

    #[test]
    fn test_list_markers() {
        assert_eq!(list_marker(ListType::Bullet, 3), "•");
        let ordered = ListType::Ordered {
            start: 3,
            delimiter: ')',
        };
        assert_eq!(list_marker(ordered, 0), "3)");
        assert_eq!(list_marker(ordered, 2), "5)");
        assert_eq!(task_marker(true), "[x]");
    }

    #[test]
    fn test_inline_style_accumulates() {
        let style = InlineStyle::default().with_strong().with_emphasis();
        assert!(style.strong && style.emphasis && !style.strikethrough);
    }

    #[test]
    fn test_draws_every_node_kind() {
        let text = "---\ntitle: x\n---\n# Title\n\nSome **bold** _it_ ~~s~~ `c` [l](u) ![a](i.png)[^1]\n\n\
                    > quote\n\n- a\n  - nested\n- [x] done\n\n1. one\n\n```rust\nfn x() {}\n```\n\n\
                    | h |\n|---|\n| c |\n\n---\n\n<div>raw</div>\n\n[^1]: note\n";
        let document = parse_markdown(text);
        let palette = Palette::dark();
        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                NativeRenderer::new(&palette, 1.5).show(ui, &document);
            });
        });
    }

    #[test]
    fn test_code_jobs_cover_nested_blocks() {
        let text = "```rust\nfn a() {}\n```\n\n> ```\n> quoted\n> ```\n\n- item\n\n  ```py\n  x = 1\n  ```\n\n<div>raw</div>\n";
        let document = parse_markdown(text);
        let palette = Palette::light();
        let jobs = NativeRenderer::new(&palette, 1.0).code_jobs(&document);

        let mut lines: Vec<usize> = jobs.keys().copied().collect();
        lines.sort_unstable();
        assert_eq!(lines, vec![1, 5, 11, 15]);
        assert_eq!(jobs[&1].text, "fn a() {}");
        assert_eq!(jobs[&5].text, "quoted");

        let zoomed = NativeRenderer::new(&palette, 2.0).code_jobs(&document);
        let size = |jobs: &CodeJobs| jobs[&1].sections[0].format.font_id.size;
        assert_eq!(size(&zoomed), size(&jobs) * 2.0);
    }
}
