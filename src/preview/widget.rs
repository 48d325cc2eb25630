//! Preview Surface
//!
//! Scrollable rendered view of the document. The parse is cached per content
//! version, and highlighted code blocks per version, zoom and appearance;
//! drawing happens every frame through [`NativeRenderer`].

use eframe::egui::{self, ScrollArea, Ui, Vec2};
use log::debug;

use crate::markdown::parser::{parse_markdown, MarkdownDocument};
use crate::mode::Pane;
use crate::preview::renderer::{CodeJobs, NativeRenderer};
use crate::preview::sync_scroll::{ScrollCoordinator, ScrollGeometry, SurfaceSync};
use crate::theme::Palette;

/// What happened in the preview this frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreviewOutput {
    /// Pointer pressed or wheel scrolled over the preview
    pub interacted: bool,
    /// A user scroll was reported to the coordinator
    pub reported_scroll: bool,
}

/// One parsed version of the document.
#[derive(Debug)]
struct ParsedPreview {
    version: u64,
    document: MarkdownDocument,
    /// Code blocks highlighted for `(zoom bits, dark)`
    code_jobs: Option<((u32, bool), CodeJobs)>,
}

/// Preview pane state kept across frames.
#[derive(Debug)]
pub struct PreviewPane {
    sync: SurfaceSync,
    cached: Option<ParsedPreview>,
}

impl Default for PreviewPane {
    fn default() -> Self {
        Self::new()
    }
}

impl PreviewPane {
    pub fn new() -> Self {
        Self {
            sync: SurfaceSync::new(Pane::Preview),
            cached: None,
        }
    }

    pub fn sync_mut(&mut self) -> &mut SurfaceSync {
        &mut self.sync
    }

    /// Parsed document for `version`, re-parsing only when the version moved.
    pub fn document(&mut self, text: &str, version: u64) -> &MarkdownDocument {
        &cached_parse(&mut self.cached, text, version).document
    }

    pub fn show(
        &mut self,
        ui: &mut Ui,
        text: &str,
        version: u64,
        palette: &Palette,
        zoom: f32,
        coordinator: &mut ScrollCoordinator,
    ) -> PreviewOutput {
        self.sync.tick();
        let target = self
            .sync
            .last_geometry()
            .and_then(|geometry| self.sync.pending_target(geometry, coordinator));

        let mut area = ScrollArea::vertical()
            .id_source("preview_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = target {
            area = area.vertical_scroll_offset(offset);
        }

        let parsed = cached_parse(&mut self.cached, text, version);
        let key = (zoom.to_bits(), palette.dark);
        if parsed.code_jobs.as_ref().map_or(true, |(cached, _)| *cached != key) {
            let jobs = NativeRenderer::new(palette, zoom).code_jobs(&parsed.document);
            debug!("Highlighted {} code blocks at zoom {}", jobs.len(), zoom);
            parsed.code_jobs = Some((key, jobs));
        }
        let document = &parsed.document;
        let mut renderer = NativeRenderer::new(palette, zoom);
        if let Some((_, jobs)) = &parsed.code_jobs {
            renderer = renderer.with_code_jobs(jobs);
        }
        let output = area.show(ui, |ui| {
            egui::Frame::none()
                .fill(palette.background)
                .inner_margin(egui::Margin::symmetric(24.0 * zoom, 16.0 * zoom))
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    renderer.show(ui, document);
                });
        });

        if target.is_some() {
            self.sync.applied();
        }
        let reported_scroll = self
            .sync
            .observe(ScrollGeometry::from_output(&output), coordinator);

        let interacted = ui.rect_contains_pointer(output.inner_rect)
            && ui.input(|i| i.pointer.any_pressed() || i.raw_scroll_delta != Vec2::ZERO);

        PreviewOutput {
            interacted,
            reported_scroll,
        }
    }
}

/// The cached parse for `version`, re-parsing only when the version moved.
fn cached_parse<'a>(
    cached: &'a mut Option<ParsedPreview>,
    text: &str,
    version: u64,
) -> &'a mut ParsedPreview {
    if cached.as_ref().map_or(false, |parsed| parsed.version != version) {
        *cached = None;
    }
    cached.get_or_insert_with(|| {
        debug!("Parsing preview for content version {}", version);
        ParsedPreview {
            version,
            document: parse_markdown(text),
            code_jobs: None,
        }
    })
}
