//! Text editor widget for mdview
//!
//! This module implements the raw-text editor using egui's TextEdit with a
//! custom layouter that paints the regex highlighter's spans. The pane also
//! takes part in scroll sync and exposes the selection for formatting
//! commands.

use std::ops::Range;
use std::sync::Arc;

use eframe::egui::text::{CCursor, LayoutJob};
use eframe::egui::text_edit::TextEditState;
use eframe::egui::text_selection::CCursorRange;
use eframe::egui::{self, Color32, FontId, ScrollArea, TextEdit, TextFormat, Ui};
use log::debug;

use crate::markdown::highlighter::{
    highlight_painted, highlight_window, paint, FontFace, PaintedSpan, LARGE_DOCUMENT_BYTES,
};
use crate::mode::Pane;
use crate::preview::{ScrollCoordinator, ScrollGeometry, SurfaceSync};
use crate::state::Document;
use crate::theme::Palette;

/// Bytes highlighted on each side of the visible position in large documents.
const WINDOW_RADIUS_BYTES: usize = 32 * 1024;

/// Result of showing the editor for one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EditorOutput {
    /// Whether the text was modified by typing
    pub changed: bool,
    /// The text edit has keyboard focus
    pub focused: bool,
    /// A user scroll was reported to the coordinator
    pub reported_scroll: bool,
}

/// Editor pane state kept across frames.
#[derive(Debug)]
pub struct EditorPane {
    sync: SurfaceSync,
    /// Ordered `(start, end)` character indices of the last known selection
    selection: (usize, usize),
    /// Selection to push into the text edit on the next frame
    pending_selection: Option<(usize, usize)>,
}

impl Default for EditorPane {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorPane {
    pub fn new() -> Self {
        Self {
            sync: SurfaceSync::new(Pane::Editor),
            selection: (0, 0),
            pending_selection: None,
        }
    }

    pub fn sync_mut(&mut self) -> &mut SurfaceSync {
        &mut self.sync
    }

    /// Current selection as ordered character indices.
    pub fn selection(&self) -> (usize, usize) {
        self.selection
    }

    /// Select a range on the next frame and focus the editor.
    pub fn set_selection(&mut self, selection: (usize, usize)) {
        self.selection = selection;
        self.pending_selection = Some(selection);
    }

    /// Forget the selection (new or reloaded text).
    pub fn reset_selection(&mut self) {
        self.selection = (0, 0);
        self.pending_selection = None;
    }

    /// Show the editor and return the output.
    pub fn show(
        &mut self,
        ui: &mut Ui,
        document: &mut Document,
        palette: &Palette,
        font_size: f32,
        word_wrap: bool,
        coordinator: &mut ScrollCoordinator,
    ) -> EditorOutput {
        self.sync.tick();
        let target = self
            .sync
            .last_geometry()
            .and_then(|geometry| self.sync.pending_target(geometry, coordinator));

        // Include content_version in the ID so that egui treats the TextEdit as
        // a new widget when the text is replaced from outside.
        let id = ui.id().with("editor").with(document.content_version());

        if let Some((start, end)) = self.pending_selection.take() {
            let mut state = TextEditState::load(ui.ctx(), id).unwrap_or_default();
            state
                .cursor
                .set_char_range(Some(CCursorRange::two(CCursor::new(start), CCursor::new(end))));
            state.store(ui.ctx(), id);
            ui.memory_mut(|m| m.request_focus(id));
        }

        let visible_fraction = self
            .sync
            .last_geometry()
            .and_then(|g| g.fraction())
            .unwrap_or(0.0);
        let palette = *palette;
        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let spans = painted_spans(text, &palette, visible_fraction);
            let wrap_width = if word_wrap { wrap_width } else { f32::INFINITY };
            let job = layout_job(text, &spans, &palette, font_size, wrap_width);
            ui.fonts(|f| f.layout_job(job))
        };

        let mut area = ScrollArea::new([!word_wrap, true])
            .id_source("editor_scroll")
            .auto_shrink([false, false]);
        if let Some(offset) = target {
            area = area.vertical_scroll_offset(offset);
        }

        let text = &mut document.text;
        let output = area.show(ui, |ui| {
            TextEdit::multiline(text)
                .id(id)
                .frame(false)
                .font(FontId::monospace(font_size))
                .desired_width(f32::INFINITY)
                .layouter(&mut layouter)
                .show(ui)
        });

        if target.is_some() {
            self.sync.applied();
        }
        let reported_scroll = self
            .sync
            .observe(ScrollGeometry::from_output(&output), coordinator);

        let text_output = output.inner;
        let changed = text_output.response.changed();
        if changed {
            document.mark_edited();
            debug!("Editor edit, revision {}", document.revision());
        }

        if let Some(range) = text_output.cursor_range {
            let primary = range.primary.ccursor.index;
            let secondary = range.secondary.ccursor.index;
            self.selection = (primary.min(secondary), primary.max(secondary));
        }

        EditorOutput {
            changed,
            focused: text_output.response.has_focus(),
            reported_scroll,
        }
    }
}

/// Highlight `text`, windowed around the visible position for large documents.
fn painted_spans(text: &str, palette: &Palette, visible_fraction: f32) -> Vec<PaintedSpan> {
    if text.len() <= LARGE_DOCUMENT_BYTES {
        return highlight_painted(text, palette);
    }
    let window = visible_window(text.len(), visible_fraction);
    paint(text, &highlight_window(text, window), palette)
}

fn visible_window(len: usize, fraction: f32) -> Range<usize> {
    let center = (len as f32 * fraction.clamp(0.0, 1.0)) as usize;
    center.saturating_sub(WINDOW_RADIUS_BYTES)..(center + WINDOW_RADIUS_BYTES).min(len)
}

/// Turn painted spans into a layout job for the text edit.
///
/// egui's default fonts have no bold face, so bold spans take the palette's
/// strong color instead.
fn layout_job(
    text: &str,
    spans: &[PaintedSpan],
    palette: &Palette,
    font_size: f32,
    wrap_width: f32,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;

    let font_id = FontId::monospace(font_size);
    for span in spans {
        let Some(section) = text.get(span.range.clone()) else {
            continue;
        };
        let style = span.style;
        let color = match style.face {
            FontFace::Bold if style.color == palette.text => palette.strong,
            _ => style.color,
        };
        job.append(
            section,
            0.0,
            TextFormat {
                font_id: font_id.clone(),
                color,
                background: style.background,
                italics: style.face == FontFace::Italic,
                ..Default::default()
            },
        );
    }

    // Spans cover the whole text; an empty text still needs a row
    if spans.is_empty() {
        job.append(
            text,
            0.0,
            TextFormat {
                font_id,
                color: palette.text,
                background: Color32::TRANSPARENT,
                ..Default::default()
            },
        );
    }
    job
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
