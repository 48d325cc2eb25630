//! Bidirectional Sync Scrolling for the Editor and Preview
//!
//! Both surfaces scroll independently and describe their position as a
//! *fraction* of their scrollable range. A single [`ScrollCoordinator`]
//! holds the latest fraction and which surface produced it; each surface
//! owns a [`SurfaceSync`] that reports user scrolls and applies the other
//! surface's fraction.
//!
//! # Feedback prevention
//!
//! Applying a fraction moves the follower, and the follower would normally
//! report that movement back. Each surface therefore runs a small phase
//! machine:
//!
//! ```text
//!   Idle --pending_target()--> ApplyingExternalScroll --applied()--> PendingClear
//!    ^                                                                    |
//!    +-------------------------------- tick() (next frame) --------------+
//! ```
//!
//! Only an `Idle` surface may report. The guard stays up until the next
//! frame, which covers the offset change egui reports in the frame the
//! programmatic scroll happens.
//!
//! # Layout changes
//!
//! The target offset is computed from the previous frame's geometry, before
//! the surface lays out. When the content height changed in between (reload,
//! zoom, theme), the scroll lands on the wrong fraction. The observation made
//! in the applying frame catches that and leaves the fraction unapplied, so
//! the next frame applies it again against the new geometry.
//!
//! # Usage
//!
//! ```ignore
//! sync.tick();
//! let target = sync.last_geometry().and_then(|g| sync.pending_target(g, coordinator));
//! let mut area = ScrollArea::vertical();
//! if let Some(offset) = target {
//!     area = area.vertical_scroll_offset(offset);
//! }
//! let output = area.show(ui, |ui| { /* content */ });
//! if target.is_some() {
//!     sync.applied();
//! }
//! sync.observe(ScrollGeometry::from_output(&output), coordinator);
//! ```

use crate::mode::Pane;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for sync scrolling behavior.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SyncScrollConfig {
    /// Smallest offset change (pixels) worth applying to a follower
    pub min_apply_delta: f32,
}

impl Default for SyncScrollConfig {
    fn default() -> Self {
        Self {
            min_apply_delta: 1.0,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Geometry
// ─────────────────────────────────────────────────────────────────────────────

/// Scroll position and extents of one surface after layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    /// Current vertical offset in pixels
    pub offset: f32,
    /// Full height of the scrolled content
    pub content_height: f32,
    /// Visible height of the scroll area
    pub viewport_height: f32,
}

impl ScrollGeometry {
    pub fn new(offset: f32, content_height: f32, viewport_height: f32) -> Self {
        Self {
            offset,
            content_height,
            viewport_height,
        }
    }

    /// Geometry of an egui scroll area after it has been shown.
    pub fn from_output<R>(output: &egui::scroll_area::ScrollAreaOutput<R>) -> Self {
        Self {
            offset: output.state.offset.y,
            content_height: output.content_size.y,
            viewport_height: output.inner_rect.height(),
        }
    }

    pub fn max_scroll(&self) -> f32 {
        self.content_height - self.viewport_height
    }

    /// Content that fits the viewport has no scroll position to share.
    pub fn is_degenerate(&self) -> bool {
        let max_scroll = self.max_scroll();
        !(max_scroll.is_finite() && max_scroll > 0.0)
    }

    /// Scroll fraction in `[0, 1]`, or `None` for degenerate geometry.
    pub fn fraction(&self) -> Option<f32> {
        if self.is_degenerate() || !self.offset.is_finite() {
            return None;
        }
        Some((self.offset / self.max_scroll()).clamp(0.0, 1.0))
    }

    /// Offset that puts this surface at `fraction`.
    pub fn offset_for(&self, fraction: f32) -> Option<f32> {
        if self.is_degenerate() || !fraction.is_finite() {
            return None;
        }
        Some(fraction.clamp(0.0, 1.0) * self.max_scroll())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Coordinator
// ─────────────────────────────────────────────────────────────────────────────

/// The shared scroll position: the last reported fraction and its source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollState {
    pub fraction: f32,
    pub source: Pane,
}

impl Default for ScrollState {
    fn default() -> Self {
        Self {
            fraction: 0.0,
            source: Pane::Editor,
        }
    }
}

/// Single authority for the shared scroll position of one document window.
#[derive(Debug, Clone)]
pub struct ScrollCoordinator {
    state: ScrollState,
    enabled: bool,
}

impl Default for ScrollCoordinator {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ScrollCoordinator {
    pub fn new(enabled: bool) -> Self {
        Self {
            state: ScrollState::default(),
            enabled,
        }
    }

    pub fn state(&self) -> ScrollState {
        self.state
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            debug!("Sync scrolling {}", if enabled { "enabled" } else { "disabled" });
            self.enabled = enabled;
        }
    }

    /// Toggle sync scrolling on/off and return the new state.
    pub fn toggle(&mut self) -> bool {
        self.set_enabled(!self.enabled);
        self.enabled
    }

    /// Back to the top, attributed to the editor.
    pub fn reset(&mut self) {
        self.state = ScrollState::default();
    }

    /// Record a user scroll. Non-finite fractions are dropped.
    ///
    /// Returns `true` if the state changed hands or value.
    pub fn report_scroll(&mut self, surface: Pane, fraction: f32) -> bool {
        if !fraction.is_finite() {
            return false;
        }
        let next = ScrollState {
            fraction: fraction.clamp(0.0, 1.0),
            source: surface,
        };
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// The fraction `surface` should follow, if another surface drives.
    ///
    /// Reading does not drain the state; the last write wins.
    pub fn consume_scroll(&self, surface: Pane) -> Option<f32> {
        (self.state.source != surface).then_some(self.state.fraction)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Per-Surface Sync
// ─────────────────────────────────────────────────────────────────────────────

/// Echo-suppression phase of one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncPhase {
    /// Free to report user scrolls
    #[default]
    Idle,
    /// A programmatic scroll is being applied this frame
    ApplyingExternalScroll,
    /// Applied; cleared at the start of the next frame
    PendingClear,
}

/// Sync bookkeeping owned by one surface.
#[derive(Debug, Clone)]
pub struct SurfaceSync {
    surface: Pane,
    phase: SyncPhase,
    /// Fraction most recently applied from the other surface
    last_applied: Option<f32>,
    /// Offset seen at the last observation
    last_offset: Option<f32>,
    last_geometry: Option<ScrollGeometry>,
    /// Geometry the in-flight target was computed from
    applied_on: Option<ScrollGeometry>,
    config: SyncScrollConfig,
}

impl SurfaceSync {
    pub fn new(surface: Pane) -> Self {
        Self::with_config(surface, SyncScrollConfig::default())
    }

    pub fn with_config(surface: Pane, config: SyncScrollConfig) -> Self {
        Self {
            surface,
            phase: SyncPhase::Idle,
            last_applied: None,
            last_offset: None,
            last_geometry: None,
            applied_on: None,
            config,
        }
    }

    pub fn phase(&self) -> SyncPhase {
        self.phase
    }

    /// Geometry from the most recent observation.
    pub fn last_geometry(&self) -> Option<ScrollGeometry> {
        self.last_geometry
    }

    /// Start-of-frame housekeeping: lowers a guard raised last frame.
    pub fn tick(&mut self) {
        if self.phase == SyncPhase::PendingClear {
            self.phase = SyncPhase::Idle;
        }
    }

    /// Record this frame's geometry and report a user scroll if there was one.
    ///
    /// Returns `true` if a fraction was reported.
    pub fn observe(&mut self, geometry: ScrollGeometry, coordinator: &mut ScrollCoordinator) -> bool {
        let moved = self
            .last_offset
            .map_or(false, |last| (last - geometry.offset).abs() > f32::EPSILON);
        // egui pins the offset to the end when the range shrinks under it
        let clamped = self.last_geometry.map_or(false, |last| {
            geometry.max_scroll() < last.max_scroll()
                && geometry.offset >= geometry.max_scroll() - f32::EPSILON
        });
        self.last_offset = Some(geometry.offset);
        self.last_geometry = Some(geometry);

        if let Some(applied_on) = self.applied_on.take() {
            let drift = (applied_on.max_scroll() - geometry.max_scroll()).abs();
            if drift > self.config.min_apply_delta {
                debug!(
                    "{:?} scroll range changed by {:.0}px while syncing, re-applying",
                    self.surface, drift
                );
                self.last_applied = None;
            }
        }

        if !moved || clamped || self.phase != SyncPhase::Idle || !coordinator.is_enabled() {
            return false;
        }
        let Some(fraction) = geometry.fraction() else {
            return false;
        };

        coordinator.report_scroll(self.surface, fraction);
        // A user scroll supersedes whatever was applied before
        self.last_applied = None;
        true
    }

    /// Offset to scroll to this frame, if the other surface moved.
    ///
    /// Raises the guard when it returns `Some`; the caller must scroll and
    /// then call [`applied`](Self::applied).
    pub fn pending_target(
        &mut self,
        geometry: ScrollGeometry,
        coordinator: &ScrollCoordinator,
    ) -> Option<f32> {
        if !coordinator.is_enabled() || self.phase != SyncPhase::Idle {
            return None;
        }
        let fraction = coordinator.consume_scroll(self.surface)?;
        if self.last_applied == Some(fraction) {
            return None;
        }
        let target = geometry.offset_for(fraction)?;
        if (target - geometry.offset).abs() <= self.config.min_apply_delta {
            // Already there by this geometry; the next one may disagree
            return None;
        }

        self.phase = SyncPhase::ApplyingExternalScroll;
        self.last_applied = Some(fraction);
        self.applied_on = Some(geometry);
        Some(target)
    }

    /// The programmatic scroll has been issued.
    pub fn applied(&mut self) {
        if self.phase == SyncPhase::ApplyingExternalScroll {
            self.phase = SyncPhase::PendingClear;
        }
    }

    /// Forget the last applied fraction so the current one is applied again.
    ///
    /// Used after content reloads, zoom and theme changes, and mode switches,
    /// all of which change the content height under the same fraction.
    pub fn invalidate(&mut self) {
        self.last_applied = None;
    }

    /// Forget everything, e.g. when the surface is unmounted.
    pub fn reset(&mut self) {
        self.phase = SyncPhase::Idle;
        self.last_applied = None;
        self.last_offset = None;
        self.last_geometry = None;
        self.applied_on = None;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry(offset: f32) -> ScrollGeometry {
        ScrollGeometry::new(offset, 1100.0, 100.0)
    }

    /// Run one frame of a surface: apply any pending target, then observe.
    fn frame(sync: &mut SurfaceSync, offset: &mut f32, coordinator: &mut ScrollCoordinator) {
        sync.tick();
        let current = geometry(*offset);
        if let Some(target) = sync.pending_target(current, coordinator) {
            *offset = target;
            sync.applied();
        }
        sync.observe(geometry(*offset), coordinator);
    }

    #[test]
    fn test_geometry_fraction() {
        assert_eq!(geometry(0.0).fraction(), Some(0.0));
        assert_eq!(geometry(500.0).fraction(), Some(0.5));
        assert_eq!(geometry(5000.0).fraction(), Some(1.0));
        assert_eq!(geometry(250.0).offset_for(0.25), Some(250.0));
    }

    #[test]
    fn test_degenerate_geometry() {
        let fits = ScrollGeometry::new(0.0, 300.0, 300.0);
        assert!(fits.is_degenerate());
        assert_eq!(fits.fraction(), None);
        assert_eq!(fits.offset_for(0.5), None);

        let empty = ScrollGeometry::new(0.0, 0.0, 400.0);
        assert!(empty.is_degenerate());
    }

    #[test]
    fn test_coordinator_defaults() {
        let coordinator = ScrollCoordinator::default();
        assert!(coordinator.is_enabled());
        assert_eq!(coordinator.state(), ScrollState::default());
        assert_eq!(coordinator.state().source, Pane::Editor);
    }

    #[test]
    fn test_report_clamps_and_ignores_non_finite() {
        let mut coordinator = ScrollCoordinator::default();
        coordinator.report_scroll(Pane::Preview, 1.7);
        assert_eq!(coordinator.state().fraction, 1.0);

        coordinator.report_scroll(Pane::Editor, -3.0);
        assert_eq!(coordinator.state().fraction, 0.0);

        assert!(!coordinator.report_scroll(Pane::Preview, f32::NAN));
        assert_eq!(coordinator.state().source, Pane::Editor);
    }

    #[test]
    fn test_round_trip_exact() {
        let mut coordinator = ScrollCoordinator::default();
        coordinator.report_scroll(Pane::Editor, 0.4217);
        assert_eq!(coordinator.consume_scroll(Pane::Preview), Some(0.4217));
        assert_eq!(coordinator.consume_scroll(Pane::Editor), None);
        // Not drained
        assert_eq!(coordinator.consume_scroll(Pane::Preview), Some(0.4217));
    }

    #[test]
    fn test_toggle_sync() {
        let mut coordinator = ScrollCoordinator::default();
        assert!(!coordinator.toggle());
        assert!(coordinator.toggle());
    }

    #[test]
    fn test_user_scroll_is_reported() {
        let mut coordinator = ScrollCoordinator::default();
        let mut editor = SurfaceSync::new(Pane::Editor);

        // First observation only records the offset
        assert!(!editor.observe(geometry(0.0), &mut coordinator));
        assert!(editor.observe(geometry(250.0), &mut coordinator));
        assert_eq!(coordinator.state().fraction, 0.25);
        assert_eq!(coordinator.state().source, Pane::Editor);

        // No movement, no report
        assert!(!editor.observe(geometry(250.0), &mut coordinator));
    }

    #[test]
    fn test_follower_applies_and_does_not_echo() {
        let mut coordinator = ScrollCoordinator::default();
        let mut editor = SurfaceSync::new(Pane::Editor);
        let mut preview = SurfaceSync::new(Pane::Preview);
        let (mut editor_offset, mut preview_offset) = (0.0, 0.0);

        frame(&mut editor, &mut editor_offset, &mut coordinator);
        frame(&mut preview, &mut preview_offset, &mut coordinator);

        // User scrolls the editor
        editor_offset = 600.0;
        frame(&mut editor, &mut editor_offset, &mut coordinator);
        assert_eq!(coordinator.state().source, Pane::Editor);

        // Preview follows in its frame, guarded
        frame(&mut preview, &mut preview_offset, &mut coordinator);
        assert_eq!(preview_offset, 600.0);
        assert_eq!(preview.phase(), SyncPhase::PendingClear);
        assert_eq!(coordinator.state().source, Pane::Editor);

        // Next frame: guard clears, offset unchanged, still no echo
        frame(&mut preview, &mut preview_offset, &mut coordinator);
        assert_eq!(preview.phase(), SyncPhase::Idle);
        assert_eq!(coordinator.state().source, Pane::Editor);
        assert_eq!(coordinator.state().fraction, 0.6);
    }

    #[test]
    fn test_observation_under_guard_is_never_reported() {
        let mut coordinator = ScrollCoordinator::default();
        coordinator.report_scroll(Pane::Editor, 0.5);
        let mut preview = SurfaceSync::new(Pane::Preview);
        preview.observe(geometry(0.0), &mut coordinator);

        let target = preview.pending_target(geometry(0.0), &coordinator);
        assert_eq!(target, Some(500.0));
        assert_eq!(preview.phase(), SyncPhase::ApplyingExternalScroll);

        // Offset change while applying
        assert!(!preview.observe(geometry(500.0), &mut coordinator));
        preview.applied();
        assert!(!preview.observe(geometry(480.0), &mut coordinator));
        assert_eq!(coordinator.state().source, Pane::Editor);
    }

    #[test]
    fn test_same_fraction_not_reapplied() {
        let mut coordinator = ScrollCoordinator::default();
        coordinator.report_scroll(Pane::Editor, 0.3);
        let mut preview = SurfaceSync::new(Pane::Preview);

        assert!(preview.pending_target(geometry(0.0), &coordinator).is_some());
        preview.applied();
        preview.tick();
        // Content reflowed and offset drifted; the same fraction stays applied
        assert_eq!(preview.pending_target(geometry(120.0), &coordinator), None);

        preview.invalidate();
        assert_eq!(
            preview.pending_target(geometry(120.0), &coordinator),
            Some(300.0)
        );
    }

    #[test]
    fn test_sub_pixel_delta_skipped() {
        let mut coordinator = ScrollCoordinator::default();
        coordinator.report_scroll(Pane::Editor, 0.5);
        let mut preview = SurfaceSync::new(Pane::Preview);

        assert_eq!(preview.pending_target(geometry(499.5), &coordinator), None);
        assert_eq!(preview.phase(), SyncPhase::Idle);
    }

    #[test]
    fn test_degenerate_never_reports_or_applies() {
        let mut coordinator = ScrollCoordinator::default();
        let mut editor = SurfaceSync::new(Pane::Editor);
        let fits = |offset| ScrollGeometry::new(offset, 400.0, 400.0);

        editor.observe(fits(0.0), &mut coordinator);
        assert!(!editor.observe(fits(3.0), &mut coordinator));
        assert_eq!(coordinator.state(), ScrollState::default());

        coordinator.report_scroll(Pane::Preview, 0.8);
        assert_eq!(editor.pending_target(fits(0.0), &coordinator), None);
        assert_eq!(editor.phase(), SyncPhase::Idle);
    }

    #[test]
    fn test_disabled_sync_is_inert() {
        let mut coordinator = ScrollCoordinator::new(false);
        let mut editor = SurfaceSync::new(Pane::Editor);
        editor.observe(geometry(0.0), &mut coordinator);
        assert!(!editor.observe(geometry(300.0), &mut coordinator));

        coordinator.report_scroll(Pane::Preview, 0.9);
        assert_eq!(editor.pending_target(geometry(0.0), &coordinator), None);
    }

    #[test]
    fn test_user_scroll_clears_last_applied() {
        let mut coordinator = ScrollCoordinator::default();
        let mut editor = SurfaceSync::new(Pane::Editor);
        let mut preview = SurfaceSync::new(Pane::Preview);
        let (mut editor_offset, mut preview_offset) = (0.0, 0.0);
        frame(&mut editor, &mut editor_offset, &mut coordinator);
        frame(&mut preview, &mut preview_offset, &mut coordinator);

        // Editor -> 0.2, preview follows
        editor_offset = 200.0;
        frame(&mut editor, &mut editor_offset, &mut coordinator);
        frame(&mut preview, &mut preview_offset, &mut coordinator);
        frame(&mut preview, &mut preview_offset, &mut coordinator);

        // User scrolls the preview elsewhere, then the editor returns to 0.2
        preview_offset = 700.0;
        frame(&mut preview, &mut preview_offset, &mut coordinator);
        frame(&mut editor, &mut editor_offset, &mut coordinator);
        assert_eq!(editor_offset, 700.0);
        frame(&mut editor, &mut editor_offset, &mut coordinator);

        editor_offset = 200.0;
        frame(&mut editor, &mut editor_offset, &mut coordinator);
        frame(&mut preview, &mut preview_offset, &mut coordinator);
        assert_eq!(preview_offset, 200.0);
    }

    #[test]
    fn test_same_frame_race_last_write_wins() {
        let mut coordinator = ScrollCoordinator::default();
        let mut editor = SurfaceSync::new(Pane::Editor);
        let mut preview = SurfaceSync::new(Pane::Preview);
        editor.observe(geometry(0.0), &mut coordinator);
        preview.observe(geometry(0.0), &mut coordinator);

        // Both surfaces scrolled by the user within the same frame
        editor.observe(geometry(100.0), &mut coordinator);
        preview.observe(geometry(900.0), &mut coordinator);
        assert_eq!(coordinator.state().source, Pane::Preview);
        assert_eq!(coordinator.state().fraction, 0.9);

        // The editor follows the later report
        assert_eq!(
            editor.pending_target(geometry(100.0), &coordinator),
            Some(900.0)
        );
    }

    /// One frame the way the panes run it: the target comes from the last
    /// observation, and the content laid out this frame is `content_height`
    /// tall. Like egui, the applied offset is clamped to the new range.
    fn laid_out_frame(
        sync: &mut SurfaceSync,
        offset: &mut f32,
        content_height: f32,
        coordinator: &mut ScrollCoordinator,
    ) {
        sync.tick();
        let target = sync
            .last_geometry()
            .and_then(|g| sync.pending_target(g, coordinator));
        if let Some(target) = target {
            *offset = target;
        }
        let geometry = ScrollGeometry::new(*offset, content_height, 100.0);
        *offset = offset.clamp(0.0, geometry.max_scroll().max(0.0));
        if target.is_some() {
            sync.applied();
        }
        sync.observe(ScrollGeometry::new(*offset, content_height, 100.0), coordinator);
    }

    #[test]
    fn test_settled_follower_realigns_after_content_grows() {
        let mut coordinator = ScrollCoordinator::default();
        coordinator.report_scroll(Pane::Editor, 0.5);
        let mut preview = SurfaceSync::new(Pane::Preview);
        let mut offset = 0.0;

        for _ in 0..3 {
            laid_out_frame(&mut preview, &mut offset, 1100.0, &mut coordinator);
        }
        assert_eq!(offset, 500.0);

        // Reload: four times the content under the same fraction
        preview.invalidate();
        for _ in 0..4 {
            laid_out_frame(&mut preview, &mut offset, 4100.0, &mut coordinator);
        }
        assert_eq!(offset, 2000.0);
        assert_eq!(preview.phase(), SyncPhase::Idle);
        assert_eq!(coordinator.state().source, Pane::Editor);
        assert_eq!(coordinator.state().fraction, 0.5);
    }

    #[test]
    fn test_apply_during_layout_change_is_retried() {
        let mut coordinator = ScrollCoordinator::default();
        let mut preview = SurfaceSync::new(Pane::Preview);
        let mut offset = 0.0;
        laid_out_frame(&mut preview, &mut offset, 1100.0, &mut coordinator);

        // The editor moves in the same frame the preview content grows
        coordinator.report_scroll(Pane::Editor, 0.8);
        laid_out_frame(&mut preview, &mut offset, 4100.0, &mut coordinator);
        assert_eq!(offset, 800.0);

        laid_out_frame(&mut preview, &mut offset, 4100.0, &mut coordinator);
        assert_eq!(offset, 3200.0);

        // Stable from here on, and never echoed
        laid_out_frame(&mut preview, &mut offset, 4100.0, &mut coordinator);
        laid_out_frame(&mut preview, &mut offset, 4100.0, &mut coordinator);
        assert_eq!(offset, 3200.0);
        assert_eq!(coordinator.state().source, Pane::Editor);
        assert_eq!(coordinator.state().fraction, 0.8);
    }

    #[test]
    fn test_shrinking_content_is_realigned() {
        let mut coordinator = ScrollCoordinator::default();
        coordinator.report_scroll(Pane::Preview, 0.75);
        let mut editor = SurfaceSync::new(Pane::Editor);
        let mut offset = 0.0;
        for _ in 0..3 {
            laid_out_frame(&mut editor, &mut offset, 2100.0, &mut coordinator);
        }
        assert_eq!(offset, 1500.0);

        // Zooming out halves the content; egui clamps the offset to the end
        editor.invalidate();
        for _ in 0..4 {
            laid_out_frame(&mut editor, &mut offset, 1100.0, &mut coordinator);
        }
        assert_eq!(offset, 750.0);
        assert_eq!(coordinator.state().source, Pane::Preview);
    }

    #[test]
    fn test_clamp_on_shrink_is_not_a_user_scroll() {
        let mut coordinator = ScrollCoordinator::default();
        let mut editor = SurfaceSync::new(Pane::Editor);
        editor.observe(ScrollGeometry::new(0.0, 2100.0, 100.0), &mut coordinator);
        assert!(editor.observe(ScrollGeometry::new(1800.0, 2100.0, 100.0), &mut coordinator));

        // Text deleted: the offset moves only because the range ended
        assert!(!editor.observe(ScrollGeometry::new(500.0, 600.0, 100.0), &mut coordinator));
        assert_eq!(coordinator.state().fraction, 0.9);

        // Scrolling up from there is the user again
        assert!(editor.observe(ScrollGeometry::new(250.0, 600.0, 100.0), &mut coordinator));
        assert_eq!(coordinator.state().fraction, 0.5);
    }
}
