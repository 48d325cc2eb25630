//! View mode and zoom routing
//!
//! The window shows the document in one of three layouts: rendered preview
//! only, editor and preview side by side, or editor only. The controller
//! here decides which surfaces are mounted, which pane keyboard zoom acts on,
//! and whether formatting commands are available.
//!
//! The two surfaces zoom independently: the preview scales its whole page,
//! the editor changes its font size.

use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// View Mode
// ─────────────────────────────────────────────────────────────────────────────

/// Window layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Rendered preview only
    #[default]
    Preview,
    /// Editor and preview side by side
    Split,
    /// Editor only
    Edit,
}

impl ViewMode {
    /// Next mode in the toggle cycle: Preview -> Split -> Edit -> Preview.
    pub fn next(self) -> Self {
        match self {
            ViewMode::Preview => ViewMode::Split,
            ViewMode::Split => ViewMode::Edit,
            ViewMode::Edit => ViewMode::Preview,
        }
    }

    /// Display label for the menu and status bar.
    pub fn label(&self) -> &'static str {
        match self {
            ViewMode::Preview => "Preview",
            ViewMode::Split => "Split",
            ViewMode::Edit => "Edit",
        }
    }

    pub fn all() -> &'static [ViewMode] {
        &[ViewMode::Preview, ViewMode::Split, ViewMode::Edit]
    }

    pub fn shows_editor(&self) -> bool {
        matches!(self, ViewMode::Split | ViewMode::Edit)
    }

    pub fn shows_preview(&self) -> bool {
        matches!(self, ViewMode::Preview | ViewMode::Split)
    }
}

/// One of the two scrollable surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pane {
    Editor,
    Preview,
}

// ─────────────────────────────────────────────────────────────────────────────
// Mode Controller
// ─────────────────────────────────────────────────────────────────────────────

/// Current layout plus the pane that last received focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeController {
    mode: ViewMode,
    focused: Pane,
}

impl Default for ModeController {
    fn default() -> Self {
        Self {
            mode: ViewMode::Preview,
            focused: Pane::Preview,
        }
    }
}

impl ModeController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn focused(&self) -> Pane {
        self.focused
    }

    /// Advance to the next mode and return it.
    pub fn toggle(&mut self) -> ViewMode {
        self.set_mode(self.mode.next());
        self.mode
    }

    /// Switch to a specific mode.
    ///
    /// Single-pane modes move focus to their pane; split keeps the last
    /// focused one. Returns `true` if the mode changed.
    pub fn set_mode(&mut self, mode: ViewMode) -> bool {
        if self.mode == mode {
            return false;
        }
        debug!("View mode {:?} -> {:?}", self.mode, mode);
        self.mode = mode;
        match mode {
            ViewMode::Preview => self.focused = Pane::Preview,
            ViewMode::Edit => self.focused = Pane::Editor,
            ViewMode::Split => {}
        }
        true
    }

    /// Record which pane has focus. Panes that are not mounted are ignored.
    pub fn focus(&mut self, pane: Pane) {
        let mounted = match pane {
            Pane::Editor => self.mode.shows_editor(),
            Pane::Preview => self.mode.shows_preview(),
        };
        if mounted {
            self.focused = pane;
        }
    }

    /// The pane keyboard zoom applies to.
    pub fn zoom_target(&self) -> Pane {
        match self.mode {
            ViewMode::Preview => Pane::Preview,
            ViewMode::Edit => Pane::Editor,
            ViewMode::Split => self.focused,
        }
    }

    pub fn shows_editor(&self) -> bool {
        self.mode.shows_editor()
    }

    pub fn shows_preview(&self) -> bool {
        self.mode.shows_preview()
    }

    /// Formatting commands need the editor's selection.
    pub fn allows_formatting(&self) -> bool {
        self.mode.shows_editor()
    }

    /// Apply a zoom action to the knob of the current target pane.
    ///
    /// Returns the pane that changed and its new value.
    pub fn route_zoom(&self, knobs: &mut ZoomKnobs, action: ZoomAction) -> (Pane, f32) {
        let target = self.zoom_target();
        let knob = knobs.knob_mut(target);
        let value = knob.apply(action);
        debug!("Zoom {:?} on {:?}: {}", action, target, value);
        (target, value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Zoom
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomAction {
    In,
    Out,
    Reset,
}

/// A bounded, stepped numeric setting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomKnob {
    pub value: f32,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub default: f32,
}

/// Page zoom of the preview surface.
pub const PREVIEW_ZOOM: ZoomKnob = ZoomKnob {
    value: 1.0,
    min: 0.5,
    max: 3.0,
    step: 0.1,
    default: 1.0,
};

/// Font size of the editor surface, in points.
pub const EDITOR_FONT_SIZE: ZoomKnob = ZoomKnob {
    value: 14.0,
    min: 8.0,
    max: 72.0,
    step: 1.0,
    default: 14.0,
};

impl ZoomKnob {
    /// Copy of this knob set to `value` (clamped).
    pub fn with_value(mut self, value: f32) -> Self {
        self.value = self.clamp(value);
        self
    }

    /// Snap to the step grid and clamp to the bounds.
    ///
    /// Non-finite input falls back to the default.
    pub fn clamp(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.default;
        }
        // Dividing by the integer scale keeps 1.3 as 1.3 rather than 13 * 0.1
        let scale = (1.0 / self.step).round().max(1.0);
        let snapped = (value * scale).round() / scale;
        snapped.clamp(self.min, self.max)
    }

    pub fn zoom_in(&mut self) -> f32 {
        self.value = self.clamp(self.value + self.step);
        self.value
    }

    pub fn zoom_out(&mut self) -> f32 {
        self.value = self.clamp(self.value - self.step);
        self.value
    }

    pub fn reset(&mut self) -> f32 {
        self.value = self.default;
        self.value
    }

    pub fn apply(&mut self, action: ZoomAction) -> f32 {
        match action {
            ZoomAction::In => self.zoom_in(),
            ZoomAction::Out => self.zoom_out(),
            ZoomAction::Reset => self.reset(),
        }
    }
}

/// The preview and editor zoom knobs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoomKnobs {
    pub preview: ZoomKnob,
    pub editor: ZoomKnob,
}

impl Default for ZoomKnobs {
    fn default() -> Self {
        Self {
            preview: PREVIEW_ZOOM,
            editor: EDITOR_FONT_SIZE,
        }
    }
}

impl ZoomKnobs {
    pub fn new(preview_zoom: f32, editor_font_size: f32) -> Self {
        Self {
            preview: PREVIEW_ZOOM.with_value(preview_zoom),
            editor: EDITOR_FONT_SIZE.with_value(editor_font_size),
        }
    }

    pub fn knob_mut(&mut self, pane: Pane) -> &mut ZoomKnob {
        match pane {
            Pane::Preview => &mut self.preview,
            Pane::Editor => &mut self.editor,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
