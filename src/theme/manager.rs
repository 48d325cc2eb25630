//! Theme Manager for mdview
//!
//! Tracks the appearance setting and the system dark-mode flag, resolves
//! them to a [`Palette`], and pushes matching visuals into the egui context
//! when either changes.
//!
//! # Usage
//!
//! ```ignore
//! let mut manager = ThemeManager::new(Theme::System);
//!
//! // Each frame
//! manager.set_system_dark(system_dark);
//! if manager.apply_if_needed(ctx) {
//!     // palette changed: re-highlight, re-render
//! }
//! ```

use eframe::egui::Context;
use log::{debug, info};

use super::Palette;
use crate::config::Theme;

// ─────────────────────────────────────────────────────────────────────────────
// Theme Manager
// ─────────────────────────────────────────────────────────────────────────────

/// Manages theme state and applies themes to the egui context.
#[derive(Debug, Clone)]
pub struct ThemeManager {
    /// Current appearance setting (Light, Dark, or System)
    current_theme: Theme,
    /// Last reported system dark-mode preference
    system_dark: bool,
    /// Palette for the effective appearance
    palette: Palette,
    /// Whether visuals must be pushed to egui on the next frame
    needs_apply: bool,
}

impl ThemeManager {
    /// Create a new ThemeManager with the given initial theme.
    pub fn new(theme: Theme) -> Self {
        info!("ThemeManager initialized with theme: {:?}", theme);
        Self {
            current_theme: theme,
            system_dark: false,
            palette: Palette::for_theme(theme, false),
            needs_apply: true,
        }
    }

    /// Get the current theme setting.
    pub fn current_theme(&self) -> Theme {
        self.current_theme
    }

    /// The palette of the effective appearance.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Set the theme and mark for reapplication.
    ///
    /// This doesn't apply the theme immediately; call `apply_if_needed()`.
    pub fn set_theme(&mut self, theme: Theme) {
        if self.current_theme != theme {
            info!("Theme changed from {:?} to {:?}", self.current_theme, theme);
            self.current_theme = theme;
            self.resolve();
        }
    }

    /// Record the system dark-mode preference.
    ///
    /// Only matters while the appearance is `System`.
    pub fn set_system_dark(&mut self, system_dark: bool) {
        if self.system_dark != system_dark {
            debug!("System dark mode changed to: {}", system_dark);
            self.system_dark = system_dark;
            if self.current_theme == Theme::System {
                self.resolve();
            }
        }
    }

    fn resolve(&mut self) {
        let palette = Palette::for_theme(self.current_theme, self.system_dark);
        if palette != self.palette {
            self.palette = palette;
            self.needs_apply = true;
        }
    }

    /// Apply the visuals only if the effective palette changed.
    ///
    /// Returns `true` if the visuals were applied.
    pub fn apply_if_needed(&mut self, ctx: &Context) -> bool {
        if !self.needs_apply {
            return false;
        }
        ctx.set_visuals(self.palette.to_visuals());
        self.needs_apply = false;
        debug!(
            "Applied theme: {:?} (dark: {})",
            self.current_theme, self.palette.dark
        );
        true
    }
}

impl Default for ThemeManager {
    fn default() -> Self {
        Self::new(Theme::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
