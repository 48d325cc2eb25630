//! User settings and preferences for mdview
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use crate::mode::{EDITOR_FONT_SIZE, PREVIEW_ZOOM};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Appearance
// ─────────────────────────────────────────────────────────────────────────────

/// Appearance preference: follow the system, or force light/dark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    System,
    Light,
    Dark,
}

impl Theme {
    /// Display label for menus.
    pub fn label(&self) -> &'static str {
        match self {
            Theme::System => "System",
            Theme::Light => "Light",
            Theme::Dark => "Dark",
        }
    }

    /// Keyboard shortcut label shown next to the menu entry.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Theme::System => "Ctrl+Shift+0",
            Theme::Light => "Ctrl+Shift+1",
            Theme::Dark => "Ctrl+Shift+2",
        }
    }

    /// All appearance options in menu order.
    pub fn all() -> &'static [Theme] {
        &[Theme::System, Theme::Light, Theme::Dark]
    }

    /// Resolve to a concrete dark/light flag given the system preference.
    pub fn is_dark(&self, system_dark: bool) -> bool {
        match self {
            Theme::System => system_dark,
            Theme::Light => false,
            Theme::Dark => true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Outer window geometry restored at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    pub width: f32,
    pub height: f32,
    /// Left edge; `None` lets the platform place the window
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// Top edge
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    #[serde(default)]
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 750.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// User preferences and application settings.
///
/// Serialized to JSON in the user's config directory. Every field has a
/// default, so partial or older config files still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Appearance (system, light, or dark)
    pub theme: Theme,

    /// Page zoom factor of the preview surface
    pub preview_zoom: f32,

    /// Font size of the editor surface, in points
    pub editor_font_size: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Editor Behavior
    // ─────────────────────────────────────────────────────────────────────────
    /// Whether the editor wraps long lines
    pub word_wrap: bool,

    /// Whether the editor and preview scroll together
    pub sync_scroll_enabled: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Session & History
    // ─────────────────────────────────────────────────────────────────────────
    /// Recently opened files (most recent first)
    pub recent_files: Vec<PathBuf>,

    /// Maximum number of recent files to remember
    pub max_recent_files: usize,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size and position
    pub window_size: WindowSize,

    /// Width share of the editor in split mode (0.0 to 1.0)
    pub split_ratio: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Printing
    // ─────────────────────────────────────────────────────────────────────────
    /// Optional HTML template overriding the built-in print page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_template: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            preview_zoom: PREVIEW_ZOOM.default,
            editor_font_size: EDITOR_FONT_SIZE.default,

            word_wrap: true,
            sync_scroll_enabled: true,

            recent_files: Vec::new(),
            max_recent_files: 10,

            window_size: WindowSize::default(),
            split_ratio: 0.5,

            custom_template: None,
        }
    }
}

impl Settings {
    /// Put `path` at the head of the recent list, dropping any older entry
    /// for it and anything past `max_recent_files`.
    pub fn add_recent_file(&mut self, path: PathBuf) {
        self.recent_files.retain(|known| *known != path);
        self.recent_files.insert(0, path);
        self.recent_files.truncate(self.max_recent_files);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Bounds of either window dimension, in points.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Bounds of the split ratio; keeps both panes visible.
    pub const MIN_SPLIT_RATIO: f32 = 0.1;
    pub const MAX_SPLIT_RATIO: f32 = 0.9;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// Config files can be edited by hand, so everything numeric is
    /// clamped after loading.
    pub fn sanitize(&mut self) {
        self.preview_zoom = PREVIEW_ZOOM.clamp(self.preview_zoom);
        self.editor_font_size = EDITOR_FONT_SIZE.clamp(self.editor_font_size);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.split_ratio = if self.split_ratio.is_finite() {
            self.split_ratio
                .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO)
        } else {
            0.5
        };

        if self.max_recent_files == 0 {
            self.max_recent_files = 10;
        } else if self.max_recent_files > 100 {
            self.max_recent_files = 100;
        }
        self.recent_files.truncate(self.max_recent_files);
    }

    /// Deserialize settings from JSON and sanitize them.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn paths(settings: &Settings) -> Vec<&str> {
        settings
            .recent_files
            .iter()
            .filter_map(|p| p.to_str())
            .collect()
    }

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();

        assert_eq!(settings.theme, Theme::System);
        assert_eq!(settings.preview_zoom, 1.0);
        assert_eq!(settings.editor_font_size, 14.0);
        assert!(settings.sync_scroll_enabled);
        assert!(settings.word_wrap);
        assert_eq!(settings.split_ratio, 0.5);
        assert!(settings.custom_template.is_none());
    }

    #[test]
    fn test_recent_files_most_recent_first() {
        let mut settings = Settings {
            max_recent_files: 3,
            ..Settings::default()
        };
        for name in ["a.md", "b.md", "c.md"] {
            settings.add_recent_file(PathBuf::from(name));
        }
        assert_eq!(paths(&settings), vec!["c.md", "b.md", "a.md"]);

        // Reopening moves the entry instead of duplicating it
        settings.add_recent_file(PathBuf::from("a.md"));
        assert_eq!(paths(&settings), vec!["a.md", "c.md", "b.md"]);

        settings.add_recent_file(PathBuf::from("d.md"));
        assert_eq!(paths(&settings), vec!["d.md", "a.md", "c.md"]);
    }

    #[test]
    fn test_theme_is_lowercase_in_json() {
        for &theme in Theme::all() {
            let json = serde_json::to_string(&theme).unwrap();
            assert_eq!(json, format!("\"{}\"", theme.label().to_lowercase()));
            assert_eq!(serde_json::from_str::<Theme>(&json).unwrap(), theme);
        }
    }

    #[test]
    fn test_theme_resolution() {
        assert!(Theme::System.is_dark(true));
        assert!(!Theme::System.is_dark(false));
        assert!(Theme::Dark.is_dark(false));
        assert!(!Theme::Light.is_dark(true));
    }

    #[test]
    fn test_json_keeps_every_field() {
        let before = Settings {
            theme: Theme::Dark,
            preview_zoom: 1.5,
            editor_font_size: 18.0,
            sync_scroll_enabled: false,
            custom_template: Some(PathBuf::from("/tmp/page.html")),
            ..Settings::default()
        };
        let json = serde_json::to_string_pretty(&before).unwrap();
        assert!(json.contains("\"custom_template\""));
        assert_eq!(serde_json::from_str::<Settings>(&json).unwrap(), before);

        // An absent template is left out of the file entirely
        let json = serde_json::to_string(&Settings::default()).unwrap();
        assert!(!json.contains("custom_template"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"theme": "light"}"#).unwrap();
        assert_eq!(settings.theme, Theme::Light);
        assert_eq!(settings.preview_zoom, 1.0);
        assert_eq!(settings.editor_font_size, 14.0);

        let settings: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_sanitize_zoom_knobs_independently() {
        let mut settings = Settings {
            preview_zoom: 9.0,
            editor_font_size: 2.0,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.preview_zoom, 3.0);
        assert_eq!(settings.editor_font_size, 8.0);

        settings.preview_zoom = 0.1;
        settings.editor_font_size = 200.0;
        settings.sanitize();
        assert_eq!(settings.preview_zoom, 0.5);
        assert_eq!(settings.editor_font_size, 72.0);
    }

    #[test]
    fn test_sanitize_split_ratio() {
        let mut settings = Settings {
            split_ratio: -0.5,
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.split_ratio, Settings::MIN_SPLIT_RATIO);

        settings.split_ratio = f32::NAN;
        settings.sanitize();
        assert_eq!(settings.split_ratio, 0.5);
    }

    #[test]
    fn test_sanitize_window_and_recent_limits() {
        let mut settings = Settings {
            max_recent_files: 0,
            window_size: WindowSize {
                width: 50.0,
                height: 1.0e6,
                ..WindowSize::default()
            },
            ..Settings::default()
        };
        settings.sanitize();
        assert_eq!(settings.max_recent_files, 10);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.window_size.height, Settings::MAX_WINDOW_SIZE);

        settings.max_recent_files = 1;
        settings.recent_files = vec![PathBuf::from("x.md"), PathBuf::from("y.md")];
        settings.sanitize();
        assert_eq!(paths(&settings), vec!["x.md"]);
    }

    #[test]
    fn test_from_json_sanitized() {
        let json = r#"{"preview_zoom": 12.0, "split_ratio": 2.0}"#;
        let settings = Settings::from_json_sanitized(json).unwrap();
        assert_eq!(settings.preview_zoom, 3.0);
        assert_eq!(settings.split_ratio, Settings::MAX_SPLIT_RATIO);
    }
}
