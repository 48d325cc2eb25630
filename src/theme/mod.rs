//! Theme System for mdview
//!
//! The appearance setting (`config::Theme`) resolves to a [`Palette`] of named
//! colors. The palette drives three consumers:
//!
//! - the editor highlighter (heading/link accent, code colors, muted quotes)
//! - the native preview renderer
//! - the printable HTML page (`{{STYLE}}` block)
//!
//! `light.rs` and `dark.rs` turn a palette into egui `Visuals` for the
//! surrounding chrome; `manager.rs` tracks the current appearance and
//! reapplies visuals when it (or the system preference) changes.
//!
//! # Usage
//!
//! ```ignore
//! use crate::config::Theme;
//! use crate::theme::Palette;
//!
//! let palette = Palette::for_theme(Theme::System, system_dark);
//! ui.label(RichText::new("Hello").color(palette.text));
//! ```

pub mod dark;
pub mod light;
pub mod manager;

pub use manager::ThemeManager;

use crate::config::Theme;
use eframe::egui::{Color32, Visuals};

/// Opacity of inline and fenced code text relative to the body text.
const CODE_FG_ALPHA: u8 = 217; // 85%

// ─────────────────────────────────────────────────────────────────────────────
// Palette
// ─────────────────────────────────────────────────────────────────────────────

/// Named colors of one appearance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Whether this is the dark palette
    pub dark: bool,
    /// Body text
    pub text: Color32,
    /// Emphasized text; egui has no bold face, so bold spans use this
    pub strong: Color32,
    /// Headings, links, list markers
    pub accent: Color32,
    /// Code text (inline and fenced)
    pub code_fg: Color32,
    /// Code background (inline and fenced)
    pub code_bg: Color32,
    /// Blockquotes and secondary labels
    pub muted: Color32,
    /// Page background
    pub background: Color32,
    /// Panels and chrome around the page
    pub panel: Color32,
    /// Rules, table borders, separators
    pub border: Color32,
    /// Text selection fill
    pub selection: Color32,
}

impl Palette {
    /// The light palette.
    pub fn light() -> Self {
        let text = Color32::from_rgb(0x24, 0x29, 0x2f);
        Self {
            dark: false,
            text,
            strong: Color32::from_rgb(0x1f, 0x23, 0x28),
            accent: Color32::from_rgb(0x09, 0x69, 0xda),
            code_fg: with_alpha(text, CODE_FG_ALPHA),
            code_bg: Color32::from_rgb(0xf6, 0xf8, 0xfa),
            muted: Color32::from_rgb(0x65, 0x6d, 0x76),
            background: Color32::from_rgb(0xff, 0xff, 0xff),
            panel: Color32::from_rgb(0xf6, 0xf8, 0xfa),
            border: Color32::from_rgb(0xd0, 0xd7, 0xde),
            selection: Color32::from_rgba_unmultiplied(0x09, 0x69, 0xda, 0x40),
        }
    }

    /// The dark palette.
    pub fn dark() -> Self {
        let text = Color32::from_rgb(0xe6, 0xed, 0xf3);
        Self {
            dark: true,
            text,
            strong: Color32::from_rgb(0xff, 0xff, 0xff),
            accent: Color32::from_rgb(0x58, 0xa6, 0xff),
            code_fg: with_alpha(text, CODE_FG_ALPHA),
            code_bg: Color32::from_rgb(0x16, 0x1b, 0x22),
            muted: Color32::from_rgb(0x8b, 0x94, 0x9e),
            background: Color32::from_rgb(0x0d, 0x11, 0x17),
            panel: Color32::from_rgb(0x16, 0x1b, 0x22),
            border: Color32::from_rgb(0x30, 0x36, 0x3d),
            selection: Color32::from_rgba_unmultiplied(0x58, 0xa6, 0xff, 0x50),
        }
    }

    /// Resolve an appearance setting against the system preference.
    pub fn for_theme(theme: Theme, system_dark: bool) -> Self {
        if theme.is_dark(system_dark) {
            Self::dark()
        } else {
            Self::light()
        }
    }

    /// egui visuals for the application chrome.
    pub fn to_visuals(&self) -> Visuals {
        if self.dark {
            dark::create_dark_visuals(self)
        } else {
            light::create_light_visuals(self)
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::light()
    }
}

fn with_alpha(color: Color32, alpha: u8) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), alpha)
}

/// Format a color as a CSS `rgba()` value.
pub fn css_color(color: Color32) -> String {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    if a == u8::MAX {
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    } else {
        format!("rgba({}, {}, {}, {:.2})", r, g, b, a as f32 / 255.0)
    }
}
