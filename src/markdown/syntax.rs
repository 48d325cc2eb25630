//! Code Block Highlighting
//!
//! syntect-backed coloring for fenced code blocks in the native preview.
//! The syntax and theme sets are expensive to load, so they live in one
//! lazily-built global shared by every frame.

use std::sync::OnceLock;

use eframe::egui::{text::LayoutJob, Color32, FontId, TextFormat};
use log::{debug, warn};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

/// syntect theme used when the preview is dark.
pub const DARK_CODE_THEME: &str = "base16-ocean.dark";
/// syntect theme used when the preview is light.
pub const LIGHT_CODE_THEME: &str = "InspiredGitHub";

/// A run of code text sharing one color.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeSegment {
    pub text: String,
    pub color: Color32,
    pub bold: bool,
    pub italic: bool,
}

/// Loaded syntect state.
pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Default for CodeHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeHighlighter {
    pub fn new() -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} code themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    fn theme(&self, dark: bool) -> Option<&Theme> {
        let name = if dark {
            DARK_CODE_THEME
        } else {
            LIGHT_CODE_THEME
        };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Resolve a fence info string ("rust", "py", "Shell") to a syntax.
    fn find_syntax(&self, language: &str) -> Option<&SyntaxReference> {
        // Info strings may carry attributes after the language word
        let word = language.split_whitespace().next()?;
        let lower = word.to_lowercase();
        let extension = match lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" => "js",
            "typescript" => "ts",
            "c++" | "cxx" => "cpp",
            "csharp" | "c#" => "cs",
            "golang" => "go",
            "ruby" => "rb",
            "yml" => "yaml",
            "markdown" => "md",
            "shell" | "bash" | "zsh" => "sh",
            "htm" => "html",
            other => other,
        };

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_name(word))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.to_lowercase() == lower)
            })
    }

    /// Highlight `code` line by line. Unknown languages come back as one
    /// plain segment per line in `fallback`.
    pub fn highlight(
        &self,
        code: &str,
        language: &str,
        dark: bool,
        fallback: Color32,
    ) -> Vec<Vec<CodeSegment>> {
        let plain = |line: &str| {
            vec![CodeSegment {
                text: line.to_string(),
                color: fallback,
                bold: false,
                italic: false,
            }]
        };

        let (Some(syntax), Some(theme)) = (self.find_syntax(language), self.theme(dark)) else {
            return LinesWithEndings::from(code).map(plain).collect();
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        LinesWithEndings::from(code)
            .map(|line| match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => ranges
                    .into_iter()
                    .map(|(style, text)| segment(style, text))
                    .collect(),
                Err(e) => {
                    warn!("Failed to highlight code line: {}", e);
                    plain(line)
                }
            })
            .collect()
    }
}

fn segment(style: Style, text: &str) -> CodeSegment {
    let fg = style.foreground;
    CodeSegment {
        text: text.to_string(),
        color: Color32::from_rgba_unmultiplied(fg.r, fg.g, fg.b, fg.a),
        bold: style.font_style.contains(FontStyle::BOLD),
        italic: style.font_style.contains(FontStyle::ITALIC),
    }
}

static HIGHLIGHTER: OnceLock<CodeHighlighter> = OnceLock::new();

/// Global highlighter, built on first use.
pub fn code_highlighter() -> &'static CodeHighlighter {
    HIGHLIGHTER.get_or_init(CodeHighlighter::new)
}

/// Highlight a code block straight into an egui layout job.
pub fn code_layout_job(
    code: &str,
    language: &str,
    dark: bool,
    fallback: Color32,
    font_size: f32,
) -> LayoutJob {
    let mut job = LayoutJob::default();
    let font_id = FontId::monospace(font_size);
    for line in code_highlighter().highlight(code, language, dark, fallback) {
        for seg in line {
            job.append(
                &seg.text,
                0.0,
                TextFormat {
                    font_id: font_id.clone(),
                    color: seg.color,
                    italics: seg.italic,
                    ..Default::default()
                },
            );
        }
    }
    job
}
