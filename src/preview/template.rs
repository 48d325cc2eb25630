//! Printable HTML Page
//!
//! Wraps the rendered markdown in a standalone HTML document styled from the
//! current palette. The page is what gets handed to the browser for
//! printing; it restores the shared scroll position and zoom on load.
//!
//! Templates use `{{NAME}}` placeholders, substituted in a single pass so
//! substituted content is never scanned again:
//!
//! | placeholder          | value                                             |
//! |----------------------|---------------------------------------------------|
//! | `{{TITLE}}`          | HTML-escaped document title                       |
//! | `{{STYLE}}`          | CSS generated from the palette                    |
//! | `{{BODY}}`           | rendered HTML                                     |
//! | `{{MARKDOWN_JSON}}`  | raw markdown as a script-safe JSON string literal |
//! | `{{SCROLL_FRACTION}}`| shared scroll fraction in `[0, 1]`               |
//! | `{{ZOOM}}`           | preview zoom factor                               |
//!
//! Unknown placeholders are left as they are.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::{Error, Result};
use crate::preview::renderer::{ComrakRenderer, MarkdownRenderer};
use crate::theme::{css_color, Palette};

const BODY_PLACEHOLDER: &str = "{{BODY}}";

/// The page layout used when no custom template is configured.
pub const BUILT_IN_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<meta name="generator" content="mdview">
<title>{{TITLE}}</title>
<style>
{{STYLE}}
</style>
</head>
<body style="zoom: {{ZOOM}}">
<article class="markdown-body">
{{BODY}}
</article>
<script>
window.mdviewSource = {{MARKDOWN_JSON}};
window.addEventListener('load', function () {
    var maxScroll = document.documentElement.scrollHeight - window.innerHeight;
    if (maxScroll > 0) {
        window.scrollTo(0, {{SCROLL_FRACTION}} * maxScroll);
    }
    window.print();
});
</script>
</body>
</html>
"#;

const BASE_CSS: &str = r#"*, *::before, *::after { box-sizing: border-box; }
body {
    margin: 0;
    font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', 'Noto Sans', Helvetica, Arial, sans-serif;
    font-size: 16px;
    line-height: 1.6;
}
.markdown-body { max-width: 900px; margin: 0 auto; padding: 32px 24px; }
.markdown-body h1, .markdown-body h2, .markdown-body h3,
.markdown-body h4, .markdown-body h5, .markdown-body h6 {
    margin: 24px 0 16px;
    font-weight: 600;
    line-height: 1.25;
}
.markdown-body h1 { font-size: 2em; border-bottom: 1px solid; padding-bottom: 0.3em; }
.markdown-body h2 { font-size: 1.5em; border-bottom: 1px solid; padding-bottom: 0.3em; }
.markdown-body h3 { font-size: 1.25em; }
.markdown-body p, .markdown-body ul, .markdown-body ol, .markdown-body pre,
.markdown-body table, .markdown-body blockquote { margin: 0 0 16px; }
.markdown-body ul, .markdown-body ol { padding-left: 2em; }
.markdown-body ul.contains-task-list { list-style-type: none; padding-left: 0; }
.markdown-body blockquote { padding: 0 1em; border-left: 4px solid; }
.markdown-body code {
    font-family: 'JetBrains Mono', 'Fira Code', Consolas, Monaco, monospace;
    font-size: 0.9em;
    padding: 0.2em 0.4em;
    border-radius: 4px;
}
.markdown-body pre { padding: 16px; overflow: auto; border-radius: 6px; line-height: 1.45; }
.markdown-body pre code { padding: 0; background: transparent; }
.markdown-body table { border-collapse: collapse; }
.markdown-body th, .markdown-body td { padding: 6px 13px; border: 1px solid; }
.markdown-body hr { height: 2px; margin: 24px 0; border: none; }
.markdown-body img { max-width: 100%; }
@media print {
    .markdown-body { max-width: none; padding: 0; }
    .markdown-body pre { white-space: pre-wrap; }
}
"#;

/// Per-render inputs of the page.
#[derive(Debug, Clone, PartialEq)]
pub struct PageOptions {
    pub palette: Palette,
    pub zoom: f32,
    pub scroll_fraction: f32,
    pub title: String,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            zoom: 1.0,
            scroll_fraction: 0.0,
            title: "Untitled".to_string(),
        }
    }
}

/// A page layout: the built-in one or a user-supplied file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PageTemplate {
    #[default]
    BuiltIn,
    Custom { path: PathBuf, source: String },
}

impl PageTemplate {
    /// Load a custom template. It must exist and contain `{{BODY}}`.
    pub fn from_file(path: &Path) -> Result<Self> {
        let source = fs::read_to_string(path).map_err(|e| Error::Template {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        if !source.contains(BODY_PLACEHOLDER) {
            return Err(Error::Template {
                message: format!("{} has no {} placeholder", path.display(), BODY_PLACEHOLDER),
            });
        }
        debug!("Loaded page template from {}", path.display());
        Ok(Self::Custom {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The configured template, or the built-in one when none is set.
    pub fn from_setting(custom: Option<&Path>) -> Result<Self> {
        match custom {
            Some(path) => Self::from_file(path),
            None => Ok(Self::BuiltIn),
        }
    }

    pub fn source(&self) -> &str {
        match self {
            Self::BuiltIn => BUILT_IN_TEMPLATE,
            Self::Custom { source, .. } => source,
        }
    }

    /// Render `text` into a full page with the default renderer.
    pub fn render(&self, text: &str, options: &PageOptions) -> Result<String> {
        self.render_with(&ComrakRenderer::default(), text, options)
    }

    pub fn render_with(
        &self,
        renderer: &dyn MarkdownRenderer,
        text: &str,
        options: &PageOptions,
    ) -> Result<String> {
        let template = self.source();
        if !template.contains(BODY_PLACEHOLDER) {
            return Err(Error::Template {
                message: format!("template has no {} placeholder", BODY_PLACEHOLDER),
            });
        }

        let body = renderer.render_html(text);
        let markdown_json = script_safe_json(text);
        let style = page_css(&options.palette);
        let title = html_escape(&options.title);
        let fraction = sanitize_number(options.scroll_fraction, 0.0).clamp(0.0, 1.0);
        let zoom = sanitize_number(options.zoom, 1.0);

        Ok(substitute(template, |name| match name {
            "TITLE" => Some(title.clone()),
            "STYLE" => Some(style.clone()),
            "BODY" => Some(body.clone()),
            "MARKDOWN_JSON" => Some(markdown_json.clone()),
            "SCROLL_FRACTION" => Some(fraction.to_string()),
            "ZOOM" => Some(zoom.to_string()),
            _ => None,
        }))
    }
}

/// Render the page for the configured template, logging instead of failing.
///
/// A missing or malformed custom template means no page.
pub fn render_page(custom: Option<&Path>, text: &str, options: &PageOptions) -> Option<String> {
    let page = PageTemplate::from_setting(custom).and_then(|template| template.render(text, options));
    match page {
        Ok(page) => Some(page),
        Err(e) => {
            warn!("Page not produced: {}", e);
            None
        }
    }
}

/// Replace every `{{NAME}}` that `lookup` knows in one left-to-right pass.
fn substitute(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after = &rest[open + 2..];
        let replaced = after.find("}}").and_then(|close| {
            let name = &after[..close];
            let is_name = !name.is_empty()
                && name.bytes().all(|b| b.is_ascii_uppercase() || b == b'_');
            if is_name {
                lookup(name).map(|value| (value, close))
            } else {
                None
            }
        });

        match replaced {
            Some((value, close)) => {
                out.push_str(&value);
                rest = &after[close + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// JSON string literal of `text` that is safe inside a `<script>` element.
fn script_safe_json(text: &str) -> String {
    let json = serde_json::Value::String(text.to_owned()).to_string();
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        match c {
            '<' => out.push_str("\\u003c"),
            '>' => out.push_str("\\u003e"),
            '&' => out.push_str("\\u0026"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            other => out.push(other),
        }
    }
    out
}

fn sanitize_number(value: f32, fallback: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        fallback
    }
}

fn page_css(palette: &Palette) -> String {
    format!(
        r#"{base}
:root {{ color-scheme: {scheme}; }}
body {{ background-color: {bg}; color: {text}; }}
.markdown-body h1, .markdown-body h2 {{ border-bottom-color: {border}; }}
.markdown-body a {{ color: {accent}; }}
.markdown-body strong {{ color: {strong}; }}
.markdown-body blockquote {{ color: {muted}; border-left-color: {border}; }}
.markdown-body code, .markdown-body pre {{ background-color: {code_bg}; color: {code_fg}; }}
.markdown-body th, .markdown-body td {{ border-color: {border}; }}
.markdown-body hr {{ background-color: {border}; }}
"#,
        base = BASE_CSS,
        scheme = if palette.dark { "dark" } else { "light" },
        bg = css_color(palette.background),
        text = css_color(palette.text),
        border = css_color(palette.border),
        accent = css_color(palette.accent),
        strong = css_color(palette.strong),
        muted = css_color(palette.muted),
        code_bg = css_color(palette.code_bg),
        code_fg = css_color(palette.code_fg),
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn render(text: &str) -> String {
        PageTemplate::BuiltIn
            .render(text, &PageOptions::default())
            .unwrap()
    }

    #[test]
    fn test_built_in_page_structure() {
        let page = render("# Hello\n\nWorld");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Untitled</title>"));
        assert!(page.contains("<h1>"));
        assert!(page.contains("<p>World</p>"));
        assert!(page.contains("color-scheme: light"));
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_script_close_in_source_is_escaped() {
        let page = render("```html\n</script><script>alert(1)</script>\n```");
        // The only raw closing tag is the template's own
        assert_eq!(page.matches("</script>").count(), 1);
        assert!(page.contains("\\u003c/script\\u003e"));
    }

    #[test]
    fn test_placeholders_in_source_are_not_resubstituted() {
        let page = render("literal {{BODY}} and {{TITLE}}");
        assert!(page.contains("literal {{BODY}} and {{TITLE}}"));
        assert_eq!(page.matches("<article").count(), 1);
    }

    #[test]
    fn test_markdown_json_round_trips() {
        let text = "a\u{2028}b <c> & \"d\"\n";
        let json = script_safe_json(text);
        assert!(!json.contains('\u{2028}'));
        assert!(!json.contains('<'));
        let back: String = serde_json::from_str(&json).unwrap();
        assert_eq!(back, text);
    }

    #[test]
    fn test_render_failures_are_template_errors() {
        let template = PageTemplate::Custom {
            path: PathBuf::from("broken.html"),
            source: "<html>{{TITLE}}</html>".to_string(),
        };
        let err = template
            .render("\u{0}\u{1f}\"quoted\" </script>", &PageOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Template { .. }));
        assert!(err.to_string().starts_with("Page template error"));

        // Any markdown text embeds; only the template itself can fail
        let page = PageTemplate::BuiltIn
            .render("\u{0}\u{1f}\"quoted\"", &PageOptions::default())
            .unwrap();
        assert!(page.contains("\\u0000\\u001f\\\"quoted\\\""));
    }

    #[test]
    fn test_title_is_escaped() {
        let options = PageOptions {
            title: "<b>notes</b>".to_string(),
            ..PageOptions::default()
        };
        let page = PageTemplate::BuiltIn.render("", &options).unwrap();
        assert!(page.contains("<title>&lt;b&gt;notes&lt;/b&gt;</title>"));
    }

    #[test]
    fn test_scroll_and_zoom_are_embedded() {
        let options = PageOptions {
            palette: Palette::dark(),
            zoom: 1.5,
            scroll_fraction: 0.25,
            ..PageOptions::default()
        };
        let page = PageTemplate::BuiltIn.render("x", &options).unwrap();
        assert!(page.contains("zoom: 1.5"));
        assert!(page.contains("0.25 * maxScroll"));
        assert!(page.contains("color-scheme: dark"));
        assert!(page.contains("#0d1117"));
    }

    #[test]
    fn test_non_finite_inputs_fall_back() {
        let options = PageOptions {
            zoom: f32::NAN,
            scroll_fraction: f32::INFINITY,
            ..PageOptions::default()
        };
        let page = PageTemplate::BuiltIn.render("x", &options).unwrap();
        assert!(page.contains("zoom: 1\""));
        assert!(page.contains("window.scrollTo(0, 0 * maxScroll)"));
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let out = substitute("{{A}} {{B}} {{lower}} {{", |name| {
            (name == "A").then(|| "x".to_string())
        });
        assert_eq!(out, "x {{B}} {{lower}} {{");
    }

    #[test]
    fn test_custom_template() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<main data-zoom=\"{{ZOOM}}\">{{BODY}}</main>").unwrap();

        let template = PageTemplate::from_file(&path).unwrap();
        let page = template.render("*hi*", &PageOptions::default()).unwrap();
        assert_eq!(page, "<main data-zoom=\"1\"><p><em>hi</em></p>\n</main>");
    }

    #[test]
    fn test_custom_template_without_body_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, "<main>{{TITLE}}</main>").unwrap();

        assert!(matches!(
            PageTemplate::from_file(&path),
            Err(Error::Template { .. })
        ));
        assert!(render_page(Some(&path), "x", &PageOptions::default()).is_none());
    }

    #[test]
    fn test_missing_custom_template_produces_no_page() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.html");
        assert!(render_page(Some(&path), "x", &PageOptions::default()).is_none());
        assert!(render_page(None, "x", &PageOptions::default()).is_some());
    }
}
