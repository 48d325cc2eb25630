//! Live markdown highlighting for the editor
//!
//! A fixed, ordered list of independent patterns (one per [`StyleClass`]) is
//! run over the whole text after every edit. Matches may overlap; when the
//! ranges are painted, later classes win over earlier ones. Nothing is cached
//! between runs, so unterminated or nested markup simply fails to match.
//!
//! ```ignore
//! let ranges = highlight("# Title\n\nSome **bold** text.");
//! let spans = paint(text, &ranges, &Palette::light());
//! ```

use std::collections::BTreeSet;
use std::ops::Range;
use std::sync::OnceLock;

use eframe::egui::Color32;
use regex::Regex;

use crate::string_utils::{line_end, line_start};
use crate::theme::Palette;

/// Documents above this size are highlighted around the visible region only.
pub const LARGE_DOCUMENT_BYTES: usize = 256 * 1024;

// ─────────────────────────────────────────────────────────────────────────────
// Styled Ranges
// ─────────────────────────────────────────────────────────────────────────────

/// Markup recognised by the highlighter, in application order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StyleClass {
    Heading,
    Bold,
    Italic,
    FencedCode,
    InlineCode,
    Link,
    Blockquote,
    ListMarker,
}

impl StyleClass {
    pub const ALL: [StyleClass; 8] = [
        StyleClass::Heading,
        StyleClass::Bold,
        StyleClass::Italic,
        StyleClass::FencedCode,
        StyleClass::InlineCode,
        StyleClass::Link,
        StyleClass::Blockquote,
        StyleClass::ListMarker,
    ];

    /// Attribute changes this class applies on top of the base style.
    pub fn attrs(&self, palette: &Palette) -> StyleAttrs {
        match self {
            StyleClass::Heading => StyleAttrs {
                color: Some(palette.accent),
                face: Some(FontFace::Bold),
                ..StyleAttrs::default()
            },
            StyleClass::Bold => StyleAttrs {
                face: Some(FontFace::Bold),
                ..StyleAttrs::default()
            },
            StyleClass::Italic => StyleAttrs {
                face: Some(FontFace::Italic),
                ..StyleAttrs::default()
            },
            StyleClass::FencedCode | StyleClass::InlineCode => StyleAttrs {
                color: Some(palette.code_fg),
                background: Some(palette.code_bg),
                ..StyleAttrs::default()
            },
            StyleClass::Link | StyleClass::ListMarker => StyleAttrs {
                color: Some(palette.accent),
                ..StyleAttrs::default()
            },
            StyleClass::Blockquote => StyleAttrs {
                color: Some(palette.muted),
                ..StyleAttrs::default()
            },
        }
    }
}

/// A byte range of the text and the markup it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StyledRange {
    pub start: usize,
    pub end: usize,
    pub class: StyleClass,
}

impl StyledRange {
    fn new(start: usize, end: usize, class: StyleClass) -> Self {
        Self { start, end, class }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patterns
// ─────────────────────────────────────────────────────────────────────────────

struct Patterns {
    heading: Regex,
    bold: Regex,
    fenced_code: Regex,
    inline_code: Regex,
    link: Regex,
    blockquote: Regex,
    list_marker: Regex,
    fence_line: Regex,
}

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid highlight pattern {pattern:?}: {e}"))
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    // `R` makes ^ and $ treat "\r\n" as a line terminator
    PATTERNS.get_or_init(|| Patterns {
        heading: compile(r"(?mR)^#{1,6}[ \t].*$"),
        bold: compile(r"\*\*(.+?)\*\*"),
        fenced_code: compile(r"(?mR)^```(?s:.*?)^```"),
        inline_code: compile(r"`[^`\n]+?`"),
        link: compile(r"\[.+?\]\(.+?\)"),
        blockquote: compile(r"(?mR)^>.*$"),
        list_marker: compile(r"(?mR)^[ \t]*([-*+]|[0-9]+\.)[ \t]"),
        fence_line: compile(r"(?mR)^```"),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlighting
// ─────────────────────────────────────────────────────────────────────────────

/// Compute styled ranges for the whole text.
///
/// Ranges are grouped by class in [`StyleClass::ALL`] order and sorted by
/// start within a class. The result depends only on `text`.
pub fn highlight(text: &str) -> Vec<StyledRange> {
    let p = patterns();
    let mut ranges = Vec::new();

    push_matches(&mut ranges, &p.heading, text, StyleClass::Heading);
    push_matches(&mut ranges, &p.bold, text, StyleClass::Bold);
    ranges.extend(
        italic_spans(text)
            .into_iter()
            .map(|r| StyledRange::new(r.start, r.end, StyleClass::Italic)),
    );
    push_matches(&mut ranges, &p.fenced_code, text, StyleClass::FencedCode);
    push_matches(&mut ranges, &p.inline_code, text, StyleClass::InlineCode);
    push_matches(&mut ranges, &p.link, text, StyleClass::Link);
    push_matches(&mut ranges, &p.blockquote, text, StyleClass::Blockquote);

    // Only the marker itself, without indentation or the trailing blank
    ranges.extend(p.list_marker.captures_iter(text).filter_map(|caps| {
        caps.get(1)
            .map(|m| StyledRange::new(m.start(), m.end(), StyleClass::ListMarker))
    }));

    ranges
}

fn push_matches(ranges: &mut Vec<StyledRange>, regex: &Regex, text: &str, class: StyleClass) {
    ranges.extend(
        regex
            .find_iter(text)
            .filter(|m| !m.is_empty())
            .map(|m| StyledRange::new(m.start(), m.end(), class)),
    );
}

/// Single-marker emphasis: `*x*` or `_x_` on one line.
///
/// The opener must not follow another `*`/`_` nor be doubled, and the
/// closer is the first same marker (at least one character in) that is not
/// itself doubled. Scanning resumes after a match, or one byte on after a
/// failed opener.
fn italic_spans(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        let marker = bytes[i];
        let is_opener = (marker == b'*' || marker == b'_')
            && !(i > 0 && matches!(bytes[i - 1], b'*' | b'_'))
            && bytes.get(i + 1).is_some_and(|&next| next != marker && next != b'\n');

        if !is_opener {
            i += 1;
            continue;
        }

        let closer = (i + 2..bytes.len())
            .take_while(|&j| bytes[j - 1] != b'\n')
            .find(|&j| bytes[j] == marker && bytes.get(j + 1) != Some(&marker));

        match closer {
            Some(j) => {
                spans.push(i..j + 1);
                i = j + 1;
            }
            None => i += 1,
        }
    }

    spans
}

/// Highlight only the lines touching `window`, for very large documents.
///
/// The window is widened to whole lines and, when it starts or ends inside
/// a fenced block, out to that block's fences. Returned ranges are offsets
/// into the full `text`.
pub fn highlight_window(text: &str, window: Range<usize>) -> Vec<StyledRange> {
    let fence = &patterns().fence_line;
    let mut start = line_start(text, window.start.min(text.len()));
    let mut end = line_end(text, window.end.max(window.start).min(text.len()));

    // An odd number of fences before the window means it opens inside a block
    let fences_before: Vec<usize> = fence.find_iter(&text[..start]).map(|m| m.start()).collect();
    if fences_before.len() % 2 == 1 {
        if let Some(&open) = fences_before.last() {
            start = open;
        }
    }

    let fences_inside = fence.find_iter(&text[start..end]).count();
    if fences_inside % 2 == 1 {
        end = fence
            .find_at(text, end)
            .map(|m| line_end(text, m.end()))
            .unwrap_or(text.len());
    }

    highlight(&text[start..end])
        .into_iter()
        .map(|r| StyledRange::new(r.start + start, r.end + start, r.class))
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Painting
// ─────────────────────────────────────────────────────────────────────────────

/// Font face of a painted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FontFace {
    #[default]
    Regular,
    Bold,
    Italic,
}

/// Attribute overrides of one style class; `None` leaves the attribute alone.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct StyleAttrs {
    pub color: Option<Color32>,
    pub background: Option<Color32>,
    pub face: Option<FontFace>,
}

/// Fully resolved style of a painted span.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanStyle {
    pub color: Color32,
    pub background: Color32,
    pub face: FontFace,
}

impl SpanStyle {
    pub fn base(palette: &Palette) -> Self {
        Self {
            color: palette.text,
            background: Color32::TRANSPARENT,
            face: FontFace::Regular,
        }
    }

    fn apply(&mut self, attrs: StyleAttrs) {
        if let Some(color) = attrs.color {
            self.color = color;
        }
        if let Some(background) = attrs.background {
            self.background = background;
        }
        if let Some(face) = attrs.face {
            self.face = face;
        }
    }
}

/// A section of text with its resolved style.
#[derive(Debug, Clone, PartialEq)]
pub struct PaintedSpan {
    pub range: Range<usize>,
    pub style: SpanStyle,
}

/// Resolve overlapping ranges into non-overlapping spans covering `text`.
///
/// Each byte takes the base style with the attributes of every range
/// covering it applied in input order. Adjacent spans with equal style are
/// merged. Ranges outside the text or off a character boundary are ignored.
pub fn paint(text: &str, ranges: &[StyledRange], palette: &Palette) -> Vec<PaintedSpan> {
    let base = SpanStyle::base(palette);
    if text.is_empty() {
        return Vec::new();
    }

    let valid: Vec<usize> = (0..ranges.len())
        .filter(|&i| {
            let r = &ranges[i];
            !r.is_empty()
                && r.end <= text.len()
                && text.is_char_boundary(r.start)
                && text.is_char_boundary(r.end)
        })
        .collect();

    let mut bounds: Vec<usize> = valid
        .iter()
        .flat_map(|&i| [ranges[i].start, ranges[i].end])
        .chain([0, text.len()])
        .collect();
    bounds.sort_unstable();
    bounds.dedup();

    let mut by_start = valid;
    by_start.sort_by_key(|&i| ranges[i].start);

    let attrs: Vec<StyleAttrs> = ranges.iter().map(|r| r.class.attrs(palette)).collect();
    let mut active: BTreeSet<usize> = BTreeSet::new();
    let mut next = 0;
    let mut spans: Vec<PaintedSpan> = Vec::new();

    for pair in bounds.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        active.retain(|&i| ranges[i].end > from);
        while next < by_start.len() && ranges[by_start[next]].start <= from {
            active.insert(by_start[next]);
            next += 1;
        }

        // BTreeSet iterates in input order, so later ranges win
        let mut style = base;
        for &i in &active {
            style.apply(attrs[i]);
        }

        match spans.last_mut() {
            Some(last) if last.style == style && last.range.end == from => last.range.end = to,
            _ => spans.push(PaintedSpan {
                range: from..to,
                style,
            }),
        }
    }

    spans
}

/// Highlight and paint in one step: text plus theme to styled spans.
pub fn highlight_painted(text: &str, palette: &Palette) -> Vec<PaintedSpan> {
    paint(text, &highlight(text), palette)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
