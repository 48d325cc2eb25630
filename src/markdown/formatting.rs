//! Markdown Formatting Operations
//!
//! Text transforms behind the editor's formatting shortcuts. They work on
//! the whole text plus a selection expressed in *character* indices (the
//! unit egui's cursor uses) and return the new text with the selection to
//! restore.
//!
//! # Usage
//! ```ignore
//! use crate::markdown::formatting::{apply_format, FormatCommand};
//!
//! let result = apply_format("Hello world", (0, 5), FormatCommand::Bold);
//! assert_eq!(result.text, "**Hello** world");
//! assert_eq!(result.selection, (0, 9));
//! ```

use crate::string_utils::char_range_to_byte_range;

// ─────────────────────────────────────────────────────────────────────────────
// Format Command Enum
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting commands available in the editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatCommand {
    /// Bold text (**text**)
    Bold,
    /// Italic text (_text_)
    Italic,
    /// Link ([text](url))
    Link,
}

impl FormatCommand {
    /// Get the keyboard shortcut label for this command.
    pub fn shortcut_label(&self) -> &'static str {
        match self {
            Self::Bold => "Ctrl+B",
            Self::Italic => "Ctrl+I",
            Self::Link => "Ctrl+K",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Link => "Insert Link",
        }
    }

    pub fn all() -> &'static [FormatCommand] {
        &[Self::Bold, Self::Italic, Self::Link]
    }
}

/// Marker used for bold.
pub const BOLD_MARKER: &str = "**";
/// Marker used for italic.
pub const ITALIC_MARKER: &str = "_";
/// Placeholder target inserted by [`insert_link`].
pub const LINK_PLACEHOLDER: &str = "url";

// ─────────────────────────────────────────────────────────────────────────────
// Format Result
// ─────────────────────────────────────────────────────────────────────────────

/// Result of applying a formatting command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatResult {
    /// The new text after formatting
    pub text: String,
    /// Selection to restore, as `(start, end)` character indices.
    /// `start == end` is a plain caret.
    pub selection: (usize, usize),
}

/// Apply a formatting command to `text` with the given selection.
pub fn apply_format(text: &str, selection: (usize, usize), command: FormatCommand) -> FormatResult {
    match command {
        FormatCommand::Bold => wrap_selection(text, selection, BOLD_MARKER),
        FormatCommand::Italic => wrap_selection(text, selection, ITALIC_MARKER),
        FormatCommand::Link => insert_link(text, selection),
    }
}

/// Surround the selection with `marker` on both sides.
///
/// With a selection, the result selects the markers and the original text.
/// With a bare caret, two markers are inserted and the caret goes between
/// them.
pub fn wrap_selection(text: &str, selection: (usize, usize), marker: &str) -> FormatResult {
    let (start_char, end_char) = ordered(selection);
    let (start, end) = char_range_to_byte_range(text, start_char, end_char);
    // Past-the-end indices were clamped; count what is really selected
    let start_char = text[..start].chars().count();
    let selected = &text[start..end];
    let selected_chars = selected.chars().count();
    let marker_chars = marker.chars().count();

    let mut new_text = String::with_capacity(text.len() + marker.len() * 2);
    new_text.push_str(&text[..start]);
    new_text.push_str(marker);
    new_text.push_str(selected);
    new_text.push_str(marker);
    new_text.push_str(&text[end..]);

    let selection = if selected.is_empty() {
        let caret = start_char + marker_chars;
        (caret, caret)
    } else {
        (start_char, start_char + selected_chars + marker_chars * 2)
    };

    FormatResult {
        text: new_text,
        selection,
    }
}

/// Replace the selection with `[selection](url)` and select `url`.
pub fn insert_link(text: &str, selection: (usize, usize)) -> FormatResult {
    let (start_char, end_char) = ordered(selection);
    let (start, end) = char_range_to_byte_range(text, start_char, end_char);
    let start_char = text[..start].chars().count();
    let selected = &text[start..end];

    let replacement = format!("[{}]({})", selected, LINK_PLACEHOLDER);
    let mut new_text = String::with_capacity(text.len() + replacement.len());
    new_text.push_str(&text[..start]);
    new_text.push_str(&replacement);
    new_text.push_str(&text[end..]);

    // "[" + text + "]("
    let url_start = start_char + selected.chars().count() + 3;
    FormatResult {
        text: new_text,
        selection: (url_start, url_start + LINK_PLACEHOLDER.chars().count()),
    }
}

fn ordered((a, b): (usize, usize)) -> (usize, usize) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(result: &FormatResult) -> String {
        let (start, end) = result.selection;
        result.text.chars().skip(start).take(end - start).collect()
    }

    #[test]
    fn test_bold_with_selection() {
        let result = wrap_selection("word", (0, 4), "**");
        assert_eq!(result.text, "**word**");
        assert_eq!(result.selection, (0, 8));
        assert_eq!(selected(&result), "**word**");
    }

    #[test]
    fn test_bold_mid_sentence() {
        let result = apply_format("Hello world", (6, 11), FormatCommand::Bold);
        assert_eq!(result.text, "Hello **world**");
        assert_eq!(selected(&result), "**world**");
    }

    #[test]
    fn test_italic_without_selection() {
        let result = apply_format("ab", (1, 1), FormatCommand::Italic);
        assert_eq!(result.text, "a__b");
        assert_eq!(result.selection, (2, 2));
    }

    #[test]
    fn test_bold_without_selection_places_caret_between_markers() {
        let result = wrap_selection("", (0, 0), "**");
        assert_eq!(result.text, "****");
        assert_eq!(result.selection, (2, 2));
    }

    #[test]
    fn test_reversed_selection() {
        let result = wrap_selection("one two", (7, 4), "_");
        assert_eq!(result.text, "one _two_");
        assert_eq!(selected(&result), "_two_");
    }

    #[test]
    fn test_link_with_selection() {
        let result = apply_format("see docs here", (4, 8), FormatCommand::Link);
        assert_eq!(result.text, "see [docs](url) here");
        assert_eq!(selected(&result), "url");
    }

    #[test]
    fn test_link_without_selection() {
        let result = insert_link("x", (1, 1));
        assert_eq!(result.text, "x[](url)");
        assert_eq!(selected(&result), "url");
    }

    #[test]
    fn test_bold_norwegian_chars() {
        let text = "Hei på deg";
        let result = wrap_selection(text, (4, 6), "**");
        assert_eq!(result.text, "Hei **på** deg");
        assert_eq!(selected(&result), "**på**");
    }

    #[test]
    fn test_link_emoji() {
        let result = insert_link("🎉 party", (2, 7));
        assert_eq!(result.text, "🎉 [party](url)");
        assert_eq!(selected(&result), "url");
    }

    #[test]
    fn test_selection_past_end_is_clamped() {
        let result = wrap_selection("abc", (1, 99), "**");
        assert_eq!(result.text, "a**bc**");
        assert_eq!(selected(&result), "**bc**");
    }

    #[test]
    fn test_shortcut_labels() {
        assert_eq!(FormatCommand::Bold.shortcut_label(), "Ctrl+B");
        assert_eq!(FormatCommand::Italic.shortcut_label(), "Ctrl+I");
        assert_eq!(FormatCommand::Link.shortcut_label(), "Ctrl+K");
    }
}
