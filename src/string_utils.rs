//! UTF-8 index utilities
//!
//! egui reports cursors and selections as *character* indices, while regex
//! matches, `LayoutJob` sections and string slicing all work in *bytes*.
//! The helpers here convert characters to bytes and snap arbitrary byte
//! positions to character and line boundaries.
//!
//! # Example
//! ```ignore
//! use crate::string_utils::{char_index_to_byte_index, line_start};
//!
//! let text = "Hei på deg";
//! let byte = char_index_to_byte_index(text, 6); // 7, 'å' is two bytes
//! assert_eq!(line_start(text, byte), 0);
//! ```

// ─────────────────────────────────────────────────────────────────────────────
// Character Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Returns the largest index `<= index` that lies on a character boundary.
///
/// Indices past the end clamp to `s.len()`.
#[inline]
pub fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while i > 0 && !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

// ─────────────────────────────────────────────────────────────────────────────
// Index Conversion
// ─────────────────────────────────────────────────────────────────────────────

/// Convert a character index to a byte index.
///
/// Returns the string length if `char_index` is beyond the string.
pub fn char_index_to_byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(s.len())
}

/// Convert an ordered `(start, end)` character range to a byte range.
pub fn char_range_to_byte_range(s: &str, start: usize, end: usize) -> (usize, usize) {
    let (start, end) = if start <= end { (start, end) } else { (end, start) };
    (
        char_index_to_byte_index(s, start),
        char_index_to_byte_index(s, end),
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Line Boundaries
// ─────────────────────────────────────────────────────────────────────────────

/// Byte index of the start of the line containing `index`.
pub fn line_start(s: &str, index: usize) -> usize {
    let index = floor_char_boundary(s, index);
    s[..index].rfind('\n').map(|i| i + 1).unwrap_or(0)
}

/// Byte index of the end of the line containing `index` (the position of
/// its `\n`, or `s.len()` for the last line).
pub fn line_end(s: &str, index: usize) -> usize {
    let index = floor_char_boundary(s, index);
    s[index..].find('\n').map(|i| index + i).unwrap_or(s.len())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_floor_norwegian() {
        let s = "Hei på deg"; // 'å' at byte 5-6
        assert_eq!(floor_char_boundary(s, 4), 4);
        assert_eq!(floor_char_boundary(s, 5), 5);
        assert_eq!(floor_char_boundary(s, 6), 5);
        assert_eq!(floor_char_boundary(s, 100), s.len());
    }

    #[test]
    fn test_char_to_byte_index() {
        let s = "Hei på";
        assert_eq!(char_index_to_byte_index(s, 0), 0);
        assert_eq!(char_index_to_byte_index(s, 5), 5);
        assert_eq!(char_index_to_byte_index(s, 6), 7);
        assert_eq!(char_index_to_byte_index(s, 100), 7);
    }

    #[test]
    fn test_char_range_to_byte_range_orders_input() {
        let s = "a🎉b";
        assert_eq!(char_range_to_byte_range(s, 2, 1), (1, 5));
        assert_eq!(char_range_to_byte_range(s, 0, 3), (0, 6));
    }

    #[test]
    fn test_line_bounds() {
        let s = "one\ntwo\nthree";
        assert_eq!(line_start(s, 5), 4);
        assert_eq!(line_end(s, 5), 7);
        assert_eq!(line_start(s, 0), 0);
        assert_eq!(line_end(s, 10), s.len());
        // A position on the newline belongs to the line it terminates
        assert_eq!(line_start(s, 3), 0);
        assert_eq!(line_end(s, 3), 3);
    }

    #[test]
    fn test_mixed_content_never_panics() {
        let s = "Hello 世界!\n🎉 Café naïve";
        for i in 0..=s.len() + 5 {
            let _ = floor_char_boundary(s, i);
            let _ = line_start(s, i);
            let _ = line_end(s, i);
        }
    }
}
