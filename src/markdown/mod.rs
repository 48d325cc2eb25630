//! Markdown parsing, highlighting, and editing transforms
//!
//! - [`highlighter`]: regex-based live highlighting of the raw text
//! - [`formatting`]: bold/italic/link commands on a text selection
//! - [`parser`]: comrak-backed AST and HTML output
//! - [`syntax`]: syntect coloring for fenced code in the preview

pub mod formatting;
pub mod highlighter;
pub mod parser;
pub mod syntax;

pub use formatting::{apply_format, FormatCommand, FormatResult};
