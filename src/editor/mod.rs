//! Editor module for mdview
//!
//! The raw-text editor surface with live markdown highlighting.

mod widget;

pub use widget::EditorPane;
