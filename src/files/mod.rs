//! File operations
//!
//! Native open/save pickers and UTF-8 document reads and writes.

pub mod dialogs;
mod io;

pub use io::{is_not_found, read_text, write_text};
