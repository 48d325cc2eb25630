//! Native file dialog integration using the rfd crate
//!
//! Pickers for markdown documents and for the optional custom page
//! template. All of them return `None` when the user cancels.

use rfd::FileDialog;
use std::path::{Path, PathBuf};

const MARKDOWN_EXTENSIONS: &[&str] = &["md", "markdown", "mdown", "mkd", "mkdn"];
const TEXT_EXTENSIONS: &[&str] = &["txt", "text"];
const HTML_EXTENSIONS: &[&str] = &["html", "htm"];

/// Default file name offered when saving an untitled document.
pub const UNTITLED_FILE_NAME: &str = "Untitled.md";

fn document_dialog(title: &str, initial_dir: Option<&Path>) -> FileDialog {
    let dialog = FileDialog::new()
        .set_title(title)
        .add_filter("Markdown Files", MARKDOWN_EXTENSIONS)
        .add_filter("Text Files", TEXT_EXTENSIONS)
        .add_filter("All Files", &["*"]);

    match initial_dir {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    }
}

/// Opens a native file dialog for picking one document.
pub fn open_file_dialog(initial_dir: Option<&Path>) -> Option<PathBuf> {
    document_dialog("Open", initial_dir).pick_file()
}

/// Opens a native save dialog.
pub fn save_file_dialog(initial_dir: Option<&Path>, default_name: Option<&str>) -> Option<PathBuf> {
    document_dialog("Save As", initial_dir)
        .set_file_name(default_name.unwrap_or(UNTITLED_FILE_NAME))
        .save_file()
}

/// Opens a native file dialog for picking an HTML page template.
pub fn open_template_dialog(initial_dir: Option<&Path>) -> Option<PathBuf> {
    let dialog = FileDialog::new()
        .set_title("Choose Page Template")
        .add_filter("HTML Files", HTML_EXTENSIONS);
    match initial_dir {
        Some(dir) => dialog.set_directory(dir),
        None => dialog,
    }
    .pick_file()
}
