//! Application state management for mdview
//!
//! [`Document`] owns the markdown text and its file; [`AppState`] owns the
//! document together with everything the two surfaces share: the view mode,
//! both zoom knobs, the scroll coordinator, the theme, and the settings.

use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::config::{save_config_silent, Settings, Theme};
use crate::error::{Error, Result};
use crate::files::{is_not_found, read_text, write_text};
use crate::markdown::{apply_format, FormatCommand, FormatResult};
use crate::mode::{ModeController, Pane, ViewMode, ZoomAction, ZoomKnobs};
use crate::preview::ScrollCoordinator;
use crate::theme::ThemeManager;

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// The open markdown document.
#[derive(Debug, Clone, Default)]
pub struct Document {
    /// Current text. The editor widget edits this in place and then calls
    /// [`Document::mark_edited`].
    pub text: String,
    path: Option<PathBuf>,
    /// Text as last loaded or saved
    saved_text: String,
    /// Bumped when the text is replaced from outside the editor (open,
    /// reload, new). The editor keys its widget state on this.
    content_version: u64,
    /// Bumped on every change, including typing. The preview re-parses when
    /// this moves.
    revision: u64,
}

impl Document {
    /// An empty untitled document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let text = read_text(path)?;
        info!("Opened {}", path.display());
        Ok(Self {
            saved_text: text.clone(),
            text,
            path: Some(path.to_path_buf()),
            content_version: 0,
            revision: 0,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.text != self.saved_text
    }

    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// File name, or "Untitled".
    pub fn file_name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str())
            .unwrap_or("Untitled")
            .to_string()
    }

    /// Display title: the file name with a `*` while modified.
    pub fn title(&self) -> String {
        let name = self.file_name();
        if self.is_modified() {
            format!("{}*", name)
        } else {
            name
        }
    }

    /// Record an in-place edit made by the editor widget.
    pub fn mark_edited(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Replace the text as an edit (formatting commands).
    pub fn set_text(&mut self, text: String) {
        if text != self.text {
            self.text = text;
            self.mark_edited();
        }
    }

    /// Replace the text from outside the editor.
    fn replace(&mut self, text: String) {
        self.saved_text = text.clone();
        self.text = text;
        self.content_version = self.content_version.wrapping_add(1);
        self.mark_edited();
    }

    /// Re-read the file.
    ///
    /// Returns `true` if the text was replaced. Untitled documents, unreadable
    /// files, and files that are not UTF-8 keep the current text.
    pub fn reload(&mut self) -> bool {
        let Some(path) = self.path.clone() else {
            debug!("Reload skipped: document has no path");
            return false;
        };
        match read_text(&path) {
            Ok(text) => {
                self.replace(text);
                info!("Reloaded {}", path.display());
                true
            }
            Err(e) if is_not_found(&e) => {
                warn!("Reload skipped: {} no longer exists", path.display());
                false
            }
            Err(e) => {
                warn!("Reload failed, keeping current text: {}", e);
                false
            }
        }
    }

    /// Write the text to the document's path.
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(Error::NoPath)?;
        write_text(&path, &self.text)?;
        self.saved_text = self.text.clone();
        info!("Saved {}", path.display());
        Ok(())
    }

    /// Write the text to `path` and adopt it as the document's path.
    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        write_text(&path, &self.text)?;
        self.saved_text = self.text.clone();
        info!("Saved as {}", path.display());
        self.path = Some(path);
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state.
#[derive(Debug)]
pub struct AppState {
    pub document: Document,
    pub settings: Settings,
    pub mode: ModeController,
    pub zoom: ZoomKnobs,
    pub scroll: ScrollCoordinator,
    pub theme: ThemeManager,
    /// Settings changed since the last save
    settings_dirty: bool,
    /// Both surfaces must re-apply the shared scroll fraction
    needs_resync: bool,
    status_message: Option<String>,
}

impl AppState {
    pub fn with_settings(mut settings: Settings) -> Self {
        settings.sanitize();
        debug!(
            "AppState: theme {:?}, zoom {}, font size {}",
            settings.theme, settings.preview_zoom, settings.editor_font_size
        );
        Self {
            document: Document::new(),
            mode: ModeController::new(),
            zoom: ZoomKnobs::new(settings.preview_zoom, settings.editor_font_size),
            scroll: ScrollCoordinator::new(settings.sync_scroll_enabled),
            theme: ThemeManager::new(settings.theme),
            settings,
            settings_dirty: false,
            needs_resync: false,
            status_message: None,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the document with an empty untitled one.
    pub fn new_document(&mut self) {
        let version = self.document.content_version();
        self.document = Document::new();
        // Keep the version moving so the editor drops stale widget state
        self.document.content_version = version.wrapping_add(1);
        self.scroll.reset();
        self.needs_resync = true;
        info!("New untitled document");
    }

    /// Open `path`, replacing the current document.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let mut document = Document::open(path)?;
        document.content_version = self.document.content_version().wrapping_add(1);
        document.revision = self.document.revision().wrapping_add(1);
        self.document = document;
        self.scroll.reset();
        self.needs_resync = true;
        self.settings.add_recent_file(path.to_path_buf());
        self.settings_dirty = true;
        Ok(())
    }

    /// Re-read the document from disk.
    pub fn reload(&mut self) -> bool {
        let reloaded = self.document.reload();
        if reloaded {
            self.needs_resync = true;
        }
        reloaded
    }

    pub fn save(&mut self) -> Result<()> {
        self.document.save()
    }

    pub fn save_as(&mut self, path: PathBuf) -> Result<()> {
        self.document.save_as(path.clone())?;
        self.settings.add_recent_file(path);
        self.settings_dirty = true;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mode, zoom, formatting
    // ─────────────────────────────────────────────────────────────────────────

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        let mode = self.mode.toggle();
        self.needs_resync = true;
        mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        if self.mode.set_mode(mode) {
            self.needs_resync = true;
        }
    }

    /// Zoom the pane the mode controller targets and remember the new value.
    pub fn apply_zoom(&mut self, action: ZoomAction) -> (Pane, f32) {
        let (pane, value) = self.mode.route_zoom(&mut self.zoom, action);
        let stored = match pane {
            Pane::Preview => &mut self.settings.preview_zoom,
            Pane::Editor => &mut self.settings.editor_font_size,
        };
        if *stored != value {
            *stored = value;
            self.settings_dirty = true;
            self.needs_resync = true;
        }
        (pane, value)
    }

    /// Apply a formatting command to the document.
    ///
    /// Returns the selection to restore, or `None` when the editor is not
    /// shown.
    pub fn format(
        &mut self,
        command: FormatCommand,
        selection: (usize, usize),
    ) -> Option<(usize, usize)> {
        if !self.mode.allows_formatting() {
            debug!("Ignoring {:?}: editor not shown", command);
            return None;
        }
        let FormatResult { text, selection } = apply_format(&self.document.text, selection, command);
        self.document.set_text(text);
        Some(selection)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Appearance and behaviour
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme.set_theme(theme);
        if self.settings.theme != theme {
            self.settings.theme = theme;
            self.settings_dirty = true;
            self.needs_resync = true;
        }
    }

    pub fn toggle_sync_scroll(&mut self) -> bool {
        let enabled = self.scroll.toggle();
        self.settings.sync_scroll_enabled = enabled;
        self.settings_dirty = true;
        if enabled {
            self.needs_resync = true;
        }
        enabled
    }

    pub fn toggle_word_wrap(&mut self) -> bool {
        self.settings.word_wrap = !self.settings.word_wrap;
        self.settings_dirty = true;
        self.settings.word_wrap
    }

    /// Whether the surfaces must re-apply the shared fraction; clears the flag.
    pub fn take_resync(&mut self) -> bool {
        std::mem::take(&mut self.needs_resync)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings_dirty = true;
    }

    /// Save settings to the config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if !self.settings_dirty {
            return false;
        }
        if save_config_silent(&self.settings) {
            self.settings_dirty = false;
            debug!("Settings saved");
            return true;
        }
        warn!("Failed to save settings");
        false
    }

    /// Save settings on exit.
    pub fn shutdown(&mut self) {
        self.settings_dirty = true;
        self.save_settings_if_dirty();
        info!("AppState shutdown complete");
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Status bar
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn status(&self) -> Option<&str> {
        self.status_message.as_deref()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_settings(Settings::default())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
