//! Main application module for mdview
//!
//! This module implements the eframe App trait: it lays out the menu bar,
//! status bar, and the editor/preview panes for the current view mode, and
//! dispatches the commands produced by shortcuts and menus.

use std::path::{Path, PathBuf};

use eframe::egui;
use log::{debug, info, warn};

use crate::commands::{shortcut_commands, AppCommand, CommandQueue};
use crate::config::{Settings, Theme, WindowSize};
pub use crate::config::APP_NAME;
use crate::editor::EditorPane;
use crate::error::{Error, Result};
use crate::files::dialogs::{open_file_dialog, open_template_dialog, save_file_dialog};
use crate::files::write_text;
use crate::markdown::FormatCommand;
use crate::mode::{Pane, ViewMode, ZoomAction};
use crate::preview::{render_page, PageOptions, PreviewPane};
use crate::state::AppState;

/// File the printable page is written to inside the temp directory.
const PRINT_FILE_NAME: &str = "mdview-print.html";

/// Smallest share of the window either split pane may take.
const MIN_SPLIT_SHARE: f32 = 0.2;

pub struct MdViewApp {
    /// Central application state
    state: AppState,
    editor: EditorPane,
    preview: PreviewPane,
    /// Commands collected this frame, dispatched after layout
    commands: CommandQueue,
    /// Title last sent to the viewport
    last_title: String,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    should_exit: bool,
}

impl MdViewApp {
    /// Create the app, opening `initial_path` if one was given.
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        settings: Settings,
        initial_path: Option<PathBuf>,
    ) -> Self {
        info!("Initializing {}", APP_NAME);

        // Zoom shortcuts are routed by the mode controller, not egui
        cc.egui_ctx.options_mut(|o| o.zoom_with_keyboard = false);

        let mut app = Self::with_state(AppState::with_settings(settings));
        if let Some(system) = cc.integration_info.system_theme {
            app.state.theme.set_system_dark(system == eframe::Theme::Dark);
        }
        app.state.theme.apply_if_needed(&cc.egui_ctx);
        info!("Applied initial theme: {:?}", app.state.settings.theme);

        if let Some(path) = initial_path {
            app.commands.push(AppCommand::OpenPath(path));
        }
        app
    }

    fn with_state(state: AppState) -> Self {
        Self {
            state,
            editor: EditorPane::new(),
            preview: PreviewPane::new(),
            commands: CommandQueue::new(),
            last_title: String::new(),
            last_window_size: None,
            last_window_pos: None,
            should_exit: false,
        }
    }

    /// Returns a title in the format "notes.md* - mdview".
    fn window_title(&self) -> String {
        format!("{} - {}", self.state.document.title(), APP_NAME)
    }

    /// Update window size in settings if changed.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let size = rect.size();
        let pos = rect.min;
        let size_changed = self
            .last_window_size
            .map_or(true, |s| (s - size).length() > 1.0);
        let pos_changed = self
            .last_window_pos
            .map_or(true, |p| (p - pos).length() > 1.0);
        if !size_changed && !pos_changed {
            return;
        }

        self.last_window_size = Some(size);
        self.last_window_pos = Some(pos);
        let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));
        // Written on exit with the rest of the settings
        self.state.settings.window_size = WindowSize {
            width: size.x,
            height: size.y,
            x: Some(pos.x),
            y: Some(pos.y),
            maximized,
        };
    }

    /// Queue an open for the first file dropped on the window.
    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped = ctx.input(|i| i.raw.dropped_files.iter().find_map(|f| f.path.clone()));
        if let Some(path) = dropped {
            debug!("File dropped: {}", path.display());
            self.commands.push(AppCommand::OpenPath(path));
        }
    }

    fn invalidate_sync(&mut self) {
        self.editor.sync_mut().invalidate();
        self.preview.sync_mut().invalidate();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Layout
    // ─────────────────────────────────────────────────────────────────────────

    fn render_menu_bar(&mut self, ctx: &egui::Context) {
        let commands = &mut self.commands;
        let state = &self.state;

        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            egui::menu::bar(ui, |ui| {
                ui.menu_button("File", |ui| {
                    menu_item(ui, "New", AppCommand::New, commands);
                    menu_item(ui, "Open…", AppCommand::Open, commands);
                    ui.menu_button("Open Recent", |ui| {
                        if state.settings.recent_files.is_empty() {
                            ui.label("No recent files");
                        }
                        for path in &state.settings.recent_files {
                            if ui.button(path.display().to_string()).clicked() {
                                commands.push(AppCommand::OpenPath(path.clone()));
                                ui.close_menu();
                            }
                        }
                        ui.separator();
                        menu_item(ui, "Clear Recent Files", AppCommand::ClearRecentFiles, commands);
                    });
                    ui.separator();
                    menu_item(ui, "Save", AppCommand::Save, commands);
                    menu_item(ui, "Save As…", AppCommand::SaveAs, commands);
                    menu_item(ui, "Reload", AppCommand::Reload, commands);
                    ui.separator();
                    menu_item(ui, "Print…", AppCommand::Print, commands);
                    ui.menu_button("Page Template", |ui| {
                        let custom = state.settings.custom_template.as_deref();
                        if let Some(path) = custom {
                            ui.label(path.display().to_string());
                            ui.separator();
                        }
                        menu_item(ui, "Choose…", AppCommand::ChooseTemplate, commands);
                        ui.add_enabled_ui(custom.is_some(), |ui| {
                            menu_item(ui, "Use Built-in", AppCommand::UseBuiltInTemplate, commands);
                        });
                    });
                    ui.separator();
                    menu_item(ui, "Quit", AppCommand::Quit, commands);
                });

                ui.menu_button("Edit", |ui| {
                    ui.add_enabled_ui(state.mode.allows_formatting(), |ui| {
                        for &command in FormatCommand::all() {
                            menu_item(ui, command.label(), AppCommand::Format(command), commands);
                        }
                    });
                });

                ui.menu_button("View", |ui| {
                    let current = state.mode.mode();
                    for &mode in ViewMode::all() {
                        if ui.radio(current == mode, mode.label()).clicked() {
                            commands.push(AppCommand::SetViewMode(mode));
                            ui.close_menu();
                        }
                    }
                    menu_item(ui, "Next View Mode", AppCommand::ToggleViewMode, commands);
                    ui.separator();
                    menu_item(ui, "Zoom In", AppCommand::Zoom(ZoomAction::In), commands);
                    menu_item(ui, "Zoom Out", AppCommand::Zoom(ZoomAction::Out), commands);
                    menu_item(ui, "Reset Zoom", AppCommand::Zoom(ZoomAction::Reset), commands);
                    ui.separator();
                    let mut sync = state.settings.sync_scroll_enabled;
                    if ui.checkbox(&mut sync, "Sync Scrolling").clicked() {
                        commands.push(AppCommand::ToggleSyncScroll);
                    }
                    let mut wrap = state.settings.word_wrap;
                    if ui.checkbox(&mut wrap, "Word Wrap").clicked() {
                        commands.push(AppCommand::ToggleWordWrap);
                    }
                });

                ui.menu_button("Theme", |ui| {
                    let current = state.theme.current_theme();
                    for &theme in Theme::all() {
                        let button = egui::Button::new(theme.label())
                            .selected(current == theme)
                            .shortcut_text(theme.shortcut_label());
                        if ui.add(button).clicked() {
                            commands.push(AppCommand::SetTheme(theme));
                            ui.close_menu();
                        }
                    }
                });
            });
        });
    }

    fn render_status_bar(&mut self, ctx: &egui::Context) {
        let state = &self.state;
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if let Some(message) = state.status() {
                    ui.label(message);
                }
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(state.mode.mode().label());
                    ui.separator();
                    if state.mode.shows_editor() {
                        ui.label(format!("{:.0} pt", state.zoom.editor.value));
                    }
                    if state.mode.shows_preview() {
                        ui.label(format!("{:.0}%", state.zoom.preview.value * 100.0));
                    }
                    if state.document.is_modified() {
                        ui.separator();
                        ui.label("Modified");
                    }
                });
            });
        });
    }

    fn render_panes(&mut self, ctx: &egui::Context) {
        let palette = *self.state.theme.palette();

        if self.state.mode.mode() == ViewMode::Split {
            let total = ctx.screen_rect().width();
            let response = egui::SidePanel::left("editor_panel")
                .resizable(true)
                .default_width(total * self.state.settings.split_ratio)
                .width_range(total * MIN_SPLIT_SHARE..=total * (1.0 - MIN_SPLIT_SHARE))
                .frame(egui::Frame::none().fill(palette.panel))
                .show(ctx, |ui| self.show_editor(ui));

            // Remember the divider once the drag is over
            let ratio = response.response.rect.width() / total;
            let dragging = ctx.input(|i| i.pointer.any_down());
            if !dragging && (ratio - self.state.settings.split_ratio).abs() > 0.01 {
                self.state.update_settings(|s| s.split_ratio = ratio);
                self.state.settings.sanitize();
            }
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::none().fill(palette.background))
            .show(ctx, |ui| match self.state.mode.mode() {
                ViewMode::Edit => self.show_editor(ui),
                ViewMode::Preview | ViewMode::Split => self.show_preview(ui),
            });
    }

    fn show_editor(&mut self, ui: &mut egui::Ui) {
        let state = &mut self.state;
        let output = self.editor.show(
            ui,
            &mut state.document,
            state.theme.palette(),
            state.zoom.editor.value,
            state.settings.word_wrap,
            &mut state.scroll,
        );
        if output.focused && state.mode.focused() != Pane::Editor {
            debug!("Editor focused");
            state.mode.focus(Pane::Editor);
        }
    }

    fn show_preview(&mut self, ui: &mut egui::Ui) {
        let state = &mut self.state;
        let output = self.preview.show(
            ui,
            &state.document.text,
            state.document.revision(),
            state.theme.palette(),
            state.zoom.preview.value,
            &mut state.scroll,
        );
        if output.interacted && state.mode.focused() != Pane::Preview {
            debug!("Preview focused");
            state.mode.focus(Pane::Preview);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Commands
    // ─────────────────────────────────────────────────────────────────────────

    fn dispatch(&mut self, command: AppCommand) {
        debug!("Dispatching {:?}", command);
        match command {
            AppCommand::New => {
                self.state.new_document();
                self.editor.reset_selection();
                self.state.set_status("New document");
            }
            AppCommand::Open => self.handle_open_file(),
            AppCommand::OpenPath(path) => self.open_path(&path),
            AppCommand::Save => self.handle_save_file(),
            AppCommand::SaveAs => self.handle_save_as_file(),
            AppCommand::Reload => self.handle_reload(),
            AppCommand::Print => self.handle_print(),
            AppCommand::ToggleViewMode => {
                let mode = self.state.toggle_view_mode();
                self.state.set_status(format!("{} mode", mode.label()));
            }
            AppCommand::SetViewMode(mode) => self.state.set_view_mode(mode),
            AppCommand::SetTheme(theme) => {
                self.state.set_theme(theme);
                self.state.set_status(format!("Theme: {}", theme.label()));
            }
            AppCommand::Zoom(action) => {
                let (pane, value) = self.state.apply_zoom(action);
                let status = match pane {
                    Pane::Preview => format!("Preview zoom {:.0}%", value * 100.0),
                    Pane::Editor => format!("Editor font {:.0} pt", value),
                };
                self.state.set_status(status);
            }
            AppCommand::ToggleSyncScroll => {
                let enabled = self.state.toggle_sync_scroll();
                let status = if enabled { "Sync scrolling on" } else { "Sync scrolling off" };
                self.state.set_status(status);
            }
            AppCommand::ToggleWordWrap => {
                self.state.toggle_word_wrap();
            }
            AppCommand::Format(command) => {
                if let Some(selection) = self.state.format(command, self.editor.selection()) {
                    self.editor.set_selection(selection);
                }
            }
            AppCommand::ClearRecentFiles => {
                self.state.update_settings(|s| s.recent_files.clear());
            }
            AppCommand::ChooseTemplate => self.handle_choose_template(),
            AppCommand::UseBuiltInTemplate => {
                self.state.update_settings(|s| s.custom_template = None);
                self.state.set_status("Using the built-in page template");
            }
            AppCommand::Quit => self.should_exit = true,
        }
    }

    /// Directory to start file dialogs in.
    fn dialog_dir(&self) -> Option<PathBuf> {
        self.state
            .document
            .path()
            .or_else(|| self.state.settings.recent_files.first().map(PathBuf::as_path))
            .and_then(Path::parent)
            .map(Path::to_path_buf)
    }

    fn handle_open_file(&mut self) {
        match open_file_dialog(self.dialog_dir().as_deref()) {
            Some(path) => self.open_path(&path),
            None => debug!("File dialog cancelled"),
        }
    }

    fn open_path(&mut self, path: &Path) {
        info!("Opening file: {}", path.display());
        match self.state.open(path) {
            Ok(()) => {
                self.editor.reset_selection();
                self.state.set_status(format!("Opened {}", path.display()));
            }
            Err(e) => {
                warn!("Failed to open file {}: {}", path.display(), e);
                self.state.set_status(format!("Failed to open: {}", e));
            }
        }
    }

    /// Saves to the document's path, or asks for one if untitled.
    fn handle_save_file(&mut self) {
        if self.state.document.path().is_none() {
            self.handle_save_as_file();
            return;
        }
        match self.state.save() {
            Ok(()) => self.state.set_status("Saved"),
            Err(e) => {
                warn!("Failed to save file: {}", e);
                self.state.set_status(format!("Save failed: {}", e));
            }
        }
    }

    fn handle_save_as_file(&mut self) {
        let name = self.state.document.file_name();
        let default_name = self.state.document.path().map(|_| name.as_str());
        let Some(path) = save_file_dialog(self.dialog_dir().as_deref(), default_name) else {
            debug!("Save dialog cancelled");
            return;
        };
        match self.state.save_as(path.clone()) {
            Ok(()) => self.state.set_status(format!("Saved {}", path.display())),
            Err(e) => {
                warn!("Failed to save file: {}", e);
                self.state.set_status(format!("Save failed: {}", e));
            }
        }
    }

    fn handle_reload(&mut self) {
        if self.state.document.path().is_none() {
            self.state.set_status("Nothing to reload");
        } else if self.state.reload() {
            self.editor.reset_selection();
            self.state.set_status("Reloaded");
        } else {
            self.state.set_status("Reload failed, kept the current text");
        }
    }

    fn handle_choose_template(&mut self) {
        let dir = self
            .state
            .settings
            .custom_template
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf);
        if let Some(path) = open_template_dialog(dir.as_deref()) {
            info!("Page template: {}", path.display());
            self.state.set_status(format!("Page template: {}", path.display()));
            self.state.update_settings(|s| s.custom_template = Some(path));
        }
    }

    /// The printable page for the current document and view state.
    fn print_page(&self) -> Option<String> {
        let options = PageOptions {
            palette: *self.state.theme.palette(),
            zoom: self.state.zoom.preview.value,
            scroll_fraction: self.state.scroll.state().fraction,
            title: self.state.document.file_name(),
        };
        render_page(
            self.state.settings.custom_template.as_deref(),
            &self.state.document.text,
            &options,
        )
    }

    /// Write the printable page to the temp directory and open it.
    fn print(&self) -> Result<PathBuf> {
        let page = self.print_page().ok_or_else(|| Error::Template {
            message: "no page was produced".to_string(),
        })?;
        let path = std::env::temp_dir().join(PRINT_FILE_NAME);
        write_text(&path, &page)?;
        open::that(&path)
            .map_err(|e| Error::Application(format!("Could not open the browser: {}", e)))?;
        Ok(path)
    }

    fn handle_print(&mut self) {
        match self.print() {
            Ok(path) => {
                info!("Opened print page {}", path.display());
                self.state.set_status("Print page opened in the browser");
            }
            Err(e) => {
                warn!("Print failed: {}", e);
                self.state.set_status(format!("Print failed: {}", e));
            }
        }
    }
}

/// A menu entry showing its shortcut that queues `command` when clicked.
fn menu_item(ui: &mut egui::Ui, label: &str, command: AppCommand, commands: &mut CommandQueue) {
    let button =
        egui::Button::new(label).shortcut_text(command.shortcut_label().unwrap_or_default());
    if ui.add(button).clicked() {
        commands.push(command);
        ui.close_menu();
    }
}

impl eframe::App for MdViewApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, frame: &mut eframe::Frame) {
        // Follow the system appearance for Theme::System
        if let Some(system) = frame.info().system_theme {
            self.state.theme.set_system_dark(system == eframe::Theme::Dark);
        }
        if self.state.theme.apply_if_needed(ctx) {
            self.invalidate_sync();
        }
        if self.state.take_resync() {
            self.invalidate_sync();
        }

        let title = self.window_title();
        if title != self.last_title {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.clone()));
            self.last_title = title;
        }
        self.update_window_state(ctx);
        self.handle_dropped_files(ctx);

        // Before any widget runs, so shortcuts never reach the text edit
        let shortcuts = ctx.input_mut(shortcut_commands);
        self.commands.extend(shortcuts);

        self.render_menu_bar(ctx);
        self.render_status_bar(ctx);
        self.render_panes(ctx);

        // Dispatch after layout so the editor selection is up to date
        for command in self.commands.drain() {
            self.dispatch(command);
        }
        self.state.save_settings_if_dirty();

        if self.should_exit {
            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
        }
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn app() -> MdViewApp {
        MdViewApp::with_state(AppState::default())
    }

    #[test]
    fn test_open_path_and_title() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.md");
        fs::write(&path, "# Notes").unwrap();

        let mut app = app();
        app.dispatch(AppCommand::OpenPath(path.clone()));
        assert_eq!(app.state.document.text, "# Notes");
        assert_eq!(app.window_title(), "notes.md - mdview");
        assert_eq!(app.dialog_dir().as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_open_missing_file_sets_status() {
        let dir = TempDir::new().unwrap();
        let mut app = app();
        app.dispatch(AppCommand::OpenPath(dir.path().join("missing.md")));
        assert!(app.state.status().unwrap().starts_with("Failed to open"));
        assert_eq!(app.window_title(), "Untitled - mdview");
    }

    #[test]
    fn test_format_uses_editor_selection() {
        let mut app = app();
        app.state.document.set_text("Hello world".to_string());

        app.editor.set_selection((6, 11));
        app.dispatch(AppCommand::Format(FormatCommand::Bold));
        // Preview mode has no editor
        assert_eq!(app.state.document.text, "Hello world");

        app.dispatch(AppCommand::SetViewMode(ViewMode::Split));
        app.dispatch(AppCommand::Format(FormatCommand::Link));
        assert_eq!(app.state.document.text, "Hello [world](url)");
        assert_eq!(app.editor.selection(), (14, 17));
    }

    #[test]
    fn test_zoom_routes_to_focused_pane() {
        let mut app = app();
        app.dispatch(AppCommand::Zoom(ZoomAction::Out));
        assert_eq!(app.state.zoom.preview.value, 0.9);

        app.dispatch(AppCommand::SetViewMode(ViewMode::Split));
        app.state.mode.focus(Pane::Editor);
        app.dispatch(AppCommand::Zoom(ZoomAction::In));
        assert_eq!(app.state.zoom.editor.value, 15.0);
        assert_eq!(app.state.zoom.preview.value, 0.9);
    }

    #[test]
    fn test_reload_keeps_text_when_file_is_gone() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "before").unwrap();

        let mut app = app();
        app.dispatch(AppCommand::OpenPath(path.clone()));
        fs::remove_file(&path).unwrap();
        app.dispatch(AppCommand::Reload);
        assert_eq!(app.state.document.text, "before");
        assert_eq!(app.state.status(), Some("Reload failed, kept the current text"));
    }

    #[test]
    fn test_print_page_reflects_view_state() {
        let mut app = app();
        app.state.document.set_text("# Hi </script>".to_string());
        app.dispatch(AppCommand::Zoom(ZoomAction::In));

        let page = app.print_page().unwrap();
        assert!(page.contains("<title>Untitled</title>"));
        assert!(page.contains("zoom: 1.1"));
        assert_eq!(page.matches("</script>").count(), 1);
    }

    #[test]
    fn test_print_page_with_missing_template() {
        let dir = TempDir::new().unwrap();
        let mut app = app();
        app.state.settings.custom_template = Some(dir.path().join("gone.html"));
        assert!(app.print_page().is_none());

        app.dispatch(AppCommand::UseBuiltInTemplate);
        assert!(app.print_page().is_some());
    }

    #[test]
    fn test_quit_and_toggles() {
        let mut app = app();
        app.dispatch(AppCommand::ToggleWordWrap);
        assert!(!app.state.settings.word_wrap);
        app.dispatch(AppCommand::ToggleViewMode);
        assert_eq!(app.state.mode.mode(), ViewMode::Split);
        assert_eq!(app.state.status(), Some("Split mode"));
        app.dispatch(AppCommand::Quit);
        assert!(app.should_exit);
    }
}
