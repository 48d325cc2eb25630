//! Application Commands
//!
//! Keyboard shortcuts and the menu bar both produce [`AppCommand`] values.
//! They are queued during the frame and dispatched in order by the app once
//! the UI has been laid out.

use std::collections::VecDeque;
use std::path::PathBuf;

use eframe::egui::{Event, InputState, Key, Modifiers};
use log::debug;

use crate::config::Theme;
use crate::markdown::FormatCommand;
use crate::mode::{ViewMode, ZoomAction};

/// Everything the user can ask the app to do.
#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// Start an empty untitled document (Ctrl+N)
    New,
    /// Pick a file to open (Ctrl+O)
    Open,
    /// Open a known path (recent files, command line)
    OpenPath(PathBuf),
    /// Save to the current path, asking for one if untitled (Ctrl+S)
    Save,
    /// Save under a new path (Ctrl+Shift+S)
    SaveAs,
    /// Re-read the document from disk (Ctrl+R)
    Reload,
    /// Open the printable page in the browser (Ctrl+P)
    Print,
    /// Preview -> Split -> Edit (Ctrl+E)
    ToggleViewMode,
    SetViewMode(ViewMode),
    /// Appearance (Ctrl+Shift+0/1/2)
    SetTheme(Theme),
    /// Zoom the focused pane (Ctrl+= / Ctrl+- / Ctrl+0)
    Zoom(ZoomAction),
    ToggleSyncScroll,
    ToggleWordWrap,
    /// Markdown formatting in the editor (Ctrl+B / Ctrl+I / Ctrl+K)
    Format(FormatCommand),
    ClearRecentFiles,
    /// Pick an HTML file to use as the print page
    ChooseTemplate,
    /// Go back to the built-in print page
    UseBuiltInTemplate,
    /// Close the window (Ctrl+Q)
    Quit,
}

impl AppCommand {
    /// Keyboard shortcut shown next to menu entries.
    pub fn shortcut_label(&self) -> Option<&'static str> {
        let label = match self {
            Self::New => "Ctrl+N",
            Self::Open => "Ctrl+O",
            Self::Save => "Ctrl+S",
            Self::SaveAs => "Ctrl+Shift+S",
            Self::Reload => "Ctrl+R",
            Self::Print => "Ctrl+P",
            Self::ToggleViewMode => "Ctrl+E",
            Self::SetTheme(theme) => theme.shortcut_label(),
            Self::Zoom(ZoomAction::In) => "Ctrl+=",
            Self::Zoom(ZoomAction::Out) => "Ctrl+-",
            Self::Zoom(ZoomAction::Reset) => "Ctrl+0",
            Self::Format(command) => command.shortcut_label(),
            Self::Quit => "Ctrl+Q",
            _ => return None,
        };
        Some(label)
    }
}

/// Map one key press to a command.
pub fn command_for_key(modifiers: Modifiers, key: Key) -> Option<AppCommand> {
    if !modifiers.ctrl || modifiers.alt {
        return None;
    }

    let command = if modifiers.shift {
        match key {
            Key::S => AppCommand::SaveAs,
            Key::Num0 => AppCommand::SetTheme(Theme::System),
            Key::Num1 => AppCommand::SetTheme(Theme::Light),
            Key::Num2 => AppCommand::SetTheme(Theme::Dark),
            // Shift+= on most layouts
            Key::Plus | Key::Equals => AppCommand::Zoom(ZoomAction::In),
            _ => return None,
        }
    } else {
        match key {
            Key::N => AppCommand::New,
            Key::O => AppCommand::Open,
            Key::S => AppCommand::Save,
            Key::R => AppCommand::Reload,
            Key::P => AppCommand::Print,
            Key::E => AppCommand::ToggleViewMode,
            Key::Plus | Key::Equals => AppCommand::Zoom(ZoomAction::In),
            Key::Minus => AppCommand::Zoom(ZoomAction::Out),
            Key::Num0 => AppCommand::Zoom(ZoomAction::Reset),
            Key::B => AppCommand::Format(FormatCommand::Bold),
            Key::I => AppCommand::Format(FormatCommand::Italic),
            Key::K => AppCommand::Format(FormatCommand::Link),
            Key::Q => AppCommand::Quit,
            _ => return None,
        }
    };
    Some(command)
}

/// Commands for the shortcuts pressed this frame, in event order.
///
/// Matched key presses are removed from the input so widgets laid out later
/// in the frame (the focused text edit binds Ctrl+K, for one) never see them.
pub fn shortcut_commands(input: &mut InputState) -> Vec<AppCommand> {
    let mut commands = Vec::new();
    input.events.retain(|event| {
        let Event::Key {
            key,
            pressed: true,
            modifiers,
            ..
        } = event
        else {
            return true;
        };
        match command_for_key(*modifiers, *key) {
            Some(command) => {
                debug!("Keyboard shortcut: {:?}", command);
                commands.push(command);
                false
            }
            None => true,
        }
    });
    commands
}

/// FIFO of commands waiting for dispatch.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<AppCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: AppCommand) {
        self.pending.push_back(command);
    }

    pub fn extend(&mut self, commands: impl IntoIterator<Item = AppCommand>) {
        self.pending.extend(commands);
    }

    /// Take everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<AppCommand> {
        self.pending.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eframe::egui;

    const CTRL: Modifiers = Modifiers::CTRL;
    const CTRL_SHIFT: Modifiers = Modifiers {
        ctrl: true,
        shift: true,
        ..Modifiers::NONE
    };

    #[test]
    fn test_file_shortcuts() {
        assert_eq!(command_for_key(CTRL, Key::O), Some(AppCommand::Open));
        assert_eq!(command_for_key(CTRL, Key::S), Some(AppCommand::Save));
        assert_eq!(command_for_key(CTRL_SHIFT, Key::S), Some(AppCommand::SaveAs));
        assert_eq!(command_for_key(CTRL, Key::P), Some(AppCommand::Print));
    }

    #[test]
    fn test_zoom_and_theme_share_digits() {
        assert_eq!(
            command_for_key(CTRL, Key::Num0),
            Some(AppCommand::Zoom(ZoomAction::Reset))
        );
        assert_eq!(
            command_for_key(CTRL_SHIFT, Key::Num0),
            Some(AppCommand::SetTheme(Theme::System))
        );
        assert_eq!(
            command_for_key(CTRL_SHIFT, Key::Num2),
            Some(AppCommand::SetTheme(Theme::Dark))
        );
        assert_eq!(
            command_for_key(CTRL, Key::Minus),
            Some(AppCommand::Zoom(ZoomAction::Out))
        );
    }

    #[test]
    fn test_format_shortcuts() {
        for &command in FormatCommand::all() {
            let key = match command {
                FormatCommand::Bold => Key::B,
                FormatCommand::Italic => Key::I,
                FormatCommand::Link => Key::K,
            };
            assert_eq!(command_for_key(CTRL, key), Some(AppCommand::Format(command)));
        }
    }

    #[test]
    fn test_requires_ctrl_without_alt() {
        assert_eq!(command_for_key(Modifiers::NONE, Key::B), None);
        assert_eq!(command_for_key(Modifiers::SHIFT, Key::S), None);
        let ctrl_alt = Modifiers {
            ctrl: true,
            alt: true,
            ..Modifiers::NONE
        };
        assert_eq!(command_for_key(ctrl_alt, Key::S), None);
    }

    #[test]
    fn test_labels_match_bindings() {
        assert_eq!(AppCommand::SaveAs.shortcut_label(), Some("Ctrl+Shift+S"));
        assert_eq!(
            AppCommand::SetTheme(Theme::Light).shortcut_label(),
            Some("Ctrl+Shift+1")
        );
        assert_eq!(AppCommand::ToggleSyncScroll.shortcut_label(), None);
    }

    #[test]
    fn test_shortcut_commands_from_input() {
        let key = |key: Key, modifiers: Modifiers| Event::Key {
            key,
            physical_key: None,
            pressed: true,
            repeat: false,
            modifiers,
        };
        let raw = egui::RawInput {
            events: vec![
                key(Key::E, CTRL),
                Event::Text("e".to_string()),
                key(Key::B, CTRL),
                Event::Key {
                    key: Key::S,
                    physical_key: None,
                    pressed: false,
                    repeat: false,
                    modifiers: CTRL,
                },
            ],
            ..Default::default()
        };

        let ctx = egui::Context::default();
        ctx.options_mut(|o| o.zoom_with_keyboard = false);
        let mut commands = Vec::new();
        let mut left_over = Vec::new();
        let _ = ctx.run(raw, |ctx| {
            commands = ctx.input_mut(shortcut_commands);
            left_over = ctx.input(|i| i.events.clone());
        });

        assert_eq!(
            commands,
            vec![
                AppCommand::ToggleViewMode,
                AppCommand::Format(FormatCommand::Bold)
            ]
        );
        // Only the shortcut presses were taken out of the input
        assert_eq!(left_over.len(), 2);
        assert_eq!(left_over[0], Event::Text("e".to_string()));
        assert!(matches!(
            left_over[1],
            Event::Key {
                key: Key::S,
                pressed: false,
                ..
            }
        ));
    }

    #[test]
    fn test_queue_is_fifo() {
        let mut queue = CommandQueue::new();
        assert!(queue.drain().is_empty());
        queue.push(AppCommand::Save);
        queue.extend([AppCommand::Print, AppCommand::Quit]);
        assert_eq!(
            queue.drain(),
            vec![AppCommand::Save, AppCommand::Print, AppCommand::Quit]
        );
        assert!(queue.drain().is_empty());
    }
}
