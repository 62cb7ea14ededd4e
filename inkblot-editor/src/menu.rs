//! Application menu and keyboard accelerators.
//!
//! Commands are handled by the editor; roles are left to the platform's
//! native text editing and window behavior.

use std::collections::BTreeSet;

/// Editor-handled menu actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    Open,
    OpenFolder,
    Save,
    SaveAs,
    ExportPdf,
    TogglePreview,
}

/// Actions delegated to the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Undo,
    Redo,
    Cut,
    Copy,
    Paste,
    SelectAll,
    ResetZoom,
    ZoomIn,
    ZoomOut,
    ToggleFullscreen,
    Quit,
}

impl Role {
    /// Platform role identifier.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Undo => "undo",
            Self::Redo => "redo",
            Self::Cut => "cut",
            Self::Copy => "copy",
            Self::Paste => "paste",
            Self::SelectAll => "selectall",
            Self::ResetZoom => "resetzoom",
            Self::ZoomIn => "zoomin",
            Self::ZoomOut => "zoomout",
            Self::ToggleFullscreen => "togglefullscreen",
            Self::Quit => "quit",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Command {
        label: &'static str,
        accelerator: Option<&'static str>,
        command: MenuCommand,
    },
    Role(Role),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub label: &'static str,
    pub items: Vec<MenuItem>,
}

impl Menu {
    /// Labels of the command items, in order.
    pub fn labels(&self) -> Vec<&'static str> {
        self.items
            .iter()
            .filter_map(|item| match item {
                MenuItem::Command { label, .. } => Some(*label),
                _ => None,
            })
            .collect()
    }
}

fn command(
    label: &'static str,
    accelerator: &'static str,
    command: MenuCommand,
) -> MenuItem {
    MenuItem::Command {
        label,
        accelerator: Some(accelerator),
        command,
    }
}

/// The File / Edit / View menu bar.
pub fn application_menu() -> Vec<Menu> {
    vec![
        Menu {
            label: "File",
            items: vec![
                command("Open", "CmdOrCtrl+O", MenuCommand::Open),
                command("Open Folder...", "CmdOrCtrl+Shift+O", MenuCommand::OpenFolder),
                command("Save", "CmdOrCtrl+S", MenuCommand::Save),
                command("Save As...", "CmdOrCtrl+Shift+S", MenuCommand::SaveAs),
                MenuItem::Separator,
                command("Export PDF", "CmdOrCtrl+P", MenuCommand::ExportPdf),
                MenuItem::Separator,
                MenuItem::Role(Role::Quit),
            ],
        },
        Menu {
            label: "Edit",
            items: vec![
                MenuItem::Role(Role::Undo),
                MenuItem::Role(Role::Redo),
                MenuItem::Separator,
                MenuItem::Role(Role::Cut),
                MenuItem::Role(Role::Copy),
                MenuItem::Role(Role::Paste),
                MenuItem::Role(Role::SelectAll),
            ],
        },
        Menu {
            label: "View",
            items: vec![
                command("Toggle Preview", "CmdOrCtrl+Shift+P", MenuCommand::TogglePreview),
                MenuItem::Separator,
                MenuItem::Role(Role::ResetZoom),
                MenuItem::Role(Role::ZoomIn),
                MenuItem::Role(Role::ZoomOut),
                MenuItem::Role(Role::ToggleFullscreen),
            ],
        },
    ]
}

/// Normalised chord: modifier set plus key, all lowercase.
///
/// `Cmd`, `Ctrl`, `Command`, `Control` and `CmdOrCtrl` are treated alike so
/// a chord typed on either platform finds the same command.
fn parse_chord(chord: &str) -> Option<(BTreeSet<String>, String)> {
    let mut parts: Vec<String> = chord
        .split('+')
        .map(|p| p.trim().to_ascii_lowercase())
        .collect();
    let key = parts.pop().filter(|k| !k.is_empty())?;
    let mods = parts
        .into_iter()
        .map(|m| match m.as_str() {
            "cmd" | "command" | "ctrl" | "control" | "cmdorctrl" | "commandorcontrol" => {
                "cmdorctrl".to_string()
            }
            "option" => "alt".to_string(),
            _ => m,
        })
        .collect();
    Some((mods, key))
}

/// Finds the command bound to a keyboard chord such as `"Ctrl+Shift+S"`.
pub fn command_for_accelerator(chord: &str) -> Option<MenuCommand> {
    let wanted = parse_chord(chord)?;
    application_menu()
        .into_iter()
        .flat_map(|menu| menu.items)
        .find_map(|item| match item {
            MenuItem::Command {
                accelerator: Some(accel),
                command,
                ..
            } if parse_chord(accel).as_ref() == Some(&wanted) => Some(command),
            _ => None,
        })
}
