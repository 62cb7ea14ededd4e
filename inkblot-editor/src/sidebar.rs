//! Folder sidebar: directory scan and the rows it renders as.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Extensions listed in the sidebar.
const LISTED_EXTENSIONS: &[&str] = &["md", "markdown", "txt"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Folder,
    File,
}

/// One node of a scanned folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TreeEntry {
    #[serde(rename = "type")]
    pub kind: EntryKind,
    pub name: String,
    pub path: PathBuf,
    /// Nesting level below the opened folder (0 for its direct children).
    pub depth: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeEntry>,
}

/// Recursively scans `root`.
///
/// Folders sort before files, each alphabetically ignoring case. Hidden
/// entries and symlinks are skipped; files are listed only if they look
/// like markdown or plain text.
pub fn build_tree(root: &Path) -> io::Result<Vec<TreeEntry>> {
    scan(root, 0)
}

fn scan(dir: &Path, depth: usize) -> io::Result<Vec<TreeEntry>> {
    let mut entries = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }

        let file_type = entry.file_type()?;
        let path = entry.path();
        if file_type.is_dir() {
            let children = scan(&path, depth + 1)?;
            entries.push(TreeEntry {
                kind: EntryKind::Folder,
                name,
                path,
                depth,
                children,
            });
        } else if file_type.is_file() && is_listed(&path) {
            entries.push(TreeEntry {
                kind: EntryKind::File,
                name,
                path,
                depth,
                children: Vec::new(),
            });
        }
    }

    entries.sort_by(|a, b| {
        let folder_first = (a.kind != EntryKind::Folder).cmp(&(b.kind != EntryKind::Folder));
        folder_first.then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });
    Ok(entries)
}

fn is_listed(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|ext| {
            LISTED_EXTENSIONS
                .iter()
                .any(|allowed| allowed.eq_ignore_ascii_case(ext))
        })
}

/// A visible sidebar line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarRow {
    pub kind: EntryKind,
    pub name: String,
    pub path: PathBuf,
    pub depth: usize,
    /// `▾` open folder, `▸` closed folder, `└` file.
    pub icon: char,
    /// This file is the open document.
    pub active: bool,
}

/// Sidebar state: the opened folder and which subfolders are expanded.
#[derive(Debug, Clone, Default)]
pub struct Sidebar {
    root: Option<PathBuf>,
    tree: Vec<TreeEntry>,
    expanded: HashSet<PathBuf>,
}

impl Sidebar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows a freshly scanned folder. All subfolders start collapsed.
    pub fn show(&mut self, root: PathBuf, tree: Vec<TreeEntry>) {
        self.root = Some(root);
        self.tree = tree;
        self.expanded.clear();
    }

    /// Forgets the folder and hides the sidebar.
    pub fn close(&mut self) {
        self.root = None;
        self.tree.clear();
        self.expanded.clear();
    }

    pub fn is_open(&self) -> bool {
        self.root.is_some()
    }

    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn tree(&self) -> &[TreeEntry] {
        &self.tree
    }

    /// Sidebar heading: the opened folder's name.
    pub fn title(&self) -> Option<String> {
        self.root
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
    }

    /// Opens or closes a folder. Returns the new expanded state.
    pub fn toggle(&mut self, folder: &Path) -> bool {
        if self.expanded.remove(folder) {
            false
        } else {
            self.expanded.insert(folder.to_path_buf());
            true
        }
    }

    pub fn is_expanded(&self, folder: &Path) -> bool {
        self.expanded.contains(folder)
    }

    /// Flattens the visible part of the tree, marking `current` as active.
    pub fn rows(&self, current: Option<&Path>) -> Vec<SidebarRow> {
        let mut rows = Vec::new();
        self.push_rows(&self.tree, current, &mut rows);
        rows
    }

    fn push_rows(&self, entries: &[TreeEntry], current: Option<&Path>, rows: &mut Vec<SidebarRow>) {
        for entry in entries {
            match entry.kind {
                EntryKind::Folder => {
                    let open = self.is_expanded(&entry.path);
                    rows.push(SidebarRow {
                        kind: EntryKind::Folder,
                        name: entry.name.clone(),
                        path: entry.path.clone(),
                        depth: entry.depth,
                        icon: if open { '\u{25BE}' } else { '\u{25B8}' },
                        active: false,
                    });
                    if open {
                        self.push_rows(&entry.children, current, rows);
                    }
                }
                EntryKind::File => rows.push(SidebarRow {
                    kind: EntryKind::File,
                    name: entry.name.clone(),
                    path: entry.path.clone(),
                    depth: entry.depth,
                    icon: '\u{2514}',
                    active: current == Some(entry.path.as_path()),
                }),
            }
        }
    }
}
