//! File chooser seam.
//!
//! Every picker returns `None` when the user cancels; callers treat that as
//! a normal outcome, not an error.

use async_trait::async_trait;
use std::path::{Path, PathBuf};

/// A named group of file extensions. `*` matches anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileFilter {
    pub name: &'static str,
    pub extensions: &'static [&'static str],
}

impl FileFilter {
    /// Returns true if `path` passes this filter.
    #[must_use]
    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.contains(&"*") {
            return true;
        }
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| {
                self.extensions
                    .iter()
                    .any(|allowed| allowed.eq_ignore_ascii_case(ext))
            })
    }

    /// The first concrete extension, used as a default when saving.
    #[must_use]
    pub fn default_extension(&self) -> Option<&'static str> {
        self.extensions.iter().copied().find(|e| *e != "*")
    }
}

const ALL_FILES: FileFilter = FileFilter {
    name: "All Files",
    extensions: &["*"],
};

/// Filters for Open.
pub const MARKDOWN_FILTERS: &[FileFilter] = &[
    FileFilter {
        name: "Markdown",
        extensions: &["md", "markdown", "txt"],
    },
    ALL_FILES,
];

/// Filters for Save As, defaulting to `.md`.
pub const SAVE_FILTERS: &[FileFilter] = &[
    FileFilter {
        name: "Markdown",
        extensions: &["md"],
    },
    ALL_FILES,
];

/// Filters for Export PDF.
pub const PDF_FILTERS: &[FileFilter] = &[FileFilter {
    name: "PDF",
    extensions: &["pdf"],
}];

/// Platform file dialogs.
#[async_trait]
pub trait FileDialogs: Send + Sync {
    /// Asks for an existing file to open.
    async fn pick_open_file(&self, filters: &[FileFilter]) -> Option<PathBuf>;

    /// Asks for a destination path.
    async fn pick_save_path(
        &self,
        default_name: Option<&str>,
        filters: &[FileFilter],
    ) -> Option<PathBuf>;

    /// Asks for a folder to show in the sidebar.
    async fn pick_folder(&self) -> Option<PathBuf>;
}

/// Dialogs with fixed answers, for headless use and tests.
///
/// An unset answer behaves like the user pressing Cancel.
#[derive(Debug, Clone, Default)]
pub struct PresetDialogs {
    pub open: Option<PathBuf>,
    pub save: Option<PathBuf>,
    pub folder: Option<PathBuf>,
}

impl PresetDialogs {
    /// Dialogs that cancel everything.
    #[must_use]
    pub fn cancelling() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_open(mut self, path: impl Into<PathBuf>) -> Self {
        self.open = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_save(mut self, path: impl Into<PathBuf>) -> Self {
        self.save = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_folder(mut self, path: impl Into<PathBuf>) -> Self {
        self.folder = Some(path.into());
        self
    }
}

#[async_trait]
impl FileDialogs for PresetDialogs {
    async fn pick_open_file(&self, _filters: &[FileFilter]) -> Option<PathBuf> {
        self.open.clone()
    }

    async fn pick_save_path(
        &self,
        default_name: Option<&str>,
        _filters: &[FileFilter],
    ) -> Option<PathBuf> {
        match (&self.save, default_name) {
            (Some(path), Some(name)) if path.is_dir() => Some(path.join(name)),
            (save, _) => save.clone(),
        }
    }

    async fn pick_folder(&self) -> Option<PathBuf> {
        self.folder.clone()
    }
}
