//! The open document and its dirty state.

use std::path::{Path, PathBuf};

/// Title shown for a document that has never been saved.
pub const UNTITLED: &str = "Untitled";

/// What the Tab key inserts.
pub const TAB_SPACES: &str = "    ";

/// The text buffer plus the snapshot it was last persisted as.
///
/// The document is dirty whenever the buffer differs from that snapshot, so
/// typing a change and then undoing it by hand clears the dirty flag again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    path: Option<PathBuf>,
    text: String,
    saved: String,
}

impl Document {
    /// An empty, untitled, clean document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A document freshly read from `path`.
    #[must_use]
    pub fn loaded(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            path: Some(path.into()),
            saved: text.clone(),
            text,
        }
    }

    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the buffer. Returns the new dirty state.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        self.text = text.into();
        self.is_dirty()
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.text != self.saved
    }

    /// File name of the path, or [`UNTITLED`].
    #[must_use]
    pub fn title(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| UNTITLED.to_string())
    }

    /// Text for the modified indicator next to the title.
    #[must_use]
    pub fn modified_indicator(&self) -> &'static str {
        if self.is_dirty() { "(unsaved)" } else { "" }
    }

    /// Records that the current buffer was written, optionally to a new path.
    pub fn mark_saved(&mut self, path: Option<PathBuf>) {
        if let Some(path) = path {
            self.path = Some(path);
        }
        self.saved = self.text.clone();
    }

    /// Replaces the selection `[start, end)` (char offsets) with four spaces.
    ///
    /// Offsets past the end are clamped and a reversed selection is
    /// normalised. Returns the collapsed cursor position after the insert.
    pub fn insert_tab(&mut self, start: usize, end: usize) -> usize {
        let (start, end) = if start <= end { (start, end) } else { (end, start) };
        let from = byte_offset(&self.text, start);
        let to = byte_offset(&self.text, end);
        self.text.replace_range(from..to, TAB_SPACES);
        self.text[..from].chars().count() + TAB_SPACES.len()
    }
}

/// Byte index of the `chars`-th character, or the end of the string.
fn byte_offset(text: &str, chars: usize) -> usize {
    text.char_indices()
        .nth(chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len())
}
