//! Editor shell for InkBlot.
//!
//! Provides:
//! - The single open [`Document`] with dirty tracking
//! - Live markdown preview via comrak
//! - Save / Save As / Export PDF through injected collaborators
//! - Folder sidebar and split-pane layout state
//! - The application menu surface
//!
//! # Architecture
//!
//! [`DocumentController`] owns the buffer and talks to three collaborators,
//! all behind traits so tests can substitute fakes:
//!
//! - **Document Store** ([`DocumentStore`]): whole-file reads and writes
//! - **Print Engine** ([`PrintEngine`]): HTML to paginated PDF bytes
//! - **File Dialogs** ([`FileDialogs`]): path pickers, `None` meaning cancelled
//!
//! The controller also holds a receiver for the license gate's state and
//! refuses buffer mutations while the trial is expired.

mod config;
mod controller;
mod dialogs;
mod document;
mod error;
pub mod export;
pub mod layout;
pub mod menu;
mod print;
mod render;
mod sidebar;
mod store;

pub use config::EditorConfig;
pub use controller::{DocumentController, ExportJob};
pub use dialogs::{
    FileDialogs, FileFilter, PresetDialogs, MARKDOWN_FILTERS, PDF_FILTERS, SAVE_FILTERS,
};
pub use document::{Document, TAB_SPACES, UNTITLED};
pub use error::{EditorError, EditorResult};
pub use export::{PageSize, PdfOptions, PREVIEW_CSS};
pub use layout::{DragTarget, SplitLayout};
pub use print::{HeadlessBrowserPrintEngine, PrintCommand, PrintEngine};
pub use render::{MarkdownRenderer, RenderOptions};
pub use sidebar::{build_tree, EntryKind, Sidebar, SidebarRow, TreeEntry};
pub use store::{DocumentStore, FsDocumentStore};
