//! The document controller: buffer, preview and file operations.

use crate::config::EditorConfig;
use crate::dialogs::{FileDialogs, MARKDOWN_FILTERS, PDF_FILTERS, SAVE_FILTERS};
use crate::document::Document;
use crate::error::{EditorError, EditorResult};
use crate::export::{wrap_for_print, PdfOptions, PREVIEW_CSS};
use crate::layout::SplitLayout;
use crate::print::PrintEngine;
use crate::render::MarkdownRenderer;
use crate::sidebar::{Sidebar, SidebarRow};
use crate::store::DocumentStore;
use inkblot_license::GateState;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

/// Owns the open document and coordinates the editor's collaborators.
///
/// Buffer mutations (typing, Tab, New, Open) are refused with
/// [`EditorError::Locked`] while the license gate reports an expired trial.
/// Saving and exporting only read the buffer and stay available.
pub struct DocumentController {
    document: Document,
    preview: String,
    renderer: MarkdownRenderer,
    config: EditorConfig,
    store: Arc<dyn DocumentStore>,
    dialogs: Arc<dyn FileDialogs>,
    printer: Arc<dyn PrintEngine>,
    access: watch::Receiver<GateState>,
    sidebar: Sidebar,
    layout: SplitLayout,
}

impl DocumentController {
    pub fn new(
        config: EditorConfig,
        store: Arc<dyn DocumentStore>,
        dialogs: Arc<dyn FileDialogs>,
        printer: Arc<dyn PrintEngine>,
        access: watch::Receiver<GateState>,
    ) -> Self {
        let renderer = MarkdownRenderer::new(config.render);
        let document = Document::new();
        let preview = renderer.render(document.text());
        Self {
            document,
            preview,
            renderer,
            config,
            store,
            dialogs,
            printer,
            access,
            sidebar: Sidebar::new(),
            layout: SplitLayout::new(),
        }
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The rendered preview of the current buffer.
    pub fn preview_html(&self) -> &str {
        &self.preview
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    pub fn sidebar_mut(&mut self) -> &mut Sidebar {
        &mut self.sidebar
    }

    /// Sidebar rows with the open document highlighted.
    pub fn sidebar_rows(&self) -> Vec<SidebarRow> {
        self.sidebar.rows(self.document.path())
    }

    pub fn layout(&self) -> &SplitLayout {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut SplitLayout {
        &mut self.layout
    }

    /// Whether the input surface currently accepts edits.
    pub fn editing_enabled(&self) -> bool {
        self.access.borrow().editing_enabled()
    }

    fn ensure_editable(&self) -> EditorResult<()> {
        if self.editing_enabled() {
            Ok(())
        } else {
            debug!("Rejected buffer mutation while locked");
            Err(EditorError::Locked)
        }
    }

    fn rerender(&mut self) {
        self.preview = self.renderer.render(self.document.text());
    }

    fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.rerender();
    }

    /// Starts an empty untitled document.
    pub fn new_document(&mut self) -> EditorResult<()> {
        self.ensure_editable()?;
        self.replace_document(Document::new());
        Ok(())
    }

    /// Open via the file dialog. Returns `None` if the user cancelled.
    pub async fn open(&mut self) -> EditorResult<Option<PathBuf>> {
        self.ensure_editable()?;
        let Some(path) = self.dialogs.pick_open_file(MARKDOWN_FILTERS).await else {
            debug!("Open cancelled");
            return Ok(None);
        };
        self.open_path(&path).await?;
        Ok(Some(path))
    }

    /// Loads a known path, e.g. a sidebar click.
    pub async fn open_path(&mut self, path: &Path) -> EditorResult<()> {
        self.ensure_editable()?;
        let text = self.store.read_text(path).await?;
        info!("Opened {}", path.display());
        self.replace_document(Document::loaded(path, text));
        Ok(())
    }

    /// Replaces the buffer with `text`. Returns the new dirty state.
    pub fn edit(&mut self, text: impl Into<String>) -> EditorResult<bool> {
        self.ensure_editable()?;
        let dirty = self.document.set_text(text);
        self.rerender();
        Ok(dirty)
    }

    /// Tab key: four spaces over the selection. Returns the new cursor.
    pub fn insert_tab(&mut self, start: usize, end: usize) -> EditorResult<usize> {
        self.ensure_editable()?;
        let cursor = self.document.insert_tab(start, end);
        self.rerender();
        Ok(cursor)
    }

    /// Saves to the known path, or falls back to Save As.
    ///
    /// Returns the path written, or `None` if Save As was cancelled.
    pub async fn save(&mut self) -> EditorResult<Option<PathBuf>> {
        let Some(path) = self.document.path().map(Path::to_path_buf) else {
            return self.save_as().await;
        };
        self.store.write_text(&path, self.document.text()).await?;
        self.document.mark_saved(None);
        info!("Saved {}", path.display());
        Ok(Some(path))
    }

    /// Asks for a path and saves there. A path without extension gets `.md`.
    pub async fn save_as(&mut self) -> EditorResult<Option<PathBuf>> {
        let Some(mut path) = self.dialogs.pick_save_path(None, SAVE_FILTERS).await else {
            debug!("Save As cancelled");
            return Ok(None);
        };
        if path.file_name().is_none() {
            return Err(EditorError::InvalidPath(path.display().to_string()));
        }
        if path.extension().is_none() {
            if let Some(ext) = SAVE_FILTERS[0].default_extension() {
                path.set_extension(ext);
            }
        }

        self.store.write_text(&path, self.document.text()).await?;
        self.document.mark_saved(Some(path.clone()));
        info!("Saved as {}", path.display());
        Ok(Some(path))
    }

    /// Snapshots what export needs so the caller can release the controller
    /// before the slow print step.
    pub fn export_job(&self) -> ExportJob {
        ExportJob {
            html: self.preview.clone(),
            stylesheet: PREVIEW_CSS,
            options: self.config.pdf,
            default_name: self.config.default_export_name.clone(),
            store: Arc::clone(&self.store),
            dialogs: Arc::clone(&self.dialogs),
            printer: Arc::clone(&self.printer),
        }
    }

    /// Export PDF. Returns the written path, or `None` if cancelled.
    pub async fn export_pdf(&self) -> EditorResult<Option<PathBuf>> {
        self.export_job().run().await
    }

    /// Open Folder via the dialog and show it in the sidebar.
    ///
    /// Returns false if the user cancelled.
    pub async fn open_folder(&mut self) -> EditorResult<bool> {
        let Some(root) = self.dialogs.pick_folder().await else {
            debug!("Open Folder cancelled");
            return Ok(false);
        };
        let tree = self.store.read_tree(&root).await?;
        info!("Opened folder {} ({} entries)", root.display(), tree.len());
        self.sidebar.show(root, tree);
        Ok(true)
    }

    /// Closes the sidebar.
    pub fn close_folder(&mut self) {
        self.sidebar.close();
    }
}

/// A detached PDF export: owns a snapshot of the preview HTML and handles to
/// the collaborators, so it can run without borrowing the controller.
pub struct ExportJob {
    html: String,
    stylesheet: &'static str,
    options: PdfOptions,
    default_name: String,
    store: Arc<dyn DocumentStore>,
    dialogs: Arc<dyn FileDialogs>,
    printer: Arc<dyn PrintEngine>,
}

impl ExportJob {
    /// The complete document handed to the print engine.
    pub fn print_document(&self) -> String {
        wrap_for_print(&self.html, self.stylesheet, &self.options)
    }

    /// Paginates, asks for a destination, and writes the PDF.
    pub async fn run(self) -> EditorResult<Option<PathBuf>> {
        let document = self.print_document();
        let pdf = self.printer.print_to_pdf(&document, &self.options).await?;

        let Some(path) = self
            .dialogs
            .pick_save_path(Some(&self.default_name), PDF_FILTERS)
            .await
        else {
            debug!("Export cancelled");
            return Ok(None);
        };

        self.store.write_bytes(&path, &pdf).await?;
        info!("Exported PDF to {} ({} bytes)", path.display(), pdf.len());
        Ok(Some(path))
    }
}
