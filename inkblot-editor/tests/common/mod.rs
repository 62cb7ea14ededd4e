//! Shared test helpers for editor tests.

#![allow(dead_code)]

use async_trait::async_trait;
use inkblot_editor::{
    DocumentController, DocumentStore, EditorConfig, EditorError, EditorResult, FileDialogs,
    PdfOptions, PresetDialogs, PrintEngine, TreeEntry,
};
use inkblot_license::GateState;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

/// In-memory document store.
#[derive(Default)]
pub struct MemoryStore {
    files: Mutex<HashMap<PathBuf, Vec<u8>>>,
    pub fail_writes: bool,
}

impl MemoryStore {
    /// A store whose writes all fail with `PermissionDenied`.
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    pub fn with_file(path: &str, text: &str) -> Self {
        let store = Self::default();
        store.put(path, text.as_bytes());
        store
    }

    pub fn put(&self, path: impl Into<PathBuf>, bytes: &[u8]) {
        self.files.lock().unwrap().insert(path.into(), bytes.to_vec());
    }

    pub fn bytes(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        self.files.lock().unwrap().get(path.as_ref()).cloned()
    }

    pub fn text(&self, path: impl AsRef<Path>) -> Option<String> {
        self.bytes(path).map(|b| String::from_utf8(b).unwrap())
    }
}

fn not_found(path: &Path) -> EditorError {
    std::io::Error::new(std::io::ErrorKind::NotFound, path.display().to_string()).into()
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn read_text(&self, path: &Path) -> EditorResult<String> {
        let bytes = self.bytes(path).ok_or_else(|| not_found(path))?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e).into())
    }

    async fn write_text(&self, path: &Path, text: &str) -> EditorResult<()> {
        self.write_bytes(path, text.as_bytes()).await
    }

    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> EditorResult<()> {
        if self.fail_writes {
            return Err(
                std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only").into(),
            );
        }
        self.put(path, bytes);
        Ok(())
    }

    async fn read_tree(&self, _root: &Path) -> EditorResult<Vec<TreeEntry>> {
        Ok(Vec::new())
    }
}

/// Print engine that records what it was asked to print.
#[derive(Default)]
pub struct RecordingPrinter {
    pub printed: Mutex<Vec<(String, PdfOptions)>>,
    pub fail: bool,
}

pub const FAKE_PDF: &[u8] = b"%PDF-1.7\n%fake\n";

impl RecordingPrinter {
    pub fn printed(&self) -> Vec<(String, PdfOptions)> {
        self.printed.lock().unwrap().clone()
    }
}

#[async_trait]
impl PrintEngine for RecordingPrinter {
    async fn print_to_pdf(&self, html: &str, options: &PdfOptions) -> EditorResult<Vec<u8>> {
        if self.fail {
            return Err(EditorError::Print("renderer crashed".into()));
        }
        self.printed
            .lock()
            .unwrap()
            .push((html.to_string(), *options));
        Ok(FAKE_PDF.to_vec())
    }
}

pub struct Harness {
    pub controller: DocumentController,
    pub store: Arc<MemoryStore>,
    pub printer: Arc<RecordingPrinter>,
    pub access: watch::Sender<GateState>,
}

pub fn harness(store: MemoryStore, dialogs: PresetDialogs) -> Harness {
    harness_with(store, Arc::new(dialogs), RecordingPrinter::default())
}

pub fn harness_with(
    store: MemoryStore,
    dialogs: Arc<dyn FileDialogs>,
    printer: RecordingPrinter,
) -> Harness {
    let store = Arc::new(store);
    let printer = Arc::new(printer);
    let (access, rx) = watch::channel(GateState::TrialActive);
    let controller = DocumentController::new(
        EditorConfig::default(),
        store.clone(),
        dialogs,
        printer.clone(),
        rx,
    );
    Harness {
        controller,
        store,
        printer,
        access,
    }
}
