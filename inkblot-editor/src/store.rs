//! Document persistence.

use crate::error::{EditorError, EditorResult};
use crate::sidebar::{build_tree, TreeEntry};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Whole-file reads and writes on the host filesystem.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Reads a UTF-8 text file.
    async fn read_text(&self, path: &Path) -> EditorResult<String>;

    /// Writes a text file, replacing its contents.
    async fn write_text(&self, path: &Path, text: &str) -> EditorResult<()>;

    /// Writes a binary file, replacing its contents.
    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> EditorResult<()>;

    /// Scans a folder for the sidebar.
    async fn read_tree(&self, root: &Path) -> EditorResult<Vec<TreeEntry>>;
}

/// [`DocumentStore`] over `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDocumentStore;

#[async_trait]
impl DocumentStore for FsDocumentStore {
    async fn read_text(&self, path: &Path) -> EditorResult<String> {
        Ok(fs::read_to_string(path).await?)
    }

    async fn write_text(&self, path: &Path, text: &str) -> EditorResult<()> {
        fs::write(path, text).await?;
        debug!("Wrote {} bytes to {}", text.len(), path.display());
        Ok(())
    }

    async fn write_bytes(&self, path: &Path, bytes: &[u8]) -> EditorResult<()> {
        fs::write(path, bytes).await?;
        debug!("Wrote {} bytes to {}", bytes.len(), path.display());
        Ok(())
    }

    async fn read_tree(&self, root: &Path) -> EditorResult<Vec<TreeEntry>> {
        let root: PathBuf = root.to_path_buf();
        tokio::task::spawn_blocking(move || build_tree(&root))
            .await
            .map_err(|e| EditorError::Task(format!("folder scan panicked: {e}")))?
            .map_err(Into::into)
    }
}
