//! Print engine seam and a headless-browser implementation.

use crate::error::{EditorError, EditorResult};
use crate::export::{with_page_setup, PdfOptions};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::process::Command;
use tracing::debug;

/// Renders a complete HTML document off-screen to paginated PDF bytes.
#[async_trait]
pub trait PrintEngine: Send + Sync {
    async fn print_to_pdf(&self, html: &str, options: &PdfOptions) -> EditorResult<Vec<u8>>;
}

/// How to invoke the headless browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintCommand {
    /// Browser executable (Chromium, Chrome, Edge).
    pub program: String,
    /// Extra arguments placed before the generated ones.
    pub args: Vec<String>,
}

impl Default for PrintCommand {
    fn default() -> Self {
        Self {
            program: "chromium".to_string(),
            args: Vec::new(),
        }
    }
}

/// Prints through a Chromium-family browser in headless mode.
///
/// The HTML is written to a private temporary directory and the browser's
/// `--print-to-pdf` output is read back. Page size, margins and background
/// printing reach the browser through the document's `@page` rule.
#[derive(Debug, Clone)]
pub struct HeadlessBrowserPrintEngine {
    command: PrintCommand,
}

impl HeadlessBrowserPrintEngine {
    pub fn new(command: PrintCommand) -> Self {
        Self { command }
    }

    fn file_url(path: &Path) -> String {
        let path = path.to_string_lossy().replace('\\', "/");
        if path.starts_with('/') {
            format!("file://{path}")
        } else {
            format!("file:///{path}")
        }
    }
}

#[async_trait]
impl PrintEngine for HeadlessBrowserPrintEngine {
    async fn print_to_pdf(&self, html: &str, options: &PdfOptions) -> EditorResult<Vec<u8>> {
        let dir = tempfile::Builder::new().prefix("inkblot-print-").tempdir()?;
        let page = dir.path().join("document.html");
        let out = dir.path().join("document.pdf");
        fs::write(&page, with_page_setup(html, options).as_bytes()).await?;

        debug!("Printing {} with {}", page.display(), self.command.program);
        let output = Command::new(&self.command.program)
            .args(&self.command.args)
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", out.display()))
            .arg(Self::file_url(&page))
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| EditorError::Print(format!("failed to run {}: {e}", self.command.program)))?;

        if !output.status.success() {
            return Err(EditorError::Print(format!(
                "{} exited with {}: {}",
                self.command.program,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let bytes = fs::read(&out)
            .await
            .map_err(|e| EditorError::Print(format!("no PDF produced: {e}")))?;
        if !bytes.starts_with(b"%PDF") {
            return Err(EditorError::Print("output is not a PDF".to_string()));
        }
        Ok(bytes)
    }
}
