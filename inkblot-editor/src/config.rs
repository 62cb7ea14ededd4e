//! Editor configuration.

use crate::export::PdfOptions;
use crate::print::PrintCommand;
use crate::render::RenderOptions;
use serde::{Deserialize, Serialize};

/// Configuration for the editor shell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Markdown rendering options.
    pub render: RenderOptions,
    /// PDF page setup.
    pub pdf: PdfOptions,
    /// Suggested file name in the export dialog.
    pub default_export_name: String,
    /// Browser used by the headless print engine.
    pub print: PrintCommand,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            pdf: PdfOptions::default(),
            default_export_name: "document.pdf".to_string(),
            print: PrintCommand::default(),
        }
    }
}
