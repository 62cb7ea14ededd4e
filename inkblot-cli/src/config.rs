//! Application configuration file.

use anyhow::{Context, Result};
use inkblot_editor::EditorConfig;
use inkblot_license::LicenseConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Top-level configuration: one section per library.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub license: LicenseConfig,
    pub editor: EditorConfig,
}

impl AppConfig {
    /// Reads a JSON config file. No path, or a path that does not exist,
    /// yields the defaults; missing fields fall back individually.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        if !path.exists() {
            debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config {}", path.display()))
    }
}

/// Directory holding persisted state: `state_dir` if given, otherwise
/// `<data_dir>/InkBlot`.
pub fn resolve_state_dir(state_dir: Option<&Path>) -> Result<PathBuf> {
    match state_dir {
        Some(dir) => Ok(dir.to_path_buf()),
        None => dirs::data_dir()
            .map(|dir| dir.join("InkBlot"))
            .context("No platform data directory; pass --state-dir"),
    }
}
