//! Wiring for the `inkblot` binary.
//!
//! [`App`] assembles the license gate and the document controller with their
//! production collaborators: a file-backed trial store, the system clock, the
//! host filesystem and a headless browser for PDF output.

mod app;
mod config;

pub use app::{App, LicenseStatus};
pub use config::{resolve_state_dir, AppConfig};
