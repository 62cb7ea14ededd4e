//! Production wiring of the gate and the controller.

use crate::config::AppConfig;
use anyhow::{bail, Context, Result};
use inkblot_editor::{
    build_tree, DocumentController, EditorError, FsDocumentStore, HeadlessBrowserPrintEngine,
    PresetDialogs, Sidebar, SidebarRow,
};
use inkblot_license::{
    BillingClient, Clock, FileTrialStore, GateState, GateTaskHandle, LicenseGate, NoBilling,
    Paywall, PurchaseReport, RestoreReport, SystemClock, TransactionEvent,
};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Billing event queue depth for the gate task.
const EVENT_BUFFER: usize = 16;

/// Snapshot printed by `inkblot license status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LicenseStatus {
    pub state: GateState,
    pub trial_start_epoch_ms: i64,
    pub remaining_ms: i64,
    pub paywall: Paywall,
}

/// The assembled application.
pub struct App {
    config: AppConfig,
    gate: Arc<LicenseGate>,
    clock: Arc<dyn Clock>,
}

impl App {
    /// Opens the trial store under `state_dir` and runs the launch evaluation.
    pub fn open(config: AppConfig, state_dir: &Path) -> Result<Self> {
        Self::with_collaborators(config, state_dir, Arc::new(SystemClock), Arc::new(NoBilling))
    }

    /// Like [`open`](Self::open) with an explicit clock and billing client.
    pub fn with_collaborators(
        config: AppConfig,
        state_dir: &Path,
        clock: Arc<dyn Clock>,
        billing: Arc<dyn BillingClient>,
    ) -> Result<Self> {
        let store = FileTrialStore::open(state_dir.join(FileTrialStore::FILE_NAME));
        debug!("Trial store at {}", store.path().display());
        let gate = Arc::new(LicenseGate::new(
            config.license.clone(),
            Arc::new(store),
            Arc::clone(&clock),
            billing,
        ));
        gate.launch().context("Failed to read the trial record")?;
        Ok(Self {
            config,
            gate,
            clock,
        })
    }

    pub fn gate(&self) -> &Arc<LicenseGate> {
        &self.gate
    }

    /// A controller over the host filesystem. `save_to` answers every save
    /// dialog; without it saving and exporting behave as cancelled.
    pub fn controller(&self, save_to: Option<PathBuf>) -> DocumentController {
        let mut dialogs = PresetDialogs::cancelling();
        dialogs.save = save_to;
        DocumentController::new(
            self.config.editor.clone(),
            Arc::new(FsDocumentStore),
            Arc::new(dialogs),
            Arc::new(HeadlessBrowserPrintEngine::new(self.config.editor.print.clone())),
            self.gate.subscribe(),
        )
    }

    /// Renders `file` to a standalone HTML page with the preview stylesheet.
    pub async fn render(&self, file: &Path) -> Result<String> {
        let mut controller = self.controller(None);
        load(&mut controller, file).await?;
        Ok(controller.export_job().print_document())
    }

    /// Renders `file` and prints it to `out` as PDF.
    pub async fn export(&self, file: &Path, out: &Path) -> Result<PathBuf> {
        let mut controller = self.controller(Some(out.to_path_buf()));
        load(&mut controller, file).await?;
        match controller.export_pdf().await {
            Ok(Some(path)) => Ok(path),
            Ok(None) => bail!("Export cancelled"),
            Err(e) => Err(e).context("PDF export failed"),
        }
    }

    /// Sidebar rows for `dir`, every folder expanded.
    pub fn tree(&self, dir: &Path) -> Result<Vec<SidebarRow>> {
        let tree = build_tree(dir).with_context(|| format!("Failed to scan {}", dir.display()))?;
        let mut sidebar = Sidebar::new();
        sidebar.show(dir.to_path_buf(), tree);
        loop {
            let collapsed: Vec<PathBuf> = sidebar
                .rows(None)
                .into_iter()
                .filter(|row| row.icon == '▸')
                .map(|row| row.path)
                .collect();
            if collapsed.is_empty() {
                break;
            }
            for folder in &collapsed {
                sidebar.toggle(folder);
            }
        }
        Ok(sidebar.rows(None))
    }

    pub fn status(&self) -> Result<LicenseStatus> {
        let state = self.gate.evaluate()?;
        let record = self.gate.trial_record()?;
        Ok(LicenseStatus {
            state,
            trial_start_epoch_ms: record.trial_start_epoch_ms,
            remaining_ms: record
                .remaining_ms(self.clock.now_ms(), self.config.license.trial_duration_ms),
            paywall: Paywall::for_state(state, &self.config.license),
        })
    }

    pub async fn purchase(&self) -> PurchaseReport {
        self.gate.purchase().await
    }

    pub async fn restore(&self) -> RestoreReport {
        self.gate.restore().await
    }

    /// Starts the background gate task. Keep the sender alive to feed it
    /// billing events.
    pub fn watch(&self) -> (mpsc::Sender<TransactionEvent>, GateTaskHandle) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let handle = Arc::clone(&self.gate).spawn(rx);
        info!(
            "Watching license state every {}s",
            self.config.license.poll_interval().as_secs()
        );
        (tx, handle)
    }
}

async fn load(controller: &mut DocumentController, file: &Path) -> Result<()> {
    match controller.open_path(file).await {
        Ok(()) => Ok(()),
        Err(EditorError::Locked) => {
            bail!("The trial has ended. Run `inkblot license purchase` to keep editing.")
        }
        Err(e) => Err(e).with_context(|| format!("Failed to open {}", file.display())),
    }
}
