//! The gate's background task: periodic re-evaluation plus billing events.

use crate::billing::TransactionEvent;
use crate::gate::LicenseGate;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Handle to a running gate task.
///
/// Dropping the handle also stops the task.
pub struct GateTaskHandle {
    shutdown: Option<oneshot::Sender<()>>,
    join: JoinHandle<()>,
}

impl GateTaskHandle {
    /// Returns true once the task has exited.
    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Stops the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.join).await {
            warn!("License gate task panicked: {}", e);
        }
    }
}

impl LicenseGate {
    /// Spawns the gate task on the current tokio runtime.
    ///
    /// The first re-evaluation happens one poll interval after spawning;
    /// call [`launch`](Self::launch) beforehand for the startup evaluation.
    /// Transaction events are applied as they arrive until `events` closes.
    pub fn spawn(self: Arc<Self>, mut events: mpsc::Receiver<TransactionEvent>) -> GateTaskHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();
        let period = self.config().poll_interval();

        let join = tokio::spawn(async move {
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut events_open = true;

            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => {
                        debug!("License gate task shutting down");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(e) = self.evaluate() {
                            warn!("License evaluation failed: {}", e);
                        }
                    }
                    event = events.recv(), if events_open => match event {
                        Some(event) => {
                            if let Err(e) = self.handle_transaction(&event).await {
                                warn!("Failed to apply transaction {}: {}", event.transaction_id, e);
                            }
                        }
                        None => {
                            debug!("Billing event channel closed");
                            events_open = false;
                        }
                    },
                }
            }
        });

        GateTaskHandle {
            shutdown: Some(shutdown_tx),
            join,
        }
    }
}
