//! Background reclamation of expired admission windows.

use crate::controller::AdmissionController;
use shared_types::TimeSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Handle to a running sweeper. Dropping it stops the task.
pub struct SweeperHandle {
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl SweeperHandle {
    /// Signal the sweeper to stop and wait for it to exit.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown_tx.send(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Spawn a task that calls [`AdmissionController::sweep`] every `interval`.
///
/// Missed ticks are skipped rather than bursted. Must be called from within
/// a tokio runtime.
pub fn spawn_sweeper<T>(controller: Arc<AdmissionController<T>>, interval: Duration) -> SweeperHandle
where
    T: TimeSource + 'static,
{
    let (shutdown_tx, mut shutdown_rx) = watch::channel(false);

    let task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
        info!(interval_ms = interval.as_millis() as u64, "Admission sweeper started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let removed = controller.sweep();
                    debug!(removed, tracked = controller.tracked_keys(), "Admission sweep tick");
                }
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        break;
                    }
                }
            }
        }

        info!("Admission sweeper stopped");
    });

    SweeperHandle {
        shutdown_tx,
        task: Some(task),
    }
}
