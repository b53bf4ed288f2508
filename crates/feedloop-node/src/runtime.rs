//! # Node Runtime
//!
//! Owns the subsystem container and the background sweepers.
//!
//! ## Startup Sequence
//!
//! 1. Build the container (subsystems in dependency order)
//! 2. Spawn one sweeper per enabled admission policy
//! 3. Signal ready
//!
//! ## Shutdown Sequence
//!
//! 1. Signal every sweeper
//! 2. Await their exit

use std::sync::Arc;

use fl_01_admission::{spawn_sweeper, SweeperHandle};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::container::{NodeConfig, Policy, SubsystemContainer};

pub struct NodeRuntime {
    container: Arc<SubsystemContainer>,
    sweepers: Mutex<Vec<(Policy, SweeperHandle)>>,
}

impl NodeRuntime {
    pub fn new(config: NodeConfig) -> Self {
        info!("Creating Feedloop node runtime");
        Self {
            container: Arc::new(SubsystemContainer::new(config)),
            sweepers: Mutex::new(Vec::new()),
        }
    }

    /// Spawn sweepers. Must run inside a tokio runtime; calling it twice
    /// does not start duplicates.
    pub async fn start(&self) {
        let mut sweepers = self.sweepers.lock().await;
        if !sweepers.is_empty() {
            debug!("Runtime already started");
            return;
        }

        for policy in Policy::ALL {
            let controller = Arc::clone(self.container.admission(policy));
            let config = controller.config().clone();
            if !config.enabled {
                info!(policy = policy.as_str(), "Admission disabled, no sweeper");
                continue;
            }
            info!(
                policy = policy.as_str(),
                limit = config.limit,
                window_ms = config.window_ms(),
                "Admission policy active"
            );
            sweepers.push((policy, spawn_sweeper(controller, config.cleanup_interval)));
        }

        info!(sweepers = sweepers.len(), "Feedloop node started");
    }

    /// Number of sweepers currently running.
    pub async fn running_sweepers(&self) -> usize {
        self.sweepers
            .lock()
            .await
            .iter()
            .filter(|(_, handle)| handle.is_running())
            .count()
    }

    pub async fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        let sweepers = std::mem::take(&mut *self.sweepers.lock().await);
        for (policy, handle) in sweepers {
            handle.shutdown().await;
            debug!(policy = policy.as_str(), "Sweeper stopped");
        }
        info!("Shutdown complete");
    }

    pub fn container(&self) -> Arc<SubsystemContainer> {
        Arc::clone(&self.container)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_spawns_one_sweeper_per_enabled_policy() {
        let mut config = NodeConfig::default();
        config.admission.sdk.enabled = false;
        let runtime = NodeRuntime::new(config);

        runtime.start().await;
        assert_eq!(runtime.running_sweepers().await, 2);

        runtime.start().await;
        assert_eq!(runtime.running_sweepers().await, 2);

        runtime.shutdown().await;
        assert_eq!(runtime.running_sweepers().await, 0);
    }
}
