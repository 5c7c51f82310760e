use crate::registry::ModuleRegistry;
use crate::snapshot::StatusSnapshot;
use chrono::Utc;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, error, warn};

/// Runs every registered probe and collects the verdicts.
#[derive(Clone)]
pub struct Aggregator {
    registry: Arc<ModuleRegistry>,
}

impl Aggregator {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self { registry }
    }

    /// Probes all modules concurrently and waits for every one of them.
    ///
    /// Each probe runs in its own task under its own timeout; a timeout or a
    /// panicking probe counts as unhealthy.
    pub async fn run(&self) -> StatusSnapshot {
        let checked_at = Utc::now();
        let mut tasks = Vec::with_capacity(self.registry.len());

        for module in self.registry.all() {
            let probe = module.probe.clone();
            let limit = module.timeout;
            tasks.push(tokio::spawn(async move { timeout(limit, probe.check()).await }));
        }

        let results = futures::future::join_all(tasks).await;

        let mut statuses = BTreeMap::new();
        for (module, result) in self.registry.all().iter().zip(results) {
            let healthy = match result {
                Ok(Ok(healthy)) => {
                    debug!(module = %module.name, healthy, "probe finished");
                    healthy
                }
                Ok(Err(_)) => {
                    warn!(module = %module.name, timeout = ?module.timeout, "probe timed out");
                    false
                }
                Err(e) => {
                    error!(module = %module.name, error = %e, "probe task failed");
                    false
                }
            };
            statuses.insert(module.name.clone(), healthy);
        }

        StatusSnapshot::new(statuses, checked_at)
    }
}
