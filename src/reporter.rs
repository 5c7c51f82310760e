use crate::health_storage::StatusStore;
use crate::snapshot::StatusSnapshot;
use futures::future::join_all;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportSummary {
    pub written: usize,
    pub failed: usize,
}

/// Publishes snapshots to the shared store and to the log.
#[derive(Clone)]
pub struct Reporter {
    store: Arc<dyn StatusStore>,
}

impl Reporter {
    pub fn new(store: Arc<dyn StatusStore>) -> Self {
        Self { store }
    }

    /// One store write per module, issued together, then one log record for the
    /// whole snapshot.
    ///
    /// A failed write is logged and counted; it never stops the remaining writes.
    pub async fn report(&self, snapshot: &StatusSnapshot) -> ReportSummary {
        let mut summary = ReportSummary::default();

        let writes = snapshot.iter().map(|(module, healthy)| async move {
            (module, healthy, self.store.set_module_status(module, healthy).await)
        });

        for (module, healthy, result) in join_all(writes).await {
            match result {
                Ok(()) => summary.written += 1,
                Err(e) => {
                    summary.failed += 1;
                    error!(module, healthy, error = %e, "Failed to store module status");
                }
            }
        }

        info!(
            statuses = ?snapshot.statuses(),
            healthy = snapshot.healthy_count(),
            total = snapshot.len(),
            checked_at = %snapshot.checked_at(),
            store_failures = summary.failed,
            "Module status"
        );

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::health_storage::{MockStatusStore, StatusStore};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::collections::BTreeMap;
    use std::time::Duration;

    struct SlowStore {
        inner: MockStatusStore,
        latency: Duration,
    }

    #[async_trait]
    impl StatusStore for SlowStore {
        async fn set_module_status(&self, module: &str, healthy: bool) -> Result<(), StoreError> {
            tokio::time::sleep(self.latency).await;
            self.inner.set_module_status(module, healthy).await
        }
    }

    fn snapshot() -> StatusSnapshot {
        StatusSnapshot::new(
            BTreeMap::from([
                ("frontend".to_string(), true),
                ("gateway".to_string(), false),
                ("database".to_string(), true),
            ]),
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_report_writes_each_module() {
        let store = MockStatusStore::new();
        let reporter = Reporter::new(Arc::new(store.clone()));

        let summary = reporter.report(&snapshot()).await;

        assert_eq!(summary, ReportSummary { written: 3, failed: 0 });
        assert_eq!(store.get("frontend"), Some(true));
        assert_eq!(store.get("gateway"), Some(false));
        assert_eq!(store.get("database"), Some(true));
    }

    #[tokio::test]
    async fn test_report_is_idempotent() {
        let store = MockStatusStore::new();
        let reporter = Reporter::new(Arc::new(store.clone()));
        let snapshot = snapshot();

        reporter.report(&snapshot).await;
        let first = store.snapshot();
        reporter.report(&snapshot).await;

        assert_eq!(store.snapshot(), first);
        assert_eq!(store.write_count(), 6);
    }

    #[tokio::test]
    async fn test_report_survives_unavailable_store() {
        let store = MockStatusStore::unavailable();
        let reporter = Reporter::new(Arc::new(store.clone()));

        let summary = reporter.report(&snapshot()).await;

        assert_eq!(summary, ReportSummary { written: 0, failed: 3 });
        assert!(store.snapshot().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_report_writes_concurrently() {
        let store = MockStatusStore::new();
        let reporter = Reporter::new(Arc::new(SlowStore {
            inner: store.clone(),
            latency: Duration::from_secs(1),
        }));

        let started = tokio::time::Instant::now();
        let summary = reporter.report(&snapshot()).await;

        assert_eq!(summary, ReportSummary { written: 3, failed: 0 });
        assert!(started.elapsed() < Duration::from_secs(2));
        assert_eq!(store.get("gateway"), Some(false));
    }
}
