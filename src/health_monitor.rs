use crate::aggregator::Aggregator;
use crate::reporter::Reporter;
use crate::snapshot::StatusSnapshot;

/// Aggregator and Reporter wired together. Both the scheduler and the `/health`
/// handler go through this; runs are independent and never deduplicated.
#[derive(Clone)]
pub struct HealthMonitor {
    aggregator: Aggregator,
    reporter: Reporter,
    report_on_query: bool,
}

impl HealthMonitor {
    pub fn new(aggregator: Aggregator, reporter: Reporter) -> Self {
        Self {
            aggregator,
            reporter,
            report_on_query: true,
        }
    }

    /// Whether on-demand queries also write to the store.
    pub fn with_report_on_query(mut self, report_on_query: bool) -> Self {
        self.report_on_query = report_on_query;
        self
    }

    /// Probe everything live and publish the result.
    pub async fn check_modules(&self) -> StatusSnapshot {
        let snapshot = self.aggregator.run().await;
        self.reporter.report(&snapshot).await;
        snapshot
    }

    /// On-demand path used by `GET /health`.
    pub async fn query(&self) -> StatusSnapshot {
        if self.report_on_query {
            self.check_modules().await
        } else {
            self.aggregator.run().await
        }
    }
}
