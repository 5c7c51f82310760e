use crate::health_monitor::HealthMonitor;
use crate::snapshot::StatusSnapshot;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Drives the health monitor on a fixed period until told to stop.
///
/// Ticks are anchored to the schedule, not to the end of the previous cycle. A
/// cycle that overruns the period makes the scheduler skip the missed ticks
/// rather than fire them back to back.
pub struct Scheduler {
    monitor: HealthMonitor,
    period: Duration,
    cycles: Arc<AtomicU64>,
}

impl Scheduler {
    pub fn new(monitor: HealthMonitor, period: Duration) -> Self {
        Self {
            monitor,
            period,
            cycles: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Run a single cycle right now.
    pub async fn tick(&self) -> StatusSnapshot {
        let snapshot = self.monitor.check_modules().await;
        let cycle = self.cycles.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(cycle, healthy = snapshot.healthy_count(), total = snapshot.len(), "Health check cycle completed");
        snapshot
    }

    pub fn completed_cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    pub fn start(self) -> SchedulerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let cycles = self.cycles.clone();
        let task = tokio::spawn(self.run(shutdown_rx));

        SchedulerHandle {
            shutdown_tx,
            task,
            cycles,
        }
    }

    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut ticker = interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        info!(period = ?self.period, "Starting health check scheduler");

        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.changed() => {
                    info!("Health check scheduler shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    self.tick().await;
                }
            }
        }
    }
}

pub struct SchedulerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    cycles: Arc<AtomicU64>,
}

impl SchedulerHandle {
    pub fn completed_cycles(&self) -> u64 {
        self.cycles.load(Ordering::SeqCst)
    }

    /// Stop taking new ticks and give an in-flight cycle up to `grace` to finish.
    ///
    /// Returns `false` if the cycle had to be abandoned.
    pub async fn shutdown(mut self, grace: Duration) -> bool {
        let _ = self.shutdown_tx.send(true);

        match timeout(grace, &mut self.task).await {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                warn!(error = %e, "Health check scheduler task failed");
                false
            }
            Err(_) => {
                warn!(grace = ?grace, "Abandoning in-flight health check cycle");
                self.task.abort();
                false
            }
        }
    }
}
