pub mod aggregator;
pub mod config;
pub mod error;
pub mod health_monitor;
pub mod health_storage;
pub mod http_client;
pub mod probe;
pub mod registry;
pub mod reporter;
pub mod scheduler;
pub mod server;
pub mod snapshot;

pub use aggregator::Aggregator;
pub use config::{HealthCheckerConfig, ModuleConfig, ProbeKind};
pub use error::{ConfigError, RegistryError, StoreError};
pub use health_monitor::HealthMonitor;
pub use health_storage::{MockStatusStore, RedisStatusStore, StatusStore};
pub use http_client::{HttpClient, MockHttpClient, ReqwestHttpClient};
pub use probe::{HttpProbe, ProcessProbe, Probe, StaticProbe};
pub use registry::{ModuleRegistry, RegisteredModule};
pub use reporter::{ReportSummary, Reporter};
pub use scheduler::{Scheduler, SchedulerHandle};
pub use server::create_router;
pub use snapshot::StatusSnapshot;
