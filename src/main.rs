use anyhow::{Context, Result};
use module_health::{
    create_router, Aggregator, HealthCheckerConfig, HealthMonitor, ModuleRegistry,
    RedisStatusStore, Reporter, ReqwestHttpClient, Scheduler,
};
use std::sync::Arc;
use tokio::signal;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("module_health=info,tower_http=info"));

    if std::env::var("LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let config = HealthCheckerConfig::from_env().context("invalid configuration")?;
    config.log_configuration();

    let http_client = Arc::new(
        ReqwestHttpClient::new(config.probe_timeout).context("failed to build HTTP client")?,
    );
    let registry = ModuleRegistry::from_config(&config.modules, config.probe_timeout, http_client)
        .context("failed to register modules")?;

    let store = RedisStatusStore::new(&config.redis_url, &config.store_key_prefix)
        .context("invalid Redis URL")?;

    let monitor = HealthMonitor::new(
        Aggregator::new(Arc::new(registry)),
        Reporter::new(Arc::new(store)),
    )
    .with_report_on_query(config.report_on_query);

    let scheduler = Scheduler::new(monitor.clone(), config.health_check_interval).start();

    let app = create_router(monitor);
    let addr = format!("0.0.0.0:{}", config.port);
    info!("Server starting on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown(config.shutdown_grace).await;
    info!("Shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
