use crate::health_monitor::HealthMonitor;
use crate::snapshot::StatusSnapshot;
use axum::{extract::State, response::Json, routing::get, Router};
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub monitor: HealthMonitor,
}

/// Always 200: the body reports module health, the endpoint itself does not fail.
async fn health_handler(State(state): State<AppState>) -> Json<StatusSnapshot> {
    Json(state.monitor.query().await)
}

pub fn create_router(monitor: HealthMonitor) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { monitor })
}
