use anyhow::Result;
use axum::routing::post;
use axum::Router;
use tracing::info;

use crate::config::settings::{MockConfig, SettingsConfig};
use crate::observability::metrics::{get_metrics, Metrics};
use crate::observability::routes::MetricsState;
use crate::server::register;

#[derive(Clone)]
pub struct AppState {
    pub mock: MockConfig,
    pub metrics_state: MetricsState,
}

impl AppState {
    pub fn new(metrics: &Metrics, mock: &MockConfig) -> Self {
        Self {
            mock: mock.clone(),
            metrics_state: MetricsState::new(metrics.registry.clone()),
        }
    }
}

/// The verification route on its own, so tests can mount it on an
/// ephemeral server.
pub fn register_router() -> Router<AppState> {
    Router::new().route(
        "/register/{register_type}/{ars_id}",
        post(register::handle),
    )
}

/// Start the mock verification server with the metrics route merged in.
pub async fn start(settings_config: &SettingsConfig, mock: &MockConfig) -> Result<()> {
    let metrics = get_metrics().await;
    let state = AppState::new(metrics, mock);

    let app = Router::new()
        .merge(register_router())
        .merge(state.metrics_state.router(&settings_config.metrics))
        .with_state(state);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    info!("mock verification server listening on {}:{}", bind_addr, port);
    metrics.up.set(1);
    axum::serve(listener, app).await?;

    Ok(())
}
