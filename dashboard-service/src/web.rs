use std::sync::Arc;

use aq_client::{db::measurement_queries, domain::Measurement};
use axum::{extract::State, http::StatusCode, routing::get, Router};

use crate::{
    ingest::{self, MeasurementSource},
    store::MeasurementStore,
};

/// Minimum value a stored measurement must reach to appear on the dashboard.
pub const RISK_THRESHOLD: f64 = 10.0;

/// Dependencies shared by every request handler.
pub struct AppState {
    pub store: MeasurementStore,
    pub source: Arc<dyn MeasurementSource>,
    pub parameter: String,
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(list))
        .route("/refresh", get(refresh))
        .with_state(state)
}

/// `GET /` — render all stored measurements at or above the risk threshold.
async fn list(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    metrics::counter!("dashboard_list_requests_total").increment(1);

    render_listing(&state).await
}

/// `GET /refresh` — discard and reload the store, then render like `/`.
async fn refresh(State(state): State<Arc<AppState>>) -> Result<String, StatusCode> {
    metrics::counter!("dashboard_refresh_requests_total").increment(1);

    if let Err(e) = ingest::refresh(&state.store, state.source.as_ref(), &state.parameter).await {
        tracing::error!(error = %e, "refresh failed");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    render_listing(&state).await
}

async fn render_listing(state: &AppState) -> Result<String, StatusCode> {
    let rows = measurement_queries::at_least(state.store.pool(), RISK_THRESHOLD)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "measurement query failed");
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(render(&rows))
}

/// Render measurements as a list of `(timestamp, value)` tuples, e.g.
/// `[("2023-01-01T01:00:00Z", 12.3)]`. An empty listing renders `[]`.
fn render(rows: &[Measurement]) -> String {
    let tuples: Vec<(&str, f64)> = rows
        .iter()
        .map(|m| (m.datetime.as_str(), m.value))
        .collect();
    format!("{tuples:?}")
}
