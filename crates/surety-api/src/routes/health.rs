//! Liveness endpoint

use axum::{extract::State, Json};

use crate::dto::HealthResponse;
use crate::AppState;

/// GET /health - Liveness and whether a view is ready to render
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let view_ready = state.view_ready().await;
    Json(HealthResponse::new(state.session().network_id, view_ready))
}
