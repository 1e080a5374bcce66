//! API route handlers

pub mod actions;
pub mod health;
pub mod session;
pub mod view;

use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use surety_core::SuretyError;

use crate::dto::ApiError;
use crate::AppState;

/// Handler error response
pub type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ApiError>)>;

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/session", get(session::get_session))
        .route("/view", get(view::get_view))
        .route("/view/refresh", post(view::refresh_view))
        .nest("/actions", actions::router())
        .with_state(state)
}

/// Map a client error to its HTTP status and body
pub(crate) fn error_response(err: &SuretyError) -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(ApiError::from(err)),
    )
}

/// Run `work` on its own task so a dropped request cannot abandon it halfway
pub(crate) async fn run_detached<T, F>(work: F) -> Result<T, (StatusCode, Json<ApiError>)>
where
    T: Send + 'static,
    F: std::future::Future<Output = Result<T, SuretyError>> + Send + 'static,
{
    match tokio::spawn(work).await {
        Ok(result) => result.map_err(|e| error_response(&e)),
        Err(e) => {
            tracing::error!("Background task failed: {}", e);
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::internal("background task failed")),
            ))
        }
    }
}
