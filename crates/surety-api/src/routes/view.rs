//! View model endpoints

use axum::{extract::State, Json};

use crate::dto::ViewModel;
use crate::routes::{error_response, ApiResult};
use crate::AppState;

/// GET /view - Current view snapshot, including loading state
pub async fn get_view(State(state): State<AppState>) -> Json<ViewModel> {
    Json(state.view().await)
}

/// POST /view/refresh - Refresh flights, insurances and balance
pub async fn refresh_view(State(state): State<AppState>) -> ApiResult<ViewModel> {
    state
        .refresh()
        .await
        .map(Json)
        .map_err(|e| error_response(&e))
}
