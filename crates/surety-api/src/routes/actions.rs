//! Passenger action endpoints

use axum::{extract::State, routing::post, Json, Router};

use crate::dto::{PayoutResponse, PurchaseRequest, PurchaseResponse};
use crate::routes::{run_detached, ApiResult};
use crate::AppState;

/// Create action routes
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/purchase", post(purchase))
        .route("/payout", post(payout))
}

/// POST /actions/purchase - Buy insurance (when a flight is given) and refresh
pub async fn purchase(
    State(state): State<AppState>,
    Json(request): Json<PurchaseRequest>,
) -> ApiResult<PurchaseResponse> {
    run_detached(async move { state.initiate_purchase_flow(request).await })
        .await
        .map(Json)
}

/// POST /actions/payout - Request payout of credited insurance
pub async fn payout(State(state): State<AppState>) -> ApiResult<PayoutResponse> {
    run_detached(async move { state.request_payout().await })
        .await
        .map(|receipt| Json(PayoutResponse { receipt }))
}
