//! Session endpoint

use axum::{extract::State, Json};
use chain_client::probe_provider;

use crate::dto::SessionResponse;
use crate::AppState;

/// GET /session - Connected account, network and contract addresses
pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session();
    let provider = probe_provider(state.client()).await;

    Json(SessionResponse {
        account: session.account.clone(),
        network_id: session.network_id,
        application_address: session.contracts.application.address().clone(),
        data_address: session.contracts.data.address().clone(),
        provider,
    })
}
