//! Provider probing
//!
//! Checks whether the injected provider answers and what it is connected to.

use std::time::Instant;

use serde::{Deserialize, Serialize};
use surety_core::NetworkId;

use crate::ChainClient;

/// Result of probing the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProbe {
    /// Provider is reachable and responding
    pub is_online: bool,

    /// Network the provider reports, if it answered
    pub network_id: Option<NetworkId>,

    /// Number of authorized accounts
    pub account_count: usize,

    /// Round-trip time of the network id query
    pub latency_ms: u64,
}

/// Probe the provider's network and account availability
pub async fn probe_provider(client: &ChainClient) -> ProviderProbe {
    let start = Instant::now();
    let network_id = match client.network_id().await {
        Ok(id) => id,
        Err(e) => {
            tracing::debug!("Provider probe failed: {}", e);
            return ProviderProbe {
                is_online: false,
                network_id: None,
                account_count: 0,
                latency_ms: start.elapsed().as_millis() as u64,
            };
        }
    };
    let latency_ms = start.elapsed().as_millis() as u64;

    let account_count = client.accounts().await.map(|a| a.len()).unwrap_or(0);

    ProviderProbe {
        is_online: true,
        network_id: Some(network_id),
        account_count,
        latency_ms,
    }
}
