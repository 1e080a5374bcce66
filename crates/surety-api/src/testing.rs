//! Shared fixtures for session tests

use std::sync::Arc;
use std::time::Duration;

use chain_client::{ChainProvider, InMemoryProvider};
use flight_surety::constants::{artifacts, methods};
use serde_json::json;
use surety_core::{
    Address, ClientConfig, ContractArtifact, DeploymentManifest, NetworkDeployment, NetworkId,
};

use crate::AppState;

pub(crate) const NETWORK: NetworkId = NetworkId(5777);
pub(crate) const APP_ADDRESS: &str = "0x627306090abaB3A6e1400e9345bC60c78a8BEf57";
pub(crate) const DATA_ADDRESS: &str = "0xC5fdf4076b8F3A5357c5E395ab970B5B54098Fef";

pub(crate) fn passenger() -> Address {
    Address::new("0xf17f52151EbEF6C7334FAD080c5704D77216b732")
}

pub(crate) fn app_address() -> Address {
    Address::new(APP_ADDRESS)
}

fn artifact(name: &str, address: &str) -> ContractArtifact {
    ContractArtifact {
        contract_name: name.to_string(),
        abi: json!([]),
        networks: [(
            NETWORK.artifact_key(),
            NetworkDeployment {
                address: Address::new(address),
                transaction_hash: None,
            },
        )]
        .into_iter()
        .collect(),
    }
}

pub(crate) fn manifest() -> DeploymentManifest {
    DeploymentManifest::new(
        artifact(artifacts::APPLICATION_NAME, APP_ADDRESS),
        artifact(artifacts::DATA_NAME, DATA_ADDRESS),
    )
}

pub(crate) fn provider() -> Arc<InMemoryProvider> {
    let provider = InMemoryProvider::new(NETWORK).with_accounts(vec![passenger()]);
    provider.set_balance(&passenger(), "5000000000000000000");
    Arc::new(provider)
}

pub(crate) fn slow_provider(latency: Duration) -> Arc<InMemoryProvider> {
    let provider = InMemoryProvider::new(NETWORK)
        .with_accounts(vec![passenger()])
        .with_latency(latency);
    provider.set_balance(&passenger(), "5000000000000000000");
    Arc::new(provider)
}

pub(crate) fn script_flights(provider: &InMemoryProvider, names: &[&str]) {
    provider.set_response(
        &app_address(),
        methods::GET_FLIGHTS_COUNT,
        &[],
        json!(names.len().to_string()),
    );
    for (index, name) in names.iter().enumerate() {
        provider.set_response(
            &app_address(),
            methods::GET_FLIGHT,
            &[json!(index as u64)],
            json!({"name": name, "airline": DATA_ADDRESS, "statusCode": "0"}),
        );
    }
}

pub(crate) fn script_insurance(provider: &InMemoryProvider, flight: &str, amount: &str) {
    provider.set_response(
        &app_address(),
        methods::GET_INSURANCE,
        &[json!(flight)],
        json!({"amount": amount, "payoutAmount": "0", "state": "0"}),
    );
}

pub(crate) async fn connect(provider: Arc<InMemoryProvider>) -> AppState {
    let provider: Arc<dyn ChainProvider> = provider;
    AppState::connect(Some(provider), ClientConfig::default(), &manifest())
        .await
        .expect("fixture session connects")
}
