//! Contract Resolution
//!
//! Maps the connected network to the deployed application/data contract pair.

use std::path::Path;

use chain_client::{ChainClient, ContractHandle};
use surety_core::{ContractArtifact, DeploymentManifest, NetworkId, SuretyError};

use crate::constants::artifacts;

/// Handles for both FlightSurety contracts on one network
#[derive(Debug, Clone)]
pub struct ContractPair {
    pub application: ContractHandle,
    pub data: ContractHandle,
}

/// Resolve both contracts for `network_id`.
///
/// The application contract depends on the data contract, so a network with
/// only one of them deployed is reported as `NotDeployed`.
pub fn resolve_contracts(
    client: &ChainClient,
    manifest: &DeploymentManifest,
    network_id: NetworkId,
) -> Result<ContractPair, SuretyError> {
    let application = manifest.application.deployment(network_id);
    let data = manifest.data.deployment(network_id);

    match (application, data) {
        (Some(app_dep), Some(data_dep)) => {
            tracing::info!(
                network = %network_id,
                application = %app_dep.address,
                data = %data_dep.address,
                "Resolved FlightSurety contracts"
            );
            Ok(ContractPair {
                application: client.contract(
                    &manifest.application.contract_name,
                    app_dep,
                    &manifest.application.abi,
                ),
                data: client.contract(&manifest.data.contract_name, data_dep, &manifest.data.abi),
            })
        }
        (app_dep, data_dep) => {
            let missing: Vec<&str> = [
                (app_dep.is_none(), manifest.application.contract_name.as_str()),
                (data_dep.is_none(), manifest.data.contract_name.as_str()),
            ]
            .into_iter()
            .filter_map(|(is_missing, name)| is_missing.then_some(name))
            .collect();

            tracing::warn!(
                network = %network_id,
                ?missing,
                deployed = ?manifest.deployed_networks(),
                "FlightSurety not deployed"
            );
            Err(SuretyError::NotDeployed {
                network_id,
                missing: missing.join(", "),
            })
        }
    }
}

/// Load the manifest from the two build artifacts in `dir`
pub fn load_manifest(dir: impl AsRef<Path>) -> surety_core::Result<DeploymentManifest> {
    let dir = dir.as_ref();
    Ok(DeploymentManifest::new(
        ContractArtifact::load(dir.join(artifacts::APPLICATION_FILE))?,
        ContractArtifact::load(dir.join(artifacts::DATA_FILE))?,
    ))
}
