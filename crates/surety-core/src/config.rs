//! Configuration types for the Flight Surety client

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{Address, Error, NetworkId, Result};

/// Client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Upper bound for every provider call, in seconds
    #[serde(default = "default_call_timeout_secs")]
    pub call_timeout_secs: u64,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,

    /// Directory holding the contract build artifacts
    #[serde(default)]
    pub artifacts_dir: Option<PathBuf>,
}

fn default_call_timeout_secs() -> u64 {
    30
}

fn default_api_port() -> u16 {
    18545
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            call_timeout_secs: default_call_timeout_secs(),
            api_port: default_api_port(),
            artifacts_dir: None,
        }
    }
}

impl ClientConfig {
    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }

    /// Load configuration from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        serde_json::from_str(&text).map_err(|e| Error::Serialization(e.to_string()))
    }
}

/// Address of one contract on one network
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDeployment {
    pub address: Address,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,
}

/// Build artifact of a single contract (`contractName`, `abi`, `networks`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,

    #[serde(default)]
    pub abi: serde_json::Value,

    /// Keyed by network id rendered as a decimal string
    #[serde(default)]
    pub networks: HashMap<String, NetworkDeployment>,
}

impl ContractArtifact {
    /// Deployment entry for a network, if the contract was deployed there
    pub fn deployment(&self, network: NetworkId) -> Option<&NetworkDeployment> {
        self.networks.get(&network.artifact_key())
    }

    /// Parse an artifact from its JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Load an artifact from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }
}

/// Deployment manifest for the application and data contracts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentManifest {
    pub application: ContractArtifact,
    pub data: ContractArtifact,
}

impl DeploymentManifest {
    pub fn new(application: ContractArtifact, data: ContractArtifact) -> Self {
        Self { application, data }
    }

    /// Build a manifest from the two artifact JSON documents
    pub fn from_artifacts_json(application: &str, data: &str) -> Result<Self> {
        Ok(Self::new(
            ContractArtifact::from_json(application)?,
            ContractArtifact::from_json(data)?,
        ))
    }

    /// Network ids for which both contracts are deployed, ascending
    pub fn deployed_networks(&self) -> Vec<NetworkId> {
        let mut ids: Vec<NetworkId> = self
            .application
            .networks
            .keys()
            .filter(|key| self.data.networks.contains_key(*key))
            .filter_map(|key| key.parse::<u64>().ok().map(NetworkId))
            .collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APP_ARTIFACT: &str = r#"{
        "contractName": "FlightSuretyApp",
        "abi": [{"type": "function", "name": "getFlightsCount"}],
        "networks": {
            "5777": {"address": "0x627306090abaB3A6e1400e9345bC60c78a8BEf57", "transactionHash": "0xabc"},
            "4": {"address": "0xf17f52151EbEF6C7334FAD080c5704D77216b732"}
        }
    }"#;

    const DATA_ARTIFACT: &str = r#"{
        "contractName": "FlightSuretyData",
        "abi": [],
        "networks": {
            "5777": {"address": "0xC5fdf4076b8F3A5357c5E395ab970B5B54098Fef"}
        }
    }"#;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.call_timeout_secs, 30);
        assert_eq!(config.call_timeout(), Duration::from_secs(30));
        assert_eq!(config.api_port, 18545);
        assert!(config.artifacts_dir.is_none());
    }

    #[test]
    fn test_config_defaults_when_fields_missing() {
        let config: ClientConfig = serde_json::from_str(r#"{"api_port": 9000}"#).unwrap();
        assert_eq!(config.api_port, 9000);
        assert_eq!(config.call_timeout_secs, 30);
    }

    #[test]
    fn test_load_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("surety.json");
        std::fs::write(&path, r#"{"call_timeout_secs": 3, "artifacts_dir": "build/contracts"}"#)
            .unwrap();

        let config = ClientConfig::load(&path).unwrap();
        assert_eq!(config.call_timeout(), Duration::from_secs(3));
        assert_eq!(config.artifacts_dir, Some(PathBuf::from("build/contracts")));
        assert_eq!(config.api_port, 18545);

        let err = ClientConfig::load(dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_artifact_parsing() {
        let artifact = ContractArtifact::from_json(APP_ARTIFACT).unwrap();
        assert_eq!(artifact.contract_name, "FlightSuretyApp");
        let dep = artifact.deployment(NetworkId(5777)).unwrap();
        assert!(dep.address.is_valid());
        assert_eq!(dep.transaction_hash.as_deref(), Some("0xabc"));
        assert!(artifact.deployment(NetworkId(1)).is_none());
    }

    #[test]
    fn test_manifest_deployed_networks() {
        let manifest = DeploymentManifest::from_artifacts_json(APP_ARTIFACT, DATA_ARTIFACT).unwrap();
        assert_eq!(manifest.deployed_networks(), vec![NetworkId(5777)]);
    }

    #[test]
    fn test_malformed_artifact() {
        let err = ContractArtifact::from_json("{not json").unwrap_err();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
