//! chain-client: Chain provider abstraction with bounded call timeouts
//!
//! The wallet/provider is an external collaborator. This crate defines the
//! seam it plugs into (`ChainProvider`), wraps it in a `ChainClient` that puts
//! a timeout on every call, and hands out `ContractHandle`s for deployed
//! contracts.

pub mod contract;
pub mod memory;
pub mod probe;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use surety_core::{
    parse_wei, Address, ChainError, ClientConfig, NetworkDeployment, NetworkId, TxHash, Wei,
};

pub use contract::ContractHandle;
pub use memory::{ChainScript, InMemoryProvider};
pub use probe::{probe_provider, ProviderProbe};

/// Result type for chain client operations
pub type Result<T> = std::result::Result<T, ChainError>;

/// Sender and attached value for a contract interaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallOptions {
    pub from: Address,
    pub value: Option<Wei>,
}

impl CallOptions {
    pub fn sender(from: Address) -> Self {
        Self { from, value: None }
    }

    pub fn with_value(mut self, value: Wei) -> Self {
        self.value = Some(value);
        self
    }
}

/// Receipt of a state-changing transaction; passed through uninterpreted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxReceipt {
    pub transaction_hash: TxHash,
    pub from: Address,
    pub to: Address,
    pub method: String,
    #[serde(default)]
    pub status: bool,
}

/// Injected blockchain provider (wallet extension, RPC gateway, test double)
#[async_trait]
pub trait ChainProvider: Send + Sync {
    /// Accounts the user has authorized, primary first
    async fn accounts(&self) -> Result<Vec<Address>>;

    /// Id of the network the provider is connected to
    async fn network_id(&self) -> Result<NetworkId>;

    /// Account balance as a base-unit integer string
    async fn balance(&self, account: &Address) -> Result<String>;

    /// Read-only contract call
    async fn call(
        &self,
        contract: &Address,
        method: &str,
        args: &[Value],
        options: &CallOptions,
    ) -> Result<Value>;

    /// State-changing transaction
    async fn send(
        &self,
        contract: &Address,
        method: &str,
        args: &[Value],
        options: &CallOptions,
    ) -> Result<TxReceipt>;
}

/// High-level client over an injected provider
#[derive(Clone)]
pub struct ChainClient {
    inner: Arc<dyn ChainProvider>,
    call_timeout: Duration,
}

impl ChainClient {
    /// Wrap a provider using the configured call timeout
    pub fn new(provider: Arc<dyn ChainProvider>, config: &ClientConfig) -> Self {
        Self {
            inner: provider,
            call_timeout: config.call_timeout(),
        }
    }

    /// Wrap whatever provider the host detected, failing if there is none
    pub fn detect(provider: Option<Arc<dyn ChainProvider>>, config: &ClientConfig) -> Result<Self> {
        match provider {
            Some(p) => Ok(Self::new(p, config)),
            None => Err(ChainError::ProviderUnavailable {
                reason: "no injected provider found, consider installing a wallet extension"
                    .to_string(),
            }),
        }
    }

    /// Get the underlying provider (for advanced usage)
    pub fn inner(&self) -> &Arc<dyn ChainProvider> {
        &self.inner
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub async fn accounts(&self) -> Result<Vec<Address>> {
        timed_request("accounts", self.call_timeout, self.inner.accounts()).await
    }

    /// First authorized account, the caller identity for the session
    pub async fn primary_account(&self) -> Result<Address> {
        self.accounts()
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ChainError::ProviderUnavailable {
                reason: "provider exposes no authorized accounts".to_string(),
            })
    }

    pub async fn network_id(&self) -> Result<NetworkId> {
        timed_request("network_id", self.call_timeout, self.inner.network_id()).await
    }

    /// Account balance in wei
    pub async fn balance(&self, account: &Address) -> Result<Wei> {
        let raw = timed_request("balance", self.call_timeout, self.inner.balance(account)).await?;
        parse_wei(&raw).map_err(|e| ChainError::Decode {
            method: "balance".to_string(),
            message: e.to_string(),
        })
    }

    /// Handle for a deployed contract
    pub fn contract(
        &self,
        name: impl Into<String>,
        deployment: &NetworkDeployment,
        abi: &Value,
    ) -> ContractHandle {
        ContractHandle::new(self.clone(), name, deployment.address.clone(), abi)
    }
}

/// Run a provider call under a timeout, mapping expiry to `ChainError::Timeout`
pub(crate) async fn timed_request<T>(
    method: &str,
    timeout: Duration,
    fut: impl Future<Output = Result<T>>,
) -> Result<T> {
    tokio::time::timeout(timeout, fut)
        .await
        .map_err(|_| ChainError::Timeout {
            method: method.to_string(),
            secs: timeout.as_secs(),
        })?
}
