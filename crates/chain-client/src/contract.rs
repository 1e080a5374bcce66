//! Deployed contract handles

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use surety_core::{Address, ChainError};

use crate::{timed_request, CallOptions, ChainClient, Result, TxReceipt};

/// Callable handle for one deployed contract
#[derive(Clone)]
pub struct ContractHandle {
    name: String,
    address: Address,
    /// Function names from the ABI; `None` when no ABI was supplied
    methods: Option<Arc<HashSet<String>>>,
    client: ChainClient,
}

impl ContractHandle {
    pub fn new(client: ChainClient, name: impl Into<String>, address: Address, abi: &Value) -> Self {
        Self {
            name: name.into(),
            address,
            methods: abi_functions(abi).map(Arc::new),
            client,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Read-only call on behalf of `from`
    pub async fn call(&self, method: &str, args: &[Value], from: &Address) -> Result<Value> {
        self.ensure_method(method)?;
        tracing::debug!(contract = %self.name, method, "contract call");

        let options = CallOptions::sender(from.clone());
        timed_request(
            method,
            self.client.call_timeout(),
            self.client
                .inner()
                .call(&self.address, method, args, &options),
        )
        .await
    }

    /// State-changing transaction
    pub async fn send(
        &self,
        method: &str,
        args: &[Value],
        options: &CallOptions,
    ) -> Result<TxReceipt> {
        self.ensure_method(method)?;
        tracing::info!(contract = %self.name, method, from = %options.from, "sending transaction");

        timed_request(
            method,
            self.client.call_timeout(),
            self.client
                .inner()
                .send(&self.address, method, args, options),
        )
        .await
    }

    fn ensure_method(&self, method: &str) -> Result<()> {
        match &self.methods {
            Some(methods) if !methods.contains(method) => Err(ChainError::UnknownMethod {
                contract: self.name.clone(),
                method: method.to_string(),
            }),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ContractHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractHandle")
            .field("name", &self.name)
            .field("address", &self.address)
            .finish()
    }
}

/// Collect function names from a JSON ABI. Entries without a `type` are functions.
fn abi_functions(abi: &Value) -> Option<HashSet<String>> {
    let entries = abi.as_array().filter(|a| !a.is_empty())?;
    Some(
        entries
            .iter()
            .filter(|entry| {
                entry
                    .get("type")
                    .and_then(Value::as_str)
                    .map_or(true, |t| t == "function")
            })
            .filter_map(|entry| entry.get("name").and_then(Value::as_str))
            .map(str::to_string)
            .collect(),
    )
}
