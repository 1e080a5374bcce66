//! In-memory provider
//!
//! A scriptable `ChainProvider` for local development and tests. Read results
//! are keyed by contract address, method name and JSON-encoded arguments.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use surety_core::{Address, ChainError, NetworkId, TxHash, Wei};

use crate::{CallOptions, ChainProvider, Result, TxReceipt};

/// A read-only call the provider received
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
    pub contract: Address,
    pub method: String,
    pub args: Vec<Value>,
    pub from: Address,
}

/// A transaction the provider accepted
#[derive(Debug, Clone, PartialEq)]
pub struct SentTx {
    pub hash: TxHash,
    pub contract: Address,
    pub method: String,
    pub args: Vec<Value>,
    pub from: Address,
    pub value: Option<Wei>,
}

/// Chain contents for a development session, loaded from JSON
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainScript {
    pub network_id: NetworkId,
    pub accounts: Vec<Address>,
    /// Base-unit integer strings keyed by account
    #[serde(default)]
    pub balances: HashMap<Address, String>,
    #[serde(default)]
    pub calls: Vec<ScriptedCall>,
}

/// One scripted read-only call and its result
#[derive(Debug, Clone, Deserialize)]
pub struct ScriptedCall {
    pub contract: Address,
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
    pub result: Value,
}

impl ChainScript {
    pub fn from_json(text: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

type CallKey = (Address, String, String);

#[derive(Default)]
struct MemoryState {
    accounts: Vec<Address>,
    balances: HashMap<Address, String>,
    responses: HashMap<CallKey, std::result::Result<Value, String>>,
    send_failures: HashMap<String, String>,
    calls: Vec<CallRecord>,
    sent: Vec<SentTx>,
}

/// Scriptable in-memory provider
pub struct InMemoryProvider {
    network_id: NetworkId,
    latency: Option<Duration>,
    state: Mutex<MemoryState>,
}

impl InMemoryProvider {
    pub fn new(network_id: NetworkId) -> Self {
        Self {
            network_id,
            latency: None,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// Provider answering from a loaded script
    pub fn from_script(script: ChainScript) -> Self {
        let provider = Self::new(script.network_id).with_accounts(script.accounts);
        for (account, wei) in script.balances {
            provider.set_balance(&account, wei);
        }
        for call in script.calls {
            provider.set_response(&call.contract, &call.method, &call.args, call.result);
        }
        provider
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.lock().accounts = accounts;
        self
    }

    /// Delay applied before answering every request
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn set_balance(&self, account: &Address, wei: impl Into<String>) {
        self.lock().balances.insert(account.clone(), wei.into());
    }

    /// Script the result of a read-only call
    pub fn set_response(&self, contract: &Address, method: &str, args: &[Value], result: Value) {
        self.lock()
            .responses
            .insert(call_key(contract, method, args), Ok(result));
    }

    /// Script a read-only call to fail
    pub fn set_failure(&self, contract: &Address, method: &str, args: &[Value], message: &str) {
        self.lock()
            .responses
            .insert(call_key(contract, method, args), Err(message.to_string()));
    }

    /// Make every transaction to `method` revert
    pub fn set_send_failure(&self, method: &str, message: &str) {
        self.lock()
            .send_failures
            .insert(method.to_string(), message.to_string());
    }

    /// Calls received so far, in arrival order
    pub fn calls(&self) -> Vec<CallRecord> {
        self.lock().calls.clone()
    }

    /// Number of calls received for `method`
    pub fn call_count(&self, method: &str) -> usize {
        self.lock().calls.iter().filter(|c| c.method == method).count()
    }

    /// Transactions accepted so far
    pub fn sent(&self) -> Vec<SentTx> {
        self.lock().sent.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn delay(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

fn call_key(contract: &Address, method: &str, args: &[Value]) -> CallKey {
    (
        contract.clone(),
        method.to_string(),
        Value::Array(args.to_vec()).to_string(),
    )
}

#[async_trait]
impl ChainProvider for InMemoryProvider {
    async fn accounts(&self) -> Result<Vec<Address>> {
        self.delay().await;
        Ok(self.lock().accounts.clone())
    }

    async fn network_id(&self) -> Result<NetworkId> {
        self.delay().await;
        Ok(self.network_id)
    }

    async fn balance(&self, account: &Address) -> Result<String> {
        self.delay().await;
        Ok(self
            .lock()
            .balances
            .get(account)
            .cloned()
            .unwrap_or_else(|| "0".to_string()))
    }

    async fn call(
        &self,
        contract: &Address,
        method: &str,
        args: &[Value],
        options: &CallOptions,
    ) -> Result<Value> {
        self.lock().calls.push(CallRecord {
            contract: contract.clone(),
            method: method.to_string(),
            args: args.to_vec(),
            from: options.from.clone(),
        });
        self.delay().await;

        let scripted = self
            .lock()
            .responses
            .get(&call_key(contract, method, args))
            .cloned();
        match scripted {
            Some(Ok(value)) => Ok(value),
            Some(Err(message)) => Err(ChainError::CallFailed {
                method: method.to_string(),
                message,
            }),
            None => Err(ChainError::CallFailed {
                method: method.to_string(),
                message: "execution reverted".to_string(),
            }),
        }
    }

    async fn send(
        &self,
        contract: &Address,
        method: &str,
        args: &[Value],
        options: &CallOptions,
    ) -> Result<TxReceipt> {
        self.delay().await;

        let mut state = self.lock();
        if let Some(message) = state.send_failures.get(method) {
            return Err(ChainError::TransactionRejected {
                method: method.to_string(),
                message: message.clone(),
            });
        }

        let hash = TxHash::new(format!("0x{:064x}", state.sent.len() + 1));
        state.sent.push(SentTx {
            hash: hash.clone(),
            contract: contract.clone(),
            method: method.to_string(),
            args: args.to_vec(),
            from: options.from.clone(),
            value: options.value,
        });

        Ok(TxReceipt {
            transaction_hash: hash,
            from: options.from.clone(),
            to: contract.clone(),
            method: method.to_string(),
            status: true,
        })
    }
}
