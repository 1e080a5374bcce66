//! Passenger session state shared across API handlers

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use chain_client::{ChainClient, ChainProvider};
use flight_surety::{resolve_contracts, ContractPair};
use surety_core::{Address, ClientConfig, DeploymentManifest, NetworkId, SuretyError};
use tokio::sync::{Mutex, RwLock};

use crate::dto::ViewModel;

/// Identity of a connected session: who is calling, on which network, against
/// which contracts. Fixed for the lifetime of the session.
#[derive(Debug, Clone)]
pub struct Session {
    /// Caller identity for every read and transaction
    pub account: Address,
    pub network_id: NetworkId,
    pub contracts: ContractPair,
}

/// Last published view together with the error that produced it, if any
pub(crate) struct Published {
    pub view: ViewModel,
    pub error: Option<SuretyError>,
    /// Completed refresh cycles, successful or not
    pub cycles: u64,
}

/// Shared session state
#[derive(Clone)]
pub struct AppState {
    pub(crate) inner: Arc<AppStateInner>,
}

pub(crate) struct AppStateInner {
    pub config: ClientConfig,
    pub client: ChainClient,
    pub session: Session,
    /// Written only by the refresh cycle
    pub published: RwLock<Published>,
    /// Serializes refresh cycles
    pub refresh_lock: Mutex<()>,
    pub purchase_in_flight: AtomicBool,
    pub payout_in_flight: AtomicBool,
}

impl AppState {
    /// Bootstrap a session from the injected provider.
    ///
    /// # Errors
    /// `ProviderUnavailable` when there is no provider, it does not answer, or
    /// it exposes no account; `NotDeployed` when the connected network lacks
    /// either contract. Both are final for the session.
    pub async fn connect(
        provider: Option<Arc<dyn ChainProvider>>,
        config: ClientConfig,
        manifest: &DeploymentManifest,
    ) -> Result<Self, SuretyError> {
        let unavailable = |e: surety_core::ChainError| SuretyError::ProviderUnavailable {
            reason: e.to_string(),
        };

        let client = ChainClient::detect(provider, &config).map_err(unavailable)?;
        let account = client.primary_account().await.map_err(unavailable)?;
        let network_id = client.network_id().await.map_err(unavailable)?;
        let contracts = resolve_contracts(&client, manifest, network_id)?;

        tracing::info!(account = %account, network = %network_id, "Session connected");

        Ok(Self::from_parts(
            config,
            client,
            Session {
                account,
                network_id,
                contracts,
            },
        ))
    }

    /// Assemble state from an already resolved session
    pub fn from_parts(config: ClientConfig, client: ChainClient, session: Session) -> Self {
        let view = ViewModel::new(session.account.clone(), session.network_id);
        Self {
            inner: Arc::new(AppStateInner {
                config,
                client,
                session,
                published: RwLock::new(Published {
                    view,
                    error: None,
                    cycles: 0,
                }),
                refresh_lock: Mutex::new(()),
                purchase_in_flight: AtomicBool::new(false),
                payout_in_flight: AtomicBool::new(false),
            }),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    pub fn client(&self) -> &ChainClient {
        &self.inner.client
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    /// Snapshot of the current view
    pub async fn view(&self) -> ViewModel {
        self.inner.published.read().await.view.clone()
    }

    /// Whether a refresh cycle is currently running
    pub async fn is_loading(&self) -> bool {
        self.inner.published.read().await.view.is_loading
    }

    /// True once a refresh has completed and the last one did not fail
    pub async fn view_ready(&self) -> bool {
        let published = self.inner.published.read().await;
        published.cycles > 0 && published.error.is_none()
    }
}
