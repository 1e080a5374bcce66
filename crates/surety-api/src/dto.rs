//! Data Transfer Objects for the presentation layer

use chain_client::{ProviderProbe, TxReceipt};
use flight_surety::constants::params;
use flight_surety::{Flight, InsurancePosition};
use serde::{Deserialize, Serialize};
use surety_core::{Address, Ether, NetworkId, SuretyError};

/// Liveness plus whether a view has been published yet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub network_id: NetworkId,
    pub view_ready: bool,
}

impl HealthResponse {
    pub fn new(network_id: NetworkId, view_ready: bool) -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            network_id,
            view_ready,
        }
    }
}

/// Everything the passenger screen renders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewModel {
    pub account: Address,
    pub network_id: NetworkId,
    /// Flights in contract index order
    pub flights: Vec<Flight>,
    pub flights_count: u64,
    /// Held positions only, in flight order
    pub insurances: Vec<InsurancePosition>,
    /// Wallet balance; `None` until read or when the read failed
    pub balance: Option<Ether>,
    pub is_loading: bool,
    /// Set when the last refresh was aborted
    pub error: Option<ViewError>,
    /// Flights whose insurance could not be read during the last refresh
    pub position_failures: Vec<PositionFailure>,
}

impl ViewModel {
    pub fn new(account: Address, network_id: NetworkId) -> Self {
        Self {
            account,
            network_id,
            flights: Vec::new(),
            flights_count: 0,
            insurances: Vec::new(),
            balance: None,
            is_loading: false,
            error: None,
            position_failures: Vec::new(),
        }
    }
}

/// Error indicator shown by the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewError {
    pub code: String,
    pub message: String,
    pub blocking: bool,
}

impl From<&SuretyError> for ViewError {
    fn from(err: &SuretyError) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            blocking: err.is_blocking(),
        }
    }
}

/// A recovered insurance read failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionFailure {
    pub flight_name: String,
    pub reason: String,
}

impl PositionFailure {
    /// Extract the flight from an `InsurancePositionFailed`; other errors are not position failures
    pub fn from_error(err: &SuretyError) -> Option<Self> {
        match err {
            SuretyError::InsurancePositionFailed {
                flight_name,
                reason,
            } => Some(Self {
                flight_name: flight_name.clone(),
                reason: reason.clone(),
            }),
            _ => None,
        }
    }
}

/// Session details response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub account: Address,
    pub network_id: NetworkId,
    pub application_address: Address,
    pub data_address: Address,
    pub provider: ProviderProbe,
}

/// Purchase request: omit `flight_name` to only refresh the view
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    #[serde(default)]
    pub flight_name: Option<String>,
    /// Premium in ether
    #[serde(default = "default_purchase_amount")]
    pub amount: String,
}

fn default_purchase_amount() -> String {
    params::DEFAULT_PURCHASE_AMOUNT.to_string()
}

impl PurchaseRequest {
    pub fn for_flight(flight_name: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            flight_name: Some(flight_name.into()),
            amount: amount.into(),
        }
    }

    pub fn refresh_only() -> Self {
        Self {
            flight_name: None,
            amount: default_purchase_amount(),
        }
    }
}

/// Purchase flow response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseResponse {
    pub receipt: Option<TxReceipt>,
    pub view: ViewModel,
}

/// Payout response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoutResponse {
    pub receipt: TxReceipt,
}

/// Generic API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new("internal_error", message)
    }
}

impl From<&SuretyError> for ApiError {
    fn from(err: &SuretyError) -> Self {
        Self::new(err.error_code(), err.to_string())
    }
}
