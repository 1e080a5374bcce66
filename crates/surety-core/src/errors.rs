//! Error types for the Flight Surety client

use thiserror::Error;

use crate::NetworkId;

/// Core errors that can occur in the client
#[derive(Debug, Error)]
pub enum Error {
    #[error("Chain error: {0}")]
    Chain(#[from] ChainError),

    #[error("Surety error: {0}")]
    Surety(#[from] SuretyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Provider transport and contract call errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    #[error("No compatible chain provider: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("Call to {method} failed: {message}")]
    CallFailed { method: String, message: String },

    #[error("Call to {method} timed out after {secs}s")]
    Timeout { method: String, secs: u64 },

    #[error("Failed to decode {method} result: {message}")]
    Decode { method: String, message: String },

    #[error("Method {method} not found in {contract} ABI")]
    UnknownMethod { contract: String, method: String },

    #[error("Transaction {method} rejected: {message}")]
    TransactionRejected { method: String, message: String },
}

/// Errors surfaced by the passenger client to its presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SuretyError {
    #[error("Non-Ethereum client detected: {reason}")]
    ProviderUnavailable { reason: String },

    #[error("Contracts not deployed to network {network_id} (missing: {missing})")]
    NotDeployed {
        network_id: NetworkId,
        missing: String,
    },

    #[error("Contract endpoint unavailable: {reason}")]
    EndpointUnavailable { reason: String },

    #[error("Failed to read flight #{index}: {reason}")]
    FlightReadFailed { index: u64, reason: String },

    #[error("Failed to read insurance for flight {flight_name}: {reason}")]
    InsurancePositionFailed { flight_name: String, reason: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Flight not found: {flight_name}")]
    FlightNotFound { flight_name: String },

    #[error("{action} already in progress")]
    ActionInProgress { action: &'static str },

    #[error("{action} transaction failed: {reason}")]
    TransactionFailed { action: &'static str, reason: String },
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

impl SuretyError {
    /// Get an HTTP-friendly error code
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable { .. } => "provider_unavailable",
            Self::NotDeployed { .. } => "not_deployed",
            Self::EndpointUnavailable { .. } => "endpoint_unavailable",
            Self::FlightReadFailed { .. } => "flight_read_failed",
            Self::InsurancePositionFailed { .. } => "insurance_position_failed",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::FlightNotFound { .. } => "flight_not_found",
            Self::ActionInProgress { .. } => "action_in_progress",
            Self::TransactionFailed { .. } => "transaction_failed",
        }
    }

    /// Get HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Self::InvalidAmount { .. } => 400,
            Self::FlightNotFound { .. } => 404,
            Self::ActionInProgress { .. } => 409,
            Self::NotDeployed { .. } => 422,
            Self::FlightReadFailed { .. }
            | Self::InsurancePositionFailed { .. }
            | Self::TransactionFailed { .. } => 502,
            Self::ProviderUnavailable { .. } | Self::EndpointUnavailable { .. } => 503,
        }
    }

    /// Errors that leave the session unusable and must block dependent UI
    pub fn is_blocking(&self) -> bool {
        matches!(
            self,
            Self::ProviderUnavailable { .. } | Self::NotDeployed { .. }
        )
    }
}

impl From<ChainError> for SuretyError {
    fn from(err: ChainError) -> Self {
        match err {
            ChainError::ProviderUnavailable { reason } => Self::ProviderUnavailable { reason },
            other => Self::EndpointUnavailable {
                reason: other.to_string(),
            },
        }
    }
}
