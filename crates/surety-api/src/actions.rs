//! Passenger actions: buy insurance and request payout

use std::sync::atomic::{AtomicBool, Ordering};

use chain_client::{CallOptions, TxReceipt};
use flight_surety::constants::methods;
use serde_json::json;
use surety_core::{to_base_units, SuretyError};

use crate::dto::{PurchaseRequest, PurchaseResponse};
use crate::AppState;

/// Marks an action as running until dropped
struct InFlight<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool, action: &'static str) -> Result<Self, SuretyError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| SuretyError::ActionInProgress { action })?;
        Ok(Self { flag })
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl AppState {
    /// Run the purchase flow.
    ///
    /// With a flight selected, submits `buyInsurance` for the requested
    /// premium first. The flow always ends with a refresh so the view shows
    /// the state after the purchase.
    pub async fn initiate_purchase_flow(
        &self,
        request: PurchaseRequest,
    ) -> Result<PurchaseResponse, SuretyError> {
        let receipt = match &request.flight_name {
            Some(flight_name) => Some(self.submit_purchase(flight_name, &request.amount).await?),
            None => None,
        };

        let view = match self.refresh().await {
            Ok(view) => view,
            // The transaction went through; report it with the last good view
            Err(e) if receipt.is_some() => {
                tracing::warn!(error = %e, "Refresh after purchase failed");
                self.view().await
            }
            Err(e) => return Err(e),
        };

        Ok(PurchaseResponse { receipt, view })
    }

    /// Submit the payout transaction. Independent of any running refresh.
    pub async fn request_payout(&self) -> Result<TxReceipt, SuretyError> {
        let _running = InFlight::acquire(&self.inner.payout_in_flight, "Payout")?;
        let session = self.session();

        tracing::info!(account = %session.account, "Requesting payout");
        session
            .contracts
            .application
            .send(
                methods::WITHDRAW_PAYOUT,
                &[],
                &CallOptions::sender(session.account.clone()),
            )
            .await
            .map_err(|e| SuretyError::TransactionFailed {
                action: "Payout",
                reason: e.to_string(),
            })
    }

    async fn submit_purchase(
        &self,
        flight_name: &str,
        amount: &str,
    ) -> Result<TxReceipt, SuretyError> {
        let _running = InFlight::acquire(&self.inner.purchase_in_flight, "Purchase")?;

        let value = to_base_units(amount)?;
        if value.is_zero() {
            return Err(SuretyError::InvalidAmount {
                message: "premium must be greater than zero".to_string(),
            });
        }

        let known = self
            .inner
            .published
            .read()
            .await
            .view
            .flights
            .iter()
            .any(|f| f.name == flight_name);
        if !known {
            return Err(SuretyError::FlightNotFound {
                flight_name: flight_name.to_string(),
            });
        }

        let session = self.session();
        tracing::info!(flight = flight_name, amount, "Buying insurance");
        session
            .contracts
            .application
            .send(
                methods::BUY_INSURANCE,
                &[json!(flight_name)],
                &CallOptions::sender(session.account.clone()).with_value(value),
            )
            .await
            .map_err(|e| SuretyError::TransactionFailed {
                action: "Purchase",
                reason: e.to_string(),
            })
    }
}
