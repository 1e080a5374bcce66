//! View model refresh
//!
//! A refresh reads the flight catalog, then every flight's insurance position
//! and the wallet balance, and publishes the result as one view. Cycles never
//! overlap: a request arriving while one runs waits for it and shares its
//! outcome.

use flight_surety::{fetch_flight_catalog, fetch_positions, FlightCatalog, PositionReport};
use surety_core::{Ether, SuretyError};

use crate::dto::{PositionFailure, ViewError, ViewModel};
use crate::AppState;

/// Data gathered by one successful cycle
struct RefreshCycle {
    catalog: FlightCatalog,
    positions: PositionReport,
    balance: Option<Ether>,
}

impl AppState {
    /// Refresh the view model.
    ///
    /// The cycle runs on its own task, so dropping the returned future does
    /// not abandon it with loading still set. On failure the previous flights
    /// and insurances stay published, loading is cleared and the view carries
    /// an error indicator.
    pub async fn refresh(&self) -> Result<ViewModel, SuretyError> {
        let state = self.clone();
        match tokio::spawn(async move { state.refresh_coalesced().await }).await {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(SuretyError::EndpointUnavailable {
                reason: format!("refresh task stopped: {}", e),
            }),
        }
    }

    async fn refresh_coalesced(&self) -> Result<ViewModel, SuretyError> {
        let joined_at = self.inner.published.read().await.cycles;

        let _cycle = match self.inner.refresh_lock.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                tracing::debug!("Refresh already running, joining it");
                let guard = self.inner.refresh_lock.lock().await;
                let published = self.inner.published.read().await;
                // A cycle finished since this request arrived; share its outcome
                if published.cycles > joined_at {
                    return match &published.error {
                        Some(e) => Err(e.clone()),
                        None => Ok(published.view.clone()),
                    };
                }
                drop(published);
                guard
            }
        };

        self.inner.published.write().await.view.is_loading = true;

        let outcome = self.run_cycle().await;

        let mut published = self.inner.published.write().await;
        published.view.is_loading = false;
        published.cycles += 1;
        match outcome {
            Ok(cycle) => {
                let view = &mut published.view;
                view.flights = cycle.catalog.flights;
                view.flights_count = cycle.catalog.flights_count;
                view.insurances = cycle.positions.positions;
                view.position_failures = cycle
                    .positions
                    .failures
                    .iter()
                    .filter_map(PositionFailure::from_error)
                    .collect();
                view.balance = cycle.balance;
                view.error = None;
                published.error = None;

                tracing::info!(
                    flights = published.view.flights_count,
                    insurances = published.view.insurances.len(),
                    "View refreshed"
                );
                Ok(published.view.clone())
            }
            Err(e) => {
                tracing::error!(error = %e, "Refresh aborted, keeping last view");
                published.view.error = Some(ViewError::from(&e));
                published.error = Some(e.clone());
                Err(e)
            }
        }
    }

    async fn run_cycle(&self) -> Result<RefreshCycle, SuretyError> {
        let session = self.session();
        let application = &session.contracts.application;

        let catalog = fetch_flight_catalog(application, &session.account).await?;

        let (positions, balance) = tokio::join!(
            fetch_positions(application, &catalog.flights, &session.account),
            self.client().balance(&session.account),
        );

        let balance = match balance {
            Ok(wei) => Some(Ether::from_wei(wei)),
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read balance");
                None
            }
        };

        Ok(RefreshCycle {
            catalog,
            positions,
            balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::testing;
    use flight_surety::constants::methods;
    use serde_json::json;
    use std::time::Duration;
    use surety_core::SuretyError;

    #[tokio::test]
    async fn test_empty_network() {
        let provider = testing::provider();
        testing::script_flights(&provider, &[]);
        let state = testing::connect(provider).await;

        let view = state.refresh().await.unwrap();
        assert!(view.flights.is_empty());
        assert_eq!(view.flights_count, 0);
        assert!(view.insurances.is_empty());
        assert!(!view.is_loading);
        assert!(view.error.is_none());
    }

    #[tokio::test]
    async fn test_single_position_among_three_flights() {
        let provider = testing::provider();
        testing::script_flights(&provider, &["ND1309", "AA100", "BA117"]);
        testing::script_insurance(&provider, "ND1309", "0");
        testing::script_insurance(&provider, "AA100", "2000000000000000000");
        testing::script_insurance(&provider, "BA117", "0");
        let state = testing::connect(provider).await;

        let view = state.refresh().await.unwrap();
        assert_eq!(view.flights.len(), 3);
        assert_eq!(view.flights_count, 3);
        assert_eq!(view.insurances.len(), 1);
        assert_eq!(view.insurances[0].amount_paid.to_string(), "2");
        assert_eq!(view.insurances[0].flight.name, view.flights[1].name);
        assert_eq!(view.balance.map(|b| b.to_string()).as_deref(), Some("5"));
    }

    #[tokio::test]
    async fn test_failed_position_read_is_recorded_not_blocking() {
        let provider = testing::provider();
        testing::script_flights(&provider, &["ND1309", "AA100", "BA117"]);
        testing::script_insurance(&provider, "ND1309", "1000000000000000000");
        testing::script_insurance(&provider, "AA100", "0");
        provider.set_failure(
            &testing::app_address(),
            methods::GET_INSURANCE,
            &[json!("BA117")],
            "network error",
        );
        let state = testing::connect(provider).await;

        let view = state.refresh().await.unwrap();
        assert!(view.error.is_none());
        assert_eq!(view.flights.len(), 3);
        let insured: Vec<&str> = view.insurances.iter().map(|p| p.flight.name.as_str()).collect();
        assert_eq!(insured, vec!["ND1309"]);
        assert_eq!(view.position_failures.len(), 1);
        assert_eq!(view.position_failures[0].flight_name, view.flights[2].name);
    }

    #[tokio::test]
    async fn test_refresh_is_idempotent() {
        let provider = testing::provider();
        testing::script_flights(&provider, &["ND1309", "AA100"]);
        testing::script_insurance(&provider, "ND1309", "1000000000000000000");
        testing::script_insurance(&provider, "AA100", "0");
        let state = testing::connect(provider).await;

        let first = state.refresh().await.unwrap();
        let second = state.refresh().await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_catalog_failure_keeps_last_view() {
        let provider = testing::provider();
        testing::script_flights(&provider, &["ND1309", "AA100"]);
        testing::script_insurance(&provider, "ND1309", "1000000000000000000");
        testing::script_insurance(&provider, "AA100", "0");
        let state = testing::connect(provider.clone()).await;
        let good = state.refresh().await.unwrap();

        provider.set_failure(
            &testing::app_address(),
            methods::GET_FLIGHT,
            &[json!(1)],
            "reverted",
        );
        let err = state.refresh().await.unwrap_err();
        assert!(matches!(err, SuretyError::FlightReadFailed { index: 1, .. }));

        let view = state.view().await;
        assert!(!view.is_loading);
        assert_eq!(view.flights, good.flights);
        assert_eq!(view.insurances, good.insurances);
        assert_eq!(view.error.as_ref().map(|e| e.code.as_str()), Some("flight_read_failed"));

        // A later successful refresh clears the indicator
        testing::script_flights(&provider, &["ND1309", "AA100"]);
        let recovered = state.refresh().await.unwrap();
        assert!(recovered.error.is_none());
    }

    #[tokio::test]
    async fn test_count_failure_resets_loading() {
        let provider = testing::provider();
        provider.set_failure(
            &testing::app_address(),
            methods::GET_FLIGHTS_COUNT,
            &[],
            "offline",
        );
        let state = testing::connect(provider).await;

        let err = state.refresh().await.unwrap_err();
        assert_eq!(err.error_code(), "endpoint_unavailable");
        assert!(!state.is_loading().await);
    }

    #[tokio::test]
    async fn test_concurrent_refreshes_are_coalesced() {
        let provider = testing::slow_provider(Duration::from_millis(30));
        testing::script_flights(&provider, &["ND1309", "AA100"]);
        testing::script_insurance(&provider, "ND1309", "0");
        testing::script_insurance(&provider, "AA100", "0");
        let state = testing::connect(provider.clone()).await;

        let (a, b) = tokio::join!(state.refresh(), state.refresh());
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(provider.call_count(methods::GET_FLIGHTS_COUNT), 1);
    }

    #[tokio::test]
    async fn test_loading_visible_while_refreshing() {
        let provider = testing::slow_provider(Duration::from_millis(50));
        testing::script_flights(&provider, &["ND1309"]);
        testing::script_insurance(&provider, "ND1309", "0");
        let state = testing::connect(provider).await;

        let background = state.clone();
        let handle = tokio::spawn(async move { background.refresh().await });

        tokio::time::sleep(Duration::from_millis(20)).await;
        let mid = state.view().await;
        assert!(mid.is_loading);
        assert!(mid.insurances.is_empty());

        let done = handle.await.unwrap().unwrap();
        assert!(!done.is_loading);
        assert!(!state.is_loading().await);
    }

    #[tokio::test]
    async fn test_dropped_refresh_still_clears_loading() {
        let provider = testing::slow_provider(Duration::from_millis(50));
        testing::script_flights(&provider, &["ND1309"]);
        testing::script_insurance(&provider, "ND1309", "0");
        let state = testing::connect(provider).await;

        let abandoned = tokio::time::timeout(Duration::from_millis(10), state.refresh()).await;
        assert!(abandoned.is_err());
        assert!(state.is_loading().await);

        tokio::time::sleep(Duration::from_millis(400)).await;
        let view = state.view().await;
        assert!(!view.is_loading);
        assert_eq!(view.flights.len(), 1);
    }

    #[tokio::test]
    async fn test_request_after_finished_cycle_runs_again() {
        let provider = testing::provider();
        testing::script_flights(&provider, &["ND1309"]);
        testing::script_insurance(&provider, "ND1309", "0");
        let state = testing::connect(provider.clone()).await;
        state.refresh().await.unwrap();

        // An earlier waiter still holds the lock after its cycle finished
        let held = state.inner.refresh_lock.lock().await;
        testing::script_insurance(&provider, "ND1309", "1000000000000000000");
        let late = state.clone();
        let handle = tokio::spawn(async move { late.refresh().await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        drop(held);

        let view = handle.await.unwrap().unwrap();
        assert_eq!(view.insurances.len(), 1);
        assert_eq!(provider.call_count(methods::GET_FLIGHTS_COUNT), 2);
    }
}
