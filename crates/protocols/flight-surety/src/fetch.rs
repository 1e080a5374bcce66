//! Flight Catalog and Insurance Fetching
//!
//! Reads the flight list and the caller's insurance positions from the
//! application contract.

use chain_client::ContractHandle;
use serde_json::json;
use surety_core::{Address, SuretyError};

use crate::constants::methods;
use crate::state::{
    integer_string, Flight, FlightCatalog, InsurancePosition, InsuranceRecord, PositionReport,
};

/// Read the full flight catalog as `caller`.
///
/// Flights are read one after another in index order. Any failed read
/// fails the whole catalog.
pub async fn fetch_flight_catalog(
    application: &ContractHandle,
    caller: &Address,
) -> Result<FlightCatalog, SuretyError> {
    let endpoint_err = |reason: String| SuretyError::EndpointUnavailable {
        reason: format!("{}: {}", methods::GET_FLIGHTS_COUNT, reason),
    };

    let raw_count = application
        .call(methods::GET_FLIGHTS_COUNT, &[], caller)
        .await
        .map_err(|e| endpoint_err(e.to_string()))?;
    let flights_count = integer_string(&raw_count)
        .and_then(|s| s.parse::<u64>().ok())
        .ok_or_else(|| endpoint_err(format!("unexpected count {}", raw_count)))?;

    tracing::debug!(flights_count, "Fetching flight catalog");

    let mut flights = Vec::new();
    for index in 0..flights_count {
        let record = application
            .call(methods::GET_FLIGHT, &[json!(index)], caller)
            .await
            .map_err(|e| SuretyError::FlightReadFailed {
                index,
                reason: e.to_string(),
            })?;
        let flight = Flight::from_record(record)
            .map_err(|reason| SuretyError::FlightReadFailed { index, reason })?;
        tracing::debug!(index, flight = %flight.name, "Fetched flight");
        flights.push(flight);
    }

    Ok(FlightCatalog {
        flights,
        flights_count,
    })
}

/// Read the caller's insurance on `flight`; `None` when no premium was paid
pub async fn fetch_position(
    application: &ContractHandle,
    flight: &Flight,
    caller: &Address,
) -> Result<Option<InsurancePosition>, SuretyError> {
    let failed = |reason: String| SuretyError::InsurancePositionFailed {
        flight_name: flight.name.clone(),
        reason,
    };

    let raw = application
        .call(methods::GET_INSURANCE, &[json!(flight.name)], caller)
        .await
        .map_err(|e| failed(e.to_string()))?;
    let record = InsuranceRecord::from_value(&raw).map_err(failed)?;

    record
        .into_position(flight)
        .map_err(|e| failed(e.to_string()))
}

/// Read positions for every flight concurrently.
///
/// Waits for all reads. A failed read is recorded in the report and does not
/// affect the other flights. Positions keep catalog order.
pub async fn fetch_positions(
    application: &ContractHandle,
    flights: &[Flight],
    caller: &Address,
) -> PositionReport {
    let reads = flights
        .iter()
        .map(|flight| fetch_position(application, flight, caller));
    let results = futures::future::join_all(reads).await;

    let mut report = PositionReport::default();
    for result in results {
        match result {
            Ok(Some(position)) => report.positions.push(position),
            Ok(None) => {}
            Err(e) => {
                tracing::warn!(error = %e, "Insurance position unavailable");
                report.failures.push(e);
            }
        }
    }

    tracing::debug!(
        positions = report.positions.len(),
        failures = report.failures.len(),
        "Fetched insurance positions"
    );
    report
}
