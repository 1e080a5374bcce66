//! Flight Surety Protocol Implementation
//!
//! Passenger-side access to the FlightSurety contracts: resolving the
//! application/data contract pair for the connected network, reading the
//! flight catalog and the caller's insurance position on each flight.

pub mod constants;
pub mod deployment;
pub mod fetch;
pub mod state;

// Re-exports
pub use deployment::{load_manifest, resolve_contracts, ContractPair};
pub use fetch::{fetch_flight_catalog, fetch_position, fetch_positions};
pub use state::{Flight, FlightCatalog, InsurancePosition, InsuranceRecord, PositionReport};
