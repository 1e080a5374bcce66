//! surety-api: Passenger session and HTTP API
//!
//! Owns the connected session, refreshes the view model and exposes it,
//! together with the purchase and payout actions, to the presentation layer.

pub mod actions;
pub mod aggregator;
pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

#[cfg(test)]
pub(crate) mod testing;

pub use server::*;
pub use state::{AppState, Session};
