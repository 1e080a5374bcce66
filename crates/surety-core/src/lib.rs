//! surety-core: Shared types, errors, and configuration
//!
//! This crate provides the foundational types used across the Flight Surety
//! workspace, including the wei/ether unit conversions.

pub mod config;
pub mod errors;
pub mod types;
pub mod units;

pub use config::*;
pub use errors::*;
pub use types::*;
pub use units::{parse_wei, to_base_units, to_display};
