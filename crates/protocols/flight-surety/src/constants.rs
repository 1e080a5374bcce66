//! Flight Surety Constants
//!
//! Artifact names and contract method names used by the passenger client.

/// Build artifact files and contract names
pub mod artifacts {
    pub const APPLICATION_FILE: &str = "FlightSuretyApp.json";
    pub const DATA_FILE: &str = "FlightSuretyData.json";

    pub const APPLICATION_NAME: &str = "FlightSuretyApp";
    pub const DATA_NAME: &str = "FlightSuretyData";
}

/// Application contract methods
pub mod methods {
    /// `getFlightsCount() -> uint`
    pub const GET_FLIGHTS_COUNT: &str = "getFlightsCount";

    /// `getFlight(uint index) -> Flight`
    pub const GET_FLIGHT: &str = "getFlight";

    /// `getInsurance(string flight) -> {amount, payoutAmount, state}`
    pub const GET_INSURANCE: &str = "getInsurance";

    /// `buyInsurance(string flight)`, payable
    pub const BUY_INSURANCE: &str = "buyInsurance";

    /// `withdrawPayout()`
    pub const WITHDRAW_PAYOUT: &str = "withdrawPayout";
}

/// Client-side parameters
pub mod params {
    /// Pre-filled purchase amount, in ether
    pub const DEFAULT_PURCHASE_AMOUNT: &str = "1";
}
