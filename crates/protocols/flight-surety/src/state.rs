//! Flight Surety State Types
//!
//! Flight records, insurance records and the positions derived from them.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use surety_core::{to_display, Ether, SuretyError};

/// A flight as returned by `getFlight(index)`.
///
/// Only `name` is interpreted; every other field is passed through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flight {
    pub name: String,

    #[serde(flatten)]
    pub details: Map<String, Value>,
}

impl Flight {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            details: Map::new(),
        }
    }

    /// Parse a flight record, requiring a non-empty `name`
    pub fn from_record(record: Value) -> Result<Self, String> {
        let mut fields = match record {
            Value::Object(fields) => fields,
            other => return Err(format!("expected a flight record, got {}", other)),
        };

        let name = match fields.remove("name") {
            Some(Value::String(name)) if !name.is_empty() => name,
            Some(other) => return Err(format!("flight name is not a string: {}", other)),
            None => return Err("flight record has no name".to_string()),
        };

        Ok(Self {
            name,
            details: fields,
        })
    }
}

/// Result of a full catalog read
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightCatalog {
    /// Flights in contract index order
    pub flights: Vec<Flight>,
    pub flights_count: u64,
}

/// Raw insurance record as returned by `getInsurance(flightName)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsuranceRecord {
    /// Premium paid, base-unit integer string
    pub amount: String,
    /// Payout credited, base-unit integer string
    pub payout_amount: String,
    /// Contract-defined status code
    pub state: String,
}

impl InsuranceRecord {
    pub fn from_value(value: &Value) -> Result<Self, String> {
        let field = |key: &str| {
            value
                .get(key)
                .and_then(integer_string)
                .ok_or_else(|| format!("insurance record field '{}' missing or not an integer", key))
        };

        Ok(Self {
            amount: field("amount")?,
            payout_amount: field("payoutAmount")?,
            state: field("state")?,
        })
    }

    /// Convert into a position on `flight`; `None` when nothing was paid
    pub fn into_position(self, flight: &Flight) -> Result<Option<InsurancePosition>, SuretyError> {
        let amount_paid = to_display(&self.amount)?;
        if amount_paid.is_zero() {
            return Ok(None);
        }

        Ok(Some(InsurancePosition {
            amount_paid,
            payout_amount: to_display(&self.payout_amount)?,
            state: self.state,
            flight: flight.clone(),
        }))
    }
}

/// The caller's insurance on one flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsurancePosition {
    pub amount_paid: Ether,
    pub payout_amount: Ether,
    pub state: String,
    pub flight: Flight,
}

/// Outcome of a batch position read
#[derive(Debug, Clone, Default)]
pub struct PositionReport {
    /// Held positions, in catalog order
    pub positions: Vec<InsurancePosition>,
    /// `InsurancePositionFailed` for each flight whose read failed
    pub failures: Vec<SuretyError>,
}

/// Contract integers arrive as decimal strings or, from some providers, JSON numbers
pub(crate) fn integer_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => n.as_u64().map(|n| n.to_string()),
        _ => None,
    }
}
