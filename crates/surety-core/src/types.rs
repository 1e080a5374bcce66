//! Core type definitions for the Flight Surety client

use primitive_types::U256;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

use crate::units;

/// Account or contract address (20 bytes, 0x-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Address(pub String);

impl Address {
    pub fn new(addr: impl Into<String>) -> Self {
        Self(addr.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check the 0x prefix and 20-byte hex body. Checksum casing is not verified.
    pub fn is_valid(&self) -> bool {
        match self.0.strip_prefix("0x") {
            Some(body) => hex::decode(body).map(|b| b.len() == 20).unwrap_or(false),
            None => false,
        }
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Transaction hash (32 bytes, 0x-prefixed hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxHash(pub String);

impl TxHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of the network the provider is connected to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NetworkId(pub u64);

impl NetworkId {
    /// Key used by build artifacts (`networks: { "5777": {...} }`)
    pub fn artifact_key(&self) -> String {
        self.0.to_string()
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Wei amount (1 ether = 10^18 wei), as wide as the contract's uint256
pub type Wei = U256;

/// Exact ether amount, stored in wei.
///
/// Displays and serializes as the shortest exact decimal string
/// ("2", "0.5", "0.000000000000000001").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ether {
    wei: Wei,
}

impl Ether {
    pub const ZERO: Ether = Ether { wei: U256::zero() };

    pub fn from_wei(wei: Wei) -> Self {
        Self { wei }
    }

    pub fn wei(&self) -> Wei {
        self.wei
    }

    pub fn is_zero(&self) -> bool {
        self.wei.is_zero()
    }
}

impl fmt::Display for Ether {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, frac) = self.wei.div_mod(constants::WEI_PER_ETHER);
        if frac.is_zero() {
            return write!(f, "{}", whole);
        }
        let digits = format!(
            "{:0>width$}",
            frac.to_string(),
            width = constants::ETHER_DECIMALS
        );
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl Serialize for Ether {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Ether {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        units::to_base_units(&s)
            .map(Ether::from_wei)
            .map_err(serde::de::Error::custom)
    }
}

/// Constants
pub mod constants {
    use super::{Wei, U256};

    /// Decimal places of the base unit
    pub const ETHER_DECIMALS: usize = 18;

    /// 1 ether in wei
    pub const WEI_PER_ETHER: Wei = U256([1_000_000_000_000_000_000, 0, 0, 0]);

    /// Raw amount the contract reports when no insurance is held
    pub const ZERO_AMOUNT: &str = "0";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address_validation() {
        let valid = Address::new("0x627306090abaB3A6e1400e9345bC60c78a8BEf57");
        assert!(valid.is_valid());

        assert!(!Address::new("627306090abaB3A6e1400e9345bC60c78a8BEf57").is_valid());
        assert!(!Address::new("0x1234").is_valid());
        assert!(!Address::new("0xZZ7306090abaB3A6e1400e9345bC60c78a8BEf57").is_valid());
    }

    #[test]
    fn test_ether_display() {
        let wei = |n: u64| Ether::from_wei(Wei::from(n));
        assert_eq!(wei(2_000_000_000_000_000_000).to_string(), "2");
        assert_eq!(wei(500_000_000_000_000_000).to_string(), "0.5");
        assert_eq!(wei(1).to_string(), "0.000000000000000001");
        assert_eq!(Ether::ZERO.to_string(), "0");
        assert_eq!(wei(1_250_000_000_000_000_000).to_string(), "1.25");
        assert!(Ether::ZERO.is_zero());
    }

    #[test]
    fn test_ether_serializes_as_string() {
        let amount = Ether::from_wei(Wei::from(1_500_000_000_000_000_000u64));
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1.5\"");

        let parsed: Ether = serde_json::from_str("\"0.25\"").unwrap();
        assert_eq!(parsed.wei(), Wei::from(250_000_000_000_000_000u64));
    }

    #[test]
    fn test_network_artifact_key() {
        assert_eq!(NetworkId(5777).artifact_key(), "5777");
        assert_eq!(NetworkId(1).to_string(), "1");
    }
}
