//! Wei / ether conversion
//!
//! Pure functions, no I/O. Amounts stay in 256-bit integer wei end to end so
//! the decimal rendering is exact for every value the contract can store.

use crate::constants::{ETHER_DECIMALS, WEI_PER_ETHER};
use crate::{Ether, SuretyError, Wei};

/// Parse a base-unit integer string as returned by the contract
pub fn parse_wei(raw: &str) -> Result<Wei, SuretyError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(SuretyError::InvalidAmount {
            message: format!("'{}' is not a base-unit integer", raw),
        });
    }
    Wei::from_dec_str(raw).map_err(|e| SuretyError::InvalidAmount {
        message: format!("'{}': {:?}", raw, e),
    })
}

/// Convert a raw wei string into a display amount
pub fn to_display(raw: &str) -> Result<Ether, SuretyError> {
    parse_wei(raw).map(Ether::from_wei)
}

/// Convert a human ether string ("1", "0.25") into wei
pub fn to_base_units(display: &str) -> Result<Wei, SuretyError> {
    let invalid = |message: String| SuretyError::InvalidAmount { message };

    let trimmed = display.trim();
    let (whole, frac) = match trimmed.split_once('.') {
        Some((w, f)) => (w, f),
        None => (trimmed, ""),
    };

    if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("'{}' is not a decimal amount", display)));
    }
    if trimmed.contains('.') && frac.is_empty() {
        return Err(invalid(format!("'{}' has an empty fraction", display)));
    }
    if !frac.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(format!("'{}' is not a decimal amount", display)));
    }
    if frac.len() > ETHER_DECIMALS {
        return Err(invalid(format!(
            "'{}' has more than {} decimal places",
            display, ETHER_DECIMALS
        )));
    }

    let whole_wei = Wei::from_dec_str(whole)
        .ok()
        .and_then(|w| w.checked_mul(WEI_PER_ETHER))
        .ok_or_else(|| invalid(format!("'{}' is out of range", display)))?;

    let frac_wei = if frac.is_empty() {
        Wei::zero()
    } else {
        let padded = format!("{:0<width$}", frac, width = ETHER_DECIMALS);
        Wei::from_dec_str(&padded).map_err(|e| invalid(format!("'{}': {:?}", display, e)))?
    };

    whole_wei
        .checked_add(frac_wei)
        .ok_or_else(|| invalid(format!("'{}' is out of range", display)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_display_exact() {
        assert_eq!(to_display("2000000000000000000").unwrap().to_string(), "2");
        assert_eq!(to_display("0").unwrap(), Ether::ZERO);
        assert_eq!(
            to_display("123456789012345678901").unwrap().to_string(),
            "123.456789012345678901"
        );
    }

    #[test]
    fn test_to_display_rejects_malformed() {
        for raw in ["", "abc", "-1", "+5", "1.5", "0x10", " 1"] {
            let err = to_display(raw).unwrap_err();
            assert_eq!(err.error_code(), "invalid_amount", "input {:?}", raw);
        }
    }

    #[test]
    fn test_to_display_beyond_u128() {
        // 2^128 wei
        let raw = "340282366920938463463374607431768211456";
        assert_eq!(
            to_display(raw).unwrap().to_string(),
            "340282366920938463463.374607431768211456"
        );

        // uint256 max
        let max = Wei::MAX.to_string();
        let shown = to_display(&max).unwrap().to_string();
        assert_eq!(shown.replace('.', ""), max);
        assert_eq!(to_base_units(&shown).unwrap(), Wei::MAX);
    }

    #[test]
    fn test_to_display_rejects_overflow() {
        // Wider than uint256
        let too_big = "9".repeat(80);
        assert!(to_display(&too_big).is_err());
    }

    #[test]
    fn test_to_base_units() {
        assert_eq!(to_base_units("1").unwrap(), WEI_PER_ETHER);
        assert_eq!(
            to_base_units("0.5").unwrap(),
            Wei::from(500_000_000_000_000_000u64)
        );
        assert_eq!(
            to_base_units(" 2.25 ").unwrap(),
            Wei::from(2_250_000_000_000_000_000u64)
        );
        assert_eq!(to_base_units("0.000000000000000001").unwrap(), Wei::one());
    }

    #[test]
    fn test_to_base_units_rejects_malformed() {
        for input in ["", ".5", "1.", "1.2.3", "-1", "1e18", "0.0000000000000000001"] {
            assert!(to_base_units(input).is_err(), "input {:?}", input);
        }
    }

    #[test]
    fn test_display_inverts_base_units() {
        let wei = to_base_units("3.14159").unwrap();
        assert_eq!(Ether::from_wei(wei).to_string(), "3.14159");
    }
}
