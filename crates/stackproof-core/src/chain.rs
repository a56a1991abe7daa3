//! # Chain Identifier
//!
//! [`ChainId`] wraps an EVM chain id (EIP-155). Providers report it over
//! JSON-RPC as a `0x`-prefixed hex quantity; the credential payload and
//! message render it in decimal.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// An EVM chain identifier.
///
/// Serializes as a plain JSON number, matching the `chainId` field of the
/// credential payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ChainId(u64);

impl ChainId {
    /// Ethereum mainnet.
    pub const MAINNET: ChainId = ChainId(1);

    /// Create a chain id from its decimal value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Parse a JSON-RPC hex quantity such as `"0x1"` or `"0xaa36a7"`.
    ///
    /// Hex digits may be either case; the `0x` prefix is required.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidChainId`] if the string is not a
    /// `0x`-prefixed hex number that fits in 64 bits.
    pub fn from_hex_quantity(s: &str) -> Result<Self, ValidationError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| ValidationError::InvalidChainId(s.to_string()))?;
        let id = u64::from_str_radix(digits, 16)
            .map_err(|_| ValidationError::InvalidChainId(s.to_string()))?;
        Ok(Self(id))
    }

    /// Render as a JSON-RPC hex quantity (`0x` + lowercase hex, no padding).
    pub fn to_hex_quantity(&self) -> String {
        format!("{:#x}", self.0)
    }

    /// The decimal value.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for ChainId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- hex quantity parsing --

    #[test]
    fn parses_mainnet() {
        assert_eq!(ChainId::from_hex_quantity("0x1").unwrap(), ChainId::MAINNET);
    }

    #[test]
    fn parses_sepolia() {
        let id = ChainId::from_hex_quantity("0xaa36a7").unwrap();
        assert_eq!(id.as_u64(), 11_155_111);
    }

    #[test]
    fn parses_uppercase_digits() {
        let id = ChainId::from_hex_quantity("0xAA36A7").unwrap();
        assert_eq!(id.as_u64(), 11_155_111);
    }

    #[test]
    fn rejects_invalid_quantities() {
        assert!(ChainId::from_hex_quantity("").is_err());
        assert!(ChainId::from_hex_quantity("1").is_err()); // missing prefix
        assert!(ChainId::from_hex_quantity("0x").is_err()); // no digits
        assert!(ChainId::from_hex_quantity("0xzz").is_err());
        assert!(ChainId::from_hex_quantity("0x10000000000000000").is_err()); // > u64
    }

    // -- rendering --

    #[test]
    fn hex_quantity_roundtrip() {
        let id = ChainId::new(11_155_111);
        assert_eq!(id.to_hex_quantity(), "0xaa36a7");
        assert_eq!(ChainId::from_hex_quantity(&id.to_hex_quantity()).unwrap(), id);
    }

    #[test]
    fn display_is_decimal() {
        assert_eq!(format!("{}", ChainId::new(31337)), "31337");
    }

    // -- serde --

    #[test]
    fn serializes_as_number() {
        let json = serde_json::to_string(&ChainId::new(1)).unwrap();
        assert_eq!(json, "1");
        let back: ChainId = serde_json::from_str("11155111").unwrap();
        assert_eq!(back.as_u64(), 11_155_111);
    }
}
