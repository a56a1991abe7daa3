//! # Ethereum Address Newtype
//!
//! [`EthAddress`] wraps a `0x`-prefixed, 40-hex-digit account address and
//! validates the format at construction time.
//!
//! ## Casing
//!
//! Wallets report addresses in mixed case (EIP-55 checksums), and the
//! credential message embeds the address exactly as the payload carries it.
//! `EthAddress` therefore preserves the casing it was constructed with.
//! Derived equality (`==`) is byte equality on the stored string; use
//! [`EthAddress::matches`] to compare two addresses as accounts, ignoring
//! case. Addresses rendered by this implementation are lowercased first via
//! [`EthAddress::to_lowercase`].

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Length of a `0x`-prefixed address string: 2 prefix + 40 hex characters.
pub const ADDRESS_STR_LEN: usize = 42;

/// An Ethereum account address, casing preserved.
///
/// # Validation
///
/// - Must start with `0x` (lowercase prefix)
/// - Must be exactly 42 characters
/// - The 40 characters after the prefix must be hex digits, either case
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct EthAddress(String);

impl EthAddress {
    /// Create an address from a string, validating format.
    ///
    /// The input casing is preserved: signed messages embed the address
    /// verbatim, so normalizing here would corrupt message recomputation
    /// for checksummed inputs.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidAddress`] if the string is not
    /// `0x` followed by exactly 40 hex digits.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        if !is_valid_address(&s) {
            return Err(ValidationError::InvalidAddress(s));
        }
        Ok(Self(s))
    }

    /// Access the address string as constructed.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Return the address with all hex digits lowercased.
    ///
    /// This is the canonical rendering used when this implementation
    /// issues a payload.
    pub fn to_lowercase(&self) -> EthAddress {
        Self(self.0.to_lowercase())
    }

    /// Compare two addresses as accounts, ignoring letter-casing.
    pub fn matches(&self, other: &EthAddress) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Abbreviated form for display: first six and last four characters,
    /// e.g. `0x1234…abcd`.
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[ADDRESS_STR_LEN - 4..])
    }
}

impl std::fmt::Display for EthAddress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for EthAddress {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

// Deserializes as a plain string, then routes through `new()` so that
// malformed addresses are rejected at deserialization time.
impl<'de> Deserialize<'de> for EthAddress {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

fn is_valid_address(s: &str) -> bool {
    s.len() == ADDRESS_STR_LEN
        && s.starts_with("0x")
        && s[2..].chars().all(|c| c.is_ascii_hexdigit())
}

#[cfg(test)]
mod tests {
    use super::*;

    const LOWER: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";
    const CHECKSUMMED: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

    // -- construction --

    #[test]
    fn accepts_lowercase() {
        let addr = EthAddress::new(LOWER).unwrap();
        assert_eq!(addr.as_str(), LOWER);
    }

    #[test]
    fn accepts_checksummed_and_preserves_casing() {
        let addr = EthAddress::new(CHECKSUMMED).unwrap();
        assert_eq!(addr.as_str(), CHECKSUMMED);
    }

    #[test]
    fn rejects_invalid() {
        assert!(EthAddress::new("").is_err());
        assert!(EthAddress::new("0x").is_err());
        assert!(EthAddress::new("f39fd6e51aad88f6f4ce6ab8827279cfffb92266").is_err()); // no prefix
        assert!(EthAddress::new("0xf39fd6e51aad88f6f4ce6ab8827279cfffb9226").is_err()); // 39 digits
        assert!(EthAddress::new("0xf39fd6e51aad88f6f4ce6ab8827279cfffb922666").is_err()); // 41 digits
        assert!(EthAddress::new("0xg39fd6e51aad88f6f4ce6ab8827279cfffb92266").is_err()); // non-hex
        assert!(EthAddress::new("0Xf39fd6e51aad88f6f4ce6ab8827279cfffb92266").is_err()); // 0X prefix
    }

    #[test]
    fn error_carries_input() {
        let err = EthAddress::new("nope").unwrap_err();
        assert!(format!("{err}").contains("nope"));
    }

    // -- comparison --

    #[test]
    fn matches_ignores_case() {
        let a = EthAddress::new(LOWER).unwrap();
        let b = EthAddress::new(CHECKSUMMED).unwrap();
        assert!(a.matches(&b));
        assert!(b.matches(&a));
        // Derived equality is byte equality.
        assert_ne!(a, b);
    }

    #[test]
    fn matches_rejects_different_account() {
        let a = EthAddress::new(LOWER).unwrap();
        let b = EthAddress::new("0x70997970c51812dc3a010c7d01b50e0d17dc79c8").unwrap();
        assert!(!a.matches(&b));
    }

    #[test]
    fn to_lowercase_normalizes() {
        let addr = EthAddress::new(CHECKSUMMED).unwrap();
        assert_eq!(addr.to_lowercase().as_str(), LOWER);
    }

    // -- display --

    #[test]
    fn display_is_full_address() {
        let addr = EthAddress::new(CHECKSUMMED).unwrap();
        assert_eq!(format!("{addr}"), CHECKSUMMED);
    }

    #[test]
    fn short_form() {
        let addr = EthAddress::new(LOWER).unwrap();
        assert_eq!(addr.short(), "0xf39f…2266");
    }

    // -- parsing & serde --

    #[test]
    fn from_str_roundtrip() {
        let addr: EthAddress = LOWER.parse().unwrap();
        assert_eq!(addr.as_str(), LOWER);
        assert!("garbage".parse::<EthAddress>().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let addr = EthAddress::new(CHECKSUMMED).unwrap();
        let json = serde_json::to_string(&addr).unwrap();
        assert_eq!(json, format!("\"{CHECKSUMMED}\""));
        let back: EthAddress = serde_json::from_str(&json).unwrap();
        assert_eq!(addr, back);
    }

    #[test]
    fn deserialize_rejects_malformed() {
        let result: Result<EthAddress, _> = serde_json::from_str("\"0x123\"");
        assert!(result.is_err());
    }
}
