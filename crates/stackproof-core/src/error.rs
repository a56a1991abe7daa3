//! # Validation Errors
//!
//! Format errors for the domain newtypes, built with `thiserror`. Each
//! variant carries the rejected input and states the expected format, so a
//! failure is diagnosable from the message alone.

use thiserror::Error;

/// Validation failure for a domain primitive.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Address is not `0x` followed by 40 hex digits.
    #[error("invalid Ethereum address: \"{0}\" (expected 0x followed by 40 hex characters)")]
    InvalidAddress(String),

    /// Chain id is not a `0x`-prefixed hex quantity that fits in 64 bits.
    #[error("invalid chain id quantity: \"{0}\" (expected 0x-prefixed hex)")]
    InvalidChainId(String),

    /// Timestamp is not RFC 3339 UTC with `Z` suffix.
    #[error("invalid issuedAt timestamp: \"{value}\" ({reason})")]
    InvalidTimestamp {
        /// The string that failed to parse.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Nonce is not exactly 32 lowercase hex characters.
    #[error("invalid nonce: \"{0}\" (expected 32 lowercase hex characters)")]
    InvalidNonce(String),
}
