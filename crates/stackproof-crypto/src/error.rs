//! # Cryptographic Error Types
//!
//! Structured errors for all cryptographic operations in
//! `stackproof-crypto`. Uses `thiserror` for derive-based `Display` and
//! `Error` implementations with diagnostic context.

use thiserror::Error;

/// Errors from cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    /// Signature is not exactly 65 bytes.
    #[error("invalid signature length: expected 65 bytes, got {0}")]
    InvalidSignatureLength(usize),

    /// Recovery byte is outside the accepted encodings.
    #[error("invalid recovery byte: {0} (expected 0, 1, 27, or 28)")]
    InvalidRecoveryByte(u8),

    /// The r/s component is not a valid secp256k1 scalar pair.
    #[error("invalid signature encoding: {0}")]
    InvalidSignature(String),

    /// Hex decoding failed.
    #[error("hex decode error: {0}")]
    HexDecode(String),

    /// Signing key material is malformed.
    #[error("invalid signing key: {0}")]
    InvalidSigningKey(String),

    /// Signing key material could not be located.
    #[error("no key material: {0}")]
    MissingKeyMaterial(String),

    /// The signing operation itself failed.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// No public key could be recovered for the digest/signature pair.
    #[error("public key recovery failed: {0}")]
    RecoveryFailed(String),

    /// A derived value failed domain validation.
    #[error("validation error: {0}")]
    Validation(#[from] stackproof_core::ValidationError),

    /// I/O error while reading key material.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
