//! # Challenge Nonces
//!
//! Every credential carries a random 128-bit nonce, hex-encoded. The nonce
//! makes each canonical message unique, so two credentials issued by the
//! same wallet in the same millisecond still differ and a captured
//! signature cannot be replayed as a fresh issuance.

use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Number of random bytes in a nonce. Fixed: the hex length below is part
/// of the credential format, not a tunable.
pub const NONCE_BYTES: usize = 16;

/// Length of the hex rendering, two characters per byte.
pub const NONCE_HEX_LEN: usize = 2 * NONCE_BYTES;

/// A 128-bit random nonce, stored as 32 lowercase hex characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Nonce(String);

impl Nonce {
    /// Generate a fresh nonce from the operating system CSPRNG.
    pub fn random() -> Self {
        let mut bytes = [0u8; NONCE_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Accept an existing nonce string, validating the format.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidNonce`] unless the string is
    /// exactly [`NONCE_HEX_LEN`] lowercase hex characters.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let s = value.into();
        let well_formed =
            s.len() == NONCE_HEX_LEN && s.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f'));
        if !well_formed {
            return Err(ValidationError::InvalidNonce(s));
        }
        Ok(Self(s))
    }

    /// Access the hex string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Nonce {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// Deserializes as a plain string, then routes through `new()` so that
// malformed nonces are rejected at deserialization time.
impl<'de> Deserialize<'de> for Nonce {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
