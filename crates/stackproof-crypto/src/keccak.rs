//! # Keccak-256
//!
//! Thin wrapper over the `sha3` implementation. Ethereum uses the original
//! Keccak padding, not the finalized SHA-3 standard; `Keccak256` from the
//! `sha3` crate implements the former.

use sha3::{Digest, Keccak256};

/// Compute the Keccak-256 digest of `data`.
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}
