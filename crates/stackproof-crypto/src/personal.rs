//! # EIP-191 Personal Messages
//!
//! `personal_sign` never hashes the caller's message directly. The wallet
//! prepends `"\x19Ethereum Signed Message:\n"` followed by the decimal
//! byte length of the message, then hashes the whole thing with
//! Keccak-256. The `0x19` lead byte makes the result structurally invalid
//! as RLP, so a signed message can never be replayed as a transaction.

use crate::keccak::keccak256;

/// Prefix prepended to every personal message before hashing.
pub const PERSONAL_MESSAGE_PREFIX: &str = "\x19Ethereum Signed Message:\n";

/// Compute the EIP-191 digest of a personal message.
///
/// The length in the prefix is the message's UTF-8 byte length rendered in
/// decimal, matching what wallets hash for `personal_sign`.
pub fn personal_message_digest(message: &str) -> [u8; 32] {
    let length = message.len().to_string();
    let mut prefixed =
        Vec::with_capacity(PERSONAL_MESSAGE_PREFIX.len() + length.len() + message.len());
    prefixed.extend_from_slice(PERSONAL_MESSAGE_PREFIX.as_bytes());
    prefixed.extend_from_slice(length.as_bytes());
    prefixed.extend_from_slice(message.as_bytes());
    keccak256(&prefixed)
}
