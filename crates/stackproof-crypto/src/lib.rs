//! # stackproof-crypto — Cryptographic Primitives for StackProof
//!
//! This crate provides the cryptographic building blocks for issuing and
//! verifying participation credentials:
//!
//! - **Keccak-256** hashing (the original Keccak padding Ethereum uses,
//!   not finalized SHA-3).
//! - **EIP-191 personal message digests**: the `"\x19Ethereum Signed
//!   Message:\n" + length + message` construction wallets apply for
//!   `personal_sign`.
//! - **[`RecoverableSignature`]**: the 65-byte `r || s || v` signature
//!   format, with hex parsing and rendering.
//! - **Signer recovery**: [`recover_address`] recomputes the public key
//!   from digest and signature and derives the Ethereum address, so
//!   verification needs no key registry.
//! - **[`LocalSigner`]**: an in-process secp256k1 key for headless
//!   issuance and tests, with seed loading from hex, file, or environment.

pub mod error;
pub mod keccak;
pub mod personal;
pub mod recover;
pub mod signature;
pub mod signer;

// Re-export primary types.
pub use error::CryptoError;
pub use keccak::keccak256;
pub use personal::{personal_message_digest, PERSONAL_MESSAGE_PREFIX};
pub use recover::{address_from_verifying_key, recover_address};
pub use signature::{RecoverableSignature, SIGNATURE_LEN};
pub use signer::LocalSigner;
