#![deny(missing_docs)]

//! # stackproof-core — Foundational Types for StackProof
//!
//! This crate defines the domain primitives every other crate in the
//! workspace depends on. It has no internal crate dependencies — only
//! `serde`, `thiserror`, `chrono`, `hex`, and `rand_core` from the external
//! ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype wrappers for domain primitives.** Addresses, chain ids,
//!    timestamps, and nonces are distinct types with validated constructors.
//!    No bare strings cross a crate boundary.
//!
//! 2. **Construction-time validation.** A value that exists is a value that
//!    passed its format check. `Deserialize` routes through the same
//!    constructors, so malformed JSON is rejected at the boundary rather
//!    than propagating inward.
//!
//! 3. **String fidelity for signed content.** [`EthAddress`] and
//!    [`IssuedAt`] preserve the exact rendering they were constructed with.
//!    The signed credential message embeds these strings verbatim;
//!    normalizing them on parse would silently break signature
//!    recomputation for credentials produced by other implementations.

pub mod address;
pub mod chain;
pub mod error;
pub mod nonce;
pub mod temporal;

// Re-export primary types at crate root for ergonomic imports.
pub use address::EthAddress;
pub use chain::ChainId;
pub use error::ValidationError;
pub use nonce::{Nonce, NONCE_BYTES, NONCE_HEX_LEN};
pub use temporal::IssuedAt;
