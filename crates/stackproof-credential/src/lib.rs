//! # stackproof-credential — Credential Codec and Verification Engine
//!
//! Defines the participation credential and everything needed to encode,
//! exchange, and verify one:
//!
//! - **[`CredentialPayload`]**: the claims a credential binds — wallet
//!   address, chain id, issuance time, random nonce, plus the fixed scheme
//!   identifiers.
//! - **[`canonical_message`]**: the deterministic 8-line text rendering of a
//!   payload. This exact string is what the wallet signs and what
//!   verification recomputes.
//! - **[`Credential`]**: the issued artifact (payload + message +
//!   signature) and its JSON interchange form.
//! - **[`verify`]**: the offline verification engine. Recomputes the
//!   canonical message, recovers the signer from the signature, and
//!   compares it to the claimed address. Needs no network and no wallet.
//!
//! ## Invariants
//!
//! - A credential's `message` must be byte-for-byte the canonical
//!   serialization of its `payload`; verification treats any divergence as
//!   tampering ([`Verdict::MessageMismatch`]).
//! - "Signature does not match" is a [`Verdict`], never an error.
//!   [`VerifyError`] is reserved for structurally malformed input.

pub mod credential;
pub mod message;
pub mod payload;
pub mod verify;

// Re-export primary types.
pub use credential::Credential;
pub use message::{canonical_message, MESSAGE_HEADER};
pub use payload::{CredentialPayload, APP, PURPOSE, VERSION};
pub use verify::{verify, Verdict, VerifyError};
