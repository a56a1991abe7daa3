//! # Verification Engine
//!
//! Offline verification of a participation credential. The engine is a
//! pure function of its input: no network, no wallet, no mutation. A
//! third party holding only the credential JSON can run it.
//!
//! Verification distinguishes three failure planes:
//!
//! - **Malformed input** ([`VerifyError`]): the credential is not even
//!   well-formed enough to check. Wrong scheme constants, unparseable
//!   values.
//! - **Structural mismatch** ([`Verdict::MessageMismatch`]): the stored
//!   message is not the canonical rendering of the payload. Someone edited
//!   one without the other.
//! - **Cryptographic mismatch** ([`Verdict::Unrecoverable`],
//!   [`Verdict::SignerMismatch`]): the signature does not tie the message
//!   to the claimed address.
//!
//! The latter two are results, not errors: "this credential is not valid"
//! is the answer the engine exists to give.

use thiserror::Error;

use stackproof_core::EthAddress;
use stackproof_crypto::{recover_address, CryptoError};

use crate::credential::Credential;
use crate::message::canonical_message;

/// Errors for input too malformed to yield a verdict.
#[derive(Error, Debug)]
pub enum VerifyError {
    /// A fixed payload field does not carry its required constant.
    #[error("payload field {field} must be {expected:?}, found {found:?}")]
    SchemaMismatch {
        /// JSON name of the offending field.
        field: &'static str,
        /// The required constant.
        expected: &'static str,
        /// The value actually present.
        found: String,
    },

    /// Field-level validation failure from the foundational types.
    #[error("invalid payload field: {0}")]
    Validation(#[from] stackproof_core::ValidationError),

    /// The signature is structurally unusable: wrong length, bad hex, or
    /// an out-of-range recovery byte.
    #[error("invalid signature: {0}")]
    Signature(#[from] CryptoError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The outcome of verifying a structurally well-formed credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// The message matches the payload and the signature recovers to the
    /// claimed address.
    Valid,

    /// Recomputing the canonical message from the payload does not
    /// reproduce the stored message byte-for-byte. The payload or the
    /// message was altered after signing.
    MessageMismatch,

    /// No public key recovers from the message/signature pair. The
    /// signature bytes were not produced by signing this message.
    Unrecoverable,

    /// The signature is genuine for some key, but that key's address is
    /// not the one the payload claims.
    SignerMismatch {
        /// The address the signature actually recovers to, lowercase.
        recovered: EthAddress,
    },
}

impl Verdict {
    /// The boolean contract: `true` only for [`Verdict::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, Verdict::Valid)
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Valid => write!(f, "valid"),
            Verdict::MessageMismatch => {
                write!(f, "stored message is not the canonical rendering of the payload")
            }
            Verdict::Unrecoverable => write!(f, "signature does not recover to any signer"),
            Verdict::SignerMismatch { recovered } => {
                write!(f, "signature recovers to {recovered}, not the claimed address")
            }
        }
    }
}

/// Verify a credential offline.
///
/// Algorithm: check the fixed payload constants, recompute the canonical
/// message and compare it byte-for-byte against the stored one, hash the
/// stored message with the EIP-191 prefix, recover the secp256k1 signer
/// address, and compare it to `payload.address` ignoring letter-casing.
///
/// A credential whose signature simply does not match yields a non-valid
/// [`Verdict`], never an `Err`; [`VerifyError`] means the input was too
/// malformed to judge.
pub fn verify(credential: &Credential) -> Result<Verdict, VerifyError> {
    credential.payload.validate()?;

    if canonical_message(&credential.payload) != credential.message {
        return Ok(Verdict::MessageMismatch);
    }

    let recovered = match recover_address(&credential.message, &credential.signature) {
        Ok(address) => address,
        Err(CryptoError::RecoveryFailed(_)) => return Ok(Verdict::Unrecoverable),
        Err(e) => return Err(VerifyError::Signature(e)),
    };

    if recovered.matches(&credential.payload.address) {
        Ok(Verdict::Valid)
    } else {
        Ok(Verdict::SignerMismatch { recovered })
    }
}
