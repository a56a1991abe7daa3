//! # Credential Payload
//!
//! [`CredentialPayload`] is the set of claims a participation credential
//! binds together: three fixed scheme identifiers plus the wallet address,
//! chain id, issuance timestamp, and a random nonce.
//!
//! ## Field Naming and Order
//!
//! Serde rename attributes map Rust snake_case to the camelCase JSON names
//! of the interchange format. Declaration order is serialization order,
//! so exported JSON always lists `app` first and `address` last.

use serde::{Deserialize, Serialize};

use stackproof_core::{ChainId, EthAddress, IssuedAt, Nonce};

use crate::verify::VerifyError;

/// Credential scheme identifier. Every payload carries this exact value.
pub const APP: &str = "StackProof";

/// What a signature over the payload attests to.
pub const PURPOSE: &str = "Proof of Participation";

/// Payload schema version.
pub const VERSION: &str = "1.0";

/// The claims bound by a participation credential.
///
/// A payload is a value object: freely clonable, never mutated after
/// construction. The field types validate themselves on construction and
/// on deserialization; [`CredentialPayload::validate`] additionally pins
/// the three fixed fields to their required constants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialPayload {
    /// Scheme identifier. Must equal [`APP`].
    pub app: String,

    /// Statement of intent. Must equal [`PURPOSE`].
    pub purpose: String,

    /// Schema version. Must equal [`VERSION`].
    pub version: String,

    /// Issuance time, RFC 3339 UTC. The stored rendering feeds the signed
    /// message verbatim.
    #[serde(rename = "issuedAt")]
    pub issued_at: IssuedAt,

    /// Random 128-bit challenge, 32 lowercase hex characters.
    pub nonce: Nonce,

    /// Chain id of the session the credential was issued under.
    #[serde(rename = "chainId")]
    pub chain_id: ChainId,

    /// The wallet address the credential claims. Locally issued payloads
    /// carry lowercase; foreign payloads keep whatever casing they came
    /// with.
    pub address: EthAddress,
}

impl CredentialPayload {
    /// Build a fresh payload for the given identity and issuance time.
    ///
    /// Fixes `app`, `purpose`, and `version` to their constants, draws a
    /// new random [`Nonce`], and lowercases the address to the canonical
    /// issuing form.
    pub fn build(address: &EthAddress, chain_id: ChainId, issued_at: IssuedAt) -> Self {
        Self {
            app: APP.to_string(),
            purpose: PURPOSE.to_string(),
            version: VERSION.to_string(),
            issued_at,
            nonce: Nonce::random(),
            chain_id,
            address: address.to_lowercase(),
        }
    }

    /// Check that the three fixed fields carry their required constants.
    ///
    /// The remaining fields are validated by their types; this is the only
    /// payload-level check deserialization cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::SchemaMismatch`] naming the offending field.
    pub fn validate(&self) -> Result<(), VerifyError> {
        for (field, expected, found) in [
            ("app", APP, self.app.as_str()),
            ("purpose", PURPOSE, self.purpose.as_str()),
            ("version", VERSION, self.version.as_str()),
        ] {
            if found != expected {
                return Err(VerifyError::SchemaMismatch {
                    field,
                    expected,
                    found: found.to_string(),
                });
            }
        }
        Ok(())
    }
}
