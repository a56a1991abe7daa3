//! # Credential Envelope
//!
//! [`Credential`] is the issued artifact: the payload, the canonical
//! message that was actually signed, and the recoverable signature over
//! it. The JSON rendering of this struct is the sole interchange format;
//! anyone holding the JSON can verify it offline.
//!
//! The message is stored alongside the payload rather than recomputed on
//! demand so that verification can detect a payload/message divergence,
//! which is the tampering signal the format is designed around.

use serde::{Deserialize, Serialize};

use stackproof_crypto::RecoverableSignature;

use crate::message::canonical_message;
use crate::payload::CredentialPayload;
use crate::verify::VerifyError;

/// A complete participation credential.
///
/// The envelope is rigid: exactly these three fields, unknown fields
/// rejected. The signature deserializes from its `0x`-prefixed hex form
/// and is format-checked during parsing, so a held `Credential` is always
/// structurally well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Credential {
    /// The claims the credential binds.
    pub payload: CredentialPayload,
    /// The canonical message the wallet signed.
    pub message: String,
    /// 65-byte recoverable signature over the EIP-191 hash of `message`.
    pub signature: RecoverableSignature,
}

impl Credential {
    /// Assemble a credential from a payload and the signature produced
    /// over its canonical message.
    ///
    /// The message is recomputed here from the payload, so an assembled
    /// credential is structurally consistent by construction. The caller
    /// remains responsible for having signed that exact message.
    pub fn assemble(payload: CredentialPayload, signature: RecoverableSignature) -> Self {
        let message = canonical_message(&payload);
        Self {
            payload,
            message,
            signature,
        }
    }

    /// Parse a credential from its JSON interchange form.
    ///
    /// # Errors
    ///
    /// Returns [`VerifyError::Json`] for anything structurally wrong:
    /// missing or unknown fields, malformed field values, or a signature
    /// that is not 65 bytes of hex with a sane recovery byte.
    pub fn from_json(json: &str) -> Result<Self, VerifyError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the JSON interchange form, pretty-printed with two-space
    /// indentation (the export format).
    pub fn to_json_pretty(&self) -> Result<String, VerifyError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
