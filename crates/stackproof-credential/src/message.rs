//! # Canonical Message Encoding
//!
//! The canonical message is the human-readable text a wallet signs. Its
//! exact shape is load-bearing: verification recomputes the string from
//! the payload and compares byte-for-byte, so the line order, the
//! `name: value` formatting, and the absence of a trailing newline are all
//! part of the credential format. Changing any of them would invalidate
//! every previously issued credential.

use crate::payload::CredentialPayload;

/// First line of every canonical message.
pub const MESSAGE_HEADER: &str = "STACKPROOF";

/// Render the canonical message for a payload.
///
/// Exactly eight lines joined by `\n`, no trailing newline: the header,
/// then one `name: value` line per field in fixed order. Field values are
/// embedded verbatim as the payload stores them, which is why the stored
/// renderings of address and timestamp matter.
pub fn canonical_message(payload: &CredentialPayload) -> String {
    [
        MESSAGE_HEADER.to_string(),
        format!("app: {}", payload.app),
        format!("purpose: {}", payload.purpose),
        format!("version: {}", payload.version),
        format!("address: {}", payload.address),
        format!("chainId: {}", payload.chain_id),
        format!("issuedAt: {}", payload.issued_at),
        format!("nonce: {}", payload.nonce),
    ]
    .join("\n")
}
