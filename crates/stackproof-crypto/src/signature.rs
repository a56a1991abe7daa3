//! # Recoverable Signatures
//!
//! The 65-byte `r || s || v` signature format that wallet `personal_sign`
//! calls return. The trailing `v` byte carries the recovery id: most
//! wallets emit 27 or 28, some tooling emits the raw parity 0 or 1. Both
//! encodings are accepted, and the stored bytes are kept exactly as
//! parsed, so a credential's signature re-renders with its original `v`.

use k256::ecdsa::{RecoveryId, Signature};
use serde::{Deserialize, Serialize};

use crate::error::CryptoError;

/// Byte length of a recoverable signature: 32 (r) + 32 (s) + 1 (v).
pub const SIGNATURE_LEN: usize = 65;

/// A 65-byte recoverable secp256k1 signature.
///
/// # Validation
///
/// Construction rejects out-of-range `r`/`s` scalars and recovery bytes
/// other than 0, 1, 27, or 28. A value that exists can always be split
/// into its curve components.
#[derive(Clone, PartialEq, Eq)]
pub struct RecoverableSignature([u8; SIGNATURE_LEN]);

impl RecoverableSignature {
    /// Accept a raw 65-byte signature, validating its components.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidRecoveryByte`] for an unrecognized
    /// `v`, or [`CryptoError::InvalidSignature`] if `r`/`s` do not form a
    /// valid scalar pair.
    pub fn from_bytes(bytes: [u8; SIGNATURE_LEN]) -> Result<Self, CryptoError> {
        let v = bytes[64];
        if !matches!(v, 0 | 1 | 27 | 28) {
            return Err(CryptoError::InvalidRecoveryByte(v));
        }
        Signature::from_slice(&bytes[..64])
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok(Self(bytes))
    }

    /// Parse the `0x`-prefixed hex form carried in credential JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::HexDecode`] for a missing prefix or invalid
    /// hex, [`CryptoError::InvalidSignatureLength`] if the decoded bytes
    /// are not exactly 65, and the [`RecoverableSignature::from_bytes`]
    /// errors otherwise.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let digits = s
            .strip_prefix("0x")
            .ok_or_else(|| CryptoError::HexDecode("missing 0x prefix".to_string()))?;
        let decoded = hex::decode(digits).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        let bytes: [u8; SIGNATURE_LEN] = decoded
            .try_into()
            .map_err(|rest: Vec<u8>| CryptoError::InvalidSignatureLength(rest.len()))?;
        Self::from_bytes(bytes)
    }

    /// Assemble from the components a recoverable signing operation
    /// produces. The recovery parity is stored in wallet convention,
    /// `v = 27 + parity`.
    pub fn from_parts(signature: &Signature, recovery_id: RecoveryId) -> Self {
        let mut bytes = [0u8; SIGNATURE_LEN];
        bytes[..64].copy_from_slice(signature.to_bytes().as_slice());
        bytes[64] = 27 + u8::from(recovery_id.is_y_odd());
        Self(bytes)
    }

    /// The raw 65 bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_LEN] {
        &self.0
    }

    /// Render as `0x` + 130 lowercase hex characters.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    /// The raw recovery byte as stored (0, 1, 27, or 28).
    pub fn v(&self) -> u8 {
        self.0[64]
    }

    /// The recovery id with the `+27` wallet offset normalized away.
    pub fn recovery_id(&self) -> RecoveryId {
        let v = self.0[64];
        let parity = if v >= 27 { v - 27 } else { v };
        RecoveryId::new(parity == 1, false)
    }

    /// Split into the curve signature and recovery id for recovery.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSignature`] if the scalar pair fails
    /// to parse. Unreachable for values built through the validating
    /// constructors.
    pub fn split(&self) -> Result<(Signature, RecoveryId), CryptoError> {
        let signature = Signature::from_slice(&self.0[..64])
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok((signature, self.recovery_id()))
    }
}

impl std::fmt::Debug for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RecoverableSignature")
            .field(&self.to_hex())
            .finish()
    }
}

impl std::fmt::Display for RecoverableSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for RecoverableSignature {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

// Deserializes as a hex string, then routes through `from_hex()` so that
// malformed signatures are rejected at deserialization time.
impl<'de> Deserialize<'de> for RecoverableSignature {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_hex(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_hex(v: &str) -> String {
        // r = 1, s = 2: valid nonzero scalars.
        format!("0x{:064x}{:064x}{v}", 1, 2)
    }

    // -- parsing --

    #[test]
    fn parses_wallet_convention_v() {
        let sig = RecoverableSignature::from_hex(&sample_hex("1b")).unwrap();
        assert_eq!(sig.v(), 27);
        assert!(!sig.recovery_id().is_y_odd());

        let sig = RecoverableSignature::from_hex(&sample_hex("1c")).unwrap();
        assert_eq!(sig.v(), 28);
        assert!(sig.recovery_id().is_y_odd());
    }

    #[test]
    fn parses_raw_parity_v() {
        let sig = RecoverableSignature::from_hex(&sample_hex("00")).unwrap();
        assert_eq!(sig.v(), 0);
        assert!(!sig.recovery_id().is_y_odd());

        let sig = RecoverableSignature::from_hex(&sample_hex("01")).unwrap();
        assert_eq!(sig.v(), 1);
        assert!(sig.recovery_id().is_y_odd());
    }

    #[test]
    fn rejects_unknown_recovery_byte() {
        let err = RecoverableSignature::from_hex(&sample_hex("02")).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidRecoveryByte(2)));
        assert!(RecoverableSignature::from_hex(&sample_hex("1d")).is_err());
    }

    #[test]
    fn rejects_wrong_length() {
        let err = RecoverableSignature::from_hex(&format!("0x{:064x}{:064x}", 1, 2)).unwrap_err();
        assert!(matches!(err, CryptoError::InvalidSignatureLength(64)));
    }

    #[test]
    fn rejects_missing_prefix_and_bad_hex() {
        let no_prefix = sample_hex("1b").trim_start_matches("0x").to_string();
        assert!(matches!(
            RecoverableSignature::from_hex(&no_prefix),
            Err(CryptoError::HexDecode(_))
        ));
        assert!(matches!(
            RecoverableSignature::from_hex("0xzz"),
            Err(CryptoError::HexDecode(_))
        ));
    }

    #[test]
    fn rejects_zero_r_scalar() {
        let hex = format!("0x{:064x}{:064x}1b", 0, 2);
        assert!(matches!(
            RecoverableSignature::from_hex(&hex),
            Err(CryptoError::InvalidSignature(_))
        ));
    }

    // -- rendering --

    #[test]
    fn hex_roundtrip_preserves_v_encoding() {
        for v in ["00", "01", "1b", "1c"] {
            let input = sample_hex(v);
            let sig = RecoverableSignature::from_hex(&input).unwrap();
            assert_eq!(sig.to_hex(), input);
        }
    }

    #[test]
    fn hex_form_shape() {
        let sig = RecoverableSignature::from_hex(&sample_hex("1b")).unwrap();
        let rendered = sig.to_hex();
        assert!(rendered.starts_with("0x"));
        assert_eq!(rendered.len(), 2 + 2 * SIGNATURE_LEN);
    }

    #[test]
    fn debug_shows_hex_not_byte_array() {
        let sig = RecoverableSignature::from_hex(&sample_hex("1b")).unwrap();
        assert!(format!("{sig:?}").contains("0x"));
    }

    // -- serde --

    #[test]
    fn serde_roundtrip() {
        let sig = RecoverableSignature::from_hex(&sample_hex("1c")).unwrap();
        let json = serde_json::to_string(&sig).unwrap();
        assert_eq!(json, format!("\"{}\"", sample_hex("1c")));
        let back: RecoverableSignature = serde_json::from_str(&json).unwrap();
        assert_eq!(sig, back);
    }

    #[test]
    fn deserialize_rejects_malformed() {
        let result: Result<RecoverableSignature, _> = serde_json::from_str("\"0x1234\"");
        assert!(result.is_err());
    }
}
