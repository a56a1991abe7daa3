//! # Signer Recovery
//!
//! ECDSA public key recovery: given a personal message and a recoverable
//! signature, recompute the public key that produced the signature and
//! derive its Ethereum address. The address is the verification datum; no
//! key registry or on-chain lookup is involved.

use k256::ecdsa::VerifyingKey;

use stackproof_core::EthAddress;

use crate::error::CryptoError;
use crate::keccak::keccak256;
use crate::personal::personal_message_digest;
use crate::signature::RecoverableSignature;

/// Recover the Ethereum address that signed `message` as an EIP-191
/// personal message.
///
/// High-`s` signatures are normalized during recovery, so signatures from
/// any conformant wallet are accepted as-is. The returned address is in
/// lowercase hex.
///
/// # Errors
///
/// Returns [`CryptoError::RecoveryFailed`] if no public key exists for
/// the digest/signature pair.
pub fn recover_address(
    message: &str,
    signature: &RecoverableSignature,
) -> Result<EthAddress, CryptoError> {
    let digest = personal_message_digest(message);
    let (sig, recovery_id) = signature.split()?;
    let key = VerifyingKey::recover_from_prehash(&digest, &sig, recovery_id)
        .map_err(|e| CryptoError::RecoveryFailed(e.to_string()))?;
    address_from_verifying_key(&key)
}

/// Derive the Ethereum address of a secp256k1 public key: the last 20
/// bytes of the Keccak-256 digest of the uncompressed point, skipping the
/// leading `0x04` tag byte.
pub fn address_from_verifying_key(key: &VerifyingKey) -> Result<EthAddress, CryptoError> {
    let point = key.to_encoded_point(false);
    let digest = keccak256(&point.as_bytes()[1..]);
    Ok(EthAddress::new(format!("0x{}", hex::encode(&digest[12..])))?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signer::LocalSigner;

    #[test]
    fn recovers_the_signing_address() {
        let signer = LocalSigner::generate();
        let message = "STACKPROOF\napp: StackProof";
        let sig = signer.sign_personal(message).unwrap();

        let recovered = recover_address(message, &sig).unwrap();
        assert!(recovered.matches(signer.address()));
    }

    #[test]
    fn different_message_recovers_different_address() {
        // Recovery almost never fails outright for a tampered message; it
        // yields some other key's address instead.
        let signer = LocalSigner::generate();
        let sig = signer.sign_personal("original").unwrap();

        let recovered = recover_address("tampered", &sig).unwrap();
        assert!(!recovered.matches(signer.address()));
    }

    #[test]
    fn raw_parity_v_recovers_identically() {
        let signer = LocalSigner::generate();
        let message = "parity check";
        let sig = signer.sign_personal(message).unwrap();

        // Re-encode the same signature with v in {0,1} instead of {27,28}.
        let mut bytes = *sig.as_bytes();
        bytes[64] -= 27;
        let raw_v = RecoverableSignature::from_bytes(bytes).unwrap();

        let a = recover_address(message, &sig).unwrap();
        let b = recover_address(message, &raw_v).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn recovered_address_is_lowercase_hex() {
        let signer = LocalSigner::generate();
        let sig = signer.sign_personal("case check").unwrap();
        let recovered = recover_address("case check", &sig).unwrap();
        assert_eq!(
            recovered.as_str(),
            recovered.as_str().to_lowercase().as_str()
        );
    }
}
