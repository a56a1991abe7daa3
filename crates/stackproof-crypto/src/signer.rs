//! # Local Signer
//!
//! An in-process secp256k1 signing key for headless credential issuance
//! and tests. Browsers delegate signing to a wallet extension; a CLI or
//! server has no such thing, so [`LocalSigner`] plays the wallet's part:
//! it holds the key, knows its own address, and produces EIP-191 personal
//! signatures.
//!
//! Seed material can be loaded from raw bytes, a hex string, a key file,
//! or an environment variable. Intermediate seed buffers are zeroized;
//! the inner key zeroizes itself on drop.

use std::path::Path;

use k256::ecdsa::{SigningKey, VerifyingKey};
use rand_core::OsRng;
use zeroize::Zeroize;

use stackproof_core::EthAddress;

use crate::error::CryptoError;
use crate::personal::personal_message_digest;
use crate::recover::address_from_verifying_key;
use crate::signature::RecoverableSignature;

/// An in-process secp256k1 key with its derived Ethereum address.
pub struct LocalSigner {
    key: SigningKey,
    address: EthAddress,
}

impl LocalSigner {
    /// Generate a new random key from the OS CSPRNG.
    pub fn generate() -> Self {
        Self::from_signing_key(SigningKey::random(&mut OsRng))
    }

    /// Create from a raw 32-byte seed.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::InvalidSigningKey`] if the seed is not a
    /// valid secp256k1 scalar (zero, or not below the group order).
    pub fn from_seed(seed: &[u8; 32]) -> Result<Self, CryptoError> {
        let key = SigningKey::from_bytes(seed.into())
            .map_err(|e| CryptoError::InvalidSigningKey(e.to_string()))?;
        Ok(Self::from_signing_key(key))
    }

    /// Create from a 64-character hex seed, with or without `0x` prefix.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::HexDecode`] for invalid hex and
    /// [`CryptoError::InvalidSigningKey`] for a wrong-length or
    /// out-of-range seed.
    pub fn from_hex(s: &str) -> Result<Self, CryptoError> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut decoded =
            hex::decode(digits).map_err(|e| CryptoError::HexDecode(e.to_string()))?;
        if decoded.len() != 32 {
            let got = decoded.len();
            decoded.zeroize();
            return Err(CryptoError::InvalidSigningKey(format!(
                "expected 32 bytes (64 hex chars), got {got} bytes"
            )));
        }
        let mut seed = [0u8; 32];
        seed.copy_from_slice(&decoded);
        decoded.zeroize();
        let result = Self::from_seed(&seed);
        seed.zeroize();
        result
    }

    /// Load the hex seed from the named environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::MissingKeyMaterial`] if the variable is not
    /// set, plus the [`LocalSigner::from_hex`] errors.
    pub fn from_env(var_name: &str) -> Result<Self, CryptoError> {
        let mut hex_key = std::env::var(var_name).map_err(|_| {
            CryptoError::MissingKeyMaterial(format!("environment variable {var_name} not set"))
        })?;
        let result = Self::from_hex(&hex_key);
        hex_key.zeroize();
        result
    }

    /// Load the hex seed from a key file. Surrounding whitespace and a
    /// trailing newline are tolerated.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::Io`] if the file cannot be read, plus the
    /// [`LocalSigner::from_hex`] errors.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CryptoError> {
        let mut contents = std::fs::read_to_string(path)?;
        let result = Self::from_hex(&contents);
        contents.zeroize();
        result
    }

    fn from_signing_key(key: SigningKey) -> Self {
        let address = address_from_verifying_key(&VerifyingKey::from(&key))
            .expect("20-byte digest renders as a valid address");
        Self { key, address }
    }

    /// The Ethereum address of this key, in lowercase hex.
    pub fn address(&self) -> &EthAddress {
        &self.address
    }

    /// Sign `message` as an EIP-191 personal message, producing the
    /// 65-byte recoverable signature a wallet would return.
    ///
    /// # Errors
    ///
    /// Returns [`CryptoError::SigningFailed`] if the underlying signing
    /// operation fails.
    pub fn sign_personal(&self, message: &str) -> Result<RecoverableSignature, CryptoError> {
        let digest = personal_message_digest(message);
        let (signature, recovery_id) = self
            .key
            .sign_prehash_recoverable(&digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        Ok(RecoverableSignature::from_parts(&signature, recovery_id))
    }
}

impl std::fmt::Debug for LocalSigner {
    // Never print key material.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .finish_non_exhaustive()
    }
}
