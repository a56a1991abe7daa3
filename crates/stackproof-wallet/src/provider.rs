//! EIP-1193 provider abstraction.
//!
//! A wallet provider is anything that can answer JSON-RPC style requests
//! (`eth_accounts`, `eth_requestAccounts`, `eth_chainId`, `personal_sign`)
//! and publish change notifications. [`WalletProvider`] is the seam between
//! the session state machine and a concrete wallet agent; the crate ships
//! an HTTP JSON-RPC implementation, a local key-backed one, and a mock for
//! tests.

use serde_json::Value;
use thiserror::Error;

use stackproof_core::{ChainId, EthAddress};
use stackproof_crypto::RecoverableSignature;

use crate::events::{EventKind, Subscription};

/// EIP-1193 error code reported when the user declines a wallet prompt.
pub const USER_REJECTED_CODE: i64 = 4001;

/// Errors surfaced by a wallet provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No wallet agent is present or reachable.
    #[error("no wallet provider available: {reason}")]
    Unavailable { reason: String },

    /// The user declined the request in the wallet (EIP-1193 code 4001).
    #[error("request rejected by the user")]
    UserRejected,

    /// The provider answered with a JSON-RPC error object.
    #[error("provider error {code}: {message}")]
    Rpc { code: i64, message: String },

    /// The request could not complete at the transport layer.
    #[error("transport failure: {reason}")]
    Transport { reason: String },

    /// The provider answered with an unexpected shape.
    #[error("unexpected provider response: {reason}")]
    InvalidResponse { reason: String },
}

impl ProviderError {
    /// Classify a JSON-RPC error object, folding the EIP-1193 rejection
    /// code into [`ProviderError::UserRejected`].
    pub fn from_rpc(code: i64, message: impl Into<String>) -> Self {
        if code == USER_REJECTED_CODE {
            ProviderError::UserRejected
        } else {
            ProviderError::Rpc {
                code,
                message: message.into(),
            }
        }
    }

    /// True when the user declined a wallet prompt.
    pub fn is_user_rejected(&self) -> bool {
        matches!(self, ProviderError::UserRejected)
    }
}

/// A wallet agent reachable through EIP-1193 style requests.
///
/// Implementations must be `Send + Sync` so a provider handle can be shared
/// across async tasks. The raw [`request`](WalletProvider::request) surface
/// mirrors the wire protocol; callers normally go through the typed helpers
/// ([`list_accounts`], [`request_accounts`], [`active_chain`],
/// [`sign_message`]) which parse and validate the responses.
pub trait WalletProvider: Send + Sync {
    /// Dispatch a raw request to the wallet agent.
    fn request(
        &self,
        method: &str,
        params: Value,
    ) -> impl std::future::Future<Output = Result<Value, ProviderError>> + Send;

    /// Register a listener for provider notifications of the given kind.
    ///
    /// Dropping the returned [`Subscription`] unregisters the listener.
    fn subscribe(&self, kind: EventKind) -> Subscription;
}

/// Accounts the wallet has already authorized for this caller.
///
/// Never prompts the user; an empty list means nothing is authorized yet.
pub async fn list_accounts<P: WalletProvider>(
    provider: &P,
) -> Result<Vec<EthAddress>, ProviderError> {
    let value = provider.request("eth_accounts", Value::Array(vec![])).await?;
    accounts_from_value(value)
}

/// Ask the wallet to authorize an account, prompting the user if needed.
pub async fn request_accounts<P: WalletProvider>(
    provider: &P,
) -> Result<Vec<EthAddress>, ProviderError> {
    let value = provider
        .request("eth_requestAccounts", Value::Array(vec![]))
        .await?;
    accounts_from_value(value)
}

/// The chain the wallet is currently pointed at.
pub async fn active_chain<P: WalletProvider>(provider: &P) -> Result<ChainId, ProviderError> {
    let value = provider.request("eth_chainId", Value::Array(vec![])).await?;
    chain_from_value(value)
}

/// Request an EIP-191 personal signature over `message` from `address`.
///
/// The message travels hex-encoded (see [`encode_sign_data`]); the response
/// is parsed into a 65-byte recoverable signature.
pub async fn sign_message<P: WalletProvider>(
    provider: &P,
    message: &str,
    address: &EthAddress,
) -> Result<RecoverableSignature, ProviderError> {
    let params = serde_json::json!([encode_sign_data(message), address.as_str()]);
    let value = provider.request("personal_sign", params).await?;
    signature_from_value(value)
}

/// Hex-encode message text for the `personal_sign` data parameter.
///
/// Nodes require the data as `0x`-prefixed bytes; browser wallets accept
/// plain text too, but the hex form is unambiguous for both.
pub fn encode_sign_data(message: &str) -> String {
    format!("0x{}", hex::encode(message.as_bytes()))
}

/// Recover message text from a `personal_sign` data parameter.
///
/// Accepts both the hex form produced by [`encode_sign_data`] and plain
/// text, the same leniency browser wallets apply on inbound requests.
pub fn decode_sign_data(data: &str) -> Result<String, ProviderError> {
    let Some(stripped) = data.strip_prefix("0x") else {
        return Ok(data.to_string());
    };
    let bytes = hex::decode(stripped).map_err(|e| invalid_params(format!("malformed sign data: {e}")))?;
    String::from_utf8(bytes).map_err(|e| invalid_params(format!("sign data is not UTF-8: {e}")))
}

/// Split `personal_sign` params into message text and signing address.
pub fn parse_sign_params(params: &Value) -> Result<(String, EthAddress), ProviderError> {
    let entries = params
        .as_array()
        .ok_or_else(|| invalid_params("personal_sign params must be an array".to_string()))?;
    let [data, address] = entries.as_slice() else {
        return Err(invalid_params(format!(
            "personal_sign takes 2 params, got {}",
            entries.len()
        )));
    };
    let data = data
        .as_str()
        .ok_or_else(|| invalid_params("sign data must be a string".to_string()))?;
    let address = address
        .as_str()
        .ok_or_else(|| invalid_params("signing address must be a string".to_string()))?;
    let message = decode_sign_data(data)?;
    let address =
        EthAddress::new(address).map_err(|e| invalid_params(format!("signing address: {e}")))?;
    Ok((message, address))
}

// JSON-RPC "invalid params" code.
fn invalid_params(message: String) -> ProviderError {
    ProviderError::Rpc {
        code: -32602,
        message,
    }
}

fn accounts_from_value(value: Value) -> Result<Vec<EthAddress>, ProviderError> {
    let entries = value.as_array().ok_or_else(|| ProviderError::InvalidResponse {
        reason: "account list is not an array".to_string(),
    })?;
    entries
        .iter()
        .map(|entry| {
            let raw = entry.as_str().ok_or_else(|| ProviderError::InvalidResponse {
                reason: "account entry is not a string".to_string(),
            })?;
            EthAddress::new(raw).map_err(|e| ProviderError::InvalidResponse {
                reason: format!("account entry: {e}"),
            })
        })
        .collect()
}

fn chain_from_value(value: Value) -> Result<ChainId, ProviderError> {
    let raw = value.as_str().ok_or_else(|| ProviderError::InvalidResponse {
        reason: "chain id is not a string".to_string(),
    })?;
    ChainId::from_hex_quantity(raw).map_err(|e| ProviderError::InvalidResponse {
        reason: format!("chain id: {e}"),
    })
}

fn signature_from_value(value: Value) -> Result<RecoverableSignature, ProviderError> {
    let raw = value.as_str().ok_or_else(|| ProviderError::InvalidResponse {
        reason: "signature is not a string".to_string(),
    })?;
    RecoverableSignature::from_hex(raw).map_err(|e| ProviderError::InvalidResponse {
        reason: format!("unusable signature from provider: {e}"),
    })
}
