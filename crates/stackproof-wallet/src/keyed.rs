//! Key-backed wallet provider.
//!
//! Wraps a [`LocalSigner`] in the provider interface so headless
//! environments (CI, scripts) can issue credentials without any wallet
//! agent. A key in hand is standing authorization: probes see the account
//! immediately and nothing ever prompts. The identity and chain are fixed
//! for the provider's lifetime, so subscriptions stay silent.

use std::path::Path;

use serde_json::{json, Value};

use stackproof_core::{ChainId, EthAddress};
use stackproof_crypto::{CryptoError, LocalSigner};

use crate::events::{EventHub, EventKind, Subscription};
use crate::provider::{parse_sign_params, ProviderError, WalletProvider};

/// Wallet provider backed by a local secp256k1 key.
pub struct KeyWalletProvider {
    signer: LocalSigner,
    chain_id: ChainId,
    hub: EventHub,
}

impl KeyWalletProvider {
    pub fn new(signer: LocalSigner, chain_id: ChainId) -> Self {
        Self {
            signer,
            chain_id,
            hub: EventHub::new(),
        }
    }

    /// Provider over a hex-encoded private key.
    pub fn from_hex(hex_key: &str, chain_id: ChainId) -> Result<Self, CryptoError> {
        Ok(Self::new(LocalSigner::from_hex(hex_key)?, chain_id))
    }

    /// Provider over a key read from the environment.
    pub fn from_env(var_name: &str, chain_id: ChainId) -> Result<Self, CryptoError> {
        Ok(Self::new(LocalSigner::from_env(var_name)?, chain_id))
    }

    /// Provider over a key file.
    pub fn from_file(path: impl AsRef<Path>, chain_id: ChainId) -> Result<Self, CryptoError> {
        Ok(Self::new(LocalSigner::from_file(path)?, chain_id))
    }

    pub fn address(&self) -> &EthAddress {
        self.signer.address()
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }
}

impl WalletProvider for KeyWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        match method {
            "eth_accounts" | "eth_requestAccounts" => {
                Ok(json!([self.signer.address().as_str()]))
            }
            "eth_chainId" => Ok(json!(self.chain_id.to_hex_quantity())),
            "personal_sign" => {
                let (message, address) = parse_sign_params(&params)?;
                if !address.matches(self.signer.address()) {
                    return Err(ProviderError::Rpc {
                        code: -32000,
                        message: format!("unknown account {address}"),
                    });
                }
                let signature =
                    self.signer
                        .sign_personal(&message)
                        .map_err(|e| ProviderError::Rpc {
                            code: -32000,
                            message: format!("signing failed: {e}"),
                        })?;
                Ok(json!(signature.to_hex()))
            }
            other => Err(ProviderError::Rpc {
                code: -32601,
                message: format!("the method {other} does not exist"),
            }),
        }
    }

    fn subscribe(&self, kind: EventKind) -> Subscription {
        self.hub.subscribe(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::encode_sign_data;
    use crate::session::{SessionManager, WalletSession};
    use stackproof_crypto::{recover_address, RecoverableSignature};

    // Well-known dev-node key (Hardhat/Anvil account 0).
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
    const DEV_ADDRESS: &str = "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266";

    #[tokio::test]
    async fn probe_sees_the_account_without_connecting() {
        let provider = KeyWalletProvider::from_hex(DEV_KEY, ChainId::MAINNET).unwrap();
        let manager = SessionManager::attach(provider).await.unwrap();
        match manager.state() {
            WalletSession::Connected { address, chain_id } => {
                assert_eq!(address.as_str(), DEV_ADDRESS);
                assert_eq!(*chain_id, ChainId::MAINNET);
            }
            other => panic!("expected connected, got {other}"),
        }
    }

    #[tokio::test]
    async fn chain_id_reflects_construction() {
        let signer = LocalSigner::from_seed(&[51; 32]).unwrap();
        let provider = KeyWalletProvider::new(signer, ChainId::new(8453));
        let value = provider.request("eth_chainId", json!([])).await.unwrap();
        assert_eq!(value, json!("0x2105"));
    }

    #[tokio::test]
    async fn signs_messages_that_recover_to_the_key() {
        let signer = LocalSigner::from_seed(&[52; 32]).unwrap();
        let address = signer.address().clone();
        let provider = KeyWalletProvider::new(signer, ChainId::MAINNET);

        let message = "headless signing";
        let params = json!([encode_sign_data(message), address.as_str()]);
        let value = provider.request("personal_sign", params).await.unwrap();

        let signature = RecoverableSignature::from_hex(value.as_str().unwrap()).unwrap();
        assert!(recover_address(message, &signature)
            .unwrap()
            .matches(&address));
    }

    #[tokio::test]
    async fn refuses_to_sign_for_a_foreign_address() {
        let provider = KeyWalletProvider::from_hex(DEV_KEY, ChainId::MAINNET).unwrap();
        let params = json!([
            encode_sign_data("hello"),
            "0x0000000000000000000000000000000000000002"
        ]);
        let err = provider.request("personal_sign", params).await.unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: -32000, .. }));
    }

    #[tokio::test]
    async fn unsupported_methods_report_not_found() {
        let provider = KeyWalletProvider::from_hex(DEV_KEY, ChainId::MAINNET).unwrap();
        let err = provider
            .request("eth_signTypedData_v4", json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: -32601, .. }));
    }
}
