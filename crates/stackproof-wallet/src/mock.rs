//! Mock wallet provider for tests.
//!
//! Behaves like a browser wallet with real keys: accounts are backed by
//! [`LocalSigner`]s and `personal_sign` produces genuine recoverable
//! signatures, so issued credentials verify end to end. Cloning the mock
//! yields a control handle onto the same state, which lets a test keep
//! steering the wallet (switching accounts, denying prompts, dropping the
//! transport) after a [`SessionManager`](crate::session::SessionManager)
//! has taken ownership of the provider.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::{json, Value};

use stackproof_core::{ChainId, EthAddress};
use stackproof_crypto::LocalSigner;

use crate::events::{EventHub, EventKind, ProviderEvent, Subscription};
use crate::provider::{parse_sign_params, ProviderError, WalletProvider};

#[derive(Debug)]
struct MockState {
    chain_id: ChainId,
    accounts: Vec<EthAddress>,
    signers: HashMap<String, LocalSigner>,
    authorized: bool,
    deny_accounts: bool,
    deny_connect: bool,
    deny_sign: bool,
    fail_transport: bool,
    requests: Vec<String>,
}

/// In-memory wallet agent with scriptable behavior.
#[derive(Debug, Clone)]
pub struct MockWalletProvider {
    inner: Arc<Mutex<MockState>>,
    hub: EventHub,
}

impl MockWalletProvider {
    /// A wallet on `chain_id` with no accounts configured.
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockState {
                chain_id,
                accounts: Vec::new(),
                signers: HashMap::new(),
                authorized: false,
                deny_accounts: false,
                deny_connect: false,
                deny_sign: false,
                fail_transport: false,
                requests: Vec::new(),
            })),
            hub: EventHub::new(),
        }
    }

    /// Add an account backed by `signer`. The account is known to the
    /// wallet but not yet authorized for the caller; `eth_requestAccounts`
    /// (or [`authorize_all`](Self::authorize_all)) grants access.
    pub fn with_signer(self, signer: LocalSigner) -> Self {
        {
            let mut state = self.inner.lock();
            let address = signer.address().clone();
            state.accounts.push(address.clone());
            state.signers.insert(key(&address), signer);
        }
        self
    }

    /// Mark all configured accounts as already authorized, as if the user
    /// had approved a connect in an earlier visit.
    pub fn authorize_all(&self) {
        self.inner.lock().authorized = true;
    }

    /// Make `eth_accounts` report a user rejection.
    pub fn deny_accounts(&self, deny: bool) {
        self.inner.lock().deny_accounts = deny;
    }

    /// Make `eth_requestAccounts` report a user rejection.
    pub fn deny_connect(&self, deny: bool) {
        self.inner.lock().deny_connect = deny;
    }

    /// Make `personal_sign` report a user rejection.
    pub fn deny_sign(&self, deny: bool) {
        self.inner.lock().deny_sign = deny;
    }

    /// Fail every request at the transport layer.
    pub fn fail_transport(&self, fail: bool) {
        self.inner.lock().fail_transport = fail;
    }

    /// Switch the wallet's active account to `signer`, keeping earlier
    /// keys available for signing, and notify listeners.
    pub fn switch_account(&self, signer: LocalSigner) {
        let address = signer.address().clone();
        {
            let mut state = self.inner.lock();
            state.accounts = vec![address.clone()];
            state.signers.insert(key(&address), signer);
            state.authorized = true;
        }
        self.hub
            .emit(ProviderEvent::AccountsChanged(vec![address.as_str().to_string()]));
    }

    /// Switch the wallet to `chain_id` and notify listeners.
    pub fn switch_chain(&self, chain_id: ChainId) {
        self.inner.lock().chain_id = chain_id;
        self.hub
            .emit(ProviderEvent::ChainChanged(chain_id.to_hex_quantity()));
    }

    /// Revoke the caller's authorization and notify listeners with an
    /// empty account list.
    pub fn revoke(&self) {
        self.inner.lock().authorized = false;
        self.hub.emit(ProviderEvent::AccountsChanged(vec![]));
    }

    /// Inject a raw notification, bypassing state changes.
    pub fn emit(&self, event: ProviderEvent) {
        self.hub.emit(event);
    }

    /// Every method requested so far, in order.
    pub fn recorded_methods(&self) -> Vec<String> {
        self.inner.lock().requests.clone()
    }

    /// Live subscriptions registered against this wallet.
    pub fn subscriber_count(&self) -> usize {
        self.hub.subscriber_count()
    }
}

impl WalletProvider for MockWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        let mut state = self.inner.lock();
        state.requests.push(method.to_string());
        if state.fail_transport {
            return Err(ProviderError::Transport {
                reason: "mock transport failure".to_string(),
            });
        }
        match method {
            "eth_accounts" => {
                if state.deny_accounts {
                    return Err(ProviderError::UserRejected);
                }
                if state.authorized {
                    Ok(account_list(&state.accounts))
                } else {
                    Ok(json!([]))
                }
            }
            "eth_requestAccounts" => {
                if state.deny_connect {
                    return Err(ProviderError::UserRejected);
                }
                state.authorized = true;
                Ok(account_list(&state.accounts))
            }
            "eth_chainId" => Ok(json!(state.chain_id.to_hex_quantity())),
            "personal_sign" => {
                if state.deny_sign {
                    return Err(ProviderError::UserRejected);
                }
                let (message, address) = parse_sign_params(&params)?;
                let signer = state.signers.get(&key(&address)).ok_or_else(|| {
                    ProviderError::Rpc {
                        code: -32000,
                        message: format!("unknown account {address}"),
                    }
                })?;
                let signature = signer.sign_personal(&message).map_err(|e| ProviderError::Rpc {
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

fn key(address: &EthAddress) -> String {
    address.as_str().to_ascii_lowercase()
}

fn account_list(accounts: &[EthAddress]) -> Value {
    Value::Array(
        accounts
            .iter()
            .map(|a| Value::String(a.as_str().to_string()))
            .collect(),
    )
}
