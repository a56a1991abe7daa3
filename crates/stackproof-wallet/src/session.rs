//! Wallet session state machine.
//!
//! A session tracks whether a wallet agent is present, whether an account
//! is authorized, and which chain the wallet points at. State is always
//! re-derived from the provider (`eth_accounts` + `eth_chainId`) rather
//! than accumulated from notifications, so the session converges on the
//! wallet's live state even when notifications race each other.

use std::fmt;

use stackproof_core::{ChainId, EthAddress};

use crate::events::{EventKind, ProviderEvent, Subscription};
use crate::provider::{active_chain, list_accounts, request_accounts, ProviderError, WalletProvider};

/// Connection state of a wallet session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletSession {
    /// No wallet agent is present in the environment.
    Unavailable,
    /// An agent is present but no account is authorized.
    Disconnected,
    /// An account is authorized and active on `chain_id`.
    Connected {
        address: EthAddress,
        chain_id: ChainId,
    },
}

impl WalletSession {
    pub fn is_connected(&self) -> bool {
        matches!(self, WalletSession::Connected { .. })
    }

    /// The connected identity, if any.
    pub fn connected(&self) -> Option<(&EthAddress, ChainId)> {
        match self {
            WalletSession::Connected { address, chain_id } => Some((address, *chain_id)),
            _ => None,
        }
    }
}

impl fmt::Display for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletSession::Unavailable => write!(f, "unavailable"),
            WalletSession::Disconnected => write!(f, "disconnected"),
            WalletSession::Connected { address, chain_id } => {
                write!(f, "connected ({address}, chain {chain_id})")
            }
        }
    }
}

/// Drives a [`WalletSession`] against a concrete provider.
///
/// The manager owns the provider and two subscriptions (account and chain
/// notifications). `state` is `Unavailable` exactly when no provider is
/// attached; with a provider, it is whatever the last probe or connect
/// derived. Queued notifications only take effect when
/// [`process_pending`](SessionManager::process_pending) is called.
#[derive(Debug)]
pub struct SessionManager<P: WalletProvider> {
    provider: Option<P>,
    state: WalletSession,
    accounts_sub: Option<Subscription>,
    chain_sub: Option<Subscription>,
}

impl<P: WalletProvider> SessionManager<P> {
    /// A session for an environment with no wallet agent at all.
    ///
    /// The state is pinned to [`WalletSession::Unavailable`];
    /// [`connect`](SessionManager::connect) is a no-op. Attaching a
    /// provider later means building a fresh manager with
    /// [`attach`](SessionManager::attach).
    pub fn detached() -> Self {
        Self {
            provider: None,
            state: WalletSession::Unavailable,
            accounts_sub: None,
            chain_sub: None,
        }
    }

    /// Attach to a provider: subscribe to its notifications and probe the
    /// initial state.
    pub async fn attach(provider: P) -> Result<Self, ProviderError> {
        let accounts_sub = provider.subscribe(EventKind::AccountsChanged);
        let chain_sub = provider.subscribe(EventKind::ChainChanged);
        let mut manager = Self {
            provider: Some(provider),
            state: WalletSession::Disconnected,
            accounts_sub: Some(accounts_sub),
            chain_sub: Some(chain_sub),
        };
        manager.probe().await?;
        Ok(manager)
    }

    pub fn state(&self) -> &WalletSession {
        &self.state
    }

    /// The attached provider, if any.
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_ref()
    }

    /// Re-derive the session state from the provider without prompting.
    ///
    /// Uses `eth_accounts`, which reports only accounts the user already
    /// authorized. An empty list lands in `Disconnected`; a wallet that
    /// gates even passive listing behind approval and reports a rejection
    /// is treated the same way. Transport faults propagate.
    pub async fn probe(&mut self) -> Result<&WalletSession, ProviderError> {
        let Some(provider) = &self.provider else {
            self.state = WalletSession::Unavailable;
            return Ok(&self.state);
        };
        let accounts = match list_accounts(provider).await {
            Ok(accounts) => accounts,
            Err(e) if e.is_user_rejected() => {
                tracing::warn!("account probe rejected by the user");
                self.state = WalletSession::Disconnected;
                return Ok(&self.state);
            }
            Err(e) => return Err(e),
        };
        self.state = match accounts.into_iter().next() {
            Some(address) => {
                let chain_id = active_chain(provider).await?;
                WalletSession::Connected { address, chain_id }
            }
            None => WalletSession::Disconnected,
        };
        tracing::debug!(state = %self.state, "session probed");
        Ok(&self.state)
    }

    /// Ask the wallet to authorize an account. May prompt the user.
    ///
    /// A user rejection (EIP-1193 code 4001) is a normal outcome, not an
    /// error: the session stays `Disconnected`.
    pub async fn connect(&mut self) -> Result<&WalletSession, ProviderError> {
        let Some(provider) = &self.provider else {
            return Ok(&self.state);
        };
        let accounts = match request_accounts(provider).await {
            Ok(accounts) => accounts,
            Err(e) if e.is_user_rejected() => {
                tracing::warn!("connect request declined by the user");
                self.state = WalletSession::Disconnected;
                return Ok(&self.state);
            }
            Err(e) => return Err(e),
        };
        self.state = match accounts.into_iter().next() {
            Some(address) => {
                let chain_id = active_chain(provider).await?;
                WalletSession::Connected { address, chain_id }
            }
            None => WalletSession::Disconnected,
        };
        tracing::debug!(state = %self.state, "connect completed");
        Ok(&self.state)
    }

    /// Drain queued notifications and bring the state up to date.
    ///
    /// An account notification whose first entry is a plausible address,
    /// or any chain notification, triggers a fresh probe. An account
    /// notification with no such entry is a revocation and moves the
    /// session straight to `Disconnected`. When both arrive, the probe
    /// wins, since it reflects the provider's live answer.
    pub async fn process_pending(&mut self) -> Result<&WalletSession, ProviderError> {
        let mut reprobe = false;
        let mut revoked = false;
        if let Some(sub) = &mut self.accounts_sub {
            while let Some(event) = sub.try_next() {
                match event {
                    ProviderEvent::AccountsChanged(accounts) => {
                        if accounts.first().is_some_and(|a| a.starts_with("0x")) {
                            reprobe = true;
                        } else {
                            revoked = true;
                        }
                    }
                    ProviderEvent::ChainChanged(_) => reprobe = true,
                }
            }
        }
        if let Some(sub) = &mut self.chain_sub {
            while sub.try_next().is_some() {
                reprobe = true;
            }
        }
        if reprobe {
            self.probe().await
        } else if revoked {
            tracing::debug!("wallet revoked account access");
            self.state = WalletSession::Disconnected;
            Ok(&self.state)
        } else {
            Ok(&self.state)
        }
    }
}
