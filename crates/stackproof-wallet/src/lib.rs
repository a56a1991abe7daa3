//! # stackproof-wallet — Wallet Session and Signing Protocol
//!
//! Everything between a credential and the wallet that signs it:
//!
//! - **[`WalletProvider`]**: the EIP-1193 seam. Raw `request` dispatch plus
//!   change subscriptions, with typed helpers for the four methods the
//!   protocol uses (`eth_accounts`, `eth_requestAccounts`, `eth_chainId`,
//!   `personal_sign`).
//! - **[`SessionManager`]** / **[`WalletSession`]**: the session state
//!   machine. `Unavailable` without an agent, `Disconnected` until an
//!   account is authorized, `Connected` with the active address and chain.
//!   State is re-derived from the provider, never accumulated from
//!   notifications.
//! - **[`issue_credential`]**: the signing protocol. Builds the payload for
//!   the connected identity, obtains the personal signature, and refuses to
//!   package it if the session changed underneath the prompt.
//!
//! Three providers ship in-tree: [`HttpWalletProvider`] for JSON-RPC
//! endpoints, [`KeyWalletProvider`] for headless signing with a local key,
//! and [`MockWalletProvider`] for tests.

pub mod events;
pub mod http;
pub mod issuer;
pub mod keyed;
pub mod mock;
pub mod provider;
pub mod session;

// Re-export primary types.
pub use events::{EventHub, EventKind, ProviderEvent, Subscription};
pub use http::{HttpProviderConfig, HttpWalletProvider};
pub use issuer::{issue_credential, IssueError};
pub use keyed::KeyWalletProvider;
pub use mock::MockWalletProvider;
pub use provider::{
    active_chain, list_accounts, request_accounts, sign_message, ProviderError, WalletProvider,
    USER_REJECTED_CODE,
};
pub use session::{SessionManager, WalletSession};
