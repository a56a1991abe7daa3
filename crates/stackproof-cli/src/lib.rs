//! # stackproof-cli — CLI Tool for StackProof
//!
//! Provides the `stackproof` command-line interface: probe a wallet
//! session, issue a signed participation credential, and verify or
//! inspect credential files offline.
//!
//! ## Subcommands
//!
//! - `stackproof status` — Wallet session state with an actionable hint.
//! - `stackproof issue` — Issue a credential over JSON-RPC or a local key.
//! - `stackproof verify` — Offline verification with scriptable exit codes.
//! - `stackproof inspect` — Print a credential file without verifying it.
//!
//! ```bash
//! stackproof status --rpc-url http://localhost:8545
//! stackproof issue --rpc-url http://localhost:8545 --connect
//! stackproof issue --key signer.key --chain-id 11155111 --out proof.json
//! stackproof verify proof.json
//! ```

pub mod inspect;
pub mod issue;
pub mod status;
pub mod verify;

/// Default filename for exported credentials, matching the name wallets
/// and verifiers expect.
pub const DEFAULT_EXPORT_FILENAME: &str = "stackproof.json";
