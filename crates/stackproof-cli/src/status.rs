//! # Status CLI — report the wallet session state.
//!
//! Attaches to a JSON-RPC endpoint, probes the session without prompting,
//! and prints the state with an actionable hint. An unreachable endpoint
//! is the `unavailable` state, not an error: "there is no wallet here" is
//! a legitimate answer to the question this command asks.
//!
//! ## Usage
//!
//! ```bash
//! stackproof status --rpc-url http://localhost:8545
//! ```

use anyhow::Result;
use clap::Args;

use stackproof_wallet::{
    HttpProviderConfig, HttpWalletProvider, ProviderError, SessionManager, WalletSession,
};

/// Status subcommand arguments.
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// JSON-RPC endpoint of the wallet agent or node.
    #[arg(long)]
    pub rpc_url: String,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

/// Execute the status subcommand.
pub async fn run_status(args: &StatusArgs) -> Result<u8> {
    let config = HttpProviderConfig::new(&args.rpc_url).with_timeout(args.timeout_secs);
    let provider = HttpWalletProvider::new(config)?;

    let state = match SessionManager::attach(provider).await {
        Ok(manager) => manager.state().clone(),
        Err(ProviderError::Unavailable { reason }) => {
            tracing::debug!(reason = %reason, "no wallet agent reachable");
            WalletSession::Unavailable
        }
        Err(e) => return Err(e.into()),
    };

    print_session(&args.rpc_url, &state);
    Ok(0)
}

fn print_session(rpc_url: &str, state: &WalletSession) {
    match state {
        WalletSession::Unavailable => {
            println!("  state:   unavailable");
            println!();
            println!(
                "No wallet found at {rpc_url}. Start an EIP-1193 compatible node \
                 or wallet daemon to continue."
            );
        }
        WalletSession::Disconnected => {
            println!("  state:   disconnected");
            println!();
            println!(
                "Connect a wallet to generate a proof: \
                 stackproof issue --rpc-url {rpc_url} --connect"
            );
        }
        WalletSession::Connected { address, chain_id } => {
            println!("  state:   connected");
            println!("  account: {address}");
            println!("  chain:   {} ({})", chain_id, chain_id.to_hex_quantity());
            println!();
            println!("Connected: {}", address.short());
        }
    }
}
