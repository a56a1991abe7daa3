//! # Issue CLI — obtain a signed participation credential.
//!
//! Builds the payload for the connected identity, has the wallet sign the
//! canonical message, and writes the credential JSON. The signer comes
//! from one of three sources: a JSON-RPC endpoint (a node or wallet
//! daemon), a key file, or a key in an environment variable.
//!
//! ## Usage
//!
//! ```bash
//! # Sign through a local node with unlocked accounts:
//! stackproof issue --rpc-url http://localhost:8545
//!
//! # Ask the wallet daemon for authorization first:
//! stackproof issue --rpc-url http://localhost:8545 --connect
//!
//! # Headless signing with a key file:
//! stackproof issue --key signer.key --chain-id 11155111 --out proof.json
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use stackproof_core::{ChainId, IssuedAt};
use stackproof_credential::Credential;
use stackproof_wallet::{
    issue_credential, HttpProviderConfig, HttpWalletProvider, KeyWalletProvider, SessionManager,
    WalletProvider, WalletSession,
};

use crate::DEFAULT_EXPORT_FILENAME;

/// Issue subcommand arguments.
#[derive(Args, Debug)]
pub struct IssueArgs {
    /// JSON-RPC endpoint of the wallet agent or node.
    #[arg(
        long,
        required_unless_present_any = ["key", "key_env"],
        conflicts_with_all = ["key", "key_env"]
    )]
    pub rpc_url: Option<String>,

    /// File holding a hex-encoded signing key (headless mode).
    #[arg(long, conflicts_with = "key_env")]
    pub key: Option<PathBuf>,

    /// Environment variable holding a hex-encoded signing key (headless mode).
    #[arg(long)]
    pub key_env: Option<String>,

    /// Chain id to record in headless mode (default 1). With --rpc-url the
    /// node reports its own chain and this flag is ignored.
    #[arg(long)]
    pub chain_id: Option<u64>,

    /// Request account authorization if none is granted yet (may prompt).
    #[arg(long)]
    pub connect: bool,

    /// HTTP request timeout in seconds.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,

    /// Write the credential JSON to this file instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

/// Execute the issue subcommand.
pub async fn run_issue(args: &IssueArgs, output_dir: Option<&Path>) -> Result<u8> {
    let credential = if let Some(rpc_url) = &args.rpc_url {
        if args.chain_id.is_some() {
            tracing::warn!("--chain-id is ignored with --rpc-url; the node reports its own chain");
        }
        let config = HttpProviderConfig::new(rpc_url).with_timeout(args.timeout_secs);
        let provider = HttpWalletProvider::new(config)?;
        issue_with(provider, args.connect).await?
    } else {
        let chain_id = ChainId::new(args.chain_id.unwrap_or(ChainId::MAINNET.as_u64()));
        let provider = match (&args.key, &args.key_env) {
            (Some(path), _) => KeyWalletProvider::from_file(path, chain_id)
                .with_context(|| format!("failed to load signing key from {}", path.display()))?,
            (None, Some(var)) => KeyWalletProvider::from_env(var, chain_id)
                .with_context(|| format!("failed to load signing key from ${var}"))?,
            (None, None) => {
                anyhow::bail!("one of --rpc-url, --key, or --key-env is required")
            }
        };
        issue_with(provider, args.connect).await?
    };

    let json = credential.to_json_pretty()?;
    match resolve_out(args.out.as_deref(), output_dir) {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create output directory: {}", parent.display())
                })?;
            }
            std::fs::write(&path, format!("{json}\n"))
                .with_context(|| format!("failed to write credential: {}", path.display()))?;

            println!("  account: {}", credential.payload.address);
            println!("  chain:   {}", credential.payload.chain_id);
            println!("  issued:  {}", credential.payload.issued_at);
            println!("  wrote:   {}", path.display());
        }
        // Bare JSON on stdout so the output pipes cleanly.
        None => println!("{json}"),
    }
    Ok(0)
}

/// Drive a session over any provider to a signed credential.
async fn issue_with<P: WalletProvider>(provider: P, connect: bool) -> Result<Credential> {
    let mut manager = SessionManager::attach(provider).await?;
    if !manager.state().is_connected() && connect {
        manager.connect().await?;
    }
    match manager.state() {
        WalletSession::Connected { address, chain_id } => {
            tracing::info!(address = %address, chain = %chain_id, "issuing credential");
        }
        WalletSession::Disconnected if connect => {
            anyhow::bail!("the wallet declined the connection request")
        }
        WalletSession::Disconnected => {
            anyhow::bail!("no account authorized; pass --connect to request access")
        }
        WalletSession::Unavailable => anyhow::bail!("no wallet available"),
    }
    Ok(issue_credential(&mut manager, IssuedAt::now()).await?)
}

fn resolve_out(out: Option<&Path>, output_dir: Option<&Path>) -> Option<PathBuf> {
    match (out, output_dir) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(dir)) => Some(dir.join(DEFAULT_EXPORT_FILENAME)),
        (None, None) => None,
    }
}
