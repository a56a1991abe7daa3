//! # stackproof CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.
//! Uses clap derive macros; the session-touching subcommands run on a
//! tokio runtime because wallet traffic is async end to end.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use stackproof_cli::inspect::{run_inspect, InspectArgs};
use stackproof_cli::issue::{run_issue, IssueArgs};
use stackproof_cli::status::{run_status, StatusArgs};
use stackproof_cli::verify::{run_verify, VerifyArgs};

/// StackProof CLI
///
/// Proof-of-participation credentials over EIP-191 personal signatures.
/// Issues credentials through a wallet (JSON-RPC endpoint or local key),
/// and verifies or inspects exported credential files offline.
#[derive(Parser, Debug)]
#[command(name = "stackproof", version = "0.1.0", about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Directory for exported credentials (issue writes stackproof.json here
    /// when --out is not given).
    #[arg(long, global = true)]
    output_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Report the wallet session state of a JSON-RPC endpoint.
    Status(StatusArgs),

    /// Issue a signed participation credential.
    Issue(IssueArgs),

    /// Verify a credential file offline (exit 0 valid, 1 not valid, 2 malformed).
    Verify(VerifyArgs),

    /// Print a credential file's payload, message, and signature without verifying.
    Inspect(InspectArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing based on verbosity level.
    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    tracing::debug!("stackproof CLI v0.1.0 starting");

    let result = match cli.command {
        Commands::Status(args) => run_status(&args).await,
        Commands::Issue(args) => run_issue(&args, cli.output_dir.as_deref()).await,
        Commands::Verify(args) => run_verify(&args),
        Commands::Inspect(args) => run_inspect(&args),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
