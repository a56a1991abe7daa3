//! # Inspect CLI — print a credential file without judging it.
//!
//! Decodes a credential JSON file and prints its payload fields, the
//! stored canonical message, and the signature. No verification happens;
//! use `stackproof verify` for a verdict.
//!
//! ## Usage
//!
//! ```bash
//! stackproof inspect proof.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stackproof_credential::Credential;

/// Inspect subcommand arguments.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Credential JSON file to inspect.
    pub file: PathBuf,
}

/// Execute the inspect subcommand.
pub fn run_inspect(args: &InspectArgs) -> Result<u8> {
    let raw = match std::fs::read_to_string(&args.file) {
        Ok(raw) => raw,
        Err(e) => {
            println!("  error:   cannot read {}: {e}", args.file.display());
            return Ok(2);
        }
    };
    let credential = match Credential::from_json(&raw) {
        Ok(credential) => credential,
        Err(e) => {
            println!("  error:   malformed credential: {e}");
            return Ok(2);
        }
    };

    let payload = &credential.payload;
    println!("  app:       {}", payload.app);
    println!("  purpose:   {}", payload.purpose);
    println!("  version:   {}", payload.version);
    println!("  account:   {}", payload.address);
    println!(
        "  chain:     {} ({})",
        payload.chain_id,
        payload.chain_id.to_hex_quantity()
    );
    println!("  issued:    {}", payload.issued_at);
    println!("  nonce:     {}", payload.nonce);
    println!(
        "  signature: {} (v={})",
        credential.signature.to_hex(),
        credential.signature.v()
    );
    println!();
    println!("  message:");
    for line in credential.message.lines() {
        println!("    {line}");
    }
    Ok(0)
}
