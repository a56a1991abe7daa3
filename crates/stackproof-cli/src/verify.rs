//! # Verify CLI — check a credential file offline.
//!
//! Runs the verification engine against a credential JSON file. No
//! network access; anyone holding the file can run this.
//!
//! Exit codes: `0` the credential is valid, `1` it is well-formed but not
//! valid, `2` the file cannot be read or parsed.
//!
//! ## Usage
//!
//! ```bash
//! stackproof verify proof.json
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use stackproof_credential::{verify, Credential, Verdict};

/// Verify subcommand arguments.
#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Credential JSON file to verify.
    pub file: PathBuf,
}

/// Execute the verify subcommand.
pub fn run_verify(args: &VerifyArgs) -> Result<u8> {
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

    match verify(&credential) {
        Ok(Verdict::Valid) => {
            println!("  verdict: valid");
            println!("  account: {}", credential.payload.address);
            println!("  chain:   {}", credential.payload.chain_id);
            println!("  issued:  {}", credential.payload.issued_at);
            Ok(0)
        }
        Ok(verdict) => {
            println!("  verdict: not valid ({verdict})");
            Ok(1)
        }
        Err(e) => {
            println!("  error:   malformed credential: {e}");
            Ok(2)
        }
    }
}
