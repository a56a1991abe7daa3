//! Credential issuance over a live wallet session.
//!
//! Issuance is the one place the session and the codec meet: a payload is
//! built from the connected identity, rendered to the canonical message,
//! signed through the wallet, and packaged as a [`Credential`]. The wallet
//! may switch accounts or chains while its signing prompt is open, so the
//! session is re-checked after the signature lands and a credential is
//! only produced when the identity still stands.

use thiserror::Error;

use stackproof_core::{EthAddress, IssuedAt};
use stackproof_credential::{canonical_message, Credential, CredentialPayload};

use crate::provider::{sign_message, ProviderError, WalletProvider};
use crate::session::{SessionManager, WalletSession};

/// Failures while issuing a credential.
#[derive(Debug, Error)]
pub enum IssueError {
    /// The session holds no authorized account.
    #[error("no wallet connected")]
    NotConnected,

    /// The user declined the signing prompt.
    #[error("signing rejected by the user")]
    SigningRejected,

    /// The wallet switched identity while the signing prompt was open.
    #[error("session changed while signing: expected {expected}, session is now {current}")]
    StaleSession {
        expected: EthAddress,
        current: WalletSession,
    },

    /// Provider fault during issuance.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Issue a credential for the session's connected identity, timestamped
/// at `issued_at`.
///
/// The payload pins the address, chain, timestamp, and a fresh random
/// nonce; the wallet signs the canonical message rendering. After the
/// signature returns, queued notifications are drained and the session is
/// compared against the payload: a credential signed under an identity
/// the session no longer holds is discarded as [`IssueError::StaleSession`].
pub async fn issue_credential<P: WalletProvider>(
    session: &mut SessionManager<P>,
    issued_at: IssuedAt,
) -> Result<Credential, IssueError> {
    let WalletSession::Connected { address, chain_id } = session.state().clone() else {
        return Err(IssueError::NotConnected);
    };

    let payload = CredentialPayload::build(&address, chain_id, issued_at);
    let message = canonical_message(&payload);
    tracing::debug!(address = %payload.address, chain = %payload.chain_id, "requesting wallet signature");

    let signature = {
        let Some(provider) = session.provider() else {
            return Err(IssueError::NotConnected);
        };
        match sign_message(provider, &message, &payload.address).await {
            Ok(signature) => signature,
            Err(e) if e.is_user_rejected() => return Err(IssueError::SigningRejected),
            Err(e) => return Err(IssueError::Provider(e)),
        }
    };

    session.process_pending().await?;
    match session.state() {
        WalletSession::Connected {
            address: current,
            chain_id: current_chain,
        } if current.matches(&payload.address) && *current_chain == payload.chain_id => {
            tracing::debug!(address = %payload.address, "credential signed");
            Ok(Credential::assemble(payload, signature))
        }
        current => Err(IssueError::StaleSession {
            expected: payload.address.clone(),
            current: current.clone(),
        }),
    }
}
