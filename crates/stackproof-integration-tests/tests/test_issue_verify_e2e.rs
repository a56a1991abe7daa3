//! # Credential Issuance — End-to-End Integration Tests
//!
//! Exercises the full credential lifecycle across crates:
//! 1. Attach a session to a wallet provider
//! 2. Authorize an account and issue a credential
//! 3. Export the credential to its JSON interchange form
//! 4. Re-import with nothing but the credential crate and verify offline
//! 5. Session upheaval between prompt and packaging → issuance refuses

use stackproof_core::{ChainId, IssuedAt};
use stackproof_credential::{verify, Credential, Verdict};
use stackproof_crypto::LocalSigner;
use stackproof_wallet::{
    issue_credential, IssueError, MockWalletProvider, SessionManager, WalletSession,
};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn signer(seed: u8) -> LocalSigner {
    LocalSigner::from_seed(&[seed; 32]).unwrap()
}

async fn connected(mock: &MockWalletProvider) -> SessionManager<MockWalletProvider> {
    let mut manager = SessionManager::attach(mock.clone()).await.unwrap();
    manager.connect().await.unwrap();
    assert!(manager.state().is_connected(), "fixture must connect");
    manager
}

// ---------------------------------------------------------------------------
// 1. The happy path: issue, export, re-import, verify
// ---------------------------------------------------------------------------

#[tokio::test]
async fn issue_export_import_verify() {
    let signer = signer(101);
    let address = signer.address().clone();
    let mock = MockWalletProvider::new(ChainId::new(8453)).with_signer(signer);

    let mut manager = connected(&mock).await;
    let credential = issue_credential(&mut manager, IssuedAt::now()).await.unwrap();

    assert!(credential.payload.address.matches(&address));
    assert_eq!(credential.payload.chain_id.as_u64(), 8453);
    assert!(credential.message.contains("chainId: 8453"));

    // Export, then verify from the JSON alone. The wallet and the session
    // are gone by the time the verifier runs.
    let exported = credential.to_json_pretty().unwrap();
    drop(manager);
    drop(mock);

    let imported = Credential::from_json(&exported).unwrap();
    assert_eq!(imported, credential);
    assert_eq!(verify(&imported).unwrap(), Verdict::Valid);
}

#[tokio::test]
async fn each_issuance_gets_a_fresh_nonce() {
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(signer(102));
    let mut manager = connected(&mock).await;

    let first = issue_credential(&mut manager, IssuedAt::now()).await.unwrap();
    let second = issue_credential(&mut manager, IssuedAt::now()).await.unwrap();

    assert_ne!(first.payload.nonce, second.payload.nonce);
    assert_ne!(first.message, second.message);
    assert_eq!(verify(&first).unwrap(), Verdict::Valid);
    assert_eq!(verify(&second).unwrap(), Verdict::Valid);
}

// ---------------------------------------------------------------------------
// 2. Signing refusals
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rejected_signature_yields_no_credential() {
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(signer(103));
    let mut manager = connected(&mock).await;

    mock.deny_sign(true);
    let err = issue_credential(&mut manager, IssuedAt::now()).await.unwrap_err();
    assert!(matches!(err, IssueError::SigningRejected));

    // The prompt reached the wallet before it was declined.
    assert!(mock.recorded_methods().contains(&"personal_sign".to_string()));

    // A decline is not a disconnect.
    assert!(manager.state().is_connected());
}

#[tokio::test]
async fn disconnected_session_cannot_issue() {
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(signer(104));
    let mut manager = SessionManager::attach(mock.clone()).await.unwrap();
    assert_eq!(*manager.state(), WalletSession::Disconnected);

    let err = issue_credential(&mut manager, IssuedAt::now()).await.unwrap_err();
    assert!(matches!(err, IssueError::NotConnected));
    assert!(!mock.recorded_methods().contains(&"personal_sign".to_string()));
}

// ---------------------------------------------------------------------------
// 3. Session upheaval between the prompt and packaging
// ---------------------------------------------------------------------------

#[tokio::test]
async fn account_switch_during_issuance_is_stale() {
    let original = signer(105);
    let original_address = original.address().clone();
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(original);
    let mut manager = connected(&mock).await;

    // The user switches accounts while the signing prompt is open. The old
    // key still answers the in-flight prompt, but the session has moved on.
    mock.switch_account(signer(106));

    match issue_credential(&mut manager, IssuedAt::now()).await.unwrap_err() {
        IssueError::StaleSession { expected, current } => {
            assert!(expected.matches(&original_address));
            assert!(current.is_connected());
        }
        other => panic!("expected StaleSession, got {other:?}"),
    }
}

#[tokio::test]
async fn revocation_during_issuance_is_stale() {
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(signer(107));
    let mut manager = connected(&mock).await;

    mock.revoke();

    match issue_credential(&mut manager, IssuedAt::now()).await.unwrap_err() {
        IssueError::StaleSession { current, .. } => {
            assert_eq!(current, WalletSession::Disconnected);
        }
        other => panic!("expected StaleSession, got {other:?}"),
    }
}

#[tokio::test]
async fn chain_switch_during_issuance_is_stale() {
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(signer(108));
    let mut manager = connected(&mock).await;

    mock.switch_chain(ChainId::new(11_155_111));

    let err = issue_credential(&mut manager, IssuedAt::now()).await.unwrap_err();
    assert!(matches!(err, IssueError::StaleSession { .. }));
}

#[tokio::test]
async fn session_issues_again_after_staleness() {
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(signer(109));
    let mut manager = connected(&mock).await;

    let replacement = signer(110);
    let replacement_address = replacement.address().clone();
    mock.switch_account(replacement);

    let err = issue_credential(&mut manager, IssuedAt::now()).await.unwrap_err();
    assert!(matches!(err, IssueError::StaleSession { .. }));

    // Staleness settled the session onto the new identity; the next
    // issuance binds it.
    let credential = issue_credential(&mut manager, IssuedAt::now()).await.unwrap();
    assert!(credential.payload.address.matches(&replacement_address));
    assert_eq!(verify(&credential).unwrap(), Verdict::Valid);
}

// ---------------------------------------------------------------------------
// 4. The credential binds what the wallet reported, not what anyone typed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn issued_at_is_embedded_verbatim() {
    let mock = MockWalletProvider::new(ChainId::MAINNET).with_signer(signer(111));
    let mut manager = connected(&mock).await;

    let issued_at = IssuedAt::new("2026-08-25T09:30:00.000Z").unwrap();
    let credential = issue_credential(&mut manager, issued_at).await.unwrap();

    assert_eq!(credential.payload.issued_at.as_str(), "2026-08-25T09:30:00.000Z");
    assert!(credential.message.contains("issuedAt: 2026-08-25T09:30:00.000Z"));
    assert_eq!(verify(&credential).unwrap(), Verdict::Valid);
}
