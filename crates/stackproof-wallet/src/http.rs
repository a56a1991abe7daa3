//! HTTP JSON-RPC wallet provider.
//!
//! Talks to a node or wallet daemon that exposes the Ethereum JSON-RPC
//! surface over HTTP, such as a local dev node with unlocked accounts.
//! Headless environments have no push channel for wallet notifications,
//! so change detection is polling-based and opt-in via
//! [`HttpWalletProvider::with_account_watch`].

use std::time::Duration;

use serde_json::{json, Value};
use url::Url;

use crate::events::{EventHub, EventKind, ProviderEvent, Subscription};
use crate::provider::{ProviderError, WalletProvider};

/// Configuration for [`HttpWalletProvider`].
#[derive(Debug, Clone)]
pub struct HttpProviderConfig {
    /// JSON-RPC endpoint URL.
    pub rpc_url: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Poll cadence for account and chain watching, when enabled.
    pub poll_interval_ms: u64,
}

impl HttpProviderConfig {
    /// Configuration with defaults: 30s request timeout, 2s poll cadence.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            timeout_secs: 30,
            poll_interval_ms: 2_000,
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn with_poll_interval(mut self, ms: u64) -> Self {
        self.poll_interval_ms = ms;
        self
    }
}

/// Wallet provider backed by an HTTP JSON-RPC endpoint.
#[derive(Debug)]
pub struct HttpWalletProvider {
    client: reqwest::Client,
    config: HttpProviderConfig,
    hub: EventHub,
    watch: Option<WatchHandle>,
}

impl HttpWalletProvider {
    /// Build a provider for the configured endpoint.
    ///
    /// Fails with [`ProviderError::Unavailable`] when the URL is not a
    /// well-formed `http` or `https` endpoint.
    pub fn new(config: HttpProviderConfig) -> Result<Self, ProviderError> {
        let url = Url::parse(&config.rpc_url).map_err(|e| ProviderError::Unavailable {
            reason: format!("invalid RPC URL {}: {e}", config.rpc_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ProviderError::Unavailable {
                reason: format!("unsupported RPC URL scheme: {}", url.scheme()),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Unavailable {
                reason: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self {
            client,
            config,
            hub: EventHub::new(),
            watch: None,
        })
    }

    /// Start polling `eth_accounts` and `eth_chainId` in the background,
    /// emitting change notifications through this provider's
    /// subscriptions. The first observation primes the baseline without
    /// emitting. Requires a running Tokio runtime; the poll task stops
    /// when the provider is dropped.
    pub fn with_account_watch(mut self) -> Self {
        let client = self.client.clone();
        let config = self.config.clone();
        let hub = self.hub.clone();
        let handle = tokio::spawn(async move {
            let cadence = Duration::from_millis(config.poll_interval_ms);
            let mut last_accounts: Option<Vec<String>> = None;
            let mut last_chain: Option<String> = None;
            loop {
                match rpc_call(&client, &config.rpc_url, "eth_accounts", json!([])).await {
                    Ok(value) => {
                        let accounts = string_list(&value);
                        if last_accounts.as_ref().is_some_and(|prev| *prev != accounts) {
                            tracing::debug!(count = accounts.len(), "watched account set changed");
                            hub.emit(ProviderEvent::AccountsChanged(accounts.clone()));
                        }
                        last_accounts = Some(accounts);
                    }
                    Err(e) => tracing::debug!(error = %e, "account watch poll failed"),
                }
                match rpc_call(&client, &config.rpc_url, "eth_chainId", json!([])).await {
                    Ok(value) => {
                        if let Some(chain) = value.as_str() {
                            let chain = chain.to_string();
                            if last_chain.as_ref().is_some_and(|prev| *prev != chain) {
                                tracing::debug!(chain = %chain, "watched chain changed");
                                hub.emit(ProviderEvent::ChainChanged(chain.clone()));
                            }
                            last_chain = Some(chain);
                        }
                    }
                    Err(e) => tracing::debug!(error = %e, "chain watch poll failed"),
                }
                tokio::time::sleep(cadence).await;
            }
        });
        self.watch = Some(WatchHandle(handle));
        self
    }

    /// Whether the background watch task is running.
    pub fn is_watching(&self) -> bool {
        self.watch.is_some()
    }
}

impl WalletProvider for HttpWalletProvider {
    async fn request(&self, method: &str, params: Value) -> Result<Value, ProviderError> {
        rpc_call(&self.client, &self.config.rpc_url, method, params).await
    }

    fn subscribe(&self, kind: EventKind) -> Subscription {
        self.hub.subscribe(kind)
    }
}

#[derive(Debug)]
struct WatchHandle(tokio::task::JoinHandle<()>);

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn rpc_call(
    client: &reqwest::Client,
    rpc_url: &str,
    method: &str,
    params: Value,
) -> Result<Value, ProviderError> {
    let body = json!({
        "jsonrpc": "2.0",
        "method": method,
        "params": params,
        "id": 1,
    });
    tracing::debug!(method, "dispatching JSON-RPC request");

    let response = client.post(rpc_url).json(&body).send().await.map_err(|e| {
        if e.is_connect() {
            ProviderError::Unavailable {
                reason: format!("cannot reach {rpc_url}: {e}"),
            }
        } else if e.is_timeout() {
            ProviderError::Transport {
                reason: format!("request to {rpc_url} timed out"),
            }
        } else {
            ProviderError::Transport {
                reason: e.to_string(),
            }
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProviderError::Transport {
            reason: format!("HTTP {status} from {rpc_url}"),
        });
    }

    let json: Value = response
        .json()
        .await
        .map_err(|e| ProviderError::InvalidResponse {
            reason: format!("invalid JSON from {rpc_url}: {e}"),
        })?;
    interpret_response(json)
}

/// Split a JSON-RPC response envelope into its result, classifying error
/// objects (including the EIP-1193 user-rejection code).
fn interpret_response(json: Value) -> Result<Value, ProviderError> {
    if let Some(error) = json.get("error") {
        let code = error.get("code").and_then(Value::as_i64).unwrap_or(-1);
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("unknown RPC error")
            .to_string();
        return Err(ProviderError::from_rpc(code, message));
    }
    json.get("result")
        .cloned()
        .ok_or_else(|| ProviderError::InvalidResponse {
            reason: "JSON-RPC response missing 'result' field".to_string(),
        })
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| entry.as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- configuration --

    #[test]
    fn config_defaults() {
        let config = HttpProviderConfig::new("http://localhost:8545");
        assert_eq!(config.rpc_url, "http://localhost:8545");
        assert_eq!(config.timeout_secs, 30);
        assert_eq!(config.poll_interval_ms, 2_000);
    }

    #[test]
    fn config_builders_override_defaults() {
        let config = HttpProviderConfig::new("http://localhost:8545")
            .with_timeout(5)
            .with_poll_interval(250);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.poll_interval_ms, 250);
    }

    #[test]
    fn malformed_url_is_rejected() {
        let err = HttpWalletProvider::new(HttpProviderConfig::new("not a url")).unwrap_err();
        match err {
            ProviderError::Unavailable { reason } => assert!(reason.contains("invalid RPC URL")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let err =
            HttpWalletProvider::new(HttpProviderConfig::new("ws://localhost:8546")).unwrap_err();
        match err {
            ProviderError::Unavailable { reason } => assert!(reason.contains("scheme")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    // -- response interpretation --

    #[test]
    fn result_is_extracted() {
        let value = interpret_response(json!({"jsonrpc": "2.0", "id": 1, "result": "0x1"})).unwrap();
        assert_eq!(value, json!("0x1"));
    }

    #[test]
    fn null_result_is_still_a_result() {
        let value =
            interpret_response(json!({"jsonrpc": "2.0", "id": 1, "result": null})).unwrap();
        assert_eq!(value, Value::Null);
    }

    #[test]
    fn error_objects_become_rpc_errors() {
        let err = interpret_response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": -32601, "message": "method not found"}
        }))
        .unwrap_err();
        assert!(matches!(err, ProviderError::Rpc { code: -32601, .. }));
    }

    #[test]
    fn rejection_code_becomes_user_rejected() {
        let err = interpret_response(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": {"code": 4001, "message": "User rejected the request."}
        }))
        .unwrap_err();
        assert!(err.is_user_rejected());
    }

    #[test]
    fn shapeless_error_objects_still_classify() {
        let err = interpret_response(json!({"error": {}})).unwrap_err();
        match err {
            ProviderError::Rpc { code, message } => {
                assert_eq!(code, -1);
                assert_eq!(message, "unknown RPC error");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_invalid() {
        let err = interpret_response(json!({"jsonrpc": "2.0", "id": 1})).unwrap_err();
        assert!(matches!(err, ProviderError::InvalidResponse { .. }));
    }

    #[test]
    fn string_lists_tolerate_junk_entries() {
        assert_eq!(
            string_list(&json!(["0xaa", 7, "0xbb"])),
            vec!["0xaa".to_string(), "0xbb".to_string()]
        );
        assert!(string_list(&json!("not an array")).is_empty());
    }

    // -- transport --

    #[tokio::test]
    async fn unreachable_endpoint_reports_unavailable() {
        // Port 1 is never listening.
        let provider = HttpWalletProvider::new(
            HttpProviderConfig::new("http://127.0.0.1:1").with_timeout(2),
        )
        .unwrap();
        let err = provider
            .request("eth_chainId", json!([]))
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Unavailable { .. }));
    }

    #[tokio::test]
    async fn account_watch_spawns_and_stops_with_the_provider() {
        let provider = HttpWalletProvider::new(
            HttpProviderConfig::new("http://127.0.0.1:1").with_poll_interval(50),
        )
        .unwrap()
        .with_account_watch();
        assert!(provider.is_watching());
        drop(provider);
    }
}
