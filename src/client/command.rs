//! Raw command execution: URL encoding, retry with linear backoff, per-attempt
//! timeout and envelope parsing.

use crate::client::transport::{HttpTransport, Transport};
use crate::utils::serde_helpers::lenient_message;
use crate::utils::{ClientError, Result, TransportError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// Connection and retry settings for the node's RPC endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,
    /// Total attempts per command, `0` behaves like `1`.
    pub retries: u32,
    pub retry_delay_ms: u64,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            port: 9005,
            retries: 3,
            retry_delay_ms: 1000,
            timeout_ms: 30_000,
        }
    }
}

impl ClientConfig {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn attempts(&self) -> u32 {
        self.retries.max(1)
    }
}

/// The `{status, response, error}` wrapper around every node reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    #[serde(default)]
    pub status: bool,
    #[serde(default)]
    pub response: Value,
    #[serde(default, deserialize_with = "lenient_message", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Delay slept after failed attempt `attempt` (1-indexed).
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(attempt)
}

/// Client for a node's local RPC endpoint.
pub struct MinimaClient<T: Transport = HttpTransport> {
    config: ClientConfig,
    transport: Arc<T>,
}

impl<T: Transport> Clone for MinimaClient<T> {
    fn clone(&self) -> Self {
        Self { config: self.config.clone(), transport: self.transport.clone() }
    }
}

impl MinimaClient<HttpTransport> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_transport(config, HttpTransport::new())
    }
}

impl<T: Transport> MinimaClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport: Arc::new(transport) }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn base_url(&self) -> String {
        self.config.base_url()
    }

    /// Same endpoint and transport, limited to a single attempt.
    pub fn single_shot(&self) -> Self {
        let mut config = self.config.clone();
        config.retries = 1;
        Self { config, transport: self.transport.clone() }
    }

    /// `{base_url}/{percent-encoded command}`
    pub fn command_url(&self, cmd: &str) -> String {
        format!("{}/{}", self.base_url(), urlencoding::encode(cmd))
    }

    /// Execute a raw command.
    ///
    /// `status:false` fails immediately with [`ClientError::Logic`]; transport
    /// failures (network, timeout, non-JSON body) are retried up to
    /// `retries` attempts and then fail with [`ClientError::Connection`].
    pub async fn command(&self, cmd: &str) -> Result<Envelope> {
        let url = self.command_url(cmd);
        let attempts = self.config.attempts();
        let mut last_error: Option<TransportError> = None;

        for attempt in 1..=attempts {
            match self.attempt(&url).await {
                Ok(envelope) if envelope.status => return Ok(envelope),
                Ok(envelope) => {
                    let message = envelope
                        .error
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| "Unknown RPC error".to_string());
                    debug!(command = %cmd, error = %message, "node rejected command");
                    return Err(ClientError::Logic(message));
                }
                Err(e) => {
                    warn!(attempt, attempts, error = %e, "rpc attempt failed");
                    last_error = Some(e);
                    if attempt < attempts {
                        sleep(backoff_delay(self.config.retry_delay(), attempt)).await;
                    }
                }
            }
        }

        Err(ClientError::Connection {
            base_url: self.base_url(),
            attempts,
            message: last_error.map(|e| e.to_string()).unwrap_or_default(),
        })
    }

    async fn attempt(&self, url: &str) -> std::result::Result<Envelope, TransportError> {
        let limit = self.config.timeout();
        // Dropping the timed-out future cancels the in-flight request.
        let body = timeout(limit, self.transport.get(url))
            .await
            .map_err(|_| TransportError::Timeout(limit))??;
        Ok(serde_json::from_str(&body)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::transport::testing::{Reply, ScriptedTransport};
    use serde_json::json;

    fn config(retries: u32) -> ClientConfig {
        ClientConfig { retries, ..ClientConfig::default() }
    }

    fn ok_body() -> Reply {
        Reply::Body(json!({"status": true, "response": {"version": "1.0"}}).to_string())
    }

    #[test]
    fn test_backoff_is_linear() {
        let base = Duration::from_millis(1000);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(base, 5), Duration::from_millis(5000));
    }

    #[test]
    fn test_command_url_encodes_whole_command() {
        let client = MinimaClient::new(ClientConfig::default());
        assert_eq!(
            client.command_url("send address:Mx01 amount:1"),
            "http://localhost:9005/send%20address%3AMx01%20amount%3A1"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_failures_use_full_retry_budget() {
        let client = MinimaClient::with_transport(config(3), ScriptedTransport::new(vec![]));
        let err = client.command("status").await.unwrap_err();

        assert!(err.is_connection());
        assert_eq!(client.transport.call_count(), 3);
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to connect to http://localhost:9005 after 3 attempts"));
        assert!(msg.contains("connection refused"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_between_attempts() {
        let client = MinimaClient::with_transport(config(4), ScriptedTransport::new(vec![]));
        let _ = client.command("status").await;

        let calls = client.transport.calls.lock();
        let gaps: Vec<Duration> = calls.windows(2).map(|w| w[1].1 - w[0].1).collect();
        assert_eq!(
            gaps,
            vec![
                Duration::from_millis(1000),
                Duration::from_millis(2000),
                Duration::from_millis(3000)
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_logic_failure_is_not_retried() {
        let transport = ScriptedTransport::new(vec![
            Reply::Body(json!({"status": false, "error": "Insufficient funds"}).to_string()),
            ok_body(),
        ]);
        let client = MinimaClient::with_transport(config(3), transport);
        let err = client.command("send address:Mx amount:1").await.unwrap_err();

        assert!(err.is_logic());
        assert_eq!(err.to_string(), "Insufficient funds");
        assert_eq!(client.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_logic_failure_without_message() {
        let transport = ScriptedTransport::new(vec![
            Reply::Body(r#"{"status":false}"#.into()),
            Reply::Body(r#"{"status":false,"error":""}"#.into()),
        ]);
        let client = MinimaClient::with_transport(config(3), transport);
        let err = client.command("balance").await.unwrap_err();
        assert_eq!(err.to_string(), "Unknown RPC error");
        let err = client.command("balance").await.unwrap_err();
        assert!(matches!(err, ClientError::Logic(ref m) if m == "Unknown RPC error"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_recovers_after_transient_failures() {
        let transport = ScriptedTransport::new(vec![
            Reply::Fail("reset by peer"),
            Reply::Body("<html>starting</html>".into()),
            ok_body(),
        ]);
        let client = MinimaClient::with_transport(config(3), transport);
        let envelope = client.command("status").await.unwrap();

        assert!(envelope.status);
        assert_eq!(envelope.response["version"], "1.0");
        assert_eq!(client.transport.call_count(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_counts_as_transport_failure() {
        let transport = ScriptedTransport::new(vec![Reply::Hang, ok_body()]);
        let client = MinimaClient::with_transport(config(2), transport);
        let envelope = client.command("status").await.unwrap();

        assert!(envelope.status);
        let calls = client.transport.calls.lock();
        // 30s timeout on the first attempt, then a 1s backoff.
        assert_eq!(calls[1].1 - calls[0].1, Duration::from_millis(31_000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_retries_still_attempts_once() {
        let client = MinimaClient::with_transport(config(0), ScriptedTransport::new(vec![]));
        let err = client.command("status").await.unwrap_err();
        assert!(matches!(err, ClientError::Connection { attempts: 1, .. }));
        assert_eq!(client.transport.call_count(), 1);
    }

    #[tokio::test]
    async fn test_single_shot_keeps_endpoint() {
        let client = MinimaClient::with_transport(config(5), ScriptedTransport::new(vec![]));
        let once = client.single_shot();
        assert_eq!(once.config().retries, 1);
        assert_eq!(once.base_url(), client.base_url());
        let _ = once.command("webhooks action:remove hook:x").await;
        assert_eq!(client.transport.call_count(), 1);
    }
}
