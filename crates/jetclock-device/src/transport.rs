use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::client::CorrelationClient;
use crate::error::DeviceError;

/// Where device calls go.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, DeviceError>;
}

/// Calls the privileged host through the frame protocol.
pub struct EmbeddedHostTransport {
    client: Arc<CorrelationClient>,
}

impl EmbeddedHostTransport {
    pub fn new(client: Arc<CorrelationClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<CorrelationClient> {
        &self.client
    }
}

#[async_trait]
impl Transport for EmbeddedHostTransport {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, DeviceError> {
        self.client.call(method, args).await
    }
}

/// Canned responses for running outside a JetClock host.
pub struct MockTransport;

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, DeviceError> {
        warn!(method, ?args, "not running in JetClock environment, method simulated");
        Ok(mock_response(method))
    }
}

pub fn mock_response(method: &str) -> Value {
    match method {
        "GetSystemID" => json!("dev-mock-id"),
        "GetVersion" => json!("dev-0.0.0"),
        "GetBrightness" => json!(1),
        _ => json!({ "success": true }),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    /// Embedded in a JetClock host page.
    JetClock,
    Standalone,
}

impl Environment {
    /// Embedded content served from an allowed host talks to the real
    /// device; anything else gets the mock.
    pub fn detect(embedded: bool, hostname: &str, allowed_hosts: &[String]) -> Self {
        if embedded && allowed_hosts.iter().any(|h| h.eq_ignore_ascii_case(hostname)) {
            Self::JetClock
        } else {
            Self::Standalone
        }
    }

    /// Pick the transport for this environment. Decided once; a device
    /// never switches transports.
    pub fn transport(self, client: Arc<CorrelationClient>) -> Arc<dyn Transport> {
        match self {
            Self::JetClock => Arc::new(EmbeddedHostTransport::new(client)),
            Self::Standalone => Arc::new(MockTransport),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hosts() -> Vec<String> {
        vec!["app.jetclock.io".into(), "localhost".into()]
    }

    #[test]
    fn detect_requires_embedding_and_allowed_host() {
        assert_eq!(Environment::detect(true, "app.jetclock.io", &hosts()), Environment::JetClock);
        assert_eq!(Environment::detect(true, "localhost", &hosts()), Environment::JetClock);
        assert_eq!(Environment::detect(false, "localhost", &hosts()), Environment::Standalone);
        assert_eq!(Environment::detect(true, "example.com", &hosts()), Environment::Standalone);
    }

    #[test]
    fn mock_responses() {
        assert_eq!(mock_response("GetSystemID"), json!("dev-mock-id"));
        assert_eq!(mock_response("GetVersion"), json!("dev-0.0.0"));
        assert_eq!(mock_response("GetBrightness"), json!(1));
        assert_eq!(mock_response("SetBrightness"), json!({"success": true}));
        assert_eq!(mock_response("Anything"), json!({"success": true}));
    }

    #[tokio::test]
    async fn standalone_uses_mock_without_sending() {
        let (client, mut rx) = CorrelationClient::new(crate::client::DEFAULT_TIMEOUT);
        let transport = Environment::Standalone.transport(Arc::new(client));

        let v = transport.call("GetVersion", vec![]).await.unwrap();
        assert_eq!(v, json!("dev-0.0.0"));
        assert!(rx.try_recv().is_err());
    }
}
