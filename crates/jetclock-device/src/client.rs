//! Request/response correlation for device calls.
//!
//! Every call gets a fresh message id, is sent as `{method, args, messageId}`
//! on the outbound channel, and waits for the matching response until the
//! timeout fires. Exactly one outcome reaches the caller; whichever of
//! response and timeout comes second finds nothing to complete.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use jetclock_common::{Command, Response};

use crate::error::DeviceError;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

struct PendingRequest {
    method: String,
    tx: oneshot::Sender<Response>,
}

pub struct CorrelationClient {
    next_id: AtomicU64,
    pending: Mutex<HashMap<u64, PendingRequest>>,
    outbound: mpsc::UnboundedSender<Command>,
    timeout: Duration,
}

impl CorrelationClient {
    /// Create a client and the receiving end of its outbound commands.
    pub fn new(timeout: Duration) -> (Self, mpsc::UnboundedReceiver<Command>) {
        let (outbound, rx) = mpsc::unbounded_channel();
        let client = Self {
            next_id: AtomicU64::new(0),
            pending: Mutex::new(HashMap::new()),
            outbound,
            timeout,
        };
        (client, rx)
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn pending_count(&self) -> usize {
        self.pending().len()
    }

    /// Invoke `method` on the host and wait for its result.
    pub async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, DeviceError> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let (tx, rx) = oneshot::channel();
        self.pending().insert(
            id,
            PendingRequest {
                method: method.to_string(),
                tx,
            },
        );
        // Removes the entry however this call ends, including when the
        // caller drops the future.
        let _guard = PendingGuard { client: self, id };

        debug!(method, message_id = id, "device call");
        if self.outbound.send(Command::new(method, args, id)).is_err() {
            return Err(DeviceError::Closed);
        }

        match tokio::time::timeout(self.timeout, rx).await {
            Ok(Ok(response)) => into_result(response),
            Ok(Err(_)) => Err(DeviceError::Closed),
            Err(_) => {
                warn!(method, message_id = id, "device call timed out");
                Err(DeviceError::Timeout {
                    method: method.to_string(),
                    after: self.timeout,
                })
            }
        }
    }

    /// Complete the pending request `response` answers.
    ///
    /// Matches on `messageId` when present. Responses without one go to the
    /// oldest pending request for the same method. Returns `false` when
    /// nothing was waiting, e.g. a response arriving after its timeout.
    pub fn handle_response(&self, response: Response) -> bool {
        let entry = {
            let mut pending = self.pending();
            let key = match response.message_id {
                Some(id) => pending.contains_key(&id).then_some(id),
                None => pending
                    .iter()
                    .filter(|(_, req)| req.method == response.method)
                    .map(|(&id, _)| id)
                    .min(),
            };
            key.and_then(|id| pending.remove(&id))
        };

        match entry {
            Some(req) => req.tx.send(response).is_ok(),
            None => {
                debug!(
                    method = %response.method,
                    message_id = response.message_id,
                    "unmatched device response"
                );
                false
            }
        }
    }

    /// Like [`handle_response`](Self::handle_response) for a raw message.
    /// Messages without a `method` are not responses and are ignored.
    pub fn handle_message(&self, raw: &str) -> bool {
        match Response::from_json(raw) {
            Some(response) => self.handle_response(response),
            None => false,
        }
    }

    /// Fail every pending call with [`DeviceError::Closed`].
    pub fn close(&self) {
        let dropped = std::mem::take(&mut *self.pending());
        if !dropped.is_empty() {
            debug!(count = dropped.len(), "closing pending device calls");
        }
    }

    fn pending(&self) -> MutexGuard<'_, HashMap<u64, PendingRequest>> {
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

struct PendingGuard<'a> {
    client: &'a CorrelationClient,
    id: u64,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.client.pending().remove(&self.id);
    }
}

fn into_result(response: Response) -> Result<Value, DeviceError> {
    match response.error {
        Some(error) if !error.is_empty() => Err(DeviceError::Invocation(error)),
        _ => Ok(response.result.unwrap_or(Value::Null)),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use serde_json::json;

    use super::*;

    fn client() -> (Arc<CorrelationClient>, mpsc::UnboundedReceiver<Command>) {
        let (client, rx) = CorrelationClient::new(DEFAULT_TIMEOUT);
        (Arc::new(client), rx)
    }

    #[tokio::test]
    async fn message_ids_strictly_increase() {
        let (client, mut rx) = client();
        let mut calls = Vec::new();
        for _ in 0..3 {
            let c = Arc::clone(&client);
            calls.push(tokio::spawn(async move { c.call("GetVersion", vec![]).await }));
        }

        let mut ids = Vec::new();
        for _ in 0..3 {
            let cmd = rx.recv().await.unwrap();
            assert_eq!(cmd.method, "GetVersion");
            ids.push(cmd.message_id.unwrap());
        }
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2, 3]);

        client.close();
        for call in calls {
            assert!(matches!(call.await.unwrap(), Err(DeviceError::Closed)));
        }
    }

    #[tokio::test]
    async fn responses_match_by_message_id_out_of_order() {
        let (client, mut rx) = client();
        let c1 = Arc::clone(&client);
        let first = tokio::spawn(async move { c1.call("GetSystemID", vec![]).await });
        let id1 = rx.recv().await.unwrap().message_id;
        let c2 = Arc::clone(&client);
        let second = tokio::spawn(async move { c2.call("GetSystemID", vec![]).await });
        let id2 = rx.recv().await.unwrap().message_id;

        assert!(client.handle_response(Response::ok("GetSystemID", id2, json!("second"))));
        assert!(client.handle_response(Response::ok("GetSystemID", id1, json!("first"))));

        assert_eq!(first.await.unwrap().unwrap(), json!("first"));
        assert_eq!(second.await.unwrap().unwrap(), json!("second"));
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn legacy_response_goes_to_oldest_same_method() {
        let (client, mut rx) = client();
        let c1 = Arc::clone(&client);
        let older = tokio::spawn(async move { c1.call("GetBrightness", vec![]).await });
        rx.recv().await.unwrap();
        let c2 = Arc::clone(&client);
        let newer = tokio::spawn(async move { c2.call("GetBrightness", vec![]).await });
        rx.recv().await.unwrap();

        assert!(client.handle_response(Response::ok("GetBrightness", None, json!(10))));
        assert_eq!(older.await.unwrap().unwrap(), json!(10));
        assert_eq!(client.pending_count(), 1);

        assert!(client.handle_response(Response::ok("GetBrightness", None, json!(20))));
        assert_eq!(newer.await.unwrap().unwrap(), json!(20));
    }

    #[tokio::test]
    async fn error_field_rejects_the_call() {
        let (client, mut rx) = client();
        let c = Arc::clone(&client);
        let call = tokio::spawn(async move { c.call("Reboot", vec![]).await });
        let id = rx.recv().await.unwrap().message_id;

        client.handle_response(Response::err("Reboot", id, "not permitted"));

        let err = call.await.unwrap().unwrap_err();
        assert!(matches!(err, DeviceError::Invocation(ref m) if m == "not permitted"));
    }

    #[tokio::test]
    async fn missing_result_resolves_to_null() {
        let (client, mut rx) = client();
        let c = Arc::clone(&client);
        let call = tokio::spawn(async move { c.call("reloadIframe", vec![]).await });
        rx.recv().await.unwrap();

        assert!(client.handle_message(r#"{"method":"reloadIframe","messageId":1}"#));
        assert_eq!(call.await.unwrap().unwrap(), Value::Null);
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_removes_pending_and_ignores_late_response() {
        let (client, mut rx) = client();
        let c = Arc::clone(&client);
        let call = tokio::spawn(async move { c.call("GetBrightness", vec![]).await });
        let id = rx.recv().await.unwrap().message_id;
        assert_eq!(client.pending_count(), 1);

        tokio::time::advance(DEFAULT_TIMEOUT + Duration::from_millis(1)).await;

        let err = call.await.unwrap().unwrap_err();
        assert!(matches!(err, DeviceError::Timeout { ref method, .. } if method == "GetBrightness"));
        assert_eq!(client.pending_count(), 0);
        assert!(!client.handle_response(Response::ok("GetBrightness", id, json!(1))));
    }

    #[tokio::test]
    async fn answered_calls_leave_nothing_pending() {
        let (client, mut rx) = client();
        let responder = {
            let client = Arc::clone(&client);
            tokio::spawn(async move {
                while let Some(cmd) = rx.recv().await {
                    client.handle_response(Response::ok(cmd.method, cmd.message_id, json!(0)));
                }
            })
        };

        for _ in 0..50 {
            client.call("GetBrightness", vec![]).await.unwrap();
        }
        assert_eq!(client.pending_count(), 0);
        responder.abort();
    }

    #[tokio::test]
    async fn dropped_call_releases_its_entry() {
        let (client, mut rx) = client();
        let c = Arc::clone(&client);
        let call = tokio::spawn(async move { c.call("GetVersion", vec![]).await });
        rx.recv().await.unwrap();
        assert_eq!(client.pending_count(), 1);

        call.abort();
        let _ = call.await;
        assert_eq!(client.pending_count(), 0);
    }

    #[tokio::test]
    async fn closed_outbound_fails_immediately() {
        let (client, rx) = client();
        drop(rx);
        let err = client.call("GetVersion", vec![]).await.unwrap_err();
        assert!(matches!(err, DeviceError::Closed));
        assert_eq!(client.pending_count(), 0);
    }

    #[test]
    fn non_responses_are_ignored() {
        let (client, _rx) = client();
        assert!(!client.handle_message(r#"{"result":1}"#));
        assert!(!client.handle_message("nope"));
        assert!(!client.handle_response(Response::ok("GetVersion", Some(99), json!("x"))));
    }
}
