//! Native publish/subscribe event bus.
//!
//! Every channel is addressed by name and carries raw string payloads, the
//! same shape the desktop runtime uses between its native side and the web
//! frames. Channels are created lazily on first publish or subscribe.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use serde::Serialize;
use tokio::sync::{broadcast, mpsc};

use crate::id::PluginToken;

/// Announces a newly started plugin: `{token, url?}`.
pub const PLUGIN_LOADED: &str = "jetclock:plugin.loaded";
/// Shared inbound channel for every plugin-originated message.
pub const PLUGIN_MESSAGE: &str = "plugin.message";
/// Prefix of the per-token outbound channel.
pub const PLUGIN_EVENT_PREFIX: &str = "plugin.event:";
/// Current Wi-Fi mode as an integer code.
pub const WIFI_MODE: &str = "jetclock:wifi.mode";
/// Console output forwarded from web frames: `{level, msg}`.
pub const FRONTEND_LOG: &str = "jetclock:frontend.log";
/// Whether the remote status wants the clock shown: `true` or `false`.
pub const SCREEN_ON: &str = "jetclock:screen.on";

/// Name of the channel carrying native events for one plugin.
pub fn plugin_event_channel(token: &PluginToken) -> String {
    format!("{PLUGIN_EVENT_PREFIX}{token}")
}

/// One named channel: broadcast receivers may lag, queue receivers never do.
struct Channel {
    broadcast: broadcast::Sender<String>,
    queues: Vec<mpsc::UnboundedSender<String>>,
}

pub struct EventBus {
    capacity: usize,
    channels: Mutex<HashMap<String, Channel>>,
}

impl EventBus {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: Mutex::new(HashMap::new()),
        }
    }

    fn with_channel<R>(&self, channel: &str, f: impl FnOnce(&mut Channel) -> R) -> R {
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = channels
            .entry(channel.to_string())
            .or_insert_with(|| Channel {
                broadcast: broadcast::channel(self.capacity).0,
                queues: Vec::new(),
            });
        f(entry)
    }

    /// Bounded subscription. A receiver that falls more than `capacity`
    /// payloads behind skips the oldest ones.
    pub fn subscribe(&self, channel: &str) -> broadcast::Receiver<String> {
        self.with_channel(channel, |c| c.broadcast.subscribe())
    }

    /// Unbounded subscription that keeps every payload in publish order.
    /// Dropping the receiver ends the subscription.
    pub fn subscribe_queue(&self, channel: &str) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.with_channel(channel, |c| c.queues.push(tx));
        rx
    }

    /// Publish a raw payload. Returns the number of subscribers reached.
    pub fn publish(&self, channel: &str, payload: impl Into<String>) -> usize {
        let payload = payload.into();
        self.with_channel(channel, |c| {
            c.queues.retain(|q| q.send(payload.clone()).is_ok());
            let queued = c.queues.len();
            queued + c.broadcast.send(payload).unwrap_or(0)
        })
    }

    /// Serialize `value` to JSON and publish it.
    pub fn publish_json<T: Serialize>(&self, channel: &str, value: &T) -> usize {
        match serde_json::to_string(value) {
            Ok(json) => self.publish(channel, json),
            Err(e) => {
                tracing::warn!(channel, error = %e, "failed to serialize event payload");
                0
            }
        }
    }

    /// Number of channels created so far.
    pub fn channel_count(&self) -> usize {
        self.channels
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}
