//! Plugin relay: the host-side multiplexer between the native event bus and
//! plugin frames.
//!
//! Native events for a plugin arrive on `plugin.event:<token>` and are
//! delivered to exactly the frame bound to that token. Messages posted by
//! plugin content are published on the shared `plugin.message` channel.
//! Every failure stays local to the event that caused it.

use std::sync::Arc;

use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};
use url::Url;

use jetclock_common::events::{PLUGIN_LOADED, PLUGIN_MESSAGE};
use jetclock_common::{plugin_event_channel, EventBus, PluginLoaded, PluginToken, SlotHour};

use crate::error::RelayError;
use crate::frame::FrameHost;
use crate::slots::SlotRegistry;

/// Field plugin messages carry to identify themselves.
pub const TOKEN_FIELD: &str = "pluginToken";

/// Queue of one plugin's native events, in publish order. Dropping it
/// releases the subscription.
struct NativeSubscription {
    token: PluginToken,
    rx: mpsc::UnboundedReceiver<String>,
}

impl NativeSubscription {
    fn next(&mut self) -> Option<String> {
        self.rx.try_recv().ok()
    }
}

pub struct PluginRelay<F: FrameHost> {
    registry: SlotRegistry,
    frames: F,
    bus: Arc<EventBus>,
    expose_base: String,
    announcements: mpsc::UnboundedReceiver<String>,
    subscriptions: Vec<NativeSubscription>,
}

impl<F: FrameHost> PluginRelay<F> {
    /// Create a relay and start listening for plugin announcements.
    pub fn new(
        registry: SlotRegistry,
        frames: F,
        bus: Arc<EventBus>,
        expose_base: impl Into<String>,
    ) -> Self {
        let announcements = bus.subscribe_queue(PLUGIN_LOADED);
        Self {
            registry,
            frames,
            bus,
            expose_base: expose_base.into(),
            announcements,
            subscriptions: Vec::new(),
        }
    }

    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    pub fn frames(&self) -> &F {
        &self.frames
    }

    pub fn frames_mut(&mut self) -> &mut F {
        &mut self.frames
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }

    /// Default content URL for a plugin announced without one.
    pub fn exposed_url(&self, token: &PluginToken) -> String {
        format!("{}{}/", self.expose_base, urlencoding::encode(token.as_str()))
    }

    /// Give a newly loaded plugin a slot, load its content, and subscribe to
    /// its native events.
    ///
    /// A plugin that cannot get a slot is dropped for the rest of the
    /// session.
    pub fn on_plugin_loaded(
        &mut self,
        token: PluginToken,
        content_url: Option<&str>,
    ) -> Result<SlotHour, RelayError> {
        let base = match content_url {
            Some(url) => url.to_string(),
            None => self.exposed_url(&token),
        };
        let source = with_token_query(&base, &token).map_err(|e| {
            error!(token = %token, url = %base, error = %e, "plugin dropped: bad content URL");
            RelayError::Announcement(format!("invalid content URL {base:?}: {e}"))
        })?;

        let hour = match self.registry.allocate(token.clone()) {
            Ok(hour) => hour,
            Err(e) => {
                error!(token = %token, error = %e, "plugin dropped: no slot");
                return Err(e);
            }
        };
        self.registry.bind_source(hour, source.clone());

        if let Err(e) = self
            .frames
            .load(hour, &source)
            .and_then(|()| self.frames.set_visible(hour, true))
        {
            error!(token = %token, %hour, error = %e, "failed to load plugin frame");
            return Err(e.into());
        }
        self.registry.set_shown(hour, true);

        let rx = self.bus.subscribe_queue(&plugin_event_channel(&token));
        self.subscriptions.push(NativeSubscription {
            token: token.clone(),
            rx,
        });

        info!(token = %token, %hour, url = %source, "plugin assigned to slot");
        Ok(hour)
    }

    /// Deliver one native payload to the frame owning `token`.
    pub fn deliver_native(&mut self, token: &PluginToken, raw: &str) -> Result<(), RelayError> {
        let hour = match self.registry.lookup(token) {
            Some(slot) if slot.is_visible() && self.frames.has_frame(slot.hour) => slot.hour,
            _ => {
                warn!(token = %token, "no frame bound to plugin token, dropping event");
                return Err(RelayError::RoutingMiss(token.clone()));
            }
        };

        let data: Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => {
                error!(token = %token, error = %e, raw_len = raw.len(), "invalid JSON from native side");
                return Err(RelayError::Decode {
                    token: token.clone(),
                    reason: e.to_string(),
                });
            }
        };
        self.frames.post_message(hour, &data).map_err(|e| {
            warn!(token = %token, %hour, error = %e, "failed to post message to plugin frame");
            RelayError::from(e)
        })
    }

    /// Forward a message posted by frame content onto the native bus.
    ///
    /// Anything that is not a JSON object with a non-empty string
    /// `pluginToken` is ignored. Returns the token of a forwarded message.
    pub fn on_frame_message(&self, data: &Value) -> Option<PluginToken> {
        let token = data
            .as_object()?
            .get(TOKEN_FIELD)?
            .as_str()
            .and_then(PluginToken::parse)?;

        match serde_json::to_string(data) {
            Ok(raw) => {
                self.bus.publish(PLUGIN_MESSAGE, raw);
                debug!(token = %token, "plugin message forwarded to native side");
                Some(token)
            }
            Err(e) => {
                warn!(token = %token, error = %e, "failed to serialize plugin message");
                None
            }
        }
    }

    /// Same as [`on_frame_message`](Self::on_frame_message) for a raw body.
    pub fn on_frame_body(&self, body: &str) -> Option<PluginToken> {
        let data: Value = serde_json::from_str(body).ok()?;
        self.on_frame_message(&data)
    }

    /// Drain pending announcements, then every plugin channel in order.
    ///
    /// Returns how many native events were delivered to frames.
    pub fn pump(&mut self) -> usize {
        while let Some(raw) = self.next_announcement() {
            let _ = self.handle_announcement(&raw);
        }

        let mut pending = Vec::new();
        for sub in &mut self.subscriptions {
            while let Some(raw) = sub.next() {
                pending.push((sub.token.clone(), raw));
            }
        }

        pending
            .into_iter()
            .filter(|(token, raw)| self.deliver_native(token, raw).is_ok())
            .count()
    }

    /// Release every native subscription. Slots stay assigned.
    pub fn shutdown(&mut self) {
        let released = self.subscriptions.len();
        self.subscriptions.clear();
        info!(released, "plugin relay shut down");
    }

    fn next_announcement(&mut self) -> Option<String> {
        self.announcements.try_recv().ok()
    }

    fn handle_announcement(&mut self, raw: &str) -> Result<SlotHour, RelayError> {
        let loaded: PluginLoaded = serde_json::from_str(raw).map_err(|e| {
            error!(error = %e, "invalid plugin announcement");
            RelayError::Announcement(e.to_string())
        })?;
        let token = PluginToken::parse(loaded.token).ok_or_else(|| {
            error!("plugin announcement with empty token");
            RelayError::Announcement("empty token".into())
        })?;
        self.on_plugin_loaded(token, loaded.url.as_deref())
    }
}

/// Append `pluginToken=<token>` to the query of `url`, keeping any
/// existing query and fragment.
pub fn with_token_query(url: &str, token: &PluginToken) -> Result<String, url::ParseError> {
    let mut parsed = Url::parse(url)?;
    parsed
        .query_pairs_mut()
        .append_pair(TOKEN_FIELD, token.as_str());
    Ok(parsed.into())
}
