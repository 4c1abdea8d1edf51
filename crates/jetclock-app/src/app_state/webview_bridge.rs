//! Traffic between the frames and the host.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::broadcast::error::TryRecvError;

use jetclock_common::events::{FRONTEND_LOG, SCREEN_ON, WIFI_MODE};
use jetclock_host::dispatch::RELOAD_FRAME;
use jetclock_host::WifiIndicator;
use jetclock_webview::{FrameId, WebViewEvent};

use super::core::JetclockApp;

impl JetclockApp {
    /// Route everything the frames queued since the last poll.
    pub(super) fn poll_webview_events(&mut self) {
        let events = match &self.relay {
            Some(relay) => relay.frames().drain_events(),
            None => return,
        };

        for event in events {
            match event {
                WebViewEvent::FrameMessage {
                    frame: FrameId::Loader,
                    origin,
                    body,
                } => self.handle_loader_message(origin, body),
                WebViewEvent::FrameMessage {
                    frame: FrameId::Slot(hour),
                    body,
                    ..
                } => {
                    if let Some(relay) = &self.relay {
                        if relay.on_frame_body(&body).is_none() {
                            tracing::trace!(%hour, "ignored frame message without plugin token");
                        }
                    }
                }
                WebViewEvent::ConsoleLog { entry, .. } => {
                    self.bus.publish_json(FRONTEND_LOG, &entry);
                }
                WebViewEvent::PageLoad { frame, state, url } => {
                    tracing::debug!(%frame, ?state, url = %url, "frame page load");
                }
                WebViewEvent::NavigationBlocked { .. } => {}
                WebViewEvent::Closed { frame } => {
                    tracing::debug!(%frame, "frame closed");
                }
            }
        }
    }

    /// Run a loader command on the runtime. The answer comes back through
    /// `loader_rx`; untrusted origins get none.
    pub(super) fn handle_loader_message(&self, origin: String, body: String) {
        let Some(rt) = &self.tokio_runtime else {
            tracing::warn!("loader message dropped: runtime not started");
            return;
        };
        let dispatcher = Arc::clone(&self.dispatcher);
        let tx = self.loader_tx.clone();
        rt.spawn(async move {
            if let Some(response) = dispatcher.handle(&origin, &body).await {
                let _ = tx.send(response);
            }
        });
    }

    /// Post dispatcher answers back into the loader frame.
    pub(super) fn poll_loader_responses(&mut self) {
        while let Ok(response) = self.loader_rx.try_recv() {
            let reload = response.method == RELOAD_FRAME && response.error.is_none();
            let Some(loader) = self.relay.as_ref().and_then(|r| r.frames().loader()) else {
                tracing::debug!(method = %response.method, "no loader frame for response");
                continue;
            };
            match serde_json::to_value(&response) {
                Ok(payload) => {
                    if let Err(e) = loader.deliver(&payload) {
                        tracing::warn!(error = %e, "failed to post response to loader");
                    }
                }
                Err(e) => tracing::warn!(error = %e, "failed to serialize loader response"),
            }
            if reload {
                if let Err(e) = loader.reload() {
                    tracing::warn!(error = %e, "failed to reload loader frame");
                }
            }
        }
    }

    /// Track the latest Wi-Fi mode and show it in the loader frame.
    pub(super) fn poll_wifi(&mut self) {
        loop {
            let raw = match self.wifi_rx.try_recv() {
                Ok(raw) => raw,
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            };
            let indicator = WifiIndicator::from_payload(&raw);
            if indicator == self.wifi_indicator {
                continue;
            }
            tracing::info!(alt = indicator.alt(), "Wi-Fi indicator changed");
            self.wifi_indicator = indicator;

            if let Some(loader) = self.relay.as_ref().and_then(|r| r.frames().loader()) {
                let payload = json!({
                    "type": WIFI_MODE,
                    "icon": indicator.icon(),
                    "alt": indicator.alt(),
                });
                if let Err(e) = loader.deliver(&payload) {
                    tracing::warn!(error = %e, "failed to update Wi-Fi indicator");
                }
            }
        }
    }

    /// Blank the clock while the remote status wants the screen off.
    pub(super) fn poll_screen(&mut self) {
        loop {
            let raw = match self.screen_rx.try_recv() {
                Ok(raw) => raw,
                Err(TryRecvError::Lagged(_)) => continue,
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            };
            let Ok(on) = raw.trim().parse::<bool>() else {
                tracing::debug!(payload = %raw, "ignored malformed screen state");
                continue;
            };
            if on == self.screen_on {
                continue;
            }
            tracing::info!(screen_on = on, "clock frame visibility changed");
            self.screen_on = on;

            if let Some(loader) = self.relay.as_ref().and_then(|r| r.frames().loader()) {
                if let Err(e) = loader.set_visible(on) {
                    tracing::warn!(error = %e, "failed to change clock frame visibility");
                }
            }
        }
    }

    /// Re-apply frame bounds after the window size changed.
    pub(super) fn sync_frame_bounds(&self) {
        let (Some(window), Some(relay)) = (&self.window, &self.relay) else {
            return;
        };
        let size = window.inner_size().to_logical::<f64>(window.scale_factor());
        relay.frames().relayout(
            size.width,
            size.height,
            f64::from(self.config.window.slot_size),
        );
    }
}
