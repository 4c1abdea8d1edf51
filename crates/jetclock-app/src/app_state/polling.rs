//! Periodic draining of the relay, frame events and background channels.

use std::time::Instant;

use winit::event_loop::{ActiveEventLoop, ControlFlow};

use super::core::JetclockApp;
use super::types::POLL_INTERVAL;

impl JetclockApp {
    /// Run polling and schedule the next wake-up.
    pub(super) fn poll_and_schedule(&mut self, event_loop: &ActiveEventLoop) {
        let now = Instant::now();

        if now.duration_since(self.last_poll) >= POLL_INTERVAL {
            self.last_poll = now;
            self.poll_relay();
            self.poll_webview_events();
            self.poll_loader_responses();
            self.console.drain();
            self.poll_wifi();
            self.poll_screen();
        }

        event_loop.set_control_flow(ControlFlow::WaitUntil(Instant::now() + POLL_INTERVAL));
    }

    fn poll_relay(&mut self) {
        if let Some(relay) = self.relay.as_mut() {
            let delivered = relay.pump();
            if delivered > 0 {
                tracing::trace!(delivered, "native events delivered to plugins");
            }
        }
    }
}
