//! Graceful shutdown: release subscriptions, destroy frames, stop tasks.

use std::time::Duration;

use super::core::JetclockApp;

impl JetclockApp {
    /// Shut every subsystem down. Safe to call more than once.
    ///
    /// Order: relay subscriptions and frames first, then pending device
    /// calls, then the runtime running the background tasks.
    pub(super) fn shutdown(&mut self) {
        tracing::info!("Initiating graceful shutdown");

        if let Some(mut relay) = self.relay.take() {
            relay.shutdown();
            relay.frames_mut().destroy_all();
        }

        if let Some(client) = self.client.take() {
            client.close();
        }
        self.device = None;

        if let Some(rt) = self.tokio_runtime.take() {
            rt.shutdown_timeout(Duration::from_secs(2));
        }

        self.window = None;
        self.should_exit = true;
        tracing::info!("Graceful shutdown complete");
    }
}

#[cfg(test)]
mod tests {
    use crate::app_state::core::JetclockApp;
    use jetclock_config::JetclockConfig;

    #[test]
    fn shutdown_on_fresh_app_does_not_panic() {
        let mut app = JetclockApp::new(JetclockConfig::default());
        app.shutdown();

        assert!(app.relay.is_none());
        assert!(app.client.is_none());
        assert!(app.tokio_runtime.is_none());
        assert!(app.should_exit);
    }

    #[test]
    fn shutdown_is_idempotent() {
        let mut app = JetclockApp::new(JetclockConfig::default());
        app.shutdown();
        app.shutdown();
        assert!(app.window.is_none());
    }
}
