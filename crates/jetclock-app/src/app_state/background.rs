//! Background tasks on the tokio runtime: the host bridge answering native
//! device calls, the remote status poller, and the Wi-Fi watcher.

use std::sync::Arc;
use std::time::Duration;

use jetclock_device::{CorrelationClient, Device, Environment, StatusPoller};
use jetclock_host::{IwProbe, WifiWatcher};
use url::Url;

use super::core::JetclockApp;

impl JetclockApp {
    /// Start the runtime and every background task. Returns `false` if the
    /// runtime could not be built.
    pub(super) fn start_background(&mut self) -> bool {
        if self.tokio_runtime.is_some() {
            return true;
        }

        let rt = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                tracing::error!("Failed to start tokio runtime: {e}");
                return false;
            }
        };

        let (client, mut outbound) =
            CorrelationClient::new(Duration::from_millis(self.config.device.timeout_ms));
        let client = Arc::new(client);

        // Host bridge: native device calls go straight to the dispatcher.
        let dispatcher = Arc::clone(&self.dispatcher);
        let responder = Arc::clone(&client);
        rt.spawn(async move {
            while let Some(command) = outbound.recv().await {
                let dispatcher = Arc::clone(&dispatcher);
                let responder = Arc::clone(&responder);
                tokio::spawn(async move {
                    let response = dispatcher.dispatch(command).await;
                    if !responder.handle_response(response) {
                        tracing::debug!("device response arrived after its caller gave up");
                    }
                });
            }
        });

        let host = host_of(&self.config.loader.expected_origin);
        let environment = Environment::detect(true, &host, &self.config.device.allowed_hosts);
        tracing::info!(?environment, host = %host, "device transport selected");
        let device = Arc::new(Device::new(environment.transport(Arc::clone(&client))));

        if self.config.status.enabled {
            let poller =
                StatusPoller::new(&self.config.status).with_events(Arc::clone(&self.bus));
            let device = Arc::clone(&device);
            rt.spawn(async move { poller.run(&device).await });
        }

        if self.config.wifi.enabled {
            let watcher = WifiWatcher::new(
                IwProbe::new(self.config.wifi.interface.clone()),
                Arc::clone(&self.bus),
                Duration::from_secs(self.config.wifi.poll_interval_secs),
            );
            rt.spawn(watcher.run());
        }

        self.client = Some(client);
        self.device = Some(device);
        self.tokio_runtime = Some(rt);
        tracing::info!("Background tasks started");
        true
    }
}

/// Hostname of `url`, without scheme or port. Empty when there is none.
fn host_of(url: &str) -> String {
    Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(str::to_string))
        .unwrap_or_default()
}
