//! Remote clock-status poller.
//!
//! Polls `<url>?id=<systemID>` and applies the result to the device: the
//! screen follows `screenon`, and a recent `reboot` timestamp triggers one
//! reboot.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use jetclock_common::events::SCREEN_ON;
use jetclock_common::EventBus;
use jetclock_config::schema::StatusConfig;

use crate::device::Device;
use crate::error::DeviceError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockStatus {
    /// Absent means "leave the screen alone".
    #[serde(default)]
    pub screenon: Option<bool>,
    /// Unix seconds of the most recent reboot request.
    #[serde(default)]
    pub reboot: Option<i64>,
}

pub struct StatusPoller {
    url: String,
    interval: Duration,
    reboot_window_secs: i64,
    screen_on_level: u8,
    http: Option<reqwest::Client>,
    last_status: ClockStatus,
    last_reboot: Option<i64>,
    events: Option<Arc<EventBus>>,
}

impl StatusPoller {
    pub fn new(config: &StatusConfig) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| warn!(error = %e, "failed to build status HTTP client"))
            .ok();
        Self {
            url: config.url.clone(),
            interval: Duration::from_secs(config.poll_interval_secs),
            reboot_window_secs: i64::try_from(config.reboot_window_secs).unwrap_or(i64::MAX),
            screen_on_level: config.screen_on_level,
            http,
            last_status: ClockStatus::default(),
            last_reboot: None,
            events: None,
        }
    }

    /// Publish the wanted screen state on `jetclock:screen.on` after every
    /// status that carries `screenon`, so the clock frame can be blanked.
    pub fn with_events(mut self, bus: Arc<EventBus>) -> Self {
        self.events = Some(bus);
        self
    }

    pub fn last_status(&self) -> &ClockStatus {
        &self.last_status
    }

    pub fn status_url(&self, system_id: &str) -> String {
        format!("{}?id={}", self.url, urlencoding::encode(system_id))
    }

    /// Brightness the screen should have, if the status says anything.
    pub fn target_brightness(&self, status: &ClockStatus) -> Option<u8> {
        status
            .screenon
            .map(|on| if on { self.screen_on_level } else { 0 })
    }

    /// Whether `reboot` asks for a reboot at `now`: inside the window and
    /// not already acted on.
    pub fn should_reboot(&self, reboot: Option<i64>, now: i64) -> bool {
        match reboot {
            Some(ts) => {
                self.last_reboot != Some(ts)
                    && ts <= now
                    && now.saturating_sub(ts) <= self.reboot_window_secs
            }
            None => false,
        }
    }

    pub async fn fetch(&self, system_id: &str) -> Result<ClockStatus, DeviceError> {
        let http = self
            .http
            .as_ref()
            .ok_or_else(|| DeviceError::Transport("no HTTP client".into()))?;
        let response = http
            .get(self.status_url(system_id))
            .header("User-Agent", "jetclock")
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(DeviceError::Transport(format!(
                "status endpoint returned {}",
                response.status()
            )));
        }
        response
            .json::<ClockStatus>()
            .await
            .map_err(|e| DeviceError::Decode(e.to_string()))
    }

    /// Apply `status` to the device at unix time `now`.
    pub async fn apply(&mut self, device: &Device, status: ClockStatus, now: i64) {
        if let (Some(on), Some(bus)) = (status.screenon, &self.events) {
            bus.publish(SCREEN_ON, on.to_string());
        }

        if let Some(target) = self.target_brightness(&status) {
            match device.screen().brightness().await {
                Ok(current) if current == target => {}
                Ok(current) => {
                    info!(current, target, "adjusting screen brightness");
                    if let Err(e) = device.screen().set_brightness(i64::from(target)).await {
                        warn!(error = %e, "failed to set screen brightness");
                    }
                }
                Err(e) => warn!(error = %e, "failed to read screen brightness"),
            }
        }

        if self.should_reboot(status.reboot, now) {
            // Marked before calling so a failed reboot is not retried every poll.
            self.last_reboot = status.reboot;
            info!(requested_at = status.reboot, "remote reboot requested");
            if let Err(e) = device.system().reboot().await {
                warn!(error = %e, "reboot failed");
            }
        }

        self.last_status = status;
    }

    /// Fetch and apply once. A failed fetch keeps the previous status.
    pub async fn poll_once(&mut self, device: &Device, system_id: &str) {
        match self.fetch(system_id).await {
            Ok(status) => {
                debug!(?status, "clock status");
                self.apply(device, status, chrono::Utc::now().timestamp()).await;
            }
            Err(e) => warn!(error = %e, "failed to fetch clock status"),
        }
    }

    /// Poll forever, starting immediately.
    pub async fn run(mut self, device: &Device) {
        let system_id = match device.system().info().await {
            Ok(info) => info.system_id,
            Err(e) => {
                warn!(error = %e, "system ID unavailable, polling as unknown");
                "unknown".to_string()
            }
        };
        info!(system_id = %system_id, interval = ?self.interval, "status poller started");

        let mut ticker = tokio::time::interval(self.interval);
        loop {
            ticker.tick().await;
            self.poll_once(device, &system_id).await;
        }
    }
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new(&StatusConfig::default())
    }
}
