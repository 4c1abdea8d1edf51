use serde::{Deserialize, Serialize};

/// Remote status polling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusConfig {
    pub enabled: bool,
    /// Status endpoint; `?id=<system id>` is appended.
    pub url: String,
    pub poll_interval_secs: u64,
    /// A reboot request older than this is ignored.
    pub reboot_window_secs: u64,
    /// Brightness applied when the status says the screen is on.
    pub screen_on_level: u8,
}

impl Default for StatusConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: "https://app.jetclock.io/api/clock-status".into(),
            poll_interval_secs: 10,
            reboot_window_secs: 60,
            screen_on_level: 1,
        }
    }
}
