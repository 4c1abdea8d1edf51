//! System configuration types: Wi-Fi, window, and logging.

use serde::{Deserialize, Serialize};

/// Wi-Fi mode watcher configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiConfig {
    pub enabled: bool,
    pub interface: String,
    pub poll_interval_secs: u64,
}

impl Default for WifiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interface: "wlan0".into(),
            poll_interval_secs: 10,
        }
    }
}

/// Kiosk window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub frameless: bool,
    /// Directory served under `jetclock://`.
    pub assets_dir: String,
    /// Size of each plugin frame, in logical pixels.
    pub slot_size: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 480,
            height: 480,
            frameless: true,
            assets_dir: "assets/public".into(),
            slot_size: 64,
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// `tracing-subscriber` directive for the jetclock crates.
    pub fn directive(self) -> &'static str {
        match self {
            Self::Trace => "jetclock=trace",
            Self::Debug => "jetclock=debug",
            Self::Info => "jetclock=info",
            Self::Warn => "jetclock=warn",
            Self::Error => "jetclock=error",
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
}
