//! Configuration schema types for JetClock.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod device;
mod loader;
mod plugins;
mod status;
mod system;

pub use device::*;
pub use loader::*;
pub use plugins::*;
pub use status::*;
pub use system::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct JetclockConfig {
    pub plugins: PluginsConfig,
    pub device: DeviceConfig,
    pub loader: LoaderConfig,
    pub status: StatusConfig,
    pub wifi: WifiConfig,
    pub window: WindowConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plugins() {
        let config = JetclockConfig::default();
        assert_eq!(config.plugins.expose_base, "http://localhost:3456/expose/");
        assert!(config
            .plugins
            .allowed_navigation
            .iter()
            .any(|p| p == "about:blank"));
        assert!(config.plugins.autoload.is_empty());
    }

    #[test]
    fn default_device() {
        let config = JetclockConfig::default();
        assert_eq!(config.device.timeout_ms, 5000);
        assert_eq!(config.device.allowed_hosts, vec!["app.jetclock.io", "localhost"]);
    }

    #[test]
    fn default_status() {
        let config = JetclockConfig::default();
        assert!(config.status.enabled);
        assert_eq!(config.status.poll_interval_secs, 10);
        assert_eq!(config.status.reboot_window_secs, 60);
        assert_eq!(config.status.screen_on_level, 1);
    }

    #[test]
    fn default_window_is_square_kiosk() {
        let config = JetclockConfig::default();
        assert_eq!((config.window.width, config.window.height), (480, 480));
        assert!(config.window.frameless);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config: JetclockConfig = toml::from_str(
            r#"
[loader]
expected_origin = "https://staging.jetclock.io"
"#,
        )
        .unwrap();
        assert_eq!(config.loader.expected_origin, "https://staging.jetclock.io");
        assert!(config.loader.clock_url.contains("{system_id}"));
        assert_eq!(config.wifi.interface, "wlan0");
    }

    #[test]
    fn log_level_parses_lowercase() {
        let config: JetclockConfig = toml::from_str("[logging]\nlevel = \"debug\"\n").unwrap();
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.logging.level.directive(), "jetclock=debug");
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let result: Result<JetclockConfig, _> = toml::from_str("[logging]\nlevel = \"loud\"\n");
        assert!(result.is_err());
    }
}
