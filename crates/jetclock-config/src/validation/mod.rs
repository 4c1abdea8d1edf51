//! Full configuration validation.
//!
//! Checks numeric ranges and URL shapes, collecting every problem into a
//! single `ConfigError`.

mod helpers;

#[cfg(test)]
mod tests;

use crate::schema::JetclockConfig;
use jetclock_common::ConfigError;

use helpers::{validate_range, validate_url};

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &JetclockConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    validate_url(&mut errors, "plugins.expose_base", &config.plugins.expose_base);
    validate_range(&mut errors, "device.timeout_ms", config.device.timeout_ms, 100, 60_000);
    if config.device.allowed_hosts.iter().any(|h| h.is_empty()) {
        errors.push("device.allowed_hosts must not contain empty entries".into());
    }
    validate_url(&mut errors, "loader.expected_origin", &config.loader.expected_origin);
    validate_url(&mut errors, "loader.clock_url", &config.loader.clock_url);

    if config.status.enabled {
        validate_url(&mut errors, "status.url", &config.status.url);
    }
    validate_range(
        &mut errors,
        "status.poll_interval_secs",
        config.status.poll_interval_secs,
        1,
        3600,
    );
    validate_range(
        &mut errors,
        "status.reboot_window_secs",
        config.status.reboot_window_secs,
        1,
        3600,
    );
    validate_range(
        &mut errors,
        "status.screen_on_level",
        u64::from(config.status.screen_on_level),
        1,
        100,
    );

    if config.wifi.enabled && config.wifi.interface.is_empty() {
        errors.push("wifi.interface must not be empty".into());
    }
    validate_range(
        &mut errors,
        "wifi.poll_interval_secs",
        config.wifi.poll_interval_secs,
        1,
        3600,
    );

    validate_range(&mut errors, "window.width", u64::from(config.window.width), 100, 7680);
    validate_range(&mut errors, "window.height", u64::from(config.window.height), 100, 4320);
    validate_range(
        &mut errors,
        "window.slot_size",
        u64::from(config.window.slot_size),
        16,
        u64::from(config.window.width.min(config.window.height) / 2),
    );

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}
