//! Tests for the full validation pipeline.

use super::*;
use crate::schema::JetclockConfig;

#[test]
fn default_config_validates() {
    assert!(validate(&JetclockConfig::default()).is_ok());
}

#[test]
fn catches_zero_timeout() {
    let mut config = JetclockConfig::default();
    config.device.timeout_ms = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("device.timeout_ms"));
}

#[test]
fn catches_bad_expose_base() {
    let mut config = JetclockConfig::default();
    config.plugins.expose_base = "localhost/expose".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("plugins.expose_base"));
}

#[test]
fn catches_bad_origin() {
    let mut config = JetclockConfig::default();
    config.loader.expected_origin = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("loader.expected_origin"));
}

#[test]
fn status_url_ignored_when_disabled() {
    let mut config = JetclockConfig::default();
    config.status.enabled = false;
    config.status.url = String::new();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_screen_on_level_zero() {
    let mut config = JetclockConfig::default();
    config.status.screen_on_level = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("status.screen_on_level"));
}

#[test]
fn catches_empty_wifi_interface() {
    let mut config = JetclockConfig::default();
    config.wifi.interface = String::new();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("wifi.interface"));
}

#[test]
fn catches_oversized_slots() {
    let mut config = JetclockConfig::default();
    config.window.slot_size = 300;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("window.slot_size"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = JetclockConfig::default();
    config.device.timeout_ms = 0;
    config.wifi.poll_interval_secs = 0;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("device.timeout_ms"));
    assert!(err.contains("wifi.poll_interval_secs"));
}

#[test]
fn rejects_non_hierarchical_and_malformed_urls() {
    for bad in ["about:blank", "https://", "http://[::1", "mailto:clock@jetclock.io"] {
        let mut config = JetclockConfig::default();
        config.loader.expected_origin = bad.into();
        let err = validate(&config).unwrap_err().to_string();
        assert!(err.contains("loader.expected_origin"), "{bad}");
    }
}

#[test]
fn templated_clock_url_is_accepted() {
    let mut config = JetclockConfig::default();
    config.loader.clock_url = "http://localhost:8080/clock/{system_id}?v={version}".into();
    assert!(validate(&config).is_ok());
}
