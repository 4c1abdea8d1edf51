//! Default TOML config template with inline documentation comments.

/// Generate the default TOML config content with comments.
pub(crate) fn default_config_toml() -> String {
    r##"# JetClock Configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[plugins]
# expose_base = "http://localhost:3456/expose/"
# allowed_navigation = ["http://localhost:3456/", "jetclock://", "about:blank"]
# autoload = []            # plugin URLs loaded at startup

[device]
# timeout_ms = 5000       # 100-60000
# allowed_hosts = ["app.jetclock.io", "localhost"]

[loader]
# expected_origin = "https://app.jetclock.io"
# clock_url = "https://app.jetclock.io/clock/{system_id}?version={version}"

[status]
# enabled = true
# url = "https://app.jetclock.io/api/clock-status"
# poll_interval_secs = 10   # 1-3600
# reboot_window_secs = 60   # 1-3600
# screen_on_level = 1       # 1-100

[wifi]
# enabled = true
# interface = "wlan0"
# poll_interval_secs = 10   # 1-3600

[window]
# width = 480
# height = 480
# frameless = true
# assets_dir = "assets/public"
# slot_size = 64

[logging]
# level = "info"            # trace, debug, info, warn, error
"##
    .to_string()
}
