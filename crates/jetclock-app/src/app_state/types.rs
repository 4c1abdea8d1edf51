//! Internal constants for the app state module.

use std::time::Duration;

/// How often the UI thread drains its queues (about 60 Hz).
pub(super) const POLL_INTERVAL: Duration = Duration::from_millis(16);

pub(super) const WINDOW_TITLE: &str = "JetClock";

/// Stand-in for a system ID or version that could not be fetched.
pub(super) const UNKNOWN: &str = "unknown";
