use serde::{Deserialize, Serialize};

/// Privileged loader frame configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Only messages from this origin may invoke privileged methods.
    pub expected_origin: String,
    /// Remote clock page. `{system_id}` and `{version}` are substituted.
    pub clock_url: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            expected_origin: "https://app.jetclock.io".into(),
            clock_url: "https://app.jetclock.io/clock/{system_id}?version={version}".into(),
        }
    }
}

impl LoaderConfig {
    pub fn clock_url_for(&self, system_id: &str, version: &str) -> String {
        self.clock_url
            .replace("{system_id}", system_id)
            .replace("{version}", version)
    }
}
