use serde::{Deserialize, Serialize};

/// Device facade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// How long a privileged call waits for its response.
    pub timeout_ms: u64,
    /// Hostnames under which embedded content talks to the real host.
    /// Anywhere else the facade answers with mock data.
    pub allowed_hosts: Vec<String>,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 5000,
            allowed_hosts: vec!["app.jetclock.io".into(), "localhost".into()],
        }
    }
}
