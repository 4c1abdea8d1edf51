use serde::{Deserialize, Serialize};

/// Plugin hosting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginsConfig {
    /// Base URL plugin UIs are exposed under; the token and a trailing
    /// slash are appended when a load announcement carries no URL.
    pub expose_base: String,
    /// URL prefixes plugin frames may navigate to.
    pub allowed_navigation: Vec<String>,
    /// Plugin UIs the host starts itself at launch, one fresh token each.
    pub autoload: Vec<String>,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            expose_base: "http://localhost:3456/expose/".into(),
            allowed_navigation: vec![
                "http://localhost:3456/".into(),
                "jetclock://".into(),
                "http://jetclock.localhost".into(),
                "about:blank".into(),
            ],
            autoload: Vec::new(),
        }
    }
}
