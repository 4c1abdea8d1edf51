/// Settings for one WebView.
#[derive(Debug, Clone)]
pub struct WebViewConfig {
    pub url: String,
    pub transparent: bool,
    /// Always on in debug builds.
    pub devtools: bool,
    pub user_agent: Option<String>,
    pub visible: bool,
}

impl Default for WebViewConfig {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            transparent: true,
            devtools: cfg!(debug_assertions),
            user_agent: Some(format!("JetClock/{}", env!("CARGO_PKG_VERSION"))),
            visible: true,
        }
    }
}

impl WebViewConfig {
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// A blank frame that stays hidden until content is loaded.
    pub fn hidden() -> Self {
        Self {
            visible: false,
            ..Default::default()
        }
    }
}
