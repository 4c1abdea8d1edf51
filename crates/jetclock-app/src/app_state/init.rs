//! Window creation and frame setup.

use std::path::PathBuf;
use std::sync::Arc;

use winit::event_loop::ActiveEventLoop;
use winit::window::WindowAttributes;

use jetclock_common::events::PLUGIN_LOADED;
use jetclock_common::{PluginLoaded, PluginToken};
use jetclock_host::{PluginRelay, SlotRegistry};
use jetclock_webview::{ContentProvider, NavigationPolicy, SlotWebViews, WebViewManager};

use super::core::JetclockApp;
use super::types::{UNKNOWN, WINDOW_TITLE};

impl JetclockApp {
    /// Create the window, the loader frame and the slot frames, and wire the
    /// relay to them. Returns `false` if the event loop should exit.
    pub(super) fn initialize_window(&mut self, event_loop: &ActiveEventLoop) -> bool {
        let win = &self.config.window;
        let (width, height) = (f64::from(win.width), f64::from(win.height));

        let attrs = WindowAttributes::default()
            .with_title(WINDOW_TITLE)
            .with_decorations(!win.frameless)
            .with_resizable(false)
            .with_inner_size(winit::dpi::LogicalSize::new(width, height));

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                tracing::error!("Failed to create window: {e}");
                return false;
            }
        };

        let (system_id, version) = self.system_info();
        let clock_url = self.config.loader.clock_url_for(&system_id, &version);

        let mut frames = SlotWebViews::new(self.webview_manager());
        if let Err(e) = frames.create_loader(window.as_ref(), width, height, &clock_url) {
            tracing::error!(error = %e, "Failed to create loader frame");
            return false;
        }
        if let Err(e) =
            frames.create_slots(window.as_ref(), width, height, f64::from(win.slot_size))
        {
            tracing::error!(error = %e, "Failed to create slot frames");
            return false;
        }

        self.relay = Some(PluginRelay::new(
            SlotRegistry::new(),
            frames,
            Arc::clone(&self.bus),
            self.config.plugins.expose_base.clone(),
        ));
        self.window = Some(window);
        tracing::info!(url = %clock_url, "Window created and frames initialized");
        self.announce_autoload_plugins();
        true
    }

    /// Announce each configured plugin URL under a freshly minted token.
    /// The relay picks them up on its next pump, like any native load.
    pub(super) fn announce_autoload_plugins(&self) -> usize {
        let mut announced = 0;
        for url in &self.config.plugins.autoload {
            let loaded = PluginLoaded {
                token: PluginToken::new().to_string(),
                url: Some(url.clone()),
            };
            tracing::debug!(url = %url, token = %loaded.token, "announcing autoload plugin");
            self.bus.publish_json(PLUGIN_LOADED, &loaded);
            announced += 1;
        }
        announced
    }

    /// System ID and version for the loader URL, through the device facade.
    fn system_info(&self) -> (String, String) {
        let (Some(rt), Some(device)) = (&self.tokio_runtime, &self.device) else {
            return (UNKNOWN.to_string(), UNKNOWN.to_string());
        };
        match rt.block_on(device.init()) {
            Ok(info) => (info.system_id, info.version),
            Err(e) => {
                tracing::warn!(error = %e, "System info unavailable");
                (UNKNOWN.to_string(), UNKNOWN.to_string())
            }
        }
    }

    fn webview_manager(&self) -> WebViewManager {
        let assets = PathBuf::from(&self.config.window.assets_dir);
        let assets = if assets.is_absolute() {
            assets
        } else {
            std::env::current_dir().unwrap_or_default().join(assets)
        };
        if !assets.is_dir() {
            tracing::warn!(
                path = %assets.display(),
                "Assets directory not found, jetclock:// will serve nothing"
            );
        }

        let mut manager =
            WebViewManager::new(NavigationPolicy::new(self.config.plugins.allowed_navigation.clone()));
        manager.set_content_provider(ContentProvider::new(&assets));
        tracing::info!(assets_dir = %assets.display(), "WebView manager initialized");
        manager
    }
}

#[cfg(test)]
mod tests {
    use jetclock_config::JetclockConfig;

    use super::*;

    #[test]
    fn autoload_plugins_get_distinct_tokens() {
        let mut config = JetclockConfig::default();
        config.plugins.autoload = vec![
            "http://localhost:3456/expose/weather/".into(),
            "http://localhost:3456/expose/flights/".into(),
        ];
        let app = JetclockApp::new(config);
        let mut rx = app.bus.subscribe(PLUGIN_LOADED);

        assert_eq!(app.announce_autoload_plugins(), 2);

        let first: PluginLoaded = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        let second: PluginLoaded = serde_json::from_str(&rx.try_recv().unwrap()).unwrap();
        assert_ne!(first.token, second.token);
        assert_eq!(first.url.as_deref(), Some("http://localhost:3456/expose/weather/"));
        assert!(rx.try_recv().is_err());
    }
}
