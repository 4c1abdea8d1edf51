use std::sync::{Arc, RwLock};

use tracing::{debug, warn};
use wry::raw_window_handle;
use wry::WebViewBuilder;

use crate::content::{request_path, ContentProvider, SCHEME};
use crate::events::FrameId;
use crate::ipc::IPC_INIT_SCRIPT;

use super::handle::FrameHandle;
use super::types::WebViewConfig;
use super::WebViewManager;

impl WebViewManager {
    /// Create `frame` as a child WebView of `window` at `bounds`.
    pub fn create<W: raw_window_handle::HasWindowHandle>(
        &self,
        frame: FrameId,
        window: &W,
        bounds: wry::Rect,
        config: WebViewConfig,
    ) -> Result<FrameHandle, wry::Error> {
        let mut policy = self.navigation.clone();
        policy.allow_origin_of(&config.url);
        let policy = Arc::new(RwLock::new(policy));

        let mut builder = WebViewBuilder::new()
            .with_bounds(bounds)
            .with_transparent(config.transparent)
            .with_devtools(config.devtools)
            .with_visible(config.visible)
            .with_focused(false)
            .with_initialization_script(IPC_INIT_SCRIPT);

        if let Some(ua) = &config.user_agent {
            builder = builder.with_user_agent(ua);
        }

        builder = Self::attach_ipc_handler(builder, Arc::clone(&self.events), frame);
        builder = Self::attach_page_load_handler(builder, Arc::clone(&self.events), frame);
        builder = Self::attach_navigation_handler(
            builder,
            Arc::clone(&self.events),
            Arc::clone(&policy),
            frame,
        );
        if let Some(provider) = &self.content_provider {
            builder = attach_custom_protocol(builder, Arc::clone(provider));
        }

        let webview = builder.with_url(&config.url).build_as_child(window)?;
        debug!(%frame, url = %config.url, "WebView created");

        Ok(FrameHandle {
            webview,
            frame,
            current_url: config.url,
            policy,
        })
    }
}

fn attach_custom_protocol<'a>(
    builder: WebViewBuilder<'a>,
    provider: Arc<ContentProvider>,
) -> WebViewBuilder<'a> {
    builder.with_custom_protocol(SCHEME.to_string(), move |_id, request| {
        let uri = request.uri().to_string();
        let path = request_path(&uri);

        let response = match provider.resolve(path) {
            Some((mime, data)) => wry::http::Response::builder()
                .status(200)
                .header("Content-Type", mime.as_ref())
                .header("Access-Control-Allow-Origin", "jetclock://localhost")
                .body(std::borrow::Cow::from(data.into_owned())),
            None => {
                warn!(path = %path, "custom protocol: asset not found");
                wry::http::Response::builder()
                    .status(404)
                    .body(std::borrow::Cow::from(b"Not Found".to_vec()))
            }
        };
        response.unwrap_or_else(|e| {
            warn!(error = %e, "custom protocol: bad response");
            wry::http::Response::new(std::borrow::Cow::from(Vec::new()))
        })
    })
}
