use std::sync::PoisonError;

use serde_json::Value;
use wry::WebView;

use crate::events::FrameId;
use crate::ipc::js_deliver_message;

use super::navigation::SharedPolicy;

/// One live frame.
pub struct FrameHandle {
    pub(super) webview: WebView,
    pub(super) frame: FrameId,
    pub(super) current_url: String,
    pub(super) policy: SharedPolicy,
}

impl FrameHandle {
    pub fn frame(&self) -> FrameId {
        self.frame
    }

    pub fn current_url(&self) -> &str {
        &self.current_url
    }

    /// Navigate to `url`. Its origin is added to this frame's allowlist so
    /// the content can move around its own site.
    pub fn load_url(&mut self, url: &str) -> Result<(), wry::Error> {
        self.policy
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .allow_origin_of(url);
        self.current_url = url.to_string();
        self.webview.load_url(url)
    }

    pub fn reload(&self) -> Result<(), wry::Error> {
        self.webview.reload()
    }

    pub fn evaluate_script(&self, js: &str) -> Result<(), wry::Error> {
        self.webview.evaluate_script(js)
    }

    /// Deliver `payload` to the page as a `message` event.
    pub fn deliver(&self, payload: &Value) -> Result<(), wry::Error> {
        self.webview.evaluate_script(&js_deliver_message(payload))
    }

    pub fn set_bounds(&self, bounds: wry::Rect) -> Result<(), wry::Error> {
        self.webview.set_bounds(bounds)
    }

    pub fn set_visible(&self, visible: bool) -> Result<(), wry::Error> {
        self.webview.set_visible(visible)
    }
}
