//! WebView creation and tracking.
//!
//! `WebViewManager` builds `wry::WebView` children of the main window and
//! collects their callbacks into a shared event queue.

use std::sync::{Arc, Mutex, PoisonError};

use crate::content::ContentProvider;
use crate::events::WebViewEvent;

mod handle;
mod lifecycle;
mod navigation;
mod types;

pub use handle::FrameHandle;
pub use navigation::NavigationPolicy;
pub use types::WebViewConfig;

pub(crate) type EventSink = Arc<Mutex<Vec<WebViewEvent>>>;

pub struct WebViewManager {
    pub(crate) events: EventSink,
    content_provider: Option<Arc<ContentProvider>>,
    navigation: NavigationPolicy,
}

impl WebViewManager {
    pub fn new(navigation: NavigationPolicy) -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            content_provider: None,
            navigation,
        }
    }

    /// Serve bundled assets on `jetclock://` for frames created after this.
    pub fn set_content_provider(&mut self, provider: ContentProvider) {
        self.content_provider = Some(Arc::new(provider));
    }

    pub fn navigation(&self) -> &NavigationPolicy {
        &self.navigation
    }

    /// Take every queued event.
    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }

    pub(crate) fn push_event(&self, event: WebViewEvent) {
        push(&self.events, event);
    }
}

pub(crate) fn push(events: &EventSink, event: WebViewEvent) {
    events
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .push(event);
}
