use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, warn};
use wry::WebViewBuilder;

use jetclock_host::origin_of;

use crate::events::{FrameId, PageLoadState, WebViewEvent};
use crate::ipc::IpcEnvelope;

use super::{push, EventSink, WebViewManager};

// =============================================================================
// NAVIGATION ALLOWLIST
// =============================================================================

/// URL prefixes a frame may navigate to. Everything else is blocked.
#[derive(Debug, Clone, Default)]
pub struct NavigationPolicy {
    prefixes: Vec<String>,
}

impl NavigationPolicy {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, url: &str) -> bool {
        !url.is_empty() && self.prefixes.iter().any(|p| url.starts_with(p.as_str()))
    }

    /// Also allow everything under the origin of `url`. Returns `false` if
    /// `url` has no origin.
    pub fn allow_origin_of(&mut self, url: &str) -> bool {
        match origin_of(url) {
            Some(origin) => {
                // Trailing slash so `https://a.io` does not admit `https://a.io.evil`.
                let prefix = format!("{origin}/");
                if !self.prefixes.contains(&prefix) {
                    self.prefixes.push(prefix);
                }
                true
            }
            None => false,
        }
    }

    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }
}

pub(super) type SharedPolicy = Arc<RwLock<NavigationPolicy>>;

// =============================================================================
// HANDLER ATTACHMENTS
// =============================================================================

impl WebViewManager {
    pub(super) fn attach_ipc_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
        frame: FrameId,
    ) -> WebViewBuilder<'a> {
        builder.with_ipc_handler(move |request| {
            let body = request.body();
            let Some(envelope) = IpcEnvelope::from_json(body) else {
                warn!(%frame, body_len = body.len(), "IPC message rejected: not an envelope");
                return;
            };

            match envelope {
                IpcEnvelope::Message(data) => {
                    let origin = origin_of(&request.uri().to_string())
                        .unwrap_or_else(|| "null".to_string());
                    debug!(%frame, origin = %origin, "frame message");
                    push(
                        &events,
                        WebViewEvent::FrameMessage {
                            frame,
                            origin,
                            body: data.to_string(),
                        },
                    );
                }
                IpcEnvelope::Log(entry) => {
                    push(&events, WebViewEvent::ConsoleLog { frame, entry });
                }
            }
        })
    }

    pub(super) fn attach_page_load_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
        frame: FrameId,
    ) -> WebViewBuilder<'a> {
        builder.with_on_page_load_handler(move |event, url| {
            let state = PageLoadState::from(event);
            debug!(%frame, ?state, url = %url, "page load");
            push(&events, WebViewEvent::PageLoad { frame, state, url });
        })
    }

    pub(super) fn attach_navigation_handler<'a>(
        builder: WebViewBuilder<'a>,
        events: EventSink,
        policy: SharedPolicy,
        frame: FrameId,
    ) -> WebViewBuilder<'a> {
        builder.with_navigation_handler(move |url| {
            let allowed = policy
                .read()
                .unwrap_or_else(PoisonError::into_inner)
                .allows(&url);
            if !allowed {
                warn!(%frame, url = %url, "navigation blocked: URL not in allowlist");
                push(&events, WebViewEvent::NavigationBlocked { frame, url });
            }
            allowed
        })
    }
}

// =============================================================================
// TESTS
// =============================================================================
