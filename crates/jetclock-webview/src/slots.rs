//! The window's frames: twelve plugin slots around the clock face and the
//! loader frame underneath them.

use std::collections::{HashMap, HashSet};

use serde_json::Value;
use tracing::{debug, info};
use wry::raw_window_handle;

use jetclock_common::{SlotHour, SLOT_ORDER};
use jetclock_host::{FrameError, FrameHost};

use crate::events::{FrameId, WebViewEvent};
use crate::layout::{slot_rect, FrameRect};
use crate::manager::{FrameHandle, WebViewConfig, WebViewManager};

pub struct SlotWebViews {
    manager: WebViewManager,
    slots: HashMap<SlotHour, FrameHandle>,
    /// Slots whose plugin content loaded successfully.
    loaded: HashSet<SlotHour>,
    loader: Option<FrameHandle>,
}

impl SlotWebViews {
    pub fn new(manager: WebViewManager) -> Self {
        Self {
            manager,
            slots: HashMap::new(),
            loaded: HashSet::new(),
            loader: None,
        }
    }

    /// Create the full-window loader frame showing `url`. Must be created
    /// before the slots so they stack above it.
    pub fn create_loader<W: raw_window_handle::HasWindowHandle>(
        &mut self,
        window: &W,
        width: f64,
        height: f64,
        url: &str,
    ) -> Result<(), wry::Error> {
        let handle = self.manager.create(
            FrameId::Loader,
            window,
            FrameRect::full(width, height).to_wry(),
            WebViewConfig::with_url(url),
        )?;
        info!(url, "loader frame created");
        self.loader = Some(handle);
        Ok(())
    }

    /// Create one hidden, blank frame per slot.
    pub fn create_slots<W: raw_window_handle::HasWindowHandle>(
        &mut self,
        window: &W,
        width: f64,
        height: f64,
        slot_size: f64,
    ) -> Result<(), wry::Error> {
        for hour in SLOT_ORDER.iter().filter_map(|&h| SlotHour::new(h)) {
            let bounds = slot_rect(hour, width, height, slot_size).to_wry();
            let handle =
                self.manager
                    .create(FrameId::Slot(hour), window, bounds, WebViewConfig::hidden())?;
            self.slots.insert(hour, handle);
        }
        debug!(count = self.slots.len(), "slot frames created");
        Ok(())
    }

    /// Reposition every frame for a new window size.
    pub fn relayout(&self, width: f64, height: f64, slot_size: f64) {
        if let Some(loader) = &self.loader {
            if let Err(e) = loader.set_bounds(FrameRect::full(width, height).to_wry()) {
                tracing::warn!(error = %e, "failed to resize loader frame");
            }
        }
        for (hour, handle) in &self.slots {
            let bounds = slot_rect(*hour, width, height, slot_size).to_wry();
            if let Err(e) = handle.set_bounds(bounds) {
                tracing::warn!(%hour, error = %e, "failed to move slot frame");
            }
        }
    }

    pub fn loader(&self) -> Option<&FrameHandle> {
        self.loader.as_ref()
    }

    pub fn slot(&self, hour: SlotHour) -> Option<&FrameHandle> {
        self.slots.get(&hour)
    }

    pub fn drain_events(&self) -> Vec<WebViewEvent> {
        self.manager.drain_events()
    }

    pub fn count(&self) -> usize {
        self.slots.len() + usize::from(self.loader.is_some())
    }

    /// Drop every frame. Used during shutdown.
    pub fn destroy_all(&mut self) {
        self.loaded.clear();
        for (hour, _) in self.slots.drain() {
            self.manager.push_event(WebViewEvent::Closed {
                frame: FrameId::Slot(hour),
            });
        }
        if self.loader.take().is_some() {
            self.manager.push_event(WebViewEvent::Closed {
                frame: FrameId::Loader,
            });
        }
        debug!("all frames destroyed");
    }

    fn slot_mut(&mut self, hour: SlotHour) -> Result<&mut FrameHandle, FrameError> {
        self.slots.get_mut(&hour).ok_or(FrameError::Missing(hour))
    }
}

fn backend(e: wry::Error) -> FrameError {
    FrameError::Backend(e.to_string())
}

impl FrameHost for SlotWebViews {
    fn load(&mut self, hour: SlotHour, url: &str) -> Result<(), FrameError> {
        self.loaded.remove(&hour);
        self.slot_mut(hour)?.load_url(url).map_err(backend)?;
        self.loaded.insert(hour);
        Ok(())
    }

    fn set_visible(&mut self, hour: SlotHour, visible: bool) -> Result<(), FrameError> {
        self.slot_mut(hour)?.set_visible(visible).map_err(backend)
    }

    fn post_message(&mut self, hour: SlotHour, payload: &Value) -> Result<(), FrameError> {
        self.slot_mut(hour)?.deliver(payload).map_err(backend)
    }

    fn has_frame(&self, hour: SlotHour) -> bool {
        self.slots.contains_key(&hour) && self.loaded.contains(&hour)
    }
}
