//! WebView event types.

use std::fmt;

use jetclock_common::{FrontendLogEntry, SlotHour};

/// Which embedded frame an event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FrameId {
    /// The privileged frame showing the hosted clock.
    Loader,
    Slot(SlotHour),
}

impl fmt::Display for FrameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Loader => f.write_str("loader"),
            Self::Slot(hour) => write!(f, "{hour}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLoadState {
    Started,
    Finished,
}

impl From<wry::PageLoadEvent> for PageLoadState {
    fn from(e: wry::PageLoadEvent) -> Self {
        match e {
            wry::PageLoadEvent::Started => Self::Started,
            wry::PageLoadEvent::Finished => Self::Finished,
        }
    }
}

/// Events pushed by WebView callbacks for the main loop to consume.
#[derive(Debug, Clone)]
pub enum WebViewEvent {
    PageLoad {
        frame: FrameId,
        state: PageLoadState,
        url: String,
    },
    /// Content posted a message to the host. `body` is the posted value as
    /// JSON; `origin` is the origin of the page that sent it.
    FrameMessage {
        frame: FrameId,
        origin: String,
        body: String,
    },
    ConsoleLog {
        frame: FrameId,
        entry: FrontendLogEntry,
    },
    NavigationBlocked {
        frame: FrameId,
        url: String,
    },
    Closed {
        frame: FrameId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_id_display() {
        assert_eq!(FrameId::Loader.to_string(), "loader");
        assert_eq!(FrameId::Slot(SlotHour::new(9).unwrap()).to_string(), "slot-9");
    }

    #[test]
    fn page_load_state_from_wry() {
        assert_eq!(PageLoadState::from(wry::PageLoadEvent::Started), PageLoadState::Started);
        assert_eq!(PageLoadState::from(wry::PageLoadEvent::Finished), PageLoadState::Finished);
    }
}
