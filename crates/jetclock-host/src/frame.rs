//! The embedding boundary between the host and plugin frames.

use jetclock_common::SlotHour;
use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("no frame for {0}")]
    Missing(SlotHour),

    #[error("frame backend error: {0}")]
    Backend(String),
}

/// One embedded frame per clock-face slot.
///
/// Implemented by the webview layer; the relay only ever talks to frames
/// through this trait.
pub trait FrameHost {
    /// Point the slot's frame at `url`.
    fn load(&mut self, hour: SlotHour, url: &str) -> Result<(), FrameError>;

    fn set_visible(&mut self, hour: SlotHour, visible: bool) -> Result<(), FrameError>;

    /// Deliver `payload` to the content of the slot's frame as a message event.
    fn post_message(&mut self, hour: SlotHour, payload: &Value) -> Result<(), FrameError>;

    /// Whether the slot's frame exists and plugin content loaded into it.
    fn has_frame(&self, hour: SlotHour) -> bool;
}
