use jetclock_common::{JetclockError, PluginToken, SlotHour};

use crate::frame::FrameError;

#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("all 12 plugin slots are filled")]
    SlotsFull,

    #[error("plugin token already bound to {0}")]
    DuplicateToken(SlotHour),

    #[error("no frame bound to plugin token {0}")]
    RoutingMiss(PluginToken),

    #[error("invalid JSON for plugin {token}: {reason}")]
    Decode { token: PluginToken, reason: String },

    #[error("message from untrusted origin {0}")]
    UntrustedOrigin(String),

    #[error("invalid plugin announcement: {0}")]
    Announcement(String),

    #[error(transparent)]
    Frame(#[from] FrameError),
}

impl From<RelayError> for JetclockError {
    fn from(e: RelayError) -> Self {
        JetclockError::Relay(e.to_string())
    }
}
