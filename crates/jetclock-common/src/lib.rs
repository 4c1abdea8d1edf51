pub mod errors;
pub mod events;
pub mod id;
pub mod protocol;
pub mod types;

pub use errors::{ConfigError, JetclockError};
pub use events::{plugin_event_channel, EventBus};
pub use id::{new_id, PluginToken};
pub use protocol::{Command, FrontendLogEntry, PluginLoaded, Response};
pub use types::{SlotHour, WifiMode, SLOT_COUNT, SLOT_ORDER};

pub type Result<T> = std::result::Result<T, JetclockError>;
