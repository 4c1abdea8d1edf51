//! Host side of the plugin messaging layer.
//!
//! - [`slots`]: fixed clock-face slot allocation
//! - [`relay`]: routes native events to plugin frames and frame messages
//!   back onto the native bus
//! - [`origin`]: trust boundary for privileged loader frames
//! - [`dispatch`]: answers device commands from the loader frame
//! - [`console`]: re-emits frame console output through `tracing`
//! - [`wifi`]: Wi-Fi mode watcher and indicator

pub mod console;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod origin;
pub mod relay;
pub mod slots;
pub mod wifi;

pub use console::{forward_frontend_log, ConsoleForwarder};
pub use dispatch::{CommandDispatcher, InvocationFailure, PrivilegedMethods, SimulatedDevice};
pub use error::RelayError;
pub use frame::{FrameError, FrameHost};
pub use origin::{origin_of, OriginGate};
pub use relay::PluginRelay;
pub use slots::{Slot, SlotRegistry};
pub use wifi::{parse_iw_dev, IwProbe, WifiIndicator, WifiProbe, WifiWatcher};
