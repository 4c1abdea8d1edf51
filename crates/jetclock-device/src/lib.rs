//! Device control for embedded JetClock content.
//!
//! - [`client`]: request/response correlation over the frame protocol
//! - [`transport`]: how calls reach the host (embedded or mocked)
//! - [`device`]: the `screen` / `system` facade
//! - [`status`]: remote clock-status poller

pub mod client;
pub mod device;
pub mod error;
pub mod status;
pub mod transport;

pub use client::CorrelationClient;
pub use device::{Device, Screen, ScreenStatus, System, SystemInfo};
pub use error::DeviceError;
pub use status::{ClockStatus, StatusPoller};
pub use transport::{mock_response, EmbeddedHostTransport, Environment, MockTransport, Transport};
