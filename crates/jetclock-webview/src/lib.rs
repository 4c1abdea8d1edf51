//! WebView embedding for the JetClock window.
//!
//! Wraps `wry` to provide:
//! - One child WebView per clock-face slot plus the loader frame
//! - An IPC bridge carrying frame messages and console output to Rust
//! - A `jetclock://` protocol serving bundled assets
//! - A navigation allowlist per frame

pub mod content;
pub mod events;
pub mod ipc;
pub mod layout;
pub mod manager;
pub mod slots;

pub use content::ContentProvider;
pub use events::{FrameId, PageLoadState, WebViewEvent};
pub use ipc::IpcEnvelope;
pub use layout::{slot_rect, FrameRect};
pub use manager::{FrameHandle, NavigationPolicy, WebViewConfig, WebViewManager};
pub use slots::SlotWebViews;
