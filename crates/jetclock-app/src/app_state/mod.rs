//! Top-level application state.
//!
//! Implements `winit::application::ApplicationHandler` to drive the main
//! event loop. Owns the window, the plugin relay and its frames, and the
//! tokio runtime running the background tasks.

mod background;
mod core;
mod event_handler;
mod init;
mod polling;
mod shutdown;
mod types;
mod webview_bridge;

pub use core::JetclockApp;
