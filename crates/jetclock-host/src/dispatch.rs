//! Privileged command handling for the loader frame.
//!
//! The loader posts `{method, args, messageId}`; once its origin passes the
//! gate the command is run against a [`PrivilegedMethods`] backend and
//! answered with `{method, result, error, messageId}`.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use jetclock_common::{Command, Response};

use crate::origin::OriginGate;

pub const GET_SYSTEM_ID: &str = "GetSystemID";
pub const GET_VERSION: &str = "GetVersion";
pub const GET_BRIGHTNESS: &str = "GetBrightness";
pub const SET_BRIGHTNESS: &str = "SetBrightness";
pub const REBOOT: &str = "Reboot";
pub const RELOAD_FRAME: &str = "reloadIframe";

/// Highest brightness the panel accepts.
pub const MAX_BRIGHTNESS: u8 = 100;

/// A privileged method failed on the native side.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{0}")]
pub struct InvocationFailure(pub String);

/// The native operations a loader frame may invoke.
#[async_trait]
pub trait PrivilegedMethods: Send + Sync {
    async fn system_id(&self) -> Result<String, InvocationFailure>;

    async fn version(&self) -> Result<String, InvocationFailure>;

    async fn brightness(&self) -> Result<u8, InvocationFailure>;

    async fn set_brightness(&self, level: u8) -> Result<(), InvocationFailure>;

    async fn reboot(&self) -> Result<(), InvocationFailure>;

    /// Reload the loader frame itself.
    async fn reload_frame(&self) -> Result<(), InvocationFailure>;
}

pub struct CommandDispatcher<P> {
    gate: OriginGate,
    methods: Arc<P>,
}

impl<P: PrivilegedMethods> CommandDispatcher<P> {
    pub fn new(gate: OriginGate, methods: Arc<P>) -> Self {
        Self { gate, methods }
    }

    pub fn methods(&self) -> &Arc<P> {
        &self.methods
    }

    /// Handle one raw message from a loader frame at `origin`.
    ///
    /// Returns `None` when the message must go unanswered: untrusted
    /// origin, or a body that is not a command.
    pub async fn handle(&self, origin: &str, raw: &str) -> Option<Response> {
        if self.gate.check(origin).is_err() {
            return None;
        }
        let Some(command) = Command::from_json(raw) else {
            debug!(origin, "ignoring non-command message from loader");
            return None;
        };
        Some(self.dispatch(command).await)
    }

    /// Run `command` and build its response. Never fails; errors are
    /// carried in the response.
    pub async fn dispatch(&self, command: Command) -> Response {
        let Command {
            method,
            args,
            message_id,
        } = command;

        debug!(method = %method, message_id, "dispatching device command");

        match self.invoke(&method, &args).await {
            Ok(result) => Response::ok(method, message_id, result),
            Err(e) => {
                warn!(method = %method, message_id, error = %e, "device command failed");
                Response::err(method, message_id, e.0)
            }
        }
    }

    async fn invoke(&self, method: &str, args: &[Value]) -> Result<Value, InvocationFailure> {
        let m = &self.methods;
        match method {
            GET_SYSTEM_ID => m.system_id().await.map(Value::from),
            GET_VERSION => m.version().await.map(Value::from),
            GET_BRIGHTNESS => m.brightness().await.map(Value::from),
            SET_BRIGHTNESS => {
                let level = brightness_arg(args)?;
                m.set_brightness(level).await?;
                Ok(json!({ "success": true }))
            }
            REBOOT => {
                m.reboot().await?;
                Ok(json!({ "success": true }))
            }
            RELOAD_FRAME => {
                m.reload_frame().await?;
                Ok(json!({ "success": true }))
            }
            other => Err(InvocationFailure(format!("unknown method: {other}"))),
        }
    }
}

fn brightness_arg(args: &[Value]) -> Result<u8, InvocationFailure> {
    let raw = args
        .first()
        .ok_or_else(|| InvocationFailure("SetBrightness requires a level".into()))?;
    raw.as_u64()
        .filter(|&level| level <= u64::from(MAX_BRIGHTNESS))
        .and_then(|level| u8::try_from(level).ok())
        .ok_or_else(|| InvocationFailure(format!("invalid brightness level: {raw}")))
}

/// In-memory stand-in for the native device.
#[derive(Debug)]
pub struct SimulatedDevice {
    system_id: String,
    version: String,
    brightness: AtomicU8,
    reboots: AtomicU32,
    reloads: AtomicU32,
}

impl SimulatedDevice {
    pub fn new(system_id: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            system_id: system_id.into(),
            version: version.into(),
            brightness: AtomicU8::new(MAX_BRIGHTNESS),
            reboots: AtomicU32::new(0),
            reloads: AtomicU32::new(0),
        }
    }

    pub fn reboot_count(&self) -> u32 {
        self.reboots.load(Ordering::SeqCst)
    }

    pub fn reload_count(&self) -> u32 {
        self.reloads.load(Ordering::SeqCst)
    }

    pub fn current_brightness(&self) -> u8 {
        self.brightness.load(Ordering::SeqCst)
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new("sim-0001", env!("CARGO_PKG_VERSION"))
    }
}

#[async_trait]
impl PrivilegedMethods for SimulatedDevice {
    async fn system_id(&self) -> Result<String, InvocationFailure> {
        Ok(self.system_id.clone())
    }

    async fn version(&self) -> Result<String, InvocationFailure> {
        Ok(self.version.clone())
    }

    async fn brightness(&self) -> Result<u8, InvocationFailure> {
        Ok(self.current_brightness())
    }

    async fn set_brightness(&self, level: u8) -> Result<(), InvocationFailure> {
        self.brightness.store(level.min(MAX_BRIGHTNESS), Ordering::SeqCst);
        info!(level, "simulated brightness set");
        Ok(())
    }

    async fn reboot(&self) -> Result<(), InvocationFailure> {
        let n = self.reboots.fetch_add(1, Ordering::SeqCst) + 1;
        info!(count = n, "simulated reboot");
        Ok(())
    }

    async fn reload_frame(&self) -> Result<(), InvocationFailure> {
        self.reloads.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
