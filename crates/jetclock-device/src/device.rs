//! The device facade used by clock content.
//!
//! ```ignore
//! let device = Device::new(transport);
//! device.screen().off().await?;
//! let info = device.system().info().await?;
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::sync::OnceCell;
use tracing::info;

use crate::error::DeviceError;
use crate::transport::Transport;

pub const FULL_BRIGHTNESS: u8 = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemInfo {
    #[serde(rename = "systemID")]
    pub system_id: String,
    pub version: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenStatus {
    pub screen_on: bool,
    pub brightness: u8,
}

pub struct Device {
    transport: Arc<dyn Transport>,
    info: OnceCell<SystemInfo>,
}

impl Device {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            info: OnceCell::new(),
        }
    }

    pub fn screen(&self) -> Screen<'_> {
        Screen { device: self }
    }

    pub fn system(&self) -> System<'_> {
        System { device: self }
    }

    /// Fetch system info up front and log it.
    pub async fn init(&self) -> Result<SystemInfo, DeviceError> {
        let info = self.system().info().await?;
        info!(system_id = %info.system_id, version = %info.version, "device initialized");
        Ok(info)
    }

    async fn call(&self, method: &str, args: Vec<Value>) -> Result<Value, DeviceError> {
        self.transport.call(method, args).await
    }
}

pub struct Screen<'a> {
    device: &'a Device,
}

impl Screen<'_> {
    pub async fn on(&self) -> Result<Value, DeviceError> {
        self.write(FULL_BRIGHTNESS).await
    }

    pub async fn off(&self) -> Result<Value, DeviceError> {
        self.write(0).await
    }

    /// Off when lit, full brightness when dark.
    pub async fn toggle(&self) -> Result<Value, DeviceError> {
        let current = self.brightness().await?;
        self.write(if current > 0 { 0 } else { FULL_BRIGHTNESS }).await
    }

    pub async fn status(&self) -> Result<ScreenStatus, DeviceError> {
        let brightness = self.brightness().await?;
        Ok(ScreenStatus {
            screen_on: brightness > 0,
            brightness,
        })
    }

    /// Set brightness, clamping `level` into `0..=100`.
    pub async fn set_brightness(&self, level: i64) -> Result<Value, DeviceError> {
        let level = level.clamp(0, i64::from(FULL_BRIGHTNESS));
        self.write(level as u8).await
    }

    pub async fn brightness(&self) -> Result<u8, DeviceError> {
        let value = self.device.call("GetBrightness", vec![]).await?;
        brightness_from(&value)
    }

    async fn write(&self, level: u8) -> Result<Value, DeviceError> {
        self.device.call("SetBrightness", vec![json!(level)]).await
    }
}

pub struct System<'a> {
    device: &'a Device,
}

impl System<'_> {
    pub async fn reboot(&self) -> Result<Value, DeviceError> {
        self.device.call("Reboot", vec![]).await
    }

    pub async fn reload(&self) -> Result<Value, DeviceError> {
        self.device.call("reloadIframe", vec![]).await
    }

    /// System ID and version, fetched concurrently on first use and cached
    /// for the lifetime of the device. A failed fetch is not cached.
    pub async fn info(&self) -> Result<SystemInfo, DeviceError> {
        let device = self.device;
        device
            .info
            .get_or_try_init(|| async {
                let (id, version) = tokio::try_join!(
                    device.call("GetSystemID", vec![]),
                    device.call("GetVersion", vec![]),
                )?;
                Ok(SystemInfo {
                    system_id: string_from(id)?,
                    version: string_from(version)?,
                })
            })
            .await
            .cloned()
    }
}

fn brightness_from(value: &Value) -> Result<u8, DeviceError> {
    value
        .as_u64()
        .or_else(|| value.as_f64().filter(|f| *f >= 0.0).map(|f| f.round() as u64))
        .map(|b| b.min(u64::from(FULL_BRIGHTNESS)) as u8)
        .ok_or_else(|| DeviceError::Decode(format!("brightness is not a number: {value}")))
}

fn string_from(value: Value) -> Result<String, DeviceError> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(DeviceError::Decode(format!("expected a string, got {other}"))),
    }
}
