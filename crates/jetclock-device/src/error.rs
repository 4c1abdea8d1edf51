use std::time::Duration;

use jetclock_common::JetclockError;

#[derive(Debug, Clone, thiserror::Error)]
pub enum DeviceError {
    /// The host answered with an `error` field.
    #[error("{0}")]
    Invocation(String),

    #[error("method '{method}' timed out after {after:?}")]
    Timeout { method: String, after: Duration },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("device connection closed")]
    Closed,
}

impl From<reqwest::Error> for DeviceError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

impl From<DeviceError> for JetclockError {
    fn from(e: DeviceError) -> Self {
        JetclockError::Device(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeout_names_the_method() {
        let err = DeviceError::Timeout {
            method: "GetBrightness".into(),
            after: Duration::from_secs(5),
        };
        assert_eq!(err.to_string(), "method 'GetBrightness' timed out after 5s");
    }

    #[test]
    fn invocation_error_is_the_host_message() {
        let err = DeviceError::Invocation("panel offline".into());
        assert_eq!(err.to_string(), "panel offline");
    }

    #[test]
    fn device_error_into_jetclock_error() {
        let err: JetclockError = DeviceError::Closed.into();
        assert_eq!(err.to_string(), "device error: device connection closed");
    }
}
