//! Frame <-> host wire protocol.
//!
//! Commands travel from embedded content to the privileged host as
//! `{method, args, messageId}`; the host answers with
//! `{method, result, error, messageId}`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    pub method: String,
    #[serde(default)]
    pub args: Vec<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<u64>,
}

impl Command {
    pub fn new(method: impl Into<String>, args: Vec<Value>, message_id: u64) -> Self {
        Self {
            method: method.into(),
            args,
            message_id: Some(message_id),
        }
    }

    /// Parse a command from a raw frame message.
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response {
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<u64>,
}

impl Response {
    pub fn ok(method: impl Into<String>, message_id: Option<u64>, result: Value) -> Self {
        Self {
            method: method.into(),
            result: Some(result),
            error: None,
            message_id,
        }
    }

    pub fn err(method: impl Into<String>, message_id: Option<u64>, error: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            result: None,
            error: Some(error.into()),
            message_id,
        }
    }

    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Payload of the plugin-loaded announcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginLoaded {
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// One line of console output forwarded from a web frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrontendLogEntry {
    pub level: String,
    pub msg: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_uses_camel_case_message_id() {
        let cmd = Command::new("SetBrightness", vec![json!(40)], 7);
        let value = serde_json::to_value(&cmd).unwrap();
        assert_eq!(value, json!({"method": "SetBrightness", "args": [40], "messageId": 7}));
    }

    #[test]
    fn command_args_default_to_empty() {
        let cmd = Command::from_json(r#"{"method":"Reboot"}"#).unwrap();
        assert!(cmd.args.is_empty());
        assert_eq!(cmd.message_id, None);
    }

    #[test]
    fn command_without_method_is_rejected() {
        assert!(Command::from_json(r#"{"args":[]}"#).is_none());
        assert!(Command::from_json("not json").is_none());
    }

    #[test]
    fn error_response_omits_result() {
        let resp = Response::err("Reboot", Some(3), "permission denied");
        let value = serde_json::to_value(&resp).unwrap();
        assert_eq!(
            value,
            json!({"method": "Reboot", "error": "permission denied", "messageId": 3})
        );
    }

    #[test]
    fn legacy_response_without_message_id_parses() {
        let resp = Response::from_json(r#"{"method":"GetVersion","result":"1.2.0"}"#).unwrap();
        assert_eq!(resp.message_id, None);
        assert_eq!(resp.result, Some(json!("1.2.0")));
    }

    #[test]
    fn plugin_loaded_url_is_optional() {
        let loaded: PluginLoaded = serde_json::from_str(r#"{"token":"t1"}"#).unwrap();
        assert_eq!(loaded.token, "t1");
        assert!(loaded.url.is_none());
    }
}
