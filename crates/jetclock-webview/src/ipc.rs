//! IPC between frame content and the host.
//!
//! - **JS -> Rust**: content calls `window.jetclock.postMessage(data)` (or
//!   `window.postMessage` in a top-level frame). The init script wraps it as
//!   `{"kind": "message", "payload": data}` and sends it over `window.ipc`.
//!   Console output is sent the same way as `{"kind": "log", ...}`.
//! - **Rust -> JS**: the host dispatches a `message` event on the frame's
//!   window via `evaluate_script`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use jetclock_common::FrontendLogEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "lowercase")]
pub enum IpcEnvelope {
    Message(Value),
    Log(FrontendLogEntry),
}

impl IpcEnvelope {
    pub fn from_json(raw: &str) -> Option<Self> {
        serde_json::from_str(raw).ok()
    }
}

/// Injected into every frame before any page script runs.
pub const IPC_INIT_SCRIPT: &str = r#"
(function () {
    if (window.jetclock && window.jetclock.__bridge) return;

    function send(kind, payload) {
        try {
            window.ipc.postMessage(JSON.stringify({ kind: kind, payload: payload }));
        } catch (e) {}
    }

    window.jetclock = window.jetclock || {};
    window.jetclock.__bridge = true;
    window.jetclock.postMessage = function (data) {
        send('message', data === undefined ? null : data);
    };

    // A top-level frame has no embedder; its parent.postMessage goes to the host.
    if (window.parent === window) {
        window.postMessage = function (data) {
            window.jetclock.postMessage(data);
        };
    }

    ['log', 'info', 'warn', 'error', 'debug'].forEach(function (level) {
        var original = console[level];
        console[level] = function () {
            var msg = Array.prototype.map.call(arguments, function (a) {
                if (typeof a === 'string') return a;
                try { return JSON.stringify(a); } catch (e) { return String(a); }
            }).join(' ');
            send('log', { level: level, msg: msg });
            if (original) original.apply(console, arguments);
        };
    });
})();
"#;

/// Script that delivers `payload` to the frame as a `message` event.
pub fn js_deliver_message(payload: &Value) -> String {
    let data = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!("window.dispatchEvent(new MessageEvent('message', {{ data: {data} }}));")
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_message_envelope() {
        let env = IpcEnvelope::from_json(r#"{"kind":"message","payload":{"pluginToken":"t","x":1}}"#);
        assert_eq!(
            env,
            Some(IpcEnvelope::Message(json!({"pluginToken": "t", "x": 1})))
        );
    }

    #[test]
    fn parses_log_envelope() {
        let env = IpcEnvelope::from_json(r#"{"kind":"log","payload":{"level":"warn","msg":"hi"}}"#);
        assert_eq!(
            env,
            Some(IpcEnvelope::Log(FrontendLogEntry {
                level: "warn".into(),
                msg: "hi".into()
            }))
        );
    }

    #[test]
    fn rejects_unknown_kinds_and_garbage() {
        assert!(IpcEnvelope::from_json(r#"{"kind":"eval","payload":"x"}"#).is_none());
        assert!(IpcEnvelope::from_json("not json").is_none());
        assert!(IpcEnvelope::from_json(r#"{"payload":1}"#).is_none());
    }

    #[test]
    fn deliver_script_embeds_json_literal() {
        let js = js_deliver_message(&json!({"msg": "</script>'\"", "n": 1}));
        assert!(js.starts_with("window.dispatchEvent(new MessageEvent('message', { data: {"));
        assert!(js.contains(r#""msg":"</script>'\"""#));
        assert!(js.ends_with("}));"));
    }

    #[test]
    fn init_script_exposes_bridge() {
        assert!(IPC_INIT_SCRIPT.contains("window.jetclock.postMessage"));
        assert!(IPC_INIT_SCRIPT.contains("window.ipc.postMessage"));
        assert!(IPC_INIT_SCRIPT.contains("send('log'"));
    }
}
