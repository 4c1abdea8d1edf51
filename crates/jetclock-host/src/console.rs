//! Frame console output, re-emitted through `tracing`.

use tokio::sync::broadcast::{self, error::TryRecvError};
use tracing::{debug, error, info, trace, warn};

use jetclock_common::events::FRONTEND_LOG;
use jetclock_common::{EventBus, FrontendLogEntry};

/// Decode one `{level, msg}` entry and log it at the matching level.
///
/// Returns `false` for entries that could not be decoded.
pub fn forward_frontend_log(raw: &str) -> bool {
    let entry: FrontendLogEntry = match serde_json::from_str(raw) {
        Ok(e) => e,
        Err(e) => {
            debug!(error = %e, "dropping malformed frontend log entry");
            return false;
        }
    };

    let msg = entry.msg.as_str();
    match entry.level.to_ascii_lowercase().as_str() {
        "error" => error!(target: "jetclock::frontend", "{msg}"),
        "warn" | "warning" => warn!(target: "jetclock::frontend", "{msg}"),
        "debug" => debug!(target: "jetclock::frontend", "{msg}"),
        "trace" => trace!(target: "jetclock::frontend", "{msg}"),
        _ => info!(target: "jetclock::frontend", "{msg}"),
    }
    true
}

/// Listens on `jetclock:frontend.log` and forwards whatever arrived.
pub struct ConsoleForwarder {
    rx: broadcast::Receiver<String>,
}

impl ConsoleForwarder {
    pub fn new(bus: &EventBus) -> Self {
        Self {
            rx: bus.subscribe(FRONTEND_LOG),
        }
    }

    /// Forward every queued entry. Returns how many were logged.
    pub fn drain(&mut self) -> usize {
        let mut forwarded = 0;
        loop {
            match self.rx.try_recv() {
                Ok(raw) => {
                    if forward_frontend_log(&raw) {
                        forwarded += 1;
                    }
                }
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(skipped, "frontend log lagged");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
            }
        }
        forwarded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forwards_known_and_unknown_levels() {
        assert!(forward_frontend_log(r#"{"level":"error","msg":"boom"}"#));
        assert!(forward_frontend_log(r#"{"level":"WARN","msg":"careful"}"#));
        assert!(forward_frontend_log(r#"{"level":"log","msg":"plain console.log"}"#));
    }

    #[test]
    fn rejects_malformed_entries() {
        assert!(!forward_frontend_log("not json"));
        assert!(!forward_frontend_log(r#"{"level":"info"}"#));
    }

    #[test]
    fn drain_counts_forwarded_entries() {
        let bus = EventBus::new(16);
        let mut forwarder = ConsoleForwarder::new(&bus);

        bus.publish(FRONTEND_LOG, r#"{"level":"info","msg":"a"}"#);
        bus.publish(FRONTEND_LOG, "garbage");
        bus.publish(FRONTEND_LOG, r#"{"level":"debug","msg":"b"}"#);

        assert_eq!(forwarder.drain(), 2);
        assert_eq!(forwarder.drain(), 0);
    }
}
