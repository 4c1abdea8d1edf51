//! Wi-Fi mode watcher and the indicator it drives.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, error, info};

use jetclock_common::events::WIFI_MODE;
use jetclock_common::{EventBus, JetclockError, WifiMode};

/// Read the mode of `interface` from `iw dev` output.
///
/// `type managed` is infrastructure, `type AP` is access-point. A missing
/// interface or any other type is unknown.
pub fn parse_iw_dev(output: &str, interface: &str) -> WifiMode {
    let mut in_block = false;
    for line in output.lines().map(str::trim) {
        if let Some(name) = line.strip_prefix("Interface ") {
            in_block = name.trim() == interface;
            continue;
        }
        if !in_block {
            continue;
        }
        if let Some(kind) = line.strip_prefix("type ") {
            return match kind.trim() {
                "managed" => WifiMode::Infrastructure,
                "AP" => WifiMode::AccessPoint,
                _ => WifiMode::Unknown,
            };
        }
    }
    WifiMode::Unknown
}

#[async_trait]
pub trait WifiProbe: Send + Sync {
    async fn mode(&self) -> Result<WifiMode, JetclockError>;
}

/// Probes the interface by running `iw dev`.
pub struct IwProbe {
    interface: String,
}

impl IwProbe {
    pub fn new(interface: impl Into<String>) -> Self {
        Self {
            interface: interface.into(),
        }
    }
}

#[async_trait]
impl WifiProbe for IwProbe {
    async fn mode(&self) -> Result<WifiMode, JetclockError> {
        let output = tokio::process::Command::new("iw").arg("dev").output().await?;
        if !output.status.success() {
            return Err(JetclockError::Other(format!(
                "iw dev exited with {}",
                output.status
            )));
        }
        let stdout = String::from_utf8_lossy(&output.stdout);
        Ok(parse_iw_dev(&stdout, &self.interface))
    }
}

/// Polls a [`WifiProbe`] and publishes the mode on `jetclock:wifi.mode`.
pub struct WifiWatcher<P> {
    probe: P,
    bus: Arc<EventBus>,
    interval: Duration,
    last: WifiMode,
}

impl<P: WifiProbe> WifiWatcher<P> {
    pub fn new(probe: P, bus: Arc<EventBus>, interval: Duration) -> Self {
        Self {
            probe,
            bus,
            interval,
            last: WifiMode::Unknown,
        }
    }

    pub fn last_mode(&self) -> WifiMode {
        self.last
    }

    /// Probe once and publish. A failed probe keeps and republishes the
    /// previous mode.
    pub async fn tick(&mut self) -> WifiMode {
        match self.probe.mode().await {
            Ok(mode) if mode != self.last => {
                info!(from = %self.last, to = %mode, "Wi-Fi mode changed");
                self.last = mode;
            }
            Ok(_) => {}
            Err(e) => error!(error = %e, "Wi-Fi watch error"),
        }
        debug!(mode = %self.last, "publishing Wi-Fi mode");
        self.bus.publish(WIFI_MODE, self.last.code().to_string());
        self.last
    }

    /// Tick forever on the configured interval. The first tick fires after
    /// one full interval.
    pub async fn run(mut self) {
        let mut ticker = tokio::time::interval_at(
            tokio::time::Instant::now() + self.interval,
            self.interval,
        );
        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }
}

/// What the Wi-Fi corner indicator shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WifiIndicator {
    Wifi,
    Hotspot,
    Unknown,
}

impl WifiIndicator {
    pub fn from_mode(mode: WifiMode) -> Self {
        match mode {
            WifiMode::Infrastructure => Self::Wifi,
            WifiMode::AccessPoint => Self::Hotspot,
            WifiMode::Unknown => Self::Unknown,
        }
    }

    /// Decode a `jetclock:wifi.mode` payload.
    pub fn from_payload(raw: &str) -> Self {
        let mode = raw
            .trim()
            .parse::<i64>()
            .map(WifiMode::from_code)
            .unwrap_or_default();
        Self::from_mode(mode)
    }

    /// Icon asset. An unknown mode keeps the Wi-Fi icon; only the alt
    /// text tells it apart.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Hotspot => "cell_tower.svg",
            Self::Wifi | Self::Unknown => "wifi.svg",
        }
    }

    pub fn alt(self) -> &'static str {
        match self {
            Self::Wifi => "Wi-Fi",
            Self::Hotspot => "Hotspot",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    const IW_OUTPUT: &str = "\
phy#0
\tInterface wlan0
\t\tifindex 3
\t\twdev 0x1
\t\taddr b8:27:eb:00:00:01
\t\ttype managed
\t\tchannel 6 (2437 MHz), width: 20 MHz
\tInterface uap0
\t\tifindex 4
\t\ttype AP
";

    #[test]
    fn parses_managed_and_ap_interfaces() {
        assert_eq!(parse_iw_dev(IW_OUTPUT, "wlan0"), WifiMode::Infrastructure);
        assert_eq!(parse_iw_dev(IW_OUTPUT, "uap0"), WifiMode::AccessPoint);
    }

    #[test]
    fn missing_interface_or_odd_type_is_unknown() {
        assert_eq!(parse_iw_dev(IW_OUTPUT, "wlan1"), WifiMode::Unknown);
        assert_eq!(parse_iw_dev("", "wlan0"), WifiMode::Unknown);
        let monitor = "Interface wlan0\n\ttype monitor\n";
        assert_eq!(parse_iw_dev(monitor, "wlan0"), WifiMode::Unknown);
    }

    struct ScriptedProbe(Mutex<VecDeque<Result<WifiMode, JetclockError>>>);

    impl ScriptedProbe {
        fn new(script: Vec<Result<WifiMode, JetclockError>>) -> Self {
            Self(Mutex::new(script.into()))
        }
    }

    #[async_trait]
    impl WifiProbe for ScriptedProbe {
        async fn mode(&self) -> Result<WifiMode, JetclockError> {
            self.0
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Ok(WifiMode::Unknown))
        }
    }

    #[tokio::test]
    async fn tick_publishes_and_keeps_last_on_error() {
        let bus = Arc::new(EventBus::new(16));
        let mut rx = bus.subscribe(WIFI_MODE);
        let probe = ScriptedProbe::new(vec![
            Ok(WifiMode::Infrastructure),
            Err(JetclockError::Other("iw missing".into())),
            Ok(WifiMode::AccessPoint),
        ]);
        let mut watcher = WifiWatcher::new(probe, Arc::clone(&bus), Duration::from_secs(10));

        assert_eq!(watcher.tick().await, WifiMode::Infrastructure);
        assert_eq!(watcher.tick().await, WifiMode::Infrastructure);
        assert_eq!(watcher.tick().await, WifiMode::AccessPoint);

        let published: Vec<String> = (0..3).map(|_| rx.try_recv().unwrap()).collect();
        assert_eq!(published, vec!["1", "1", "2"]);
    }

    #[tokio::test(start_paused = true)]
    async fn run_ticks_on_interval() {
        let bus = Arc::new(EventBus::new(16));
        let mut rx = bus.subscribe(WIFI_MODE);
        let probe = ScriptedProbe::new(vec![Ok(WifiMode::Infrastructure)]);
        let watcher = WifiWatcher::new(probe, Arc::clone(&bus), Duration::from_secs(10));

        let handle = tokio::spawn(watcher.run());

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(rx.try_recv().unwrap(), "1");

        handle.abort();
    }

    #[test]
    fn indicator_icons() {
        assert_eq!(WifiIndicator::from_payload("1").icon(), "wifi.svg");
        assert_eq!(WifiIndicator::from_payload("2").icon(), "cell_tower.svg");
        assert_eq!(WifiIndicator::from_payload("0"), WifiIndicator::Unknown);
        assert_eq!(WifiIndicator::from_payload("0").icon(), "wifi.svg");
        assert_eq!(WifiIndicator::from_payload("bogus").alt(), "Unknown");
        assert_eq!(WifiIndicator::from_mode(WifiMode::AccessPoint).alt(), "Hotspot");
    }
}
