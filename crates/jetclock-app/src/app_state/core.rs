//! JetclockApp struct definition and constructor.

use std::sync::mpsc;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::broadcast;
use winit::window::Window;

use jetclock_common::events::{SCREEN_ON, WIFI_MODE};
use jetclock_common::{EventBus, Response};
use jetclock_config::JetclockConfig;
use jetclock_device::{CorrelationClient, Device};
use jetclock_host::{
    CommandDispatcher, ConsoleForwarder, OriginGate, PluginRelay, SimulatedDevice, WifiIndicator,
};
use jetclock_webview::SlotWebViews;

pub struct JetclockApp {
    pub(super) config: JetclockConfig,
    pub(super) bus: Arc<EventBus>,

    pub(super) window: Option<Arc<Window>>,
    /// Owns the slot registry and every frame.
    pub(super) relay: Option<PluginRelay<SlotWebViews>>,

    /// Answers device commands from the loader frame and the native client.
    pub(super) dispatcher: Arc<CommandDispatcher<SimulatedDevice>>,
    pub(super) client: Option<Arc<CorrelationClient>>,
    pub(super) device: Option<Arc<Device>>,
    pub(super) tokio_runtime: Option<tokio::runtime::Runtime>,

    /// Dispatcher answers waiting to be posted back into the loader frame.
    pub(super) loader_tx: mpsc::Sender<Response>,
    pub(super) loader_rx: mpsc::Receiver<Response>,

    pub(super) console: ConsoleForwarder,
    pub(super) wifi_rx: broadcast::Receiver<String>,
    pub(super) wifi_indicator: WifiIndicator,
    /// Remote screen state; the loader frame is hidden while it is off.
    pub(super) screen_rx: broadcast::Receiver<String>,
    pub(super) screen_on: bool,

    pub(super) should_exit: bool,
    pub(super) last_poll: Instant,
}

impl JetclockApp {
    pub fn new(config: JetclockConfig) -> Self {
        let bus = Arc::new(EventBus::default());
        let dispatcher = Arc::new(CommandDispatcher::new(
            OriginGate::new(&config.loader.expected_origin),
            Arc::new(SimulatedDevice::default()),
        ));
        let (loader_tx, loader_rx) = mpsc::channel();
        let console = ConsoleForwarder::new(&bus);
        let wifi_rx = bus.subscribe(WIFI_MODE);
        let screen_rx = bus.subscribe(SCREEN_ON);

        Self {
            config,
            bus,
            window: None,
            relay: None,
            dispatcher,
            client: None,
            device: None,
            tokio_runtime: None,
            loader_tx,
            loader_rx,
            console,
            wifi_rx,
            wifi_indicator: WifiIndicator::Unknown,
            screen_rx,
            screen_on: true,
            should_exit: false,
            last_poll: Instant::now(),
        }
    }
}
