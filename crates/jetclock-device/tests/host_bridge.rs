//! The device facade talking to the host dispatcher through the correlation
//! client, the way the app wires them.

use std::sync::Arc;
use std::time::Duration;

use jetclock_common::Command;
use jetclock_device::client::DEFAULT_TIMEOUT;
use jetclock_device::{CorrelationClient, Device, DeviceError, EmbeddedHostTransport};
use jetclock_host::{CommandDispatcher, OriginGate, SimulatedDevice};
use tokio::sync::mpsc;

const LOADER: &str = "https://app.jetclock.io";

struct Bridge {
    device: Device,
    client: Arc<CorrelationClient>,
    sim: Arc<SimulatedDevice>,
    task: tokio::task::JoinHandle<()>,
}

/// Spawn a bridge that answers every command from `origin`, skipping
/// methods listed in `ignore`.
fn bridge(origin: &'static str, ignore: &'static [&'static str]) -> Bridge {
    let (client, mut outbound): (CorrelationClient, mpsc::UnboundedReceiver<Command>) =
        CorrelationClient::new(DEFAULT_TIMEOUT);
    let client = Arc::new(client);
    let sim = Arc::new(SimulatedDevice::new("clock-42", "2.1.0"));
    let dispatcher = CommandDispatcher::new(OriginGate::new(LOADER), Arc::clone(&sim));

    let responder = Arc::clone(&client);
    let task = tokio::spawn(async move {
        while let Some(cmd) = outbound.recv().await {
            if ignore.contains(&cmd.method.as_str()) {
                continue;
            }
            let raw = serde_json::to_string(&cmd).unwrap();
            if let Some(resp) = dispatcher.handle(origin, &raw).await {
                responder.handle_response(resp);
            }
        }
    });

    let transport = Arc::new(EmbeddedHostTransport::new(Arc::clone(&client)));
    Bridge {
        device: Device::new(transport),
        client,
        sim,
        task,
    }
}

#[tokio::test]
async fn info_round_trips_through_dispatcher() {
    let b = bridge(LOADER, &[]);
    let info = b.device.system().info().await.unwrap();
    assert_eq!(info.system_id, "clock-42");
    assert_eq!(info.version, "2.1.0");
    assert_eq!(b.client.pending_count(), 0);
    b.task.abort();
}

#[tokio::test]
async fn screen_controls_reach_the_device() {
    let b = bridge(LOADER, &[]);

    b.device.screen().off().await.unwrap();
    assert_eq!(b.sim.current_brightness(), 0);

    b.device.screen().toggle().await.unwrap();
    assert_eq!(b.sim.current_brightness(), 100);

    b.device.screen().set_brightness(250).await.unwrap();
    let status = b.device.screen().status().await.unwrap();
    assert!(status.screen_on);
    assert_eq!(status.brightness, 100);

    b.device.system().reboot().await.unwrap();
    b.device.system().reload().await.unwrap();
    assert_eq!(b.sim.reboot_count(), 1);
    assert_eq!(b.sim.reload_count(), 1);
    b.task.abort();
}

#[tokio::test(start_paused = true)]
async fn untrusted_origin_times_out() {
    let b = bridge("https://evil.example", &[]);

    let err = b.device.system().reboot().await.unwrap_err();

    assert!(matches!(err, DeviceError::Timeout { .. }));
    assert_eq!(b.sim.reboot_count(), 0);
    assert_eq!(b.client.pending_count(), 0);
    b.task.abort();
}

#[tokio::test(start_paused = true)]
async fn one_unanswered_method_does_not_block_others() {
    let b = bridge(LOADER, &["GetVersion"]);

    let started = tokio::time::Instant::now();
    let system = b.device.system();
    let screen = b.device.screen();
    let (info, brightness) = tokio::join!(
        system.info(),
        screen.brightness(),
    );

    assert!(matches!(info, Err(DeviceError::Timeout { ref method, .. }) if method == "GetVersion"));
    assert_eq!(brightness.unwrap(), 100);
    assert!(started.elapsed() >= DEFAULT_TIMEOUT);
    assert!(started.elapsed() < DEFAULT_TIMEOUT + Duration::from_secs(1));
    assert_eq!(b.client.pending_count(), 0);
    b.task.abort();
}
