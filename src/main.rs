//! LightsOut Firmware — Main Entry Point
//!
//! Hexagonal architecture around a two-task command pipeline.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                   │
//! │                                                            │
//! │  HardwareAdapter   LogEventSink   WifiAdapter   MqttBridge │
//! │  (ActuatorPort)    (EventSink)    (Connectivity)(Telemetry)│
//! │                                                            │
//! │  ─────────────── Port Trait Boundary ──────────────────    │
//! │                                                            │
//! │  ┌──────────────────────────────────────────────────────┐  │
//! │  │            LightService (pure logic)                 │  │
//! │  │  decode · actuate · ack · publish                    │  │
//! │  └──────────────────────────────────────────────────────┘  │
//! │                                                            │
//! │  RadioTransport (send-lock policy) · Pipeline (2 tasks)    │
//! └────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::sync::Arc;
use std::time::Duration;

use log::{error, info, warn};

use lightsout::adapters::hardware::HardwareAdapter;
use lightsout::adapters::log_sink::LogEventSink;
use lightsout::adapters::mqtt::MqttBridge;
use lightsout::adapters::wifi::{ConnectivityPort, WifiAdapter};
use lightsout::app::ports::NoTelemetry;
use lightsout::app::queue::CommandQueue;
use lightsout::config;
use lightsout::drivers::relay::RelayDriver;
use lightsout::drivers::status_led::StatusLed;
use lightsout::drivers::watchdog::Watchdog;
use lightsout::drivers;
use lightsout::ota;
use lightsout::radio::RadioTransport;
use lightsout::radio::sx127x::Sx127xLink;
use lightsout::tasks::{self, Pipeline};

fn main() -> anyhow::Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  LightsOut v{}                      ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 1b. OTA rollback check ────────────────────────────────
    ota::check_rollback();

    // ── 1c. Actuator GPIO bring-up ────────────────────────────
    if let Err(e) = drivers::hw_init::init_outputs() {
        // Output init failure is critical — log and halt. The TWDT is
        // armed only after init succeeds, so this is a true halt.
        error!("HAL init failed: {} — halting", e);
        halt();
    }

    // ── 2. Peripherals and radio ──────────────────────────────
    let peripherals = esp_idf_hal::peripherals::Peripherals::take()?;
    let sysloop = esp_idf_svc::eventloop::EspSystemEventLoop::take()?;
    let nvs = esp_idf_svc::nvs::EspDefaultNvsPartition::take()?;

    let link = match Sx127xLink::new(
        peripherals.spi2,
        peripherals.pins.gpio5.into(),
        peripherals.pins.gpio4.into(),
        peripherals.pins.gpio2.into(),
        peripherals.pins.gpio9.into(),
        peripherals.pins.gpio13.into(),
    ) {
        Ok(link) => link,
        Err(e) => {
            error!("LoRa SPI bring-up failed: {} — halting", e);
            halt();
        }
    };

    let transport = Arc::new(RadioTransport::new(link));
    if let Err(e) = transport.configure() {
        // A node that cannot hear commands is useless; stop here rather
        // than limp along.
        error!("LoRa configure failed: {} — halting", e);
        halt();
    }
    info!(
        "LoRa ready: {} Hz, SF{}, BW {} Hz",
        config::LORA_FREQUENCY_HZ,
        config::LORA_SPREADING_FACTOR,
        config::LORA_BANDWIDTH_HZ
    );

    // ── 3. Command pipeline ───────────────────────────────────
    let queue = Arc::new(CommandQueue::new());
    let hw = HardwareAdapter::new(RelayDriver::new(), StatusLed::new());
    let sink = LogEventSink::new();

    let _pipeline: Pipeline = match MqttBridge::start(Arc::clone(&queue)) {
        Ok(bridge) => tasks::spawn_pipeline(
            Arc::clone(&transport),
            Arc::clone(&queue),
            hw,
            bridge,
            sink,
        ),
        Err(e) => {
            warn!("MQTT bridge unavailable ({e}), running radio-only");
            tasks::spawn_pipeline(
                Arc::clone(&transport),
                Arc::clone(&queue),
                hw,
                NoTelemetry,
                sink,
            )
        }
    };

    // ── 4. WiFi (best-effort) ─────────────────────────────────
    let mut wifi = match WifiAdapter::new(peripherals.modem, sysloop, nvs) {
        Ok(wifi) => Some(wifi),
        Err(e) => {
            warn!("WiFi driver init failed ({e}), running without uplink");
            None
        }
    };
    if let Some(ref mut wifi) = wifi {
        if let Err(e) = wifi.connect() {
            warn!("WiFi connect failed ({e}), reconnect loop will retry");
        }
    }

    // ── 5. Idle loop ──────────────────────────────────────────
    // Armed last: every init failure above must land in halt(), not a
    // TWDT panic reset that would retry init.
    let watchdog = Watchdog::new();
    info!("System ready. Command pipeline running.");

    loop {
        std::thread::sleep(Duration::from_secs(1));
        if let Some(ref mut wifi) = wifi {
            wifi.poll();
        }
        watchdog.feed();
    }
}

/// Fail-stop: park the main task forever. Only reachable before the
/// TWDT is armed, so no watchdog reset turns this into an init retry.
fn halt() -> ! {
    loop {
        std::thread::sleep(Duration::from_secs(1));
    }
}
