//! Compile-time system configuration.
//!
//! Every tunable of the LightsOut node is a build-time constant — there is
//! no runtime configuration store on this device. Radio parameters must
//! match the transmitter side exactly or packets will not demodulate.

// ---------------------------------------------------------------------------
// LoRa modem parameters
// ---------------------------------------------------------------------------

/// Carrier frequency in Hz (EU868 band).
pub const LORA_FREQUENCY_HZ: u64 = 868_000_000;
/// Spreading factor (SF7 = shortest airtime at this link budget).
pub const LORA_SPREADING_FACTOR: u8 = 7;
/// Signal bandwidth in Hz.
pub const LORA_BANDWIDTH_HZ: u32 = 125_000;
/// Coding rate denominator (4/5).
pub const LORA_CODING_RATE: u8 = 5;
/// Private-network sync word. 0x34 is reserved for LoRaWAN.
pub const LORA_SYNC_WORD: u8 = 0x12;
/// Preamble length in symbols.
pub const LORA_PREAMBLE_LEN: u16 = 8;
/// Transmit power in dBm, routed through PA_BOOST.
pub const LORA_TX_POWER_DBM: i8 = 14;

/// Largest payload the transport will accept in one packet.
pub const MAX_PACKET_LEN: usize = 255;

/// Reserved ceiling for richer command payloads. The current protocol is
/// exactly one byte; anything beyond the first byte of a packet is
/// discarded. Kept so future payload framing stays copyable into
/// fixed-size buffers.
pub const MAX_COMMAND_PAYLOAD: usize = 32;

// ---------------------------------------------------------------------------
// Command pipeline
// ---------------------------------------------------------------------------

/// Bounded depth of the command queue between the receive and actuate
/// tasks. A full queue stalls producers (backpressure, never drops).
pub const QUEUE_DEPTH: usize = 10;

/// How often the receive task polls the radio for a pending packet.
pub const RADIO_POLL_INTERVAL_MS: u64 = 100;

/// Bounded wait for the radio send mutex before an outbound packet is
/// silently dropped. Acks are best-effort; blocking longer would risk
/// head-of-line blocking the radio.
pub const RADIO_SEND_LOCK_TIMEOUT_MS: u64 = 100;

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Stack size for the receive and actuate tasks, in KiB.
pub const TASK_STACK_KB: usize = 10;
/// FreeRTOS priority for both pipeline tasks (equal, low).
pub const TASK_PRIORITY: u8 = 1;

// ---------------------------------------------------------------------------
// WiFi / MQTT bridge
// ---------------------------------------------------------------------------

/// Station credentials, injected at build time. Leave unset to run the
/// node radio-only.
pub const WIFI_SSID: Option<&str> = option_env!("LIGHTSOUT_WIFI_SSID");
pub const WIFI_PASSWORD: Option<&str> = option_env!("LIGHTSOUT_WIFI_PASSWORD");

pub const MQTT_BROKER_URL: Option<&str> = option_env!("LIGHTSOUT_MQTT_URL");
pub const MQTT_CLIENT_ID: &str = "lights_out_node";
/// Actuator state is mirrored here as `"ON"` / `"OFF"`.
pub const MQTT_TOPIC_STATE: &str = "lights_out/state";
/// Broker-originated commands; the payload's first byte is consumed.
pub const MQTT_TOPIC_COMMAND: &str = "lights_out/command";
