//! MQTT telemetry bridge.
//!
//! Outbound: implements [`TelemetryPort`] over `EspMqttClient`, mirroring
//! actuator state to the broker. Non-blocking — publishes are enqueued
//! into the client's own queue and a disconnected bridge fails fast.
//!
//! Inbound: a dedicated receiver thread decodes broker messages on the
//! command topic and forwards the payload's first byte into the
//! [`CommandQueue`], the same enqueue contract the receive task uses.
//! This makes the queue the single point of command fan-in regardless of
//! origin.
//!
//! The broker connection lifecycle (reconnect, resubscribe) lives
//! entirely in this adapter; the domain core only sees `publish`.
//!
//! ## cfg gating
//!
//! - **`target_os = "espidf"`**: real `esp-idf-svc` MQTT client.
//! - **all other targets**: in-memory recorder for host-side tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;

use crate::app::ports::TelemetryPort;
use crate::app::queue::CommandQueue;
use crate::error::CommsError;

#[cfg(target_os = "espidf")]
use std::sync::Mutex;

pub struct MqttBridge {
    connected: Arc<AtomicBool>,
    #[cfg(target_os = "espidf")]
    client: Arc<Mutex<esp_idf_svc::mqtt::client::EspMqttClient<'static>>>,
    #[cfg(not(target_os = "espidf"))]
    queue: Arc<CommandQueue>,
    #[cfg(not(target_os = "espidf"))]
    published: Arc<std::sync::Mutex<Vec<(String, Vec<u8>)>>>,
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF implementation
// ───────────────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
impl MqttBridge {
    /// Connect to the compile-time broker URL and start the receiver
    /// thread. `queue` receives broker-originated command bytes.
    pub fn start(queue: Arc<CommandQueue>) -> anyhow::Result<Self> {
        use esp_idf_svc::mqtt::client::{EspMqttClient, MqttClientConfiguration};

        let url = crate::config::MQTT_BROKER_URL
            .ok_or_else(|| anyhow::anyhow!("no MQTT broker URL configured"))?;

        let conf = MqttClientConfiguration {
            client_id: Some(crate::config::MQTT_CLIENT_ID),
            ..Default::default()
        };
        let (client, connection) = EspMqttClient::new(url, &conf)?;
        let client = Arc::new(Mutex::new(client));
        let connected = Arc::new(AtomicBool::new(false));

        Self::spawn_receiver(queue, connection, Arc::clone(&client), Arc::clone(&connected));

        info!("MQTT: bridge started ({url})");
        Ok(Self { connected, client })
    }

    fn spawn_receiver(
        queue: Arc<CommandQueue>,
        mut connection: esp_idf_svc::mqtt::client::EspMqttConnection,
        client: Arc<Mutex<esp_idf_svc::mqtt::client::EspMqttClient<'static>>>,
        connected: Arc<AtomicBool>,
    ) {
        use esp_idf_svc::mqtt::client::{Details, EventPayload, QoS};

        std::thread::Builder::new()
            .name("mqtt-rx".into())
            .stack_size(8 * 1024)
            .spawn(move || loop {
                match connection.next() {
                    Ok(event) => match event.payload() {
                        EventPayload::Connected(_) => {
                            connected.store(true, Ordering::Relaxed);
                            let mut client = client.lock().unwrap_or_else(|p| p.into_inner());
                            match client.subscribe(crate::config::MQTT_TOPIC_COMMAND, QoS::AtLeastOnce)
                            {
                                Ok(_) => info!(
                                    "MQTT: subscribed to {}",
                                    crate::config::MQTT_TOPIC_COMMAND
                                ),
                                Err(e) => log::warn!("MQTT: subscribe failed: {e}"),
                            }
                        }
                        EventPayload::Disconnected => {
                            connected.store(false, Ordering::Relaxed);
                            log::warn!("MQTT: disconnected, client will reconnect");
                        }
                        EventPayload::Received {
                            topic: Some(topic),
                            data,
                            details,
                            ..
                        } => {
                            if topic == crate::config::MQTT_TOPIC_COMMAND
                                && matches!(details, Details::Complete)
                                && !data.is_empty()
                            {
                                // Same contract as the radio path: first
                                // byte in, backpressure on a full queue.
                                queue.send_blocking(data[0]);
                            }
                        }
                        _ => {}
                    },
                    Err(e) => {
                        connected.store(false, Ordering::Relaxed);
                        log::warn!("MQTT: receive loop error: {e:?}");
                        std::thread::sleep(std::time::Duration::from_secs(2));
                    }
                }
            })
            .expect("failed to spawn mqtt receiver thread");
    }
}

#[cfg(target_os = "espidf")]
impl TelemetryPort for MqttBridge {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        use esp_idf_svc::mqtt::client::QoS;

        if !self.connected.load(Ordering::Relaxed) {
            return Err(CommsError::NotConnected);
        }
        let mut client = self.client.lock().unwrap_or_else(|p| p.into_inner());
        client
            .enqueue(topic, QoS::AtMostOnce, false, payload)
            .map(|_| ())
            .map_err(|_| CommsError::PublishFailed)
    }
}

// ───────────────────────────────────────────────────────────────
// Host simulation
// ───────────────────────────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
impl MqttBridge {
    /// Host-side bridge: records publishes, starts "connected".
    pub fn start(queue: Arc<CommandQueue>) -> anyhow::Result<Self> {
        info!("MQTT(sim): bridge started");
        Ok(Self {
            connected: Arc::new(AtomicBool::new(true)),
            queue,
            published: Arc::new(std::sync::Mutex::new(Vec::new())),
        })
    }

    /// Simulate a broker message on the command topic.
    pub fn sim_inject_command(&self, payload: &[u8]) {
        if !payload.is_empty() {
            self.queue.send_blocking(payload[0]);
        }
    }

    /// Simulate losing / regaining the broker connection.
    pub fn sim_set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    /// Everything published so far, in order.
    pub fn sim_published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }
}

#[cfg(not(target_os = "espidf"))]
impl TelemetryPort for MqttBridge {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError> {
        if !self.connected.load(Ordering::Relaxed) {
            return Err(CommsError::NotConnected);
        }
        self.published
            .lock()
            .unwrap()
            .push((topic.to_string(), payload.to_vec()));
        Ok(())
    }
}
