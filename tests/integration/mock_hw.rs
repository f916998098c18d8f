//! Mock adapters for integration tests.
//!
//! All mocks share their observation state behind `Arc<Mutex<_>>` so a
//! test can move one half into the pipeline tasks and keep a handle for
//! assertions. Every actuator call is recorded, not just the latest, so
//! tests can assert on the full command history.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use lightsout::app::events::AppEvent;
use lightsout::app::ports::{ActuatorPort, EventSink, TelemetryPort};
use lightsout::CommsError;

// ── Actuator mock ─────────────────────────────────────────────

#[derive(Default)]
pub struct ActuatorState {
    pub relay: Vec<bool>,
    pub led: Vec<bool>,
}

#[derive(Clone, Default)]
pub struct SharedActuator {
    state: Arc<Mutex<ActuatorState>>,
}

#[allow(dead_code)]
impl SharedActuator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest relay write, or `false` before any write.
    pub fn relay_on(&self) -> bool {
        self.state.lock().unwrap().relay.last().copied().unwrap_or(false)
    }

    pub fn led_on(&self) -> bool {
        self.state.lock().unwrap().led.last().copied().unwrap_or(false)
    }

    /// Full relay write history, oldest first.
    pub fn relay_history(&self) -> Vec<bool> {
        self.state.lock().unwrap().relay.clone()
    }

    pub fn relay_writes(&self) -> usize {
        self.state.lock().unwrap().relay.len()
    }
}

impl ActuatorPort for SharedActuator {
    fn set_relay(&mut self, on: bool) {
        self.state.lock().unwrap().relay.push(on);
    }

    fn set_status_led(&mut self, on: bool) {
        self.state.lock().unwrap().led.push(on);
    }
}

// ── Telemetry mock ────────────────────────────────────────────

#[derive(Clone)]
pub struct SharedTelemetry {
    published: Arc<Mutex<Vec<(String, Vec<u8>)>>>,
    connected: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl SharedTelemetry {
    pub fn new() -> Self {
        Self {
            published: Arc::new(Mutex::new(Vec::new())),
            connected: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::Relaxed);
    }

    pub fn published(&self) -> Vec<(String, Vec<u8>)> {
        self.published.lock().unwrap().clone()
    }

    /// Payloads published to `topic`, as strings, oldest first.
    pub fn payloads_on(&self, topic: &str) -> Vec<String> {
        self.published
            .lock()
            .unwrap()
            .iter()
            .filter(|(t, _)| t == topic)
            .map(|(_, p)| String::from_utf8_lossy(p).into_owned())
            .collect()
    }
}

impl TelemetryPort for SharedTelemetry {
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

// ── Event sink mock ───────────────────────────────────────────

#[derive(Clone, Default)]
pub struct SharedSink {
    events: Arc<Mutex<Vec<AppEvent>>>,
}

#[allow(dead_code)]
impl SharedSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<AppEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| pred(e)).count()
    }
}

impl EventSink for SharedSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.lock().unwrap().push(*event);
    }
}
