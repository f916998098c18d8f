//! Light service — the domain core of the actuate task.
//!
//! [`LightService`] owns the actuator state (single-writer invariant: no
//! other component may mutate it) and applies decoded commands to the
//! ports in a fixed order: relay → status LED → radio ack → telemetry
//! publish. All I/O flows through port traits injected at call sites,
//! making the entire service testable with mock adapters.

use log::{debug, info};

use crate::config::MQTT_TOPIC_STATE;

use super::commands::Command;
use super::events::AppEvent;
use super::ports::{ActuatorPort, EventSink, RadioPort, TelemetryPort};

/// Two-state actuator controller. Boots into the safe OFF state.
pub struct LightService {
    relay_on: bool,
    commands_applied: u32,
}

impl LightService {
    pub fn new() -> Self {
        Self {
            relay_on: false,
            commands_applied: 0,
        }
    }

    /// Drive the outputs to the boot-safe OFF state and announce startup.
    pub fn start(&mut self, hw: &mut impl ActuatorPort, sink: &mut impl EventSink) {
        hw.set_relay(false);
        hw.set_status_led(false);
        self.relay_on = false;
        sink.emit(&AppEvent::Started);
        info!("LightService started, actuator OFF");
    }

    /// Process one wire byte dequeued from the command queue.
    ///
    /// Accepted commands apply their side effects unconditionally, even
    /// when the actuator is already in the commanded state — a repeated
    /// `'1'` re-sets the output and re-emits the ack. Unknown bytes
    /// produce zero side effects: no output change, no ack, no publish.
    pub fn handle_wire_byte(
        &mut self,
        byte: u8,
        hw: &mut impl ActuatorPort,
        radio: &impl RadioPort,
        telemetry: &mut impl TelemetryPort,
        sink: &mut impl EventSink,
    ) {
        let Some(command) = Command::from_wire(byte) else {
            debug!("Ignoring unknown command byte 0x{byte:02X}");
            sink.emit(&AppEvent::CommandIgnored(byte));
            return;
        };

        let on = command.is_on();

        // Side-effect order is part of the contract: outputs first, then
        // acknowledgments. The transition has committed once the outputs
        // are set; ack and publish failures are absorbed.
        hw.set_relay(on);
        hw.set_status_led(on);
        self.relay_on = on;
        self.commands_applied += 1;

        radio.send_ack(command.state_str());

        if telemetry
            .publish(MQTT_TOPIC_STATE, command.state_str().as_bytes())
            .is_err()
        {
            sink.emit(&AppEvent::PublishDropped);
        }

        sink.emit(&AppEvent::CommandApplied {
            command,
            relay_on: on,
        });
        info!("Light {}", command.state_str());
    }

    /// Current actuator state.
    pub fn is_on(&self) -> bool {
        self.relay_on
    }

    /// Accepted commands since boot (repeats included — no coalescing).
    pub fn commands_applied(&self) -> u32 {
        self.commands_applied
    }
}

impl Default for LightService {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ports::NoTelemetry;

    struct RecordingHw {
        relay: Vec<bool>,
        led: Vec<bool>,
    }

    impl RecordingHw {
        fn new() -> Self {
            Self {
                relay: Vec::new(),
                led: Vec::new(),
            }
        }
    }

    impl ActuatorPort for RecordingHw {
        fn set_relay(&mut self, on: bool) {
            self.relay.push(on);
        }
        fn set_status_led(&mut self, on: bool) {
            self.led.push(on);
        }
    }

    struct RecordingRadio(std::cell::RefCell<Vec<String>>);

    impl RadioPort for RecordingRadio {
        fn send_ack(&self, state: &str) {
            self.0.borrow_mut().push(format!("ACK:{state}"));
        }
    }

    struct NullSink;

    impl EventSink for NullSink {
        fn emit(&mut self, _event: &AppEvent) {}
    }

    fn fixture() -> (LightService, RecordingHw, RecordingRadio) {
        let mut svc = LightService::new();
        let mut hw = RecordingHw::new();
        svc.start(&mut hw, &mut NullSink);
        (svc, hw, RecordingRadio(std::cell::RefCell::new(Vec::new())))
    }

    #[test]
    fn on_command_sets_outputs_and_acks() {
        let (mut svc, mut hw, radio) = fixture();
        svc.handle_wire_byte(b'1', &mut hw, &radio, &mut NoTelemetry, &mut NullSink);

        assert!(svc.is_on());
        assert_eq!(hw.relay.last(), Some(&true));
        assert_eq!(hw.led.last(), Some(&true));
        assert_eq!(radio.0.borrow().as_slice(), ["ACK:ON"]);
    }

    #[test]
    fn unknown_byte_has_zero_side_effects() {
        let (mut svc, mut hw, radio) = fixture();
        let relay_writes = hw.relay.len();

        svc.handle_wire_byte(b'X', &mut hw, &radio, &mut NoTelemetry, &mut NullSink);

        assert!(!svc.is_on());
        assert_eq!(hw.relay.len(), relay_writes);
        assert!(radio.0.borrow().is_empty());
        assert_eq!(svc.commands_applied(), 0);
    }

    #[test]
    fn repeated_on_is_reapplied_not_edge_triggered() {
        let (mut svc, mut hw, radio) = fixture();
        svc.handle_wire_byte(b'1', &mut hw, &radio, &mut NoTelemetry, &mut NullSink);
        svc.handle_wire_byte(b'1', &mut hw, &radio, &mut NoTelemetry, &mut NullSink);

        // Output is set once per accepted command, plus the start reset.
        assert_eq!(hw.relay, [false, true, true]);
        assert_eq!(radio.0.borrow().as_slice(), ["ACK:ON", "ACK:ON"]);
        assert_eq!(svc.commands_applied(), 2);
    }
}
