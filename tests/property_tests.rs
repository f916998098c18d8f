//! Property tests for the command decode/dispatch core.
//!
//! Runs on host (x86_64) only — proptest is not available for ESP32 targets.
//! On ESP32, these tests are compiled out.

#![cfg(not(target_os = "espidf"))]

use std::cell::RefCell;

use lightsout::app::commands::{Command, WIRE_OFF, WIRE_ON};
use lightsout::app::events::AppEvent;
use lightsout::app::ports::{ActuatorPort, EventSink, NoTelemetry, RadioPort};
use lightsout::app::service::LightService;
use proptest::prelude::*;

// ── Minimal recording doubles ─────────────────────────────────

#[derive(Default)]
struct RelayLog {
    writes: Vec<bool>,
}

impl ActuatorPort for RelayLog {
    fn set_relay(&mut self, on: bool) {
        self.writes.push(on);
    }
    fn set_status_led(&mut self, _on: bool) {}
}

#[derive(Default)]
struct AckLog(RefCell<Vec<String>>);

impl RadioPort for AckLog {
    fn send_ack(&self, state: &str) {
        self.0.borrow_mut().push(state.to_string());
    }
}

struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: &AppEvent) {}
}

/// Feed a raw byte stream through a freshly started service.
fn run_stream(stream: &[u8]) -> (LightService, RelayLog, Vec<String>) {
    let mut svc = LightService::new();
    let mut hw = RelayLog::default();
    let radio = AckLog::default();
    svc.start(&mut hw, &mut NullSink);

    for &byte in stream {
        svc.handle_wire_byte(byte, &mut hw, &radio, &mut NoTelemetry, &mut NullSink);
    }
    let acks = radio.0.into_inner();
    (svc, hw, acks)
}

// ── Properties ────────────────────────────────────────────────

proptest! {
    /// The actuator always ends in the state of the last valid command;
    /// with no valid command it stays in the boot-safe OFF state.
    #[test]
    fn final_state_is_the_last_valid_command(stream in proptest::collection::vec(any::<u8>(), 0..64)) {
        let (svc, hw, _) = run_stream(&stream);

        let expected = stream
            .iter()
            .rev()
            .find_map(|&b| Command::from_wire(b).map(|c| c.is_on()))
            .unwrap_or(false);

        prop_assert_eq!(svc.is_on(), expected);
        prop_assert_eq!(hw.writes.last().copied(), Some(expected));
    }

    /// Exactly the valid commands are acknowledged, in arrival order,
    /// repeats included.
    #[test]
    fn acks_mirror_the_valid_command_subsequence(stream in proptest::collection::vec(any::<u8>(), 0..64)) {
        let (svc, _, acks) = run_stream(&stream);

        let expected: Vec<String> = stream
            .iter()
            .filter_map(|&b| Command::from_wire(b).map(|c| c.state_str().to_string()))
            .collect();

        prop_assert_eq!(acks, expected);
        prop_assert_eq!(svc.commands_applied() as usize, stream
            .iter()
            .filter(|&&b| b == WIRE_ON || b == WIRE_OFF)
            .count());
    }

    /// One relay write per valid command, plus the single start reset.
    #[test]
    fn relay_writes_count_valid_commands(stream in proptest::collection::vec(any::<u8>(), 0..64)) {
        let (_, hw, _) = run_stream(&stream);

        let valid = stream.iter().filter(|&&b| Command::from_wire(b).is_some()).count();
        prop_assert_eq!(hw.writes.len(), valid + 1);
    }
}
