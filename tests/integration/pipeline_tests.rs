//! End-to-end pipeline tests: simulated air interface in, actuator
//! writes / acks / publishes out, clean shutdown.

use std::sync::Arc;
use std::time::{Duration, Instant};

use lightsout::app::events::AppEvent;
use lightsout::app::queue::CommandQueue;
use lightsout::config::MQTT_TOPIC_STATE;
use lightsout::radio::RadioTransport;
use lightsout::radio::sim::SimRadioLink;
use lightsout::tasks::spawn_pipeline;

use crate::mock_hw::{SharedActuator, SharedSink, SharedTelemetry};

/// Poll `pred` until it holds or the deadline passes. The receive task
/// runs on a 100 ms cycle, so commands land within a few cycles.
fn wait_until(pred: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if pred() {
            return true;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    pred()
}

struct Harness {
    air: lightsout::radio::sim::SimRadioHandle,
    hw: SharedActuator,
    telemetry: SharedTelemetry,
    sink: SharedSink,
    pipeline: lightsout::tasks::Pipeline,
}

fn start_pipeline() -> Harness {
    let link = SimRadioLink::new();
    let air = link.handle();
    let transport = Arc::new(RadioTransport::new(link));
    transport.configure().unwrap();

    let queue = Arc::new(CommandQueue::new());
    let hw = SharedActuator::new();
    let telemetry = SharedTelemetry::new();
    let sink = SharedSink::new();

    let pipeline = spawn_pipeline(
        transport,
        queue,
        hw.clone(),
        telemetry.clone(),
        sink.clone(),
    );

    Harness {
        air,
        hw,
        telemetry,
        sink,
        pipeline,
    }
}

#[test]
fn on_command_flows_from_air_to_relay_ack_and_publish() {
    let h = start_pipeline();

    h.air.inject(b"1");
    assert!(wait_until(|| h.hw.relay_on()), "relay never energised");
    assert!(wait_until(|| h.air.sent_count() == 1), "ack never sent");

    assert!(h.hw.led_on());
    assert_eq!(h.air.sent(), vec![b"ACK:ON".to_vec()]);
    assert_eq!(h.telemetry.payloads_on(MQTT_TOPIC_STATE), ["ON"]);

    h.pipeline.shutdown();
}

#[test]
fn off_command_releases_the_relay() {
    let h = start_pipeline();

    h.air.inject(b"1");
    assert!(wait_until(|| h.hw.relay_on()));

    h.air.inject(b"0");
    assert!(wait_until(|| !h.hw.relay_on()), "relay never released");
    assert!(wait_until(|| h.air.sent_count() == 2));

    assert!(!h.hw.led_on());
    assert_eq!(h.air.sent()[1], b"ACK:OFF".to_vec());
    assert_eq!(h.telemetry.payloads_on(MQTT_TOPIC_STATE), ["ON", "OFF"]);

    h.pipeline.shutdown();
}

#[test]
fn unknown_bytes_produce_no_actuation_and_no_ack() {
    let h = start_pipeline();

    // The pipeline start drives the outputs to their safe state.
    assert!(wait_until(|| h.hw.relay_writes() == 1));

    // An empty packet yields no command at all; unknown bytes are
    // dequeued and then dropped by decode.
    h.air.inject(b"");
    h.air.inject(b"X");
    h.air.inject(&[0xFF]);
    assert!(
        wait_until(|| h.sink.count(|e| matches!(e, AppEvent::CommandIgnored(_))) == 2),
        "unknown bytes never reached the actuate task"
    );

    assert_eq!(h.hw.relay_history(), [false]);
    assert_eq!(h.air.sent_count(), 0);
    assert!(h.telemetry.published().is_empty());

    h.pipeline.shutdown();
}

#[test]
fn publish_failure_does_not_block_the_transition() {
    let h = start_pipeline();
    h.telemetry.set_connected(false);

    h.air.inject(b"1");
    assert!(wait_until(|| h.hw.relay_on()));
    assert!(wait_until(|| {
        h.sink.count(|e| matches!(e, AppEvent::PublishDropped)) == 1
    }));

    // Ack still went out even though the publish was dropped.
    assert!(wait_until(|| h.air.sent_count() == 1));
    assert!(h.telemetry.published().is_empty());

    h.pipeline.shutdown();
}

#[test]
fn commands_are_applied_in_arrival_order() {
    let h = start_pipeline();

    for packet in [b"1", b"0", b"1"] {
        h.air.inject(packet);
    }
    assert!(wait_until(|| h.air.sent_count() == 3));

    assert_eq!(h.hw.relay_history(), [false, true, false, true]);
    assert_eq!(
        h.telemetry.payloads_on(MQTT_TOPIC_STATE),
        ["ON", "OFF", "ON"]
    );

    h.pipeline.shutdown();
}

#[test]
fn shutdown_joins_both_tasks_promptly() {
    let h = start_pipeline();
    assert!(wait_until(|| h.hw.relay_writes() == 1));

    let begun = Instant::now();
    h.pipeline.shutdown();
    assert!(
        begun.elapsed() < Duration::from_secs(1),
        "shutdown took {:?}",
        begun.elapsed()
    );
}
