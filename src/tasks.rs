//! The two pipeline tasks and their lifecycle.
//!
//! ```text
//! LoRa packet ─▶ receive task ─▶ CommandQueue ─▶ actuate task ─▶ relay/LED
//!                                                     │
//!                                                     ├─▶ radio ack
//!                                                     └─▶ MQTT publish
//! ```
//!
//! Both tasks are long-lived FreeRTOS-backed threads at equal low
//! priority. They are cooperative units, not fire-and-forget loops: a
//! shared [`CancelToken`] plus a queue wakeup lets [`Pipeline::shutdown`]
//! unwind them cleanly, which is also what makes the end-to-end tests
//! joinable.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use log::{debug, info};

use crate::app::ports::{ActuatorPort, EventSink, TelemetryPort};
use crate::app::queue::CommandQueue;
use crate::app::service::LightService;
use crate::config::{MAX_PACKET_LEN, RADIO_POLL_INTERVAL_MS, TASK_PRIORITY, TASK_STACK_KB};
use crate::drivers::task_pin::{self, Core};
use crate::radio::{RadioLink, RadioTransport};

/// Byte pushed through the queue on shutdown so the blocked consumer
/// observes the cancel flag. Outside the command alphabet, so it is
/// ignored even if it races a normal command.
pub const WAKE_BYTE: u8 = 0x00;

/// Shared cancellation flag for the pipeline tasks.
#[derive(Clone)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for CancelToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Handles onto the running pipeline.
pub struct Pipeline {
    receive: JoinHandle<()>,
    actuate: JoinHandle<()>,
    cancel: CancelToken,
    queue: Arc<CommandQueue>,
}

impl Pipeline {
    /// Signal both tasks and join them. The wakeup byte unblocks the
    /// actuate task's dequeue; the receive task notices the flag on its
    /// next poll cycle.
    pub fn shutdown(self) {
        self.cancel.cancel();
        let _ = self.queue.try_send(WAKE_BYTE);
        let _ = self.receive.join();
        let _ = self.actuate.join();
        info!("Pipeline shut down");
    }
}

/// Spawn the receive and actuate tasks over an already-configured
/// transport.
///
/// The transport is shared between the tasks (ack emission vs. polling);
/// the queue is the sole command hand-off; `hw`, `telemetry` and `sink`
/// move into the actuate task, which is the only writer of actuator
/// state.
pub fn spawn_pipeline<L, A, T, S>(
    transport: Arc<RadioTransport<L>>,
    queue: Arc<CommandQueue>,
    hw: A,
    telemetry: T,
    sink: S,
) -> Pipeline
where
    L: RadioLink + Send + 'static,
    A: ActuatorPort + Send + 'static,
    T: TelemetryPort + Send + 'static,
    S: EventSink + Send + 'static,
{
    let cancel = CancelToken::new();

    let receive = {
        let transport = Arc::clone(&transport);
        let queue = Arc::clone(&queue);
        let cancel = cancel.clone();
        task_pin::spawn_on_core(Core::Pro, TASK_PRIORITY, TASK_STACK_KB, "lora-rx\0", move || {
            receive_loop(&transport, &queue, &cancel);
        })
    };

    let actuate = {
        let transport = Arc::clone(&transport);
        let queue = Arc::clone(&queue);
        let cancel = cancel.clone();
        task_pin::spawn_on_core(
            Core::App,
            TASK_PRIORITY,
            TASK_STACK_KB,
            "light-ctl\0",
            move || {
                actuate_loop(&transport, &queue, hw, telemetry, sink, &cancel);
            },
        )
    };

    Pipeline {
        receive,
        actuate,
        cancel,
        queue,
    }
}

// ── Receive task ─────────────────────────────────────────────

/// Poll the radio, extract the command byte, enqueue. Fixed poll interval
/// bounds both CPU use and the modem polling rate; a full queue stalls
/// this task rather than dropping the command (backpressure).
fn receive_loop<L: RadioLink>(
    transport: &RadioTransport<L>,
    queue: &CommandQueue,
    cancel: &CancelToken,
) {
    info!("Receive task started");
    let mut packet = [0u8; MAX_PACKET_LEN];

    while !cancel.is_cancelled() {
        let received = transport.receive(&mut packet);
        if received > 0 {
            debug!("Radio rx: {received} bytes");
            // One command per packet, carried in the first byte; the
            // remainder is discarded (reserved for richer payloads).
            queue.send_blocking(packet[0]);
        }
        std::thread::sleep(Duration::from_millis(RADIO_POLL_INTERVAL_MS));
    }
    info!("Receive task exiting");
}

// ── Actuate task ─────────────────────────────────────────────

/// Block on the queue (the design idle point), apply each command via the
/// service, loop until cancelled.
fn actuate_loop<L: RadioLink>(
    transport: &RadioTransport<L>,
    queue: &CommandQueue,
    mut hw: impl ActuatorPort,
    mut telemetry: impl TelemetryPort,
    mut sink: impl EventSink,
    cancel: &CancelToken,
) {
    info!("Actuate task started");
    let mut service = LightService::new();
    service.start(&mut hw, &mut sink);

    loop {
        let byte = queue.recv_blocking();
        if cancel.is_cancelled() {
            break;
        }
        service.handle_wire_byte(byte, &mut hw, transport, &mut telemetry, &mut sink);
    }
    info!("Actuate task exiting");
}
