//! Port traits — the boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ LightService (domain)
//! ```
//!
//! Driven adapters (the LoRa transport, the relay/LED hardware, the MQTT
//! bridge, the log sink) implement these traits. The
//! [`LightService`](super::service::LightService) consumes them via
//! generics, so the domain core never touches hardware directly and every
//! pipeline test can substitute a mock.

use crate::error::CommsError;

// ───────────────────────────────────────────────────────────────
// Actuator port (domain → relay + status LED)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the physical outputs.
///
/// Only the actuate task ever calls this — the single-writer invariant on
/// actuator state is enforced by ownership, not by locking.
pub trait ActuatorPort {
    /// Energise (`true`) or release (`false`) the relay coil.
    fn set_relay(&mut self, on: bool);

    /// Drive the status indicator; callers keep it mirroring the relay.
    fn set_status_led(&mut self, on: bool);
}

// ───────────────────────────────────────────────────────────────
// Radio port (domain → acknowledgment emission)
// ───────────────────────────────────────────────────────────────

/// Ack-emission port. `&self` because the concrete transport serialises
/// its send path internally and is shared with the receive task.
pub trait RadioPort {
    /// Transmit `"ACK:<state>"` as one radio packet. Best effort: a
    /// contended send path drops the ack silently.
    fn send_ack(&self, state: &str);
}

// ───────────────────────────────────────────────────────────────
// Telemetry port (domain → pub/sub bridge)
// ───────────────────────────────────────────────────────────────

/// Publish-side contract of the telemetry bridge.
///
/// Must not block indefinitely; a disconnected bridge returns
/// [`CommsError::NotConnected`] promptly. The bridge's inbound direction
/// (broker command → queue) lives entirely in the adapter and reuses the
/// queue's enqueue contract.
pub trait TelemetryPort {
    fn publish(&mut self, topic: &str, payload: &[u8]) -> Result<(), CommsError>;
}

/// A node running radio-only carries no bridge at all.
pub struct NoTelemetry;

impl TelemetryPort for NoTelemetry {
    fn publish(&mut self, _topic: &str, _payload: &[u8]) -> Result<(), CommsError> {
        Err(CommsError::NotConnected)
    }
}

// ───────────────────────────────────────────────────────────────
// Event sink port (domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
