//! Outbound application events.
//!
//! The [`LightService`](super::service::LightService) emits these through
//! the [`EventSink`](super::ports::EventSink) port. Adapters on the other
//! side decide what to do with them — log to serial, count, or drop.

use super::commands::Command;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEvent {
    /// A valid command was applied; carries the resulting actuator state.
    CommandApplied { command: Command, relay_on: bool },

    /// A wire byte outside the command alphabet arrived and was dropped
    /// with zero side effects.
    CommandIgnored(u8),

    /// The state publish to the telemetry bridge was dropped (bridge
    /// absent or disconnected). The actuator transition has already
    /// committed when this fires.
    PublishDropped,

    /// The service started with the actuator in its safe state.
    Started,
}
