//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (which goes to UART / USB-CDC in production).

use log::{debug, info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::CommandApplied { command, relay_on } => {
                info!(
                    "CMD   | {:?} applied, relay={}",
                    command,
                    if *relay_on { "ON" } else { "OFF" }
                );
            }
            AppEvent::CommandIgnored(byte) => {
                debug!("CMD   | unknown byte 0x{byte:02X} ignored");
            }
            AppEvent::PublishDropped => {
                warn!("TELEM | state publish dropped (bridge unavailable)");
            }
            AppEvent::Started => {
                info!("START | actuator in safe state");
            }
        }
    }
}
