//! Scripted in-memory radio link for host-side tests.
//!
//! A [`SimRadioLink`] plays the modem; its [`SimRadioHandle`] is the test
//! harness's side of the air interface — inject inbound packets, inspect
//! what the firmware transmitted. A configurable transmit delay lets
//! tests hold the transport's send lock long enough to exercise the
//! bounded-wait drop path.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::RadioLink;
use crate::error::RadioError;

#[derive(Default)]
struct AirSide {
    inbound: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
}

/// Test double for the raw modem.
pub struct SimRadioLink {
    air: Arc<Mutex<AirSide>>,
    tx_delay: Duration,
    configured: bool,
}

impl SimRadioLink {
    pub fn new() -> Self {
        Self {
            air: Arc::new(Mutex::new(AirSide::default())),
            tx_delay: Duration::ZERO,
            configured: false,
        }
    }

    /// Make every transmit hold the link for `delay` (simulated airtime).
    pub fn with_tx_delay(mut self, delay: Duration) -> Self {
        self.tx_delay = delay;
        self
    }

    /// Harness handle onto the simulated air interface.
    pub fn handle(&self) -> SimRadioHandle {
        SimRadioHandle {
            air: Arc::clone(&self.air),
        }
    }
}

impl Default for SimRadioLink {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioLink for SimRadioLink {
    fn configure(&mut self) -> Result<(), RadioError> {
        self.configured = true;
        Ok(())
    }

    fn transmit(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        if self.tx_delay > Duration::ZERO {
            std::thread::sleep(self.tx_delay);
        }
        self.air.lock().unwrap().sent.push(payload.to_vec());
        Ok(())
    }

    fn poll_receive(&mut self, buf: &mut [u8]) -> usize {
        let Some(packet) = self.air.lock().unwrap().inbound.pop_front() else {
            return 0;
        };
        let n = packet.len().min(buf.len());
        buf[..n].copy_from_slice(&packet[..n]);
        n
    }
}

/// Cloneable harness-side handle.
#[derive(Clone)]
pub struct SimRadioHandle {
    air: Arc<Mutex<AirSide>>,
}

impl SimRadioHandle {
    /// Queue an inbound packet for the next receive poll.
    pub fn inject(&self, packet: &[u8]) {
        self.air.lock().unwrap().inbound.push_back(packet.to_vec());
    }

    /// Everything the firmware transmitted, in order.
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.air.lock().unwrap().sent.clone()
    }

    pub fn sent_count(&self) -> usize {
        self.air.lock().unwrap().sent.len()
    }
}
