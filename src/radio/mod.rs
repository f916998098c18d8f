//! LoRa radio transport.
//!
//! [`RadioTransport`] owns the shared access policy around a raw modem
//! link: the send path is serialised behind a mutex with a bounded wait
//! (acks are best-effort and must never head-of-line block the radio),
//! while the polled receive path is non-blocking and issued from a single
//! task. The raw modem itself sits behind the [`RadioLink`] trait so the
//! pipeline tests can substitute a scripted link.
//!
//! ## Concrete links
//!
//! - [`sx127x::Sx127xLink`] — SX1276 over ESP-IDF SPI (target only).
//! - [`sim::SimRadioLink`] — scripted in-memory link for host tests.

use core::fmt::Write as _;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use log::{debug, warn};

use crate::config::{MAX_PACKET_LEN, RADIO_SEND_LOCK_TIMEOUT_MS};
use crate::error::RadioError;

#[cfg(not(target_os = "espidf"))]
pub mod sim;
#[cfg(target_os = "espidf")]
pub mod sx127x;

/// Raw modem contract. One packet in, one packet out, no buffering across
/// calls.
pub trait RadioLink {
    /// Apply the fixed modulation parameters. Called exactly once at
    /// startup; failure is fatal to initialisation.
    fn configure(&mut self) -> Result<(), RadioError>;

    /// Transmit one packet, blocking until the modem reports TxDone.
    fn transmit(&mut self, payload: &[u8]) -> Result<(), RadioError>;

    /// Non-blocking check for a pending inbound packet. Drains all its
    /// bytes into `buf` (up to `buf.len()`) and returns the count, or 0
    /// when nothing is pending.
    fn poll_receive(&mut self, buf: &mut [u8]) -> usize;
}

/// Shared, lock-disciplined wrapper around a [`RadioLink`].
///
/// Shared by the receive task (polling) and the actuate task (ack
/// emission); all methods take `&self`.
pub struct RadioTransport<L: RadioLink> {
    link: Mutex<L>,
    dropped_sends: AtomicU32,
}

impl<L: RadioLink> RadioTransport<L> {
    pub fn new(link: L) -> Self {
        Self {
            link: Mutex::new(link),
            dropped_sends: AtomicU32::new(0),
        }
    }

    /// One-shot modem configuration. Must succeed before any task is
    /// spawned (startup is fail-stop on error).
    pub fn configure(&self) -> Result<(), RadioError> {
        self.lock_link().configure()
    }

    /// Best-effort transmit of one packet.
    ///
    /// Waits at most [`RADIO_SEND_LOCK_TIMEOUT_MS`] for the send mutex;
    /// on contention timeout the packet is dropped without error —
    /// returns `false` so callers that care (tests, counters) can see it.
    pub fn send(&self, payload: &[u8]) -> bool {
        if payload.is_empty() || payload.len() > MAX_PACKET_LEN {
            warn!("Radio: refusing {}-byte payload", payload.len());
            return false;
        }

        let Some(mut link) = self.lock_link_timeout(Duration::from_millis(RADIO_SEND_LOCK_TIMEOUT_MS))
        else {
            self.dropped_sends.fetch_add(1, Ordering::Relaxed);
            debug!("Radio: send lock contended past timeout, packet dropped");
            return false;
        };

        match link.transmit(payload) {
            Ok(()) => true,
            Err(e) => {
                self.dropped_sends.fetch_add(1, Ordering::Relaxed);
                warn!("Radio: transmit failed ({e}), packet dropped");
                false
            }
        }
    }

    /// Non-blocking receive poll. Issued from the receive task only; if
    /// the link is momentarily held by a sender, reports "nothing
    /// pending" and lets the next poll cycle pick the packet up.
    pub fn receive(&self, buf: &mut [u8]) -> usize {
        match self.link.try_lock() {
            Ok(mut link) => link.poll_receive(buf),
            Err(_) => 0,
        }
    }

    /// Packets dropped on the send path since boot (lock contention or
    /// modem failure).
    pub fn dropped_sends(&self) -> u32 {
        self.dropped_sends.load(Ordering::Relaxed)
    }

    // ── Internal ──────────────────────────────────────────────

    /// Blocking lock that shrugs off poisoning — a panicked holder leaves
    /// only modem registers behind, which the next configure/transmit
    /// rewrites anyway.
    fn lock_link(&self) -> MutexGuard<'_, L> {
        match self.link.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn lock_link_timeout(&self, timeout: Duration) -> Option<MutexGuard<'_, L>> {
        let deadline = Instant::now() + timeout;
        loop {
            match self.link.try_lock() {
                Ok(guard) => return Some(guard),
                Err(std::sync::TryLockError::Poisoned(poisoned)) => {
                    return Some(poisoned.into_inner());
                }
                Err(std::sync::TryLockError::WouldBlock) => {
                    if Instant::now() >= deadline {
                        return None;
                    }
                    std::thread::sleep(Duration::from_millis(2));
                }
            }
        }
    }
}

impl<L: RadioLink> crate::app::ports::RadioPort for RadioTransport<L> {
    /// Format and transmit `"ACK:<state>"` as one packet.
    fn send_ack(&self, state: &str) {
        let mut msg: heapless::String<16> = heapless::String::new();
        if write!(msg, "ACK:{state}").is_err() {
            warn!("Radio: ack state name too long, ack dropped");
            return;
        }
        let _ = self.send(msg.as_bytes());
    }
}
