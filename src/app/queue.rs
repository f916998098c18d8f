//! The bounded command queue.
//!
//! Sole hand-off point between the receive task (and the MQTT bridge) and
//! the actuate task. Built on an `embassy-sync` bounded MPMC channel with
//! a blocking facade via `futures-lite`, so plain FreeRTOS-backed threads
//! can park on it without an executor.
//!
//! ```text
//! ┌──────────────┐              ┌───────────────┐
//! │ Receive Task │──┐           │               │
//! └──────────────┘  │  wire u8  │  Actuate Task │
//! ┌──────────────┐  ├──────────▶│  (sole        │
//! │ MQTT bridge  │──┘           │   consumer)   │
//! └──────────────┘              └───────────────┘
//! ```
//!
//! Entries are the raw wire byte — a value type, copied in and out, so
//! producer and consumer never alias queue storage. Strict FIFO, no peek,
//! no priority, no coalescing: every enqueued command fires.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, TrySendError};
use futures_lite::future::block_on;

use crate::config::QUEUE_DEPTH;

/// Bounded FIFO of wire command bytes.
pub struct CommandQueue {
    inner: Channel<CriticalSectionRawMutex, u8, QUEUE_DEPTH>,
}

impl CommandQueue {
    pub const fn new() -> Self {
        Self {
            inner: Channel::new(),
        }
    }

    /// Enqueue, blocking while the queue is full. This is the
    /// backpressure point: a stalled consumer stalls producers rather
    /// than dropping commands.
    pub fn send_blocking(&self, byte: u8) {
        block_on(self.inner.send(byte));
    }

    /// Non-blocking enqueue for wakeups that may be lost when the queue
    /// is already full (a full queue wakes the consumer anyway).
    pub fn try_send(&self, byte: u8) -> Result<(), TrySendError<u8>> {
        self.inner.try_send(byte)
    }

    /// Dequeue the next command, parking the calling thread until one
    /// arrives. The actuate task's idle point.
    pub fn recv_blocking(&self) -> u8 {
        block_on(self.inner.receive())
    }

    /// Entries currently buffered (diagnostics only; racy by nature).
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Configured capacity.
    pub fn capacity(&self) -> usize {
        QUEUE_DEPTH
    }
}

impl Default for CommandQueue {
    fn default() -> Self {
        Self::new()
    }
}
