//! Relay coil driver.
//!
//! A single digital output through an NPN driver stage; HIGH energises
//! the coil. This is a dumb actuator — the single-writer rule lives in
//! the actuate task, not here.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct RelayDriver {
    energized: bool,
}

impl RelayDriver {
    pub fn new() -> Self {
        Self { energized: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::RELAY_GPIO, on);
        self.energized = on;
    }

    pub fn is_energized(&self) -> bool {
        self.energized
    }
}

impl Default for RelayDriver {
    fn default() -> Self {
        Self::new()
    }
}
