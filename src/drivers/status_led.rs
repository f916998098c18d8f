//! Status LED driver.
//!
//! The board's built-in LED mirrors the relay state so the actuator can
//! be read at a glance without energising anything downstream.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: drives the real GPIO via hw_init.
//! On host/test: tracks state in-memory only.

use crate::drivers::hw_init;
use crate::pins;

pub struct StatusLed {
    lit: bool,
}

impl StatusLed {
    pub fn new() -> Self {
        Self { lit: false }
    }

    pub fn set(&mut self, on: bool) {
        hw_init::gpio_write(pins::STATUS_LED_GPIO, on);
        self.lit = on;
    }

    pub fn is_lit(&self) -> bool {
        self.lit
    }
}

impl Default for StatusLed {
    fn default() -> Self {
        Self::new()
    }
}
