//! Hardware drivers — dumb actuator outputs and task plumbing.
//!
//! Everything here is dual-target: real GPIO / FreeRTOS calls on ESP-IDF,
//! in-memory state on the host so the pipeline tests run without
//! hardware.

pub mod hw_init;
pub mod relay;
pub mod status_led;
pub mod task_pin;
pub mod watchdog;
