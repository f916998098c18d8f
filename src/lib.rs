//! LightsOut node firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod radio;
pub mod tasks;

mod error;
mod pins;

pub use error::{CommsError, RadioError};

pub mod adapters;
pub mod drivers;
pub mod ota;
