//! Application core — pure domain logic, zero I/O.
//!
//! This module contains the command dispatch pipeline of the LightsOut
//! node: the command alphabet, the bounded queue between the receive and
//! actuate tasks, and the light service that applies commands to the
//! actuator. All interaction with hardware happens through **port traits**
//! defined in [`ports`], keeping this layer fully testable without a real
//! transceiver or relay.

pub mod commands;
pub mod events;
pub mod ports;
pub mod queue;
pub mod service;
