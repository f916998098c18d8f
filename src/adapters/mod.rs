//! Adapters — the outer ring around the port traits.
//!
//! Each adapter binds a port trait to something concrete: GPIO drivers,
//! the serial logger, the WiFi station, the MQTT broker. The domain core
//! in [`crate::app`] never sees anything below this layer.

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod wifi;
