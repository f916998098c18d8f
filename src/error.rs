//! Error types for the fallible subsystems.
//!
//! One small `Copy` enum per subsystem, so failures can be passed across
//! task boundaries without allocation. Runtime failures on the command
//! path are absorbed locally (drop and continue); these types surface
//! only where a caller has a decision to make.

use core::fmt;

// ---------------------------------------------------------------------------
// Radio errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadioError {
    /// SPI bus setup or transfer failed.
    SpiFailed,
    /// The transceiver did not answer with its expected silicon version.
    ChipNotFound,
    /// The requested payload exceeds one radio packet.
    PayloadTooLarge,
    /// TxDone never arrived within the transmit window.
    TxTimeout,
}

impl fmt::Display for RadioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SpiFailed => write!(f, "SPI transfer failed"),
            Self::ChipNotFound => write!(f, "SX1276 not detected on the bus"),
            Self::PayloadTooLarge => write!(f, "payload exceeds one packet"),
            Self::TxTimeout => write!(f, "transmit timed out"),
        }
    }
}

impl std::error::Error for RadioError {}

// ---------------------------------------------------------------------------
// Communications errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommsError {
    /// Publish attempted while the broker connection is down.
    NotConnected,
    /// The client rejected the publish.
    PublishFailed,
}

impl fmt::Display for CommsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "broker not connected"),
            Self::PublishFailed => write!(f, "MQTT publish failed"),
        }
    }
}

impl std::error::Error for CommsError {}
