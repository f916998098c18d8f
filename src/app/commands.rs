//! The command alphabet.
//!
//! The wire protocol encodes exactly one command per radio packet, in the
//! packet's first byte: ASCII `'1'` switches the actuator on, ASCII `'0'`
//! switches it off, every other value is ignored. Broker-originated
//! commands use the identical encoding in the MQTT payload's first byte.

/// Wire byte that switches the actuator on.
pub const WIRE_ON: u8 = b'1';
/// Wire byte that switches the actuator off.
pub const WIRE_OFF: u8 = b'0';

/// A decoded actuator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    On,
    Off,
}

impl Command {
    /// Decode a wire byte. Unknown bytes yield `None` and must produce
    /// zero side effects downstream.
    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            WIRE_ON => Some(Self::On),
            WIRE_OFF => Some(Self::Off),
            _ => None,
        }
    }

    /// The state name this command drives the actuator into, as used in
    /// both the radio ack (`"ACK:<STATE>"`) and the MQTT state payload.
    pub fn state_str(self) -> &'static str {
        match self {
            Self::On => "ON",
            Self::Off => "OFF",
        }
    }

    /// Whether this command energises the relay.
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}
