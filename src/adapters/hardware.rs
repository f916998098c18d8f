//! Hardware adapter — binds [`ActuatorPort`] to the GPIO drivers.

use crate::app::ports::ActuatorPort;
use crate::drivers::relay::RelayDriver;
use crate::drivers::status_led::StatusLed;

/// The node's physical outputs behind the actuator port.
pub struct HardwareAdapter {
    relay: RelayDriver,
    led: StatusLed,
}

impl HardwareAdapter {
    pub fn new(relay: RelayDriver, led: StatusLed) -> Self {
        Self { relay, led }
    }

    pub fn relay_energized(&self) -> bool {
        self.relay.is_energized()
    }
}

impl ActuatorPort for HardwareAdapter {
    fn set_relay(&mut self, on: bool) {
        self.relay.set(on);
    }

    fn set_status_led(&mut self, on: bool) {
        self.led.set(on);
    }
}
