//! GPIO / peripheral pin assignments for the Heltec WiFi LoRa 32 board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.  Change a pin here and it propagates everywhere.

// ---------------------------------------------------------------------------
// Actuator outputs
// ---------------------------------------------------------------------------

/// Relay coil driver (active HIGH through an NPN stage).
pub const RELAY_GPIO: i32 = 21;
/// Built-in status LED, mirrors the relay state.
pub const STATUS_LED_GPIO: i32 = 35;

// ---------------------------------------------------------------------------
// SX1276 LoRa transceiver (SPI2 host)
// ---------------------------------------------------------------------------

pub const LORA_SCK_GPIO: i32 = 5;
pub const LORA_MISO_GPIO: i32 = 2;
pub const LORA_MOSI_GPIO: i32 = 4;
pub const LORA_CS_GPIO: i32 = 9;
/// Active-low hardware reset line into the SX1276.
pub const LORA_RST_GPIO: i32 = 13;
/// DIO0 interrupt line (RxDone/TxDone). Reserved: wired on the board but
/// not claimed by the driver, which polls the IRQ flags register over
/// SPI instead. Kept for a future IRQ-driven receive path.
pub const LORA_DIO0_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// SPI configuration
// ---------------------------------------------------------------------------

/// SX1276 SPI clock. The chip tolerates up to 10 MHz; 8 MHz leaves margin
/// on long ribbon wiring.
pub const LORA_SPI_FREQ_HZ: u32 = 8_000_000;
