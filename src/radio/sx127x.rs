//! SX1276 LoRa modem driver over ESP-IDF SPI.
//!
//! Register-level implementation of [`RadioLink`](super::RadioLink):
//! explicit-header LoRa mode, CRC on, continuous receive between
//! transmits. DIO0 is not wired as an interrupt — the receive task polls
//! the IRQ flags register, which keeps the driver free of ISR state.
//!
//! Modulation parameters come from [`crate::config`] and are written once
//! in [`configure`](Sx127xLink::configure); they must match the
//! transmitter side exactly.

use std::time::{Duration, Instant};

use esp_idf_hal::delay::FreeRtos;
use esp_idf_hal::gpio::{AnyIOPin, AnyOutputPin, Output, PinDriver};
use esp_idf_hal::spi::config::Config as SpiConfig;
use esp_idf_hal::spi::{SpiDeviceDriver, SpiDriver, SpiDriverConfig, SPI2};
use esp_idf_hal::units::Hertz;
use log::info;

use super::RadioLink;
use crate::config::{
    LORA_BANDWIDTH_HZ, LORA_CODING_RATE, LORA_FREQUENCY_HZ, LORA_PREAMBLE_LEN, LORA_SPREADING_FACTOR,
    LORA_SYNC_WORD, LORA_TX_POWER_DBM, MAX_PACKET_LEN,
};
use crate::error::RadioError;
use crate::pins;

// ── SX1276 register map (LoRa page) ──────────────────────────

const REG_FIFO: u8 = 0x00;
const REG_OP_MODE: u8 = 0x01;
const REG_FRF_MSB: u8 = 0x06;
const REG_PA_CONFIG: u8 = 0x09;
const REG_LNA: u8 = 0x0C;
const REG_FIFO_ADDR_PTR: u8 = 0x0D;
const REG_FIFO_TX_BASE: u8 = 0x0E;
const REG_FIFO_RX_BASE: u8 = 0x0F;
const REG_FIFO_RX_CURRENT: u8 = 0x10;
const REG_IRQ_FLAGS: u8 = 0x12;
const REG_RX_NB_BYTES: u8 = 0x13;
const REG_MODEM_CONFIG_1: u8 = 0x1D;
const REG_MODEM_CONFIG_2: u8 = 0x1E;
const REG_PREAMBLE_MSB: u8 = 0x20;
const REG_PAYLOAD_LENGTH: u8 = 0x22;
const REG_MODEM_CONFIG_3: u8 = 0x26;
const REG_SYNC_WORD: u8 = 0x39;
const REG_VERSION: u8 = 0x42;

const OPMODE_LORA_SLEEP: u8 = 0x80;
const OPMODE_LORA_STANDBY: u8 = 0x81;
const OPMODE_LORA_TX: u8 = 0x83;
const OPMODE_LORA_RX_CONT: u8 = 0x85;

const IRQ_TX_DONE: u8 = 0x08;
const IRQ_PAYLOAD_CRC_ERROR: u8 = 0x20;
const IRQ_RX_DONE: u8 = 0x40;

/// Silicon revision the driver expects from `REG_VERSION`.
const CHIP_VERSION: u8 = 0x12;

/// TxDone must arrive within this window; SF7/125 kHz airtime for a full
/// packet is well under it.
const TX_TIMEOUT: Duration = Duration::from_millis(1_000);

/// SX1276 attached to the SPI2 host.
pub struct Sx127xLink<'d> {
    spi: SpiDeviceDriver<'d, SpiDriver<'d>>,
    rst: PinDriver<'d, AnyOutputPin, Output>,
}

impl<'d> Sx127xLink<'d> {
    /// Claim the SPI host and control pins. The modem stays in reset
    /// until [`configure`](Self::configure) runs.
    pub fn new(
        spi: SPI2,
        sclk: AnyIOPin,
        sdo: AnyIOPin,
        sdi: AnyIOPin,
        cs: AnyIOPin,
        rst: AnyOutputPin,
    ) -> Result<Self, RadioError> {
        let config = SpiConfig::new().baudrate(Hertz(pins::LORA_SPI_FREQ_HZ));
        let spi = SpiDeviceDriver::new_single(
            spi,
            sclk,
            sdo,
            Some(sdi),
            Some(cs),
            &SpiDriverConfig::new(),
            &config,
        )
        .map_err(|_| RadioError::SpiFailed)?;
        let rst = PinDriver::output(rst).map_err(|_| RadioError::SpiFailed)?;
        Ok(Self { spi, rst })
    }

    // ── Register access ───────────────────────────────────────

    fn read_reg(&mut self, addr: u8) -> Result<u8, RadioError> {
        let write = [addr & 0x7F, 0x00];
        let mut read = [0u8; 2];
        self.spi
            .transfer(&mut read, &write)
            .map_err(|_| RadioError::SpiFailed)?;
        Ok(read[1])
    }

    fn write_reg(&mut self, addr: u8, value: u8) -> Result<(), RadioError> {
        self.spi
            .write(&[addr | 0x80, value])
            .map_err(|_| RadioError::SpiFailed)
    }

    fn write_fifo(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        let mut frame: heapless::Vec<u8, { MAX_PACKET_LEN + 1 }> = heapless::Vec::new();
        frame.push(REG_FIFO | 0x80).map_err(|_| RadioError::PayloadTooLarge)?;
        frame
            .extend_from_slice(payload)
            .map_err(|_| RadioError::PayloadTooLarge)?;
        self.spi.write(&frame).map_err(|_| RadioError::SpiFailed)
    }

    fn read_fifo(&mut self, out: &mut [u8]) -> Result<(), RadioError> {
        let mut write: heapless::Vec<u8, { MAX_PACKET_LEN + 1 }> = heapless::Vec::new();
        let mut read: heapless::Vec<u8, { MAX_PACKET_LEN + 1 }> = heapless::Vec::new();
        write.push(REG_FIFO & 0x7F).map_err(|_| RadioError::PayloadTooLarge)?;
        for _ in 0..out.len() {
            write.push(0x00).map_err(|_| RadioError::PayloadTooLarge)?;
        }
        read.resize(out.len() + 1, 0)
            .map_err(|_| RadioError::PayloadTooLarge)?;
        self.spi
            .transfer(&mut read, &write)
            .map_err(|_| RadioError::SpiFailed)?;
        out.copy_from_slice(&read[1..]);
        Ok(())
    }

    // ── Modem parameter encoding ──────────────────────────────

    fn modem_config_1() -> u8 {
        // Bandwidth field, explicit header mode.
        let bw_bits: u8 = match LORA_BANDWIDTH_HZ {
            62_500 => 0b0110,
            125_000 => 0b0111,
            250_000 => 0b1000,
            _ => 0b0111,
        };
        let cr_bits = LORA_CODING_RATE - 4;
        (bw_bits << 4) | (cr_bits << 1)
    }

    fn modem_config_2() -> u8 {
        // Spreading factor, RX payload CRC on.
        (LORA_SPREADING_FACTOR << 4) | 0x04
    }
}

impl RadioLink for Sx127xLink<'_> {
    fn configure(&mut self) -> Result<(), RadioError> {
        // Hardware reset pulse, then give the oscillator time to settle.
        self.rst.set_low().map_err(|_| RadioError::SpiFailed)?;
        FreeRtos::delay_ms(10);
        self.rst.set_high().map_err(|_| RadioError::SpiFailed)?;
        FreeRtos::delay_ms(10);

        if self.read_reg(REG_VERSION)? != CHIP_VERSION {
            return Err(RadioError::ChipNotFound);
        }

        // LoRa mode is only selectable from sleep.
        self.write_reg(REG_OP_MODE, OPMODE_LORA_SLEEP)?;
        FreeRtos::delay_ms(10);

        // Carrier: FRF = freq * 2^19 / 32 MHz.
        let frf = (LORA_FREQUENCY_HZ << 19) / 32_000_000;
        self.write_reg(REG_FRF_MSB, (frf >> 16) as u8)?;
        self.write_reg(REG_FRF_MSB + 1, (frf >> 8) as u8)?;
        self.write_reg(REG_FRF_MSB + 2, frf as u8)?;

        // Whole FIFO for whichever direction is active.
        self.write_reg(REG_FIFO_TX_BASE, 0x00)?;
        self.write_reg(REG_FIFO_RX_BASE, 0x00)?;

        // LNA boost on the HF port.
        let lna = self.read_reg(REG_LNA)?;
        self.write_reg(REG_LNA, lna | 0x03)?;

        self.write_reg(REG_MODEM_CONFIG_1, Self::modem_config_1())?;
        self.write_reg(REG_MODEM_CONFIG_2, Self::modem_config_2())?;
        // AGC auto.
        self.write_reg(REG_MODEM_CONFIG_3, 0x04)?;

        self.write_reg(REG_PREAMBLE_MSB, (LORA_PREAMBLE_LEN >> 8) as u8)?;
        self.write_reg(REG_PREAMBLE_MSB + 1, LORA_PREAMBLE_LEN as u8)?;
        self.write_reg(REG_SYNC_WORD, LORA_SYNC_WORD)?;

        // PA_BOOST output, 2..17 dBm range.
        let power = LORA_TX_POWER_DBM.clamp(2, 17) as u8;
        self.write_reg(REG_PA_CONFIG, 0x80 | (power - 2))?;

        self.write_reg(REG_OP_MODE, OPMODE_LORA_STANDBY)?;
        self.write_reg(REG_OP_MODE, OPMODE_LORA_RX_CONT)?;

        info!(
            "SX1276 configured: {} Hz, SF{}, {} Hz BW, CR 4/{}, sync 0x{:02X}, {} dBm",
            LORA_FREQUENCY_HZ,
            LORA_SPREADING_FACTOR,
            LORA_BANDWIDTH_HZ,
            LORA_CODING_RATE,
            LORA_SYNC_WORD,
            LORA_TX_POWER_DBM
        );
        Ok(())
    }

    fn transmit(&mut self, payload: &[u8]) -> Result<(), RadioError> {
        if payload.is_empty() || payload.len() > MAX_PACKET_LEN {
            return Err(RadioError::PayloadTooLarge);
        }

        self.write_reg(REG_OP_MODE, OPMODE_LORA_STANDBY)?;
        self.write_reg(REG_FIFO_ADDR_PTR, 0x00)?;
        self.write_fifo(payload)?;
        self.write_reg(REG_PAYLOAD_LENGTH, payload.len() as u8)?;
        self.write_reg(REG_OP_MODE, OPMODE_LORA_TX)?;

        let deadline = Instant::now() + TX_TIMEOUT;
        loop {
            if self.read_reg(REG_IRQ_FLAGS)? & IRQ_TX_DONE != 0 {
                break;
            }
            if Instant::now() >= deadline {
                self.write_reg(REG_OP_MODE, OPMODE_LORA_RX_CONT)?;
                return Err(RadioError::TxTimeout);
            }
            FreeRtos::delay_ms(1);
        }
        self.write_reg(REG_IRQ_FLAGS, IRQ_TX_DONE)?;

        // Resume listening.
        self.write_reg(REG_OP_MODE, OPMODE_LORA_RX_CONT)
    }

    fn poll_receive(&mut self, buf: &mut [u8]) -> usize {
        let Ok(flags) = self.read_reg(REG_IRQ_FLAGS) else {
            return 0;
        };
        if flags & IRQ_RX_DONE == 0 {
            return 0;
        }
        // Acknowledge the interrupt before touching the FIFO so a failed
        // read cannot wedge the flag.
        let _ = self.write_reg(REG_IRQ_FLAGS, IRQ_RX_DONE | IRQ_PAYLOAD_CRC_ERROR);

        if flags & IRQ_PAYLOAD_CRC_ERROR != 0 {
            return 0;
        }

        let Ok(len) = self.read_reg(REG_RX_NB_BYTES) else {
            return 0;
        };
        let n = (len as usize).min(buf.len());
        if n == 0 {
            return 0;
        }

        let Ok(current) = self.read_reg(REG_FIFO_RX_CURRENT) else {
            return 0;
        };
        if self.write_reg(REG_FIFO_ADDR_PTR, current).is_err() {
            return 0;
        }
        if self.read_fifo(&mut buf[..n]).is_err() {
            return 0;
        }
        n
    }
}
