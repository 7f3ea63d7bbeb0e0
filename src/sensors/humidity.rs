//! SHT31 relative-humidity sensor on I²C.
//!
//! Single-shot measurements take ~15 ms, longer than we want to block a
//! tick.  The driver therefore splits each sample across two polls: one
//! poll triggers a conversion, the next (one loop period later) fetches
//! the result and triggers the following conversion.
//!
//! ```text
//!  poll ─▶ trigger          poll ─▶ fetch + trigger      poll ─▶ fetch + trigger
//!          └── 15 ms conv ──┘        └── 15 ms conv ────┘
//! ```
//!
//! Humidity is reported in telemetry only; the controller never acts on it.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

pub const SHT31_ADDR: u8 = 0x44;
/// Single shot, high repeatability, no clock stretching.
pub const CMD_MEASURE: [u8; 2] = [0x24, 0x00];

/// Humidity × 10.
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_X10: AtomicU16 = AtomicU16::new(450);
#[cfg(not(target_os = "espidf"))]
static SIM_HUMIDITY_FAIL: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_humidity(pct: f32) {
    SIM_HUMIDITY_X10.store((pct.clamp(0.0, 100.0) * 10.0) as u16, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_humidity_fail(fail: bool) {
    SIM_HUMIDITY_FAIL.store(fail, Ordering::Relaxed);
}

/// Sensirion CRC-8: polynomial 0x31, init 0xFF.
pub fn crc8(data: &[u8]) -> u8 {
    let mut crc: u8 = 0xFF;
    for &byte in data {
        crc ^= byte;
        for _ in 0..8 {
            crc = if crc & 0x80 != 0 {
                (crc << 1) ^ 0x31
            } else {
                crc << 1
            };
        }
    }
    crc
}

/// Decode a 6-byte measurement frame (T, T, crc, RH, RH, crc) to %RH.
pub fn decode_humidity(frame: &[u8; 6]) -> Result<f32, SensorError> {
    if crc8(&frame[3..5]) != frame[5] {
        return Err(SensorError::BusReadFailed);
    }
    let raw = u16::from_be_bytes([frame[3], frame[4]]);
    Ok(100.0 * f32::from(raw) / 65535.0)
}

pub struct HumiditySensor {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    conversion_pending: bool,
}

impl Default for HumiditySensor {
    fn default() -> Self {
        Self::new()
    }
}

impl HumiditySensor {
    pub fn new() -> Self {
        Self {
            conversion_pending: false,
        }
    }

    /// Advance the measurement cycle.  `Ok(None)` means no new sample
    /// this poll.
    #[cfg(target_os = "espidf")]
    pub fn poll(&mut self) -> Result<Option<f32>, SensorError> {
        let sample = if self.conversion_pending {
            let mut frame = [0u8; 6];
            self.conversion_pending = false;
            hw_init::i2c_read(SHT31_ADDR, &mut frame)?;
            Some(decode_humidity(&frame)?)
        } else {
            None
        };
        hw_init::i2c_write(SHT31_ADDR, &CMD_MEASURE)?;
        self.conversion_pending = true;
        Ok(sample)
    }

    #[cfg(not(target_os = "espidf"))]
    pub fn poll(&mut self) -> Result<Option<f32>, SensorError> {
        if SIM_HUMIDITY_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::BusReadFailed);
        }
        Ok(Some(f32::from(SIM_HUMIDITY_X10.load(Ordering::Relaxed)) / 10.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crc_matches_datasheet_example() {
        assert_eq!(crc8(&[0xBE, 0xEF]), 0x92);
    }

    #[test]
    fn decodes_valid_frame() {
        let rh = [0x80, 0x00];
        let frame = [0x66, 0x66, crc8(&[0x66, 0x66]), rh[0], rh[1], crc8(&rh)];
        let pct = decode_humidity(&frame).unwrap();
        assert!((pct - 50.0).abs() < 0.01);
    }

    #[test]
    fn rejects_bad_crc() {
        let frame = [0, 0, 0, 0x80, 0x00, 0x00];
        assert_eq!(decode_humidity(&frame), Err(SensorError::BusReadFailed));
    }
}
