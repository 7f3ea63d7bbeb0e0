//! TMP36 analog temperature sensor.
//!
//! Output is 10 mV/°C with a 500 mV offset (0 °C = 0.5 V).  The analog
//! front end maps 0–5 V onto the 10-bit reading, so one count is
//! 4.8828 mV.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 channel 0 via the oneshot API (initialised by hw_init).
//! On host/test: reads from a static AtomicU16 for injection.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

// 22 °C: (22 * 10 + 500) / 4.8828 ≈ 147.5
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_ADC: AtomicU16 = AtomicU16::new(148);
#[cfg(not(target_os = "espidf"))]
static SIM_TEMP_FAIL: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_adc(raw: u16) {
    SIM_TEMP_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_temp_fail(fail: bool) {
    SIM_TEMP_FAIL.store(fail, Ordering::Relaxed);
}

const MV_PER_COUNT: f32 = 4.8828;
const OFFSET_MV: f32 = 500.0;
const MV_PER_DEG_C: f32 = 10.0;

/// Rated range of the part; anything outside is a wiring or ADC fault.
pub const MIN_PLAUSIBLE_C: f32 = -40.0;
pub const MAX_PLAUSIBLE_C: f32 = 125.0;

/// Convert a 10-bit reading to °C.
pub fn adc_to_celsius(raw: u16) -> f32 {
    let mv = f32::from(raw) * MV_PER_COUNT;
    (mv - OFFSET_MV) / MV_PER_DEG_C
}

pub struct TemperatureSensor {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    adc_channel: u32,
}

impl TemperatureSensor {
    pub fn new(adc_channel: u32) -> Self {
        Self { adc_channel }
    }

    /// Read and convert.  Out-of-range results are reported as errors so
    /// the hub can fall back to the last good value.
    pub fn read(&self) -> Result<f32, SensorError> {
        let celsius = adc_to_celsius(self.read_adc()?);
        if !(MIN_PLAUSIBLE_C..=MAX_PLAUSIBLE_C).contains(&celsius) {
            return Err(SensorError::OutOfRange);
        }
        Ok(celsius)
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read_10bit(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        if SIM_TEMP_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(SIM_TEMP_ADC.load(Ordering::Relaxed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tmp36_transfer_function() {
        // 0.5 V → 0 °C
        assert!(adc_to_celsius(102).abs() < 0.5);
        // 123 counts ≈ 600 mV → 10 °C
        assert!((adc_to_celsius(123) - 10.06).abs() < 0.05);
        // 150 counts ≈ 732 mV → 23.2 °C
        assert!((adc_to_celsius(150) - 23.24).abs() < 0.05);
    }

    #[test]
    fn sensor_keeps_its_channel() {
        let sensor = TemperatureSensor::new(crate::pins::TEMP_ADC_CHANNEL);
        assert_eq!(sensor.adc_channel, crate::pins::TEMP_ADC_CHANNEL);
    }

    #[test]
    fn full_scale_is_implausible() {
        // 1023 counts ≈ 4995 mV → ~449 °C
        assert!(adc_to_celsius(1023) > MAX_PLAUSIBLE_C);
        // 0 counts → −50 °C
        assert!(adc_to_celsius(0) < MIN_PLAUSIBLE_C);
    }
}
