//! MQ-2 smoke sensor, analog output on ADC1 channel 1.
//!
//! The controller works on the raw 10-bit count; the override threshold
//! lives in configuration.  Failed conversions surface as errors; the
//! hub holds the last count through short runs of them and reports full
//! scale once a run is long enough to mean a broken sensor.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, AtomicU16, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;
use crate::error::SensorError;

pub const ADC_FULL_SCALE: u16 = 1023;

#[cfg(not(target_os = "espidf"))]
static SIM_SMOKE_ADC: AtomicU16 = AtomicU16::new(60);
#[cfg(not(target_os = "espidf"))]
static SIM_SMOKE_FAIL: AtomicBool = AtomicBool::new(false);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_smoke_adc(raw: u16) {
    SIM_SMOKE_ADC.store(raw, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_smoke_fail(fail: bool) {
    SIM_SMOKE_FAIL.store(fail, Ordering::Relaxed);
}

pub struct SmokeSensor {
    #[cfg_attr(not(target_os = "espidf"), allow(dead_code))]
    adc_channel: u32,
}

impl SmokeSensor {
    pub fn new(adc_channel: u32) -> Self {
        Self { adc_channel }
    }

    /// Raw count, clamped to the 10-bit range.
    pub fn read(&self) -> Result<u16, SensorError> {
        Ok(self.read_adc()?.min(ADC_FULL_SCALE))
    }

    #[cfg(target_os = "espidf")]
    fn read_adc(&self) -> Result<u16, SensorError> {
        hw_init::adc1_read_10bit(self.adc_channel)
    }

    #[cfg(not(target_os = "espidf"))]
    fn read_adc(&self) -> Result<u16, SensorError> {
        if SIM_SMOKE_FAIL.load(Ordering::Relaxed) {
            return Err(SensorError::AdcReadFailed);
        }
        Ok(SIM_SMOKE_ADC.load(Ordering::Relaxed))
    }
}

#[cfg(all(test, not(target_os = "espidf")))]
mod tests {
    use super::*;
    use crate::pins;

    #[test]
    fn sensor_keeps_its_channel() {
        let sensor = SmokeSensor::new(pins::SMOKE_ADC_CHANNEL);
        assert_eq!(sensor.adc_channel, pins::SMOKE_ADC_CHANNEL);
    }
}
