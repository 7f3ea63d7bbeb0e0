//! 8-bit LEDC PWM output (fan MOSFET, LED strip MOSFET).
//!
//! Duty is written only when it changes; the thermal and lighting
//! controllers re-issue their levels every tick.

use crate::drivers::hw_init;
use crate::error::ActuatorError;

pub struct PwmOutput {
    name: &'static str,
    channel: u32,
    duty: u8,
    /// Cleared after a failed write so the next request retries.
    synced: bool,
}

impl PwmOutput {
    pub fn new(name: &'static str, channel: u32) -> Self {
        Self {
            name,
            channel,
            duty: 0,
            synced: false,
        }
    }

    pub fn fan() -> Self {
        Self::new("fan", hw_init::LEDC_CH_FAN)
    }

    pub fn led_strip() -> Self {
        Self::new("led_strip", hw_init::LEDC_CH_LED_STRIP)
    }

    pub fn set(&mut self, duty: u8) -> Result<(), ActuatorError> {
        if self.synced && duty == self.duty {
            return Ok(());
        }
        self.duty = duty;
        self.synced = false;
        hw_init::ledc_set(self.channel, duty)?;
        self.synced = true;
        Ok(())
    }

    pub fn duty(&self) -> u8 {
        self.duty
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}
