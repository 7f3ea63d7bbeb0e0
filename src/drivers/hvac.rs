//! Heat/cool relay pair.
//!
//! ## Safety contract
//!
//! The two relays must never be energised together.  Every change first
//! drops both relays, then energises the requested one, so even a failed
//! write leaves the pair off rather than both on.

use log::warn;

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::fsm::context::HvacMode;
use crate::pins;

pub struct HvacRelays {
    mode: HvacMode,
}

impl Default for HvacRelays {
    fn default() -> Self {
        Self::new()
    }
}

impl HvacRelays {
    pub fn new() -> Self {
        Self {
            mode: HvacMode::Off,
        }
    }

    pub fn set(&mut self, mode: HvacMode) -> Result<(), ActuatorError> {
        if mode == self.mode {
            return Ok(());
        }

        // Break before make.
        self.mode = HvacMode::Off;
        hw_init::gpio_write(pins::HVAC_HEAT_GPIO, false)?;
        hw_init::gpio_write(pins::HVAC_COOL_GPIO, false)?;

        match mode {
            HvacMode::Off => {}
            HvacMode::Heat => hw_init::gpio_write(pins::HVAC_HEAT_GPIO, true)?,
            HvacMode::Cool => hw_init::gpio_write(pins::HVAC_COOL_GPIO, true)?,
        }
        self.mode = mode;
        Ok(())
    }

    /// Drop both relays, ignoring the cached state.
    pub fn force_off(&mut self) {
        self.mode = HvacMode::Off;
        for pin in [pins::HVAC_HEAT_GPIO, pins::HVAC_COOL_GPIO] {
            if let Err(e) = hw_init::gpio_write(pin, false) {
                warn!("hvac: GPIO{} off failed: {}", pin, e);
            }
        }
    }

    pub fn mode(&self) -> HvacMode {
        self.mode
    }
}
