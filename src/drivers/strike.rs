//! Electric door strike.  HIGH = locked.

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

pub struct StrikeDriver {
    engaged: bool,
}

impl Default for StrikeDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl StrikeDriver {
    pub fn new() -> Self {
        Self { engaged: false }
    }

    pub fn set(&mut self, engaged: bool) -> Result<(), ActuatorError> {
        hw_init::gpio_write(pins::STRIKE_GPIO, engaged)?;
        self.engaged = engaged;
        Ok(())
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}
