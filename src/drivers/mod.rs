//! Actuator drivers, hardware initialisation, and peripheral helpers.

pub mod button;
pub mod hvac;
pub mod hw_init;
pub mod pwm;
pub mod siren;
pub mod strike;
pub mod watchdog;
