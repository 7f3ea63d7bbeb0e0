//! PIR motion sensor and door reed switch.
//!
//! The PIR output is HIGH while motion is detected.  The reed switch is
//! wired active-low with the internal pull-up: a LOW level means the door
//! is open.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads real GPIO levels via hw_init helpers.
//! On host/test: reads raw pin levels from static atomics.

#[cfg(not(target_os = "espidf"))]
use core::sync::atomic::{AtomicBool, Ordering};

#[cfg(target_os = "espidf")]
use crate::drivers::hw_init;

#[cfg(not(target_os = "espidf"))]
static SIM_PIR_LEVEL: AtomicBool = AtomicBool::new(false);
/// Raw reed level; HIGH (door closed) by default.
#[cfg(not(target_os = "espidf"))]
static SIM_REED_LEVEL: AtomicBool = AtomicBool::new(true);

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_pir_level(high: bool) {
    SIM_PIR_LEVEL.store(high, Ordering::Relaxed);
}

#[cfg(not(target_os = "espidf"))]
pub fn sim_set_reed_level(high: bool) {
    SIM_REED_LEVEL.store(high, Ordering::Relaxed);
}

/// Resolve the active-low reed wiring.
pub fn door_open_from_level(reed_high: bool) -> bool {
    !reed_high
}

pub struct PresenceSensor {
    _pir_gpio: i32,
    _reed_gpio: i32,
}

impl PresenceSensor {
    pub fn new(pir_gpio: i32, reed_gpio: i32) -> Self {
        Self {
            _pir_gpio: pir_gpio,
            _reed_gpio: reed_gpio,
        }
    }

    pub fn motion(&self) -> bool {
        self.pir_level()
    }

    pub fn door_open(&self) -> bool {
        door_open_from_level(self.reed_level())
    }

    #[cfg(target_os = "espidf")]
    fn pir_level(&self) -> bool {
        hw_init::gpio_read(self._pir_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn pir_level(&self) -> bool {
        SIM_PIR_LEVEL.load(Ordering::Relaxed)
    }

    #[cfg(target_os = "espidf")]
    fn reed_level(&self) -> bool {
        hw_init::gpio_read(self._reed_gpio)
    }

    #[cfg(not(target_os = "espidf"))]
    fn reed_level(&self) -> bool {
        SIM_REED_LEVEL.load(Ordering::Relaxed)
    }
}
