//! Controller thresholds and timing parameters.
//!
//! Compiled defaults only: the controller does not persist or reload
//! configuration.  The struct is serde-enabled so telemetry and host
//! tooling can dump it.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Every threshold, duty level, and duration the control core uses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    // --- Thermal hysteresis (°C) ---
    /// At or below this temperature the controller enters heating.
    pub heat_on_c: f32,
    /// Lower edge of the heating dead band.
    pub heat_off_c: f32,
    /// At or above this temperature the controller enters cooling.
    pub cool_on_c: f32,
    /// Lower edge (exclusive) of the cooling dead band.
    pub cool_off_c: f32,
    /// Comfort band, inclusive on both ends.
    pub comfort_low_c: f32,
    pub comfort_high_c: f32,

    // --- Duty levels (0-255) ---
    /// Gentle circulation while in the comfort band.
    pub fan_comfort_duty: u8,
    /// Fan duty while cooling.
    pub fan_cool_duty: u8,
    /// LED strip duty when motion lighting is triggered.
    pub led_motion_duty: u8,
    /// LED strip duty during a smoke emergency.
    pub led_full_duty: u8,

    // --- Timers (ms) ---
    /// How long lights stay on after the last trigger.
    pub light_duration_ms: u64,
    /// How long the intrusion siren sounds before auto-silencing.
    pub siren_duration_ms: u64,
    /// Control loop period.
    pub loop_period_ms: u32,

    // --- Smoke ---
    /// Raw ADC level at which the smoke override engages (≈1.6 V).
    pub smoke_threshold_raw: u16,
    /// Consecutive clear ticks required before a manual reset is honoured.
    pub smoke_clear_ticks: u32,
    /// Emergency alert repeat interval while the override is active.
    pub smoke_alert_repeat_ms: u64,

    // --- Daylight window (local hour, 0-23) ---
    pub sunset_hour: u8,
    pub sunrise_hour: u8,

    // --- Misc ---
    /// Telemetry report interval.
    pub telemetry_interval_ms: u64,
    /// Temperature assumed before the first sensor read.
    pub initial_temperature_c: f32,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            // Thermal: 21-25 °C comfort with 1 °C hysteresis either side
            heat_on_c: 20.0,
            heat_off_c: 21.0,
            cool_on_c: 26.0,
            cool_off_c: 25.0,
            comfort_low_c: 21.0,
            comfort_high_c: 25.0,

            // Duties
            fan_comfort_duty: 77, // 30%
            fan_cool_duty: 204,   // 80%
            led_motion_duty: 153, // 60%
            led_full_duty: 255,

            // Timers
            light_duration_ms: 180_000, // 3 min
            siren_duration_ms: 30_000,  // 30 s
            loop_period_ms: 50,         // 20 Hz

            // Smoke
            smoke_threshold_raw: 328,
            smoke_clear_ticks: 100, // 5 s at 20 Hz
            smoke_alert_repeat_ms: 10_000,

            sunset_hour: 19,
            sunrise_hour: 7,

            telemetry_interval_ms: 60_000,
            initial_temperature_c: 22.0,
        }
    }
}

impl ThresholdConfig {
    /// Reject configurations that would break the hysteresis ordering or
    /// stall a timer.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let temps = [
            self.heat_on_c,
            self.heat_off_c,
            self.comfort_low_c,
            self.comfort_high_c,
            self.cool_off_c,
            self.cool_on_c,
        ];
        if temps.iter().any(|t| !t.is_finite()) {
            return Err(ConfigError::ValidationFailed("temperature threshold not finite"));
        }
        if self.heat_on_c >= self.heat_off_c {
            return Err(ConfigError::ValidationFailed("heat_on must be below heat_off"));
        }
        if self.heat_off_c > self.comfort_low_c {
            return Err(ConfigError::ValidationFailed("heat_off above comfort_low"));
        }
        if self.comfort_low_c > self.comfort_high_c {
            return Err(ConfigError::ValidationFailed("comfort band inverted"));
        }
        if self.comfort_high_c > self.cool_off_c {
            return Err(ConfigError::ValidationFailed("comfort_high above cool_off"));
        }
        if self.cool_off_c >= self.cool_on_c {
            return Err(ConfigError::ValidationFailed("cool_off must be below cool_on"));
        }
        if self.loop_period_ms == 0 {
            return Err(ConfigError::ValidationFailed("loop period is zero"));
        }
        if self.light_duration_ms == 0 || self.siren_duration_ms == 0 {
            return Err(ConfigError::ValidationFailed("timer duration is zero"));
        }
        if self.smoke_threshold_raw == 0 {
            return Err(ConfigError::ValidationFailed("smoke threshold is zero"));
        }
        if self.sunset_hour > 23 || self.sunrise_hour > 23 {
            return Err(ConfigError::ValidationFailed("daylight hour out of range"));
        }
        Ok(())
    }
}
