//! Siren driver with steady and fire-alarm cadences.
//!
//! Intrusion uses a steady tone.  Smoke uses the temporal-three pattern
//! so occupants can tell a fire alarm from a break-in:
//!
//! ```text
//!  ON  ██    ██    ██
//!  OFF   ░░    ░░    ░░░░░░
//!      0.5s  0.5s  0.5s 1.5s   (4 s cycle)
//! ```
//!
//! The pattern is advanced by [`SirenDriver::service`], which the main
//! loop calls every iteration.

use crate::drivers::hw_init;
use crate::error::ActuatorError;
use crate::pins;

const PULSE_MS: u64 = 500;
const CYCLE_MS: u64 = 4_000;

/// Siren level `elapsed_ms` into a temporal-three cycle.
pub fn temporal_three_level(elapsed_ms: u64) -> bool {
    let phase = elapsed_ms % CYCLE_MS;
    phase < 3 * 2 * PULSE_MS && (phase / PULSE_MS) % 2 == 0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SirenMode {
    Off,
    Steady,
    /// `started_ms` is filled in on the first service call.
    Smoke { started_ms: Option<u64> },
}

pub struct SirenDriver {
    mode: SirenMode,
    level: bool,
}

impl Default for SirenDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl SirenDriver {
    pub fn new() -> Self {
        Self {
            mode: SirenMode::Off,
            level: false,
        }
    }

    /// Steady on/off.  Cancels the smoke pattern.
    pub fn set_steady(&mut self, on: bool) -> Result<(), ActuatorError> {
        self.mode = if on { SirenMode::Steady } else { SirenMode::Off };
        self.write(on)
    }

    /// Switch to the fire cadence.  Repeated calls keep the running cycle.
    pub fn start_smoke_pattern(&mut self) {
        if !matches!(self.mode, SirenMode::Smoke { .. }) {
            self.mode = SirenMode::Smoke { started_ms: None };
        }
    }

    /// Advance the pattern.
    pub fn service(&mut self, now_ms: u64) -> Result<(), ActuatorError> {
        let SirenMode::Smoke { started_ms } = self.mode else {
            return Ok(());
        };
        let start = match started_ms {
            Some(start) => start,
            None => {
                self.mode = SirenMode::Smoke {
                    started_ms: Some(now_ms),
                };
                now_ms
            }
        };
        let level = temporal_three_level(now_ms.saturating_sub(start));
        if level != self.level {
            self.write(level)?;
        }
        Ok(())
    }

    pub fn mode(&self) -> SirenMode {
        self.mode
    }

    pub fn is_sounding(&self) -> bool {
        self.level
    }

    fn write(&mut self, level: bool) -> Result<(), ActuatorError> {
        hw_init::gpio_write(pins::SIREN_GPIO, level)?;
        self.level = level;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn temporal_three_cadence() {
        let on: Vec<bool> = (0..8).map(|i| temporal_three_level(i * 500)).collect();
        assert_eq!(on, [true, false, true, false, true, false, false, false]);
        assert!(temporal_three_level(4_000));
        assert!(temporal_three_level(499));
        assert!(!temporal_three_level(3_999));
    }

    #[test]
    fn smoke_pattern_anchors_on_first_service() {
        let mut siren = SirenDriver::new();
        siren.start_smoke_pattern();
        siren.service(10_000).unwrap();
        assert!(siren.is_sounding());
        siren.start_smoke_pattern();
        siren.service(10_600).unwrap();
        assert!(!siren.is_sounding(), "restart must not reset the cycle");
        assert_eq!(
            siren.mode(),
            SirenMode::Smoke {
                started_ms: Some(10_000)
            }
        );
    }

    #[test]
    fn steady_command_cancels_pattern() {
        let mut siren = SirenDriver::new();
        siren.start_smoke_pattern();
        siren.service(0).unwrap();
        siren.set_steady(false).unwrap();
        assert_eq!(siren.mode(), SirenMode::Off);
        siren.service(1_000).unwrap();
        assert!(!siren.is_sounding());
    }
}
