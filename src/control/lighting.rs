//! Motion-triggered lighting with a retriggerable off-timer.
//!
//! While `(motion || door_open) && after_sunset` holds, every tick pushes
//! the timer start forward and re-drives the strip, so intermittent motion
//! keeps the lights on without a flicker.  Once the trigger stops the
//! strip holds its level until `light_duration_ms` has strictly elapsed.

use crate::config::ThresholdConfig;
use crate::fsm::context::{ActuatorCommand, ControllerState, SensorSnapshot, TickOutputs};

#[derive(Debug, Clone)]
pub struct LightingController {
    duration_ms: u64,
    on_duty: u8,
}

impl LightingController {
    pub fn new(config: &ThresholdConfig) -> Self {
        Self {
            duration_ms: config.light_duration_ms,
            on_duty: config.led_motion_duty,
        }
    }

    /// True when this snapshot should (re)trigger the lights.
    pub fn triggered(snap: &SensorSnapshot) -> bool {
        (snap.motion || snap.door_open) && snap.after_sunset
    }

    pub fn update(
        &self,
        snap: &SensorSnapshot,
        now_ms: u64,
        state: &mut ControllerState,
        out: &mut TickOutputs,
    ) {
        if Self::triggered(snap) {
            state.light_timer_start_ms = now_ms;
            state.led_duty = self.on_duty;
            out.command(ActuatorCommand::LedDuty(self.on_duty));
        } else if now_ms.saturating_sub(state.light_timer_start_ms) > self.duration_ms {
            if state.led_duty != 0 {
                log::debug!("lighting: timer expired, strip off");
            }
            state.led_duty = 0;
            out.command(ActuatorCommand::LedDuty(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn night_motion() -> SensorSnapshot {
        SensorSnapshot {
            motion: true,
            after_sunset: true,
            ..SensorSnapshot::default()
        }
    }

    fn quiet_night() -> SensorSnapshot {
        SensorSnapshot {
            after_sunset: true,
            ..SensorSnapshot::default()
        }
    }

    #[test]
    fn motion_after_sunset_turns_lights_on() {
        let lc = LightingController::new(&ThresholdConfig::default());
        let mut state = ControllerState::default();
        let mut out = TickOutputs::default();
        lc.update(&night_motion(), 1_000, &mut state, &mut out);
        assert_eq!(state.led_duty, 153);
        assert_eq!(state.light_timer_start_ms, 1_000);
        assert_eq!(out.commands.as_slice(), &[ActuatorCommand::LedDuty(153)]);
    }

    #[test]
    fn daytime_motion_does_not_trigger() {
        let lc = LightingController::new(&ThresholdConfig::default());
        let mut state = ControllerState::default();
        let mut out = TickOutputs::default();
        let snap = SensorSnapshot {
            motion: true,
            door_open: true,
            ..SensorSnapshot::default()
        };
        lc.update(&snap, 500_000, &mut state, &mut out);
        assert_eq!(state.led_duty, 0);
    }

    #[test]
    fn door_open_counts_as_trigger() {
        let snap = SensorSnapshot {
            door_open: true,
            after_sunset: true,
            ..SensorSnapshot::default()
        };
        assert!(LightingController::triggered(&snap));
    }

    #[test]
    fn holds_until_duration_strictly_elapsed() {
        let lc = LightingController::new(&ThresholdConfig::default());
        let mut state = ControllerState::default();
        let mut out = TickOutputs::default();
        lc.update(&night_motion(), 10_000, &mut state, &mut out);

        out.clear();
        lc.update(&quiet_night(), 10_000 + 180_000, &mut state, &mut out);
        assert_eq!(state.led_duty, 153, "exactly the duration is not yet expired");
        assert!(out.commands.is_empty());

        lc.update(&quiet_night(), 10_000 + 180_001, &mut state, &mut out);
        assert_eq!(state.led_duty, 0);
        assert_eq!(out.commands.as_slice(), &[ActuatorCommand::LedDuty(0)]);
    }

    #[test]
    fn retrigger_extends_timer() {
        let lc = LightingController::new(&ThresholdConfig::default());
        let mut state = ControllerState::default();
        let mut out = TickOutputs::default();
        lc.update(&night_motion(), 0, &mut state, &mut out);
        lc.update(&night_motion(), 170_000, &mut state, &mut out);
        lc.update(&quiet_night(), 300_000, &mut state, &mut out);
        assert_eq!(state.led_duty, 153);
        lc.update(&quiet_night(), 350_001, &mut state, &mut out);
        assert_eq!(state.led_duty, 0);
    }
}
