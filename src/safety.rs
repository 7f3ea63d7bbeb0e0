//! Smoke override supervisor.
//!
//! The supervisor runs **every tick before the FSM**.  Once the smoke
//! reading reaches the threshold the override latches, and while latched
//! the arbiter skips the mode handlers entirely.
//!
//! ## Override lifecycle
//!
//! 1. `smoke_raw >= threshold` latches the override and sets
//!    `ControllerState.smoke_active`.
//! 2. Every tick while latched, [`SmokeOverride::apply`] forces HVAC and
//!    fan off, the LED strip to full, the strike released and the siren
//!    into its fire cadence.  The emergency alert goes out on activation
//!    and then every `smoke_alert_repeat_ms`.
//! 3. Each tick below threshold extends a clear streak; any reading at or
//!    above threshold resets it.
//! 4. Only an explicit reset with a streak of at least
//!    `smoke_clear_ticks` unlatches.  There is no automatic clear.
//!
//! The security mode is never touched, so the system resumes in whatever
//! mode it was in when the smoke appeared.

use crate::config::ThresholdConfig;
use crate::fsm::Mode;
use crate::fsm::context::{ActuatorCommand, Alert, ControllerContext, HvacMode, HvacState, Notice};
use log::{error, info, warn};

/// Result of a smoke reset request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetOutcome {
    /// Override cleared; mode handlers resume next tick.
    Cleared,
    /// Readings have not been clear for long enough.
    StillSmoky { clear_ticks: u32 },
    /// Nothing to reset.
    NotActive,
}

pub struct SmokeOverride {
    threshold_raw: u16,
    clear_ticks_required: u32,
    alert_repeat_ms: u64,
    full_duty: u8,
    latched: bool,
    /// Consecutive ticks below threshold while latched.
    clear_streak: u32,
    /// Time of the last emergency alert, `None` until the first one.
    last_alert_ms: Option<u64>,
}

impl SmokeOverride {
    pub fn new(config: &ThresholdConfig) -> Self {
        Self {
            threshold_raw: config.smoke_threshold_raw,
            clear_ticks_required: config.smoke_clear_ticks,
            alert_repeat_ms: config.smoke_alert_repeat_ms,
            full_duty: config.led_full_duty,
            latched: false,
            clear_streak: 0,
            last_alert_ms: None,
        }
    }

    /// Evaluate this tick's smoke reading.  Returns `true` while the
    /// override is latched; mirrors the flag into the controller state.
    pub fn evaluate(&mut self, ctx: &mut ControllerContext) -> bool {
        let raw = ctx.sensors.smoke_raw;

        if raw >= self.threshold_raw {
            if !self.latched {
                error!(
                    "SMOKE DETECTED: raw={} (threshold {}), override latched",
                    raw, self.threshold_raw
                );
                self.latched = true;
            }
            self.clear_streak = 0;
        } else if self.latched {
            self.clear_streak = self.clear_streak.saturating_add(1);
        }

        ctx.state.smoke_active = self.latched;
        self.latched
    }

    /// Force every output into its fire-safe level.  Call once per tick
    /// while [`evaluate`](Self::evaluate) reports the override latched.
    pub fn apply(&mut self, ctx: &mut ControllerContext) {
        ctx.state.hvac = HvacState::default();
        ctx.state.fan_duty = 0;
        ctx.state.led_duty = self.full_duty;
        ctx.state.strike_engaged = false;

        ctx.outputs.command(ActuatorCommand::Hvac(HvacMode::Off));
        ctx.outputs.command(ActuatorCommand::FanDuty(0));
        ctx.outputs.command(ActuatorCommand::LedDuty(self.full_duty));
        ctx.outputs.command(ActuatorCommand::Strike(false));
        ctx.outputs.command(ActuatorCommand::SmokePattern);

        let due = match self.last_alert_ms {
            None => true,
            Some(last) => ctx.now_ms.saturating_sub(last) >= self.alert_repeat_ms,
        };
        if due {
            let notice = if self.last_alert_ms.is_none() {
                Notice::SmokeDetected
            } else {
                Notice::SmokeStillActive
            };
            error!("FIRE/SMOKE EMERGENCY: raw={}", ctx.sensors.smoke_raw);
            ctx.outputs.alert(Alert::FireSmoke);
            ctx.outputs.notice(notice);
            self.last_alert_ms = Some(ctx.now_ms);
        }
    }

    /// Attempt to clear the override.  On success the siren and strike
    /// are restored to what the current mode expects; HVAC and lighting
    /// are re-evaluated by the mode handler on the next tick.
    pub fn request_reset(&mut self, ctx: &mut ControllerContext) -> ResetOutcome {
        if !self.latched {
            return ResetOutcome::NotActive;
        }

        if self.clear_streak < self.clear_ticks_required {
            warn!(
                "smoke reset rejected: clear for {} of {} ticks",
                self.clear_streak, self.clear_ticks_required
            );
            ctx.outputs.notice(Notice::SmokeResetRejected {
                clear_ticks: self.clear_streak,
            });
            return ResetOutcome::StillSmoky {
                clear_ticks: self.clear_streak,
            };
        }

        self.latched = false;
        self.clear_streak = 0;
        self.last_alert_ms = None;

        ctx.state.smoke_active = false;
        ctx.state.strike_engaged = ctx.state.mode != Mode::Normal;
        ctx.outputs.command(ActuatorCommand::Siren(ctx.state.siren_active));
        ctx.outputs
            .command(ActuatorCommand::Strike(ctx.state.strike_engaged));
        ctx.outputs.notice(Notice::SmokeCleared);
        info!(
            "smoke override cleared, resuming {}",
            ctx.state.mode.name()
        );

        ResetOutcome::Cleared
    }

    pub fn is_active(&self) -> bool {
        self.latched
    }

    /// Consecutive below-threshold ticks since the last smoky reading.
    pub fn clear_streak(&self) -> u32 {
        self.clear_streak
    }
}
