//! Five-band hysteresis controller for HVAC relays and the fan.
//!
//! ```text
//!   heating │ dead │  comfort  │ dead │ cooling
//! ──────────┼──────┼───────────┼──────┼──────────▶ °C
//!        heat_on heat_off   comfort   cool_off  cool_on
//!                =comfort_low  _high
//! ```
//!
//! Bands are evaluated in that order and the first match wins.  In a dead
//! band nothing changes, so whichever of heat/cool was last active is
//! held until the temperature clearly reaches the comfort band or the
//! opposite extreme.  With the stock thresholds the heating dead band
//! has zero width.
//!
//! Entering heating or cooling is edge-triggered; the comfort band
//! re-issues `Off` every tick.  NaN matches no band and changes nothing.

use crate::config::ThresholdConfig;
use crate::fsm::context::{ActuatorCommand, ControllerState, HvacMode, TickOutputs};

/// Which band a temperature falls in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThermalBand {
    Heating,
    HeatDeadBand,
    Comfort,
    CoolDeadBand,
    Cooling,
}

#[derive(Debug, Clone)]
pub struct ThermalController {
    heat_on_c: f32,
    heat_off_c: f32,
    comfort_low_c: f32,
    comfort_high_c: f32,
    cool_off_c: f32,
    cool_on_c: f32,
    fan_comfort_duty: u8,
    fan_cool_duty: u8,
}

impl ThermalController {
    pub fn new(config: &ThresholdConfig) -> Self {
        Self {
            heat_on_c: config.heat_on_c,
            heat_off_c: config.heat_off_c,
            comfort_low_c: config.comfort_low_c,
            comfort_high_c: config.comfort_high_c,
            cool_off_c: config.cool_off_c,
            cool_on_c: config.cool_on_c,
            fan_comfort_duty: config.fan_comfort_duty,
            fan_cool_duty: config.fan_cool_duty,
        }
    }

    /// Classify a temperature.  `None` for NaN or a gap between bands left
    /// by a non-default configuration.
    pub fn classify(&self, t: f32) -> Option<ThermalBand> {
        if t <= self.heat_on_c {
            Some(ThermalBand::Heating)
        } else if t >= self.heat_off_c && t < self.comfort_low_c {
            Some(ThermalBand::HeatDeadBand)
        } else if t >= self.comfort_low_c && t <= self.comfort_high_c {
            Some(ThermalBand::Comfort)
        } else if t > self.cool_off_c && t < self.cool_on_c {
            Some(ThermalBand::CoolDeadBand)
        } else if t >= self.cool_on_c {
            Some(ThermalBand::Cooling)
        } else {
            None
        }
    }

    /// Apply one control step for temperature `t`.
    pub fn update(
        &self,
        t: f32,
        now_ms: u64,
        state: &mut ControllerState,
        out: &mut TickOutputs,
    ) {
        match self.classify(t) {
            Some(ThermalBand::Heating) => {
                if !state.hvac.heat_on {
                    state.hvac.heat_on = true;
                    state.hvac.cool_on = false;
                    state.fan_duty = 0;
                    state.last_temp_change_ms = now_ms;
                    out.command(ActuatorCommand::Hvac(HvacMode::Heat));
                    out.command(ActuatorCommand::FanDuty(0));
                    log::info!("thermal: {t:.1}\u{00b0}C, heating on");
                }
            }
            Some(ThermalBand::Comfort) => {
                state.hvac.heat_on = false;
                state.hvac.cool_on = false;
                state.fan_duty = self.fan_comfort_duty;
                out.command(ActuatorCommand::Hvac(HvacMode::Off));
                out.command(ActuatorCommand::FanDuty(self.fan_comfort_duty));
            }
            Some(ThermalBand::Cooling) => {
                if !state.hvac.cool_on {
                    state.hvac.heat_on = false;
                    state.hvac.cool_on = true;
                    state.fan_duty = self.fan_cool_duty;
                    state.last_temp_change_ms = now_ms;
                    out.command(ActuatorCommand::Hvac(HvacMode::Cool));
                    out.command(ActuatorCommand::FanDuty(self.fan_cool_duty));
                    log::info!("thermal: {t:.1}\u{00b0}C, cooling on");
                }
            }
            Some(ThermalBand::HeatDeadBand | ThermalBand::CoolDeadBand) | None => {}
        }
    }
}
