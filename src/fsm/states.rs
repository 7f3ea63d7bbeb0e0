//! Mode handlers and table builder.
//!
//! ```text
//!  NORMAL ──[arm]──▶ AWAY ──[door | motion]──▶ ALARM
//!    ▲                 │                         │
//!    └────[disarm]─────┘                         │
//!    └──────────────────────[disarm]─────────────┘
//!
//!  ALARM: siren silences after siren_duration, mode and lock persist.
//! ```
//!
//! NORMAL runs thermal and lighting.  AWAY runs thermal only and leaves
//! the LED strip at whatever level it had.  ALARM suspends both.

use super::context::{ActuatorCommand, Alert, ControllerContext, Notice};
use super::{Mode, StateDescriptor};
use log::{info, warn};

/// Build the state table.  Called once at startup.
pub fn build_state_table() -> [StateDescriptor; Mode::COUNT] {
    [
        StateDescriptor {
            mode: Mode::Normal,
            on_enter: Some(normal_enter),
            on_exit: None,
            on_update: normal_update,
        },
        StateDescriptor {
            mode: Mode::Away,
            on_enter: Some(away_enter),
            on_exit: None,
            on_update: away_update,
        },
        StateDescriptor {
            mode: Mode::Alarm,
            on_enter: Some(alarm_enter),
            on_exit: Some(alarm_exit),
            on_update: alarm_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  NORMAL
// ═══════════════════════════════════════════════════════════════════════════

fn normal_enter(ctx: &mut ControllerContext) {
    ctx.state.strike_engaged = false;
    ctx.outputs.command(ActuatorCommand::Strike(false));
    info!("NORMAL: strike released");
}

fn normal_update(ctx: &mut ControllerContext) -> Option<Mode> {
    ctx.run_thermal();
    ctx.run_lighting();

    if ctx.sensors.arm_requested {
        ctx.outputs.notice(Notice::Armed);
        return Some(Mode::Away);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  AWAY: armed, watching door and motion
// ═══════════════════════════════════════════════════════════════════════════

fn away_enter(ctx: &mut ControllerContext) {
    ctx.state.strike_engaged = true;
    ctx.outputs.command(ActuatorCommand::Strike(true));
    info!("AWAY: system armed, strike engaged");
}

fn away_update(ctx: &mut ControllerContext) -> Option<Mode> {
    ctx.run_thermal();

    // A valid code wins over a same-tick intrusion: whoever typed it is
    // the one opening the door.
    if ctx.sensors.disarm_code_valid {
        ctx.outputs.notice(Notice::Disarmed { from: Mode::Away });
        return Some(Mode::Normal);
    }

    if ctx.sensors.door_open || ctx.sensors.motion {
        warn!(
            "AWAY: intrusion (door_open={}, motion={})",
            ctx.sensors.door_open, ctx.sensors.motion
        );
        ctx.outputs.notice(Notice::IntrusionDetected);
        return Some(Mode::Alarm);
    }

    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  ALARM: siren for siren_duration, lock held until disarm
// ═══════════════════════════════════════════════════════════════════════════

fn alarm_enter(ctx: &mut ControllerContext) {
    ctx.state.siren_timer_start_ms = ctx.now_ms;
    ctx.state.siren_active = true;
    ctx.state.strike_engaged = true;
    ctx.outputs.command(ActuatorCommand::Strike(true));
    ctx.outputs.command(ActuatorCommand::Siren(true));
    ctx.outputs.alert(Alert::Intrusion);
}

fn alarm_exit(ctx: &mut ControllerContext) {
    ctx.state.siren_active = false;
    ctx.outputs.command(ActuatorCommand::Siren(false));
}

fn alarm_update(ctx: &mut ControllerContext) -> Option<Mode> {
    ctx.state.strike_engaged = true;
    ctx.outputs.command(ActuatorCommand::Strike(true));

    if ctx.state.siren_active
        && ctx.elapsed_since(ctx.state.siren_timer_start_ms) > ctx.config.siren_duration_ms
    {
        ctx.state.siren_active = false;
        ctx.outputs.command(ActuatorCommand::Siren(false));
        ctx.outputs.notice(Notice::SirenTimeout);
        info!("ALARM: siren timeout, holding alarm state");
    }

    if ctx.sensors.disarm_code_valid {
        ctx.outputs.notice(Notice::Disarmed { from: Mode::Alarm });
        return Some(Mode::Normal);
    }

    None
}
