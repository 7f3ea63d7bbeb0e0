//! Arbitration between the smoke override, the security FSM, and
//! external commands.

use crate::mock_hw::{Rig, SirenOutput};

use roomctl::app::commands::AppCommand;
use roomctl::app::events::AppEvent;
use roomctl::error::CommsError;
use roomctl::fsm::Mode;
use roomctl::fsm::context::{Alert, HvacMode, Notice};

const SMOKY: u16 = 400;

fn assert_fire_safe(rig: &Rig) {
    assert!(rig.app.is_smoke_active());
    assert!(rig.app.state().smoke_active);
    assert_eq!(rig.hw.hvac, HvacMode::Off);
    assert_eq!(rig.hw.fan, 0);
    assert_eq!(rig.hw.led, 255);
    assert!(!rig.hw.strike, "door must be free to open");
    assert_eq!(rig.hw.siren, SirenOutput::SmokePattern);
}

// ── Smoke pre-emption ─────────────────────────────────────────

#[test]
fn smoke_preempts_normal_without_changing_mode() {
    let mut rig = Rig::new();
    rig.hw.snapshot.temperature_c = 27.0;
    rig.tick();
    assert_eq!(rig.hw.hvac, HvacMode::Cool);

    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();
    assert_fire_safe(&rig);
    assert_eq!(rig.app.mode(), Mode::Normal);
    assert_eq!(rig.hw.alerts_of(Alert::FireSmoke), 1);
    assert_eq!(rig.hw.alert_lines[0], "ALERT:FIRE/SMOKE EMERGENCY\r\n");
    assert!(rig.sink.has_notice(Notice::SmokeDetected));
}

#[test]
fn smoke_preempts_away_and_suppresses_intrusion() {
    let mut rig = Rig::new();
    rig.arm();
    assert!(rig.hw.strike);

    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.hw.snapshot.door_open = true;
    rig.hw.snapshot.motion = true;
    rig.run_ticks(20);

    assert_fire_safe(&rig);
    assert_eq!(rig.app.mode(), Mode::Away);
    assert_eq!(rig.hw.alerts_of(Alert::Intrusion), 0);
}

#[test]
fn smoke_preempts_alarm() {
    let mut rig = Rig::new();
    rig.trip_alarm();
    assert_eq!(rig.hw.siren, SirenOutput::Steady);

    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();
    assert_fire_safe(&rig);
    assert_eq!(rig.app.mode(), Mode::Alarm);
}

#[test]
fn threshold_is_inclusive() {
    let mut rig = Rig::new();
    rig.hw.snapshot.smoke_raw = 327;
    rig.run_ticks(3);
    assert!(!rig.app.is_smoke_active());

    rig.hw.snapshot.smoke_raw = 328;
    rig.tick();
    assert!(rig.app.is_smoke_active());
}

#[test]
fn disarm_is_ignored_during_smoke() {
    let mut rig = Rig::new();
    rig.arm();
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();

    rig.hw.enter_disarm_code();
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Away);
}

#[test]
fn smoke_alert_repeats_on_interval() {
    let mut rig = Rig::new();
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();
    assert_eq!(rig.hw.alerts_of(Alert::FireSmoke), 1);

    // 10 s at 50 ms is 200 ticks; the 200th lands exactly on the interval.
    rig.run_ticks(199);
    assert_eq!(rig.hw.alerts_of(Alert::FireSmoke), 1);
    rig.tick();
    assert_eq!(rig.hw.alerts_of(Alert::FireSmoke), 2);
    assert!(rig.sink.has_notice(Notice::SmokeStillActive));
}

#[test]
fn override_does_not_clear_on_its_own() {
    let mut rig = Rig::new();
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();
    rig.hw.snapshot.smoke_raw = 0;
    rig.run_ticks(1_000);
    assert_fire_safe(&rig);
}

// ── Smoke reset ───────────────────────────────────────────────

#[test]
fn reset_requires_sustained_clear_readings() {
    let mut rig = Rig::new();
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();

    rig.command(AppCommand::ResetSmoke);
    assert!(rig.app.is_smoke_active());
    assert!(rig.sink.has_notice(Notice::SmokeResetRejected { clear_ticks: 0 }));

    rig.hw.snapshot.smoke_raw = 0;
    rig.run_ticks(99);
    rig.command(AppCommand::ResetSmoke);
    assert!(rig.app.is_smoke_active());
    assert!(rig.sink.has_notice(Notice::SmokeResetRejected { clear_ticks: 99 }));

    rig.tick();
    rig.command(AppCommand::ResetSmoke);
    assert!(!rig.app.is_smoke_active());
    assert!(!rig.app.state().smoke_active);
    assert!(rig.sink.has_notice(Notice::SmokeCleared));
    assert_eq!(rig.hw.siren, SirenOutput::Off);
}

#[test]
fn smoky_reading_restarts_clear_streak() {
    let mut rig = Rig::new();
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();

    rig.hw.snapshot.smoke_raw = 0;
    rig.run_ticks(150);
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();
    rig.hw.snapshot.smoke_raw = 0;
    rig.run_ticks(50);

    rig.command(AppCommand::ResetSmoke);
    assert!(rig.app.is_smoke_active());
    assert!(rig.sink.has_notice(Notice::SmokeResetRejected { clear_ticks: 50 }));
}

#[test]
fn clearing_resumes_previous_mode_outputs() {
    let mut rig = Rig::new();
    rig.arm();
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();
    assert!(!rig.hw.strike);

    rig.hw.snapshot.smoke_raw = 0;
    rig.run_ticks(100);
    rig.command(AppCommand::ResetSmoke);

    assert_eq!(rig.app.mode(), Mode::Away);
    assert!(rig.hw.strike, "strike re-engaged for AWAY");
    assert_eq!(rig.hw.siren, SirenOutput::Off);

    // The FSM is back in charge: an intrusion now trips the alarm.
    rig.hw.snapshot.motion = true;
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Alarm);
}

#[test]
fn clearing_in_alarm_restores_steady_siren() {
    let mut rig = Rig::new();
    rig.trip_alarm();
    rig.hw.snapshot.smoke_raw = SMOKY;
    rig.tick();

    rig.hw.snapshot.smoke_raw = 0;
    rig.run_ticks(100);
    rig.command(AppCommand::ResetSmoke);

    assert_eq!(rig.app.mode(), Mode::Alarm);
    assert_eq!(rig.hw.siren, SirenOutput::Steady);
    assert!(rig.hw.strike);
}

#[test]
fn reset_without_smoke_is_a_no_op() {
    let mut rig = Rig::new();
    rig.tick();
    rig.sink.clear();
    let calls_before = rig.hw.calls.len();

    rig.command(AppCommand::ResetSmoke);
    assert!(rig.sink.notices().is_empty());
    assert_eq!(rig.hw.calls.len(), calls_before);
}

// ── Security edges ────────────────────────────────────────────

#[test]
fn disarm_wins_over_same_tick_intrusion() {
    let mut rig = Rig::new();
    rig.arm();
    rig.hw.snapshot.door_open = true;
    rig.hw.enter_disarm_code();
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Normal);
    assert!(rig.hw.alert_lines.is_empty());
}

#[test]
fn disarm_in_normal_does_nothing() {
    let mut rig = Rig::new();
    rig.hw.enter_disarm_code();
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Normal);
    assert!(rig.sink.mode_changes().is_empty());
}

#[test]
fn arm_input_ignored_outside_normal() {
    let mut rig = Rig::new();
    rig.trip_alarm();
    rig.hw.press_arm();
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Alarm);
}

#[test]
fn failed_alert_is_reported_and_alarm_still_sounds() {
    let mut rig = Rig::new();
    rig.hw.fail_alerts = true;
    rig.trip_alarm();

    assert_eq!(rig.hw.siren, SirenOutput::Steady);
    let failed = rig.sink.events.iter().any(|e| {
        matches!(
            e,
            AppEvent::AlertFailed {
                alert: Alert::Intrusion,
                error: CommsError::UartWriteFailed
            }
        )
    });
    assert!(failed);
}

// ── Commands ──────────────────────────────────────────────────

#[test]
fn remote_arm_applies_on_next_tick() {
    let mut rig = Rig::new();
    rig.command(AppCommand::Arm);
    assert_eq!(rig.app.mode(), Mode::Normal);
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Away);
    assert!(rig.hw.strike);

    // Only accepted from NORMAL.
    rig.command(AppCommand::Arm);
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Away);
}

#[test]
fn telemetry_on_interval_and_on_request() {
    let mut rig = Rig::new();
    rig.run_ticks(1_199);
    assert_eq!(rig.sink.telemetry_count(), 0);
    rig.tick();
    assert_eq!(rig.now(), 60_000);
    assert_eq!(rig.sink.telemetry_count(), 1);

    rig.arm();
    rig.command(AppCommand::RequestTelemetry);
    assert_eq!(rig.sink.telemetry_count(), 2);
    match rig.sink.events.last() {
        Some(AppEvent::Telemetry(t)) => {
            assert_eq!(t.mode, Mode::Away);
            assert_eq!(t.ticks, 1_201);
            assert!(t.strike_engaged);
            assert_eq!(t.fan_duty, 77);
        }
        other => panic!("expected telemetry, got {other:?}"),
    }
}

#[test]
fn start_drives_power_on_levels() {
    let rig = Rig::new();
    assert_eq!(rig.hw.calls.first(), Some(&crate::mock_hw::ActuatorCall::AllOff));
    assert!(matches!(rig.sink.events.last(), Some(AppEvent::Started(Mode::Normal))));
    assert_eq!(rig.app.build_telemetry().ticks, 0);
}
