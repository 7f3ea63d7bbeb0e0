//! End-to-end scenarios through AppService with mock hardware.

use crate::mock_hw::{Rig, SirenOutput};

use roomctl::fsm::Mode;
use roomctl::fsm::context::{Alert, HvacMode, Notice};

#[test]
fn evening_arm_intrusion_timeout_disarm() {
    let mut rig = Rig::new();
    assert_eq!(rig.app.mode(), Mode::Normal);

    // Cold room: heat, fan off.
    rig.hw.snapshot.temperature_c = 19.0;
    rig.tick();
    assert_eq!(rig.hw.hvac, HvacMode::Heat);
    assert_eq!(rig.hw.fan, 0);

    // Comfortable: relays off, gentle circulation.
    rig.hw.snapshot.temperature_c = 23.0;
    rig.tick();
    assert_eq!(rig.hw.hvac, HvacMode::Off);
    assert_eq!(rig.hw.fan, 77);

    rig.arm();
    assert!(rig.hw.strike);
    assert!(rig.sink.has_notice(Notice::Armed));

    rig.hw.snapshot.door_open = true;
    rig.tick();
    let alarm_at = rig.now();
    assert_eq!(rig.app.mode(), Mode::Alarm);
    assert_eq!(rig.hw.siren, SirenOutput::Steady);
    assert!(rig.hw.strike);
    assert_eq!(rig.hw.alerts_of(Alert::Intrusion), 1);
    assert_eq!(rig.hw.alert_lines[0], "ALERT:INTRUSION DETECTED\r\n");
    rig.hw.snapshot.door_open = false;

    // Exactly the siren duration: still sounding.
    rig.step(30_000);
    assert_eq!(rig.now() - alarm_at, 30_000);
    assert_eq!(rig.hw.siren, SirenOutput::Steady);

    rig.step(1);
    assert_eq!(rig.hw.siren, SirenOutput::Off);
    assert_eq!(rig.app.mode(), Mode::Alarm);
    assert!(rig.hw.strike);
    assert!(rig.sink.has_notice(Notice::SirenTimeout));

    // Timeout fires once.
    rig.run_ticks(20);
    let timeouts = rig
        .sink
        .notices()
        .into_iter()
        .filter(|n| *n == Notice::SirenTimeout)
        .count();
    assert_eq!(timeouts, 1);

    rig.hw.enter_disarm_code();
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Normal);
    assert!(!rig.hw.strike);
    assert_eq!(rig.hw.siren, SirenOutput::Off);
    assert!(rig.sink.has_notice(Notice::Disarmed { from: Mode::Alarm }));

    assert_eq!(
        rig.sink.mode_changes(),
        vec![
            (Mode::Normal, Mode::Away),
            (Mode::Away, Mode::Alarm),
            (Mode::Alarm, Mode::Normal),
        ]
    );
    // No further alerts after the one intrusion line.
    assert_eq!(rig.hw.alert_lines.len(), 1);
}

#[test]
fn disarm_before_timeout_silences_siren() {
    let mut rig = Rig::new();
    rig.trip_alarm();
    assert_eq!(rig.hw.siren, SirenOutput::Steady);

    rig.run_ticks(10);
    rig.hw.enter_disarm_code();
    rig.tick();
    assert_eq!(rig.app.mode(), Mode::Normal);
    assert_eq!(rig.hw.siren, SirenOutput::Off);
    assert!(!rig.app.state().siren_active);
}

#[test]
fn motion_light_holds_for_full_duration_after_sunset() {
    let mut rig = Rig::new();
    rig.hw.snapshot.after_sunset = true;
    rig.hw.snapshot.motion = true;
    rig.tick();
    assert_eq!(rig.hw.led, 153);

    rig.hw.snapshot.motion = false;
    rig.step(180_000);
    assert_eq!(rig.hw.led, 153);

    rig.step(1);
    assert_eq!(rig.hw.led, 0);
}

#[test]
fn open_door_at_night_lights_strip_in_normal() {
    let mut rig = Rig::new();
    rig.hw.snapshot.after_sunset = true;
    rig.hw.snapshot.door_open = true;
    rig.tick();
    assert_eq!(rig.hw.led, 153);
    assert_eq!(rig.app.mode(), Mode::Normal);
}

#[test]
fn daytime_motion_leaves_lights_off() {
    let mut rig = Rig::new();
    rig.hw.snapshot.motion = true;
    rig.run_ticks(5);
    assert_eq!(rig.hw.led, 0);
}

#[test]
fn cooling_holds_through_dead_band() {
    let mut rig = Rig::new();

    rig.hw.snapshot.temperature_c = 27.0;
    rig.tick();
    assert_eq!(rig.hw.hvac, HvacMode::Cool);
    assert_eq!(rig.hw.fan, 204);

    rig.hw.snapshot.temperature_c = 25.5;
    rig.run_ticks(10);
    assert_eq!(rig.hw.hvac, HvacMode::Cool);
    assert_eq!(rig.hw.fan, 204);

    rig.hw.snapshot.temperature_c = 24.0;
    rig.tick();
    assert_eq!(rig.hw.hvac, HvacMode::Off);
    assert_eq!(rig.hw.fan, 77);

    // Back into the dead band from below: stays off.
    rig.hw.snapshot.temperature_c = 25.5;
    rig.run_ticks(10);
    assert_eq!(rig.hw.hvac, HvacMode::Off);
}

#[test]
fn heating_holds_just_above_heat_on() {
    let mut rig = Rig::new();
    rig.hw.snapshot.temperature_c = 19.0;
    rig.tick();
    rig.hw.snapshot.temperature_c = 20.5;
    rig.run_ticks(10);
    assert_eq!(rig.hw.hvac, HvacMode::Heat);
    assert!(rig.app.state().hvac.heat_on);
}

#[test]
fn away_runs_thermal_but_not_lighting() {
    let mut rig = Rig::new();
    rig.arm();
    rig.hw.snapshot.temperature_c = 27.0;
    rig.hw.snapshot.after_sunset = true;
    rig.tick();
    assert_eq!(rig.hw.hvac, HvacMode::Cool);
    assert_eq!(rig.hw.led, 0);
    assert_eq!(rig.app.mode(), Mode::Away);
}
