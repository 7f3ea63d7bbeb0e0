//! Mock hardware adapter for integration tests.
//!
//! Records every actuator call and alert line so tests can assert on the
//! full command history without touching real GPIO/PWM registers, and
//! lets tests script the sensor snapshot tick by tick.

#![allow(dead_code)]

use std::cell::Cell;

use roomctl::adapters::uart::format_alert;
use roomctl::app::events::AppEvent;
use roomctl::app::ports::{ActuatorPort, AlertPort, Clock, EventSink, SensorPort};
use roomctl::error::CommsError;
use roomctl::fsm::Mode;
use roomctl::fsm::context::{Alert, HvacMode, Notice, SensorSnapshot};

// ── Actuator call record ──────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCall {
    Hvac(HvacMode),
    Fan(u8),
    Led(u8),
    Strike(bool),
    Siren(bool),
    SmokePattern,
    AllOff,
}

/// Siren as the driver would see it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SirenOutput {
    Off,
    Steady,
    SmokePattern,
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    /// Snapshot returned by every read.  Edge inputs are queued separately.
    pub snapshot: SensorSnapshot,
    arm_queued: bool,
    disarm_queued: bool,

    pub calls: Vec<ActuatorCall>,
    pub alert_lines: Vec<String>,
    pub fail_alerts: bool,

    pub hvac: HvacMode,
    pub fan: u8,
    pub led: u8,
    pub strike: bool,
    pub siren: SirenOutput,
}

impl MockHardware {
    pub fn new() -> Self {
        Self {
            snapshot: SensorSnapshot::default(),
            arm_queued: false,
            disarm_queued: false,
            calls: Vec::new(),
            alert_lines: Vec::new(),
            fail_alerts: false,
            hvac: HvacMode::Off,
            fan: 0,
            led: 0,
            strike: false,
            siren: SirenOutput::Off,
        }
    }

    /// Report an arm request in the next snapshot only.
    pub fn press_arm(&mut self) {
        self.arm_queued = true;
    }

    /// Report a valid disarm code in the next snapshot only.
    pub fn enter_disarm_code(&mut self) {
        self.disarm_queued = true;
    }

    pub fn alerts_of(&self, alert: Alert) -> usize {
        let line = format_alert(alert).unwrap();
        self.alert_lines.iter().filter(|l| l.as_str() == line.as_str()).count()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorPort for MockHardware {
    fn read_all(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            arm_requested: std::mem::take(&mut self.arm_queued),
            disarm_code_valid: std::mem::take(&mut self.disarm_queued),
            ..self.snapshot
        }
    }
}

impl ActuatorPort for MockHardware {
    fn set_hvac(&mut self, mode: HvacMode) {
        self.calls.push(ActuatorCall::Hvac(mode));
        self.hvac = mode;
    }

    fn set_fan_duty(&mut self, duty: u8) {
        self.calls.push(ActuatorCall::Fan(duty));
        self.fan = duty;
    }

    fn set_led_duty(&mut self, duty: u8) {
        self.calls.push(ActuatorCall::Led(duty));
        self.led = duty;
    }

    fn set_strike(&mut self, engaged: bool) {
        self.calls.push(ActuatorCall::Strike(engaged));
        self.strike = engaged;
    }

    fn set_siren(&mut self, on: bool) {
        self.calls.push(ActuatorCall::Siren(on));
        self.siren = if on { SirenOutput::Steady } else { SirenOutput::Off };
    }

    fn start_smoke_pattern(&mut self) {
        self.calls.push(ActuatorCall::SmokePattern);
        self.siren = SirenOutput::SmokePattern;
    }

    fn all_off(&mut self) {
        self.calls.push(ActuatorCall::AllOff);
        self.hvac = HvacMode::Off;
        self.fan = 0;
        self.led = 0;
        self.strike = false;
        self.siren = SirenOutput::Off;
    }
}

impl AlertPort for MockHardware {
    fn send_alert(&mut self, alert: Alert) -> Result<(), CommsError> {
        if self.fail_alerts {
            return Err(CommsError::UartWriteFailed);
        }
        let line = format_alert(alert)?;
        self.alert_lines.push(line.as_str().to_owned());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Notice(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    pub fn has_notice(&self, notice: Notice) -> bool {
        self.notices().contains(&notice)
    }

    pub fn mode_changes(&self) -> Vec<(Mode, Mode)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::ModeChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn telemetry_count(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, AppEvent::Telemetry(_)))
            .count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Manually advanced clock; starts at zero.
#[derive(Default)]
pub struct FakeClock {
    now: Cell<u64>,
    pub hour: Option<u8>,
}

impl FakeClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, ms: u64) -> u64 {
        self.now.set(self.now.get() + ms);
        self.now.get()
    }
}

impl Clock for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn current_hour(&self) -> Option<u8> {
        self.hour
    }
}

// ── Rig: service + mocks on a 50 ms tick ──────────────────────

pub const TICK_MS: u64 = 50;

pub struct Rig {
    pub app: roomctl::app::service::AppService,
    pub hw: MockHardware,
    pub sink: RecordingSink,
    pub clock: FakeClock,
}

impl Rig {
    pub fn new() -> Self {
        Self::with_config(roomctl::config::ThresholdConfig::default())
    }

    pub fn with_config(config: roomctl::config::ThresholdConfig) -> Self {
        let mut app = roomctl::app::service::AppService::new(config).unwrap();
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink);
        Self {
            app,
            hw,
            sink,
            clock: FakeClock::new(),
        }
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Advance one loop period and run a tick.
    pub fn tick(&mut self) {
        self.step(TICK_MS);
    }

    /// Advance `ms` and run a single tick.
    pub fn step(&mut self, ms: u64) {
        let now = self.clock.advance(ms);
        self.app.tick(now, &mut self.hw, &mut self.sink);
    }

    pub fn run_ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }

    pub fn command(&mut self, cmd: roomctl::app::commands::AppCommand) {
        self.app.handle_command(cmd, &mut self.hw, &mut self.sink);
    }

    /// Drive NORMAL → AWAY via the arm input.
    pub fn arm(&mut self) {
        self.hw.press_arm();
        self.tick();
        assert_eq!(self.app.mode(), Mode::Away);
    }

    /// Drive NORMAL → AWAY → ALARM via a door opening.
    pub fn trip_alarm(&mut self) {
        self.arm();
        self.hw.snapshot.door_open = true;
        self.tick();
        self.hw.snapshot.door_open = false;
        assert_eq!(self.app.mode(), Mode::Alarm);
    }
}

impl Default for Rig {
    fn default() -> Self {
        Self::new()
    }
}
