//! Shared mutable context threaded through every controller handler.
//!
//! `ControllerContext` is the single struct that mode handlers, the
//! thermal and lighting controllers, and the smoke supervisor read from
//! and write to.  It holds the tick's sensor snapshot, the persistent
//! [`ControllerState`], configuration, and the [`TickOutputs`] buffer
//! that the arbiter drains to the actuator and alert ports once the
//! tick's decisions are complete.  Handlers never perform I/O.

use heapless::Vec;
use log::warn;
use serde::Serialize;

use super::Mode;
use crate::config::ThresholdConfig;
use crate::control::lighting::LightingController;
use crate::control::thermal::ThermalController;

// ---------------------------------------------------------------------------
// Sensor snapshot (read-only to handlers; written once per tick)
// ---------------------------------------------------------------------------

/// A point-in-time snapshot of every input.  Sampled once at the start of
/// each tick so no handler can observe a mix of stale and fresh data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// PIR motion detected.
    pub motion: bool,
    /// Door reed switch open (active-low wiring already resolved).
    pub door_open: bool,
    /// Room temperature (°C).
    pub temperature_c: f32,
    /// Raw smoke sensor ADC value (10-bit).
    pub smoke_raw: u16,
    /// Relative humidity (%).  Reported in telemetry only.
    pub humidity_pct: f32,
    /// Local time is between sunset and sunrise.
    pub after_sunset: bool,
    /// An arm request arrived since the previous tick.
    pub arm_requested: bool,
    /// A correct disarm code arrived since the previous tick.
    pub disarm_code_valid: bool,
}

impl Default for SensorSnapshot {
    fn default() -> Self {
        Self {
            motion: false,
            door_open: false,
            temperature_c: 22.0,
            smoke_raw: 0,
            humidity_pct: 0.0,
            after_sunset: false,
            arm_requested: false,
            disarm_code_valid: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller state (persists across ticks)
// ---------------------------------------------------------------------------

/// HVAC relay command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HvacMode {
    Off,
    Heat,
    Cool,
}

/// Heat/cool demand.  At most one of the two is ever set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct HvacState {
    pub heat_on: bool,
    pub cool_on: bool,
}

impl HvacState {
    pub fn mode(self) -> HvacMode {
        match (self.heat_on, self.cool_on) {
            (true, _) => HvacMode::Heat,
            (false, true) => HvacMode::Cool,
            (false, false) => HvacMode::Off,
        }
    }
}

/// Every output level and timer the controller owns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ControllerState {
    /// Security mode.  Frozen while the smoke override is active.
    pub mode: Mode,
    /// Smoke override latched.
    pub smoke_active: bool,
    pub hvac: HvacState,
    pub fan_duty: u8,
    pub led_duty: u8,
    pub strike_engaged: bool,
    pub siren_active: bool,
    /// Last lighting trigger (monotonic ms).
    pub light_timer_start_ms: u64,
    /// Siren start (monotonic ms).  Meaningful only while `siren_active`.
    pub siren_timer_start_ms: u64,
    /// Last time the thermal controller entered heating or cooling.
    pub last_temp_change_ms: u64,
}

impl Default for ControllerState {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            smoke_active: false,
            hvac: HvacState::default(),
            fan_duty: 0,
            led_duty: 0,
            strike_engaged: false,
            siren_active: false,
            light_timer_start_ms: 0,
            siren_timer_start_ms: 0,
            last_temp_change_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Tick outputs (written by handlers; drained by the arbiter)
// ---------------------------------------------------------------------------

/// A single actuator write requested by the control logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorCommand {
    Hvac(HvacMode),
    FanDuty(u8),
    LedDuty(u8),
    Strike(bool),
    Siren(bool),
    /// Start the distinct fire-alarm siren cadence.  Cancelled by the
    /// next `Siren` command.
    SmokePattern,
}

/// Alert lines sent to the remote bridge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alert {
    Intrusion,
    FireSmoke,
}

impl Alert {
    /// Payload after the `ALERT:` prefix.
    pub fn message(self) -> &'static str {
        match self {
            Self::Intrusion => "INTRUSION DETECTED",
            Self::FireSmoke => "FIRE/SMOKE EMERGENCY",
        }
    }
}

/// Loggable controller occurrences, forwarded to the event sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notice {
    Armed,
    IntrusionDetected,
    Disarmed { from: Mode },
    SirenTimeout,
    SmokeDetected,
    SmokeStillActive,
    SmokeCleared,
    SmokeResetRejected { clear_ticks: u32 },
}

pub const MAX_COMMANDS_PER_TICK: usize = 16;
pub const MAX_ALERTS_PER_TICK: usize = 2;
pub const MAX_NOTICES_PER_TICK: usize = 4;

/// Everything one tick decided to do, in order.
#[derive(Debug, Default)]
pub struct TickOutputs {
    pub commands: Vec<ActuatorCommand, MAX_COMMANDS_PER_TICK>,
    pub alerts: Vec<Alert, MAX_ALERTS_PER_TICK>,
    pub notices: Vec<Notice, MAX_NOTICES_PER_TICK>,
}

impl TickOutputs {
    pub fn command(&mut self, cmd: ActuatorCommand) {
        if self.commands.push(cmd).is_err() {
            warn!("tick command buffer full, dropped {:?}", cmd);
        }
    }

    pub fn alert(&mut self, alert: Alert) {
        if self.alerts.push(alert).is_err() {
            warn!("tick alert buffer full, dropped {:?}", alert);
        }
    }

    pub fn notice(&mut self, notice: Notice) {
        if self.notices.push(notice).is_err() {
            warn!("tick notice buffer full, dropped {:?}", notice);
        }
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.alerts.clear();
        self.notices.clear();
    }
}

// ---------------------------------------------------------------------------
// ControllerContext
// ---------------------------------------------------------------------------

/// The shared context passed to every handler.
pub struct ControllerContext {
    // -- Timing --
    /// Monotonic time of the current tick (ms).
    pub now_ms: u64,
    /// Monotonic total tick count.
    pub total_ticks: u64,

    /// Latest sensor readings.  Replaced at the start of each tick.
    pub sensors: SensorSnapshot,
    pub state: ControllerState,
    pub outputs: TickOutputs,

    pub thermal: ThermalController,
    pub lighting: LightingController,
    pub config: ThresholdConfig,
}

impl ControllerContext {
    /// Create a context in its power-on state: NORMAL, every output off,
    /// comfortable temperature assumed.
    pub fn new(config: ThresholdConfig) -> Self {
        let sensors = SensorSnapshot {
            temperature_c: config.initial_temperature_c,
            ..SensorSnapshot::default()
        };
        Self {
            now_ms: 0,
            total_ticks: 0,
            sensors,
            state: ControllerState::default(),
            outputs: TickOutputs::default(),
            thermal: ThermalController::new(&config),
            lighting: LightingController::new(&config),
            config,
        }
    }

    /// Run the thermal controller against this tick's temperature.
    pub fn run_thermal(&mut self) {
        self.thermal.update(
            self.sensors.temperature_c,
            self.now_ms,
            &mut self.state,
            &mut self.outputs,
        );
    }

    /// Run the lighting controller against this tick's presence inputs.
    pub fn run_lighting(&mut self) {
        self.lighting
            .update(&self.sensors, self.now_ms, &mut self.state, &mut self.outputs);
    }

    /// Milliseconds since `since_ms`, saturating at zero.
    pub fn elapsed_since(&self, since_ms: u64) -> u64 {
        self.now_ms.saturating_sub(since_ms)
    }
}
