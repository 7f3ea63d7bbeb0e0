//! Application service: the hexagonal core.
//!
//! [`AppService`] owns the FSM, the smoke supervisor and the shared
//! context.  It exposes a clean, hardware-agnostic API.  All I/O flows
//! through port traits injected at call sites, making the entire service
//! testable with mock adapters.
//!
//! ```text
//!  SensorPort ──▶ ┌─────────────────────────┐ ──▶ EventSink
//!                 │       AppService        │
//! ActuatorPort ◀──│  Smoke · FSM · Thermal  │
//!    AlertPort ◀──│         Lighting        │
//!                 └─────────────────────────┘
//! ```
//!
//! One tick: sample once, let the smoke supervisor pre-empt or dispatch
//! exactly one mode handler, then drain the tick's outputs to the ports.

use log::{info, warn};

use crate::config::ThresholdConfig;
use crate::error::ConfigError;
use crate::fsm::context::{ActuatorCommand, ControllerContext, ControllerState};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, Mode};
use crate::safety::{ResetOutcome, SmokeOverride};

use super::commands::AppCommand;
use super::events::{AppEvent, TelemetryData};
use super::ports::{ActuatorPort, AlertPort, EventSink, SensorPort};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

/// The application service orchestrates all domain logic.
pub struct AppService {
    fsm: Fsm,
    ctx: ControllerContext,
    smoke: SmokeOverride,
    /// Remote arm request waiting for the next tick.
    arm_pending: bool,
    last_telemetry_ms: u64,
}

impl AppService {
    /// Construct the service from configuration.
    ///
    /// Does **not** start the FSM; call [`start`](Self::start) next.
    pub fn new(config: ThresholdConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let smoke = SmokeOverride::new(&config);
        let ctx = ControllerContext::new(config);
        let fsm = Fsm::new(build_state_table());

        Ok(Self {
            fsm,
            ctx,
            smoke,
            arm_pending: false,
            last_telemetry_ms: 0,
        })
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive every output to its power-on level and enter NORMAL.
    pub fn start(
        &mut self,
        hw: &mut (impl ActuatorPort + AlertPort),
        sink: &mut impl EventSink,
    ) {
        hw.all_off();
        self.ctx.outputs.clear();
        self.fsm.start(&mut self.ctx);
        self.flush(hw, sink);
        sink.emit(&AppEvent::Started(self.ctx.state.mode));
        info!("AppService started in {}", self.ctx.state.mode.name());
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one full control cycle: read sensors → smoke → FSM → actuators.
    ///
    /// The `hw` parameter satisfies every hardware port at once; this
    /// avoids a double mutable borrow while keeping the port boundary
    /// explicit.
    pub fn tick(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SensorPort + ActuatorPort + AlertPort),
        sink: &mut impl EventSink,
    ) {
        self.ctx.outputs.clear();
        self.ctx.now_ms = now_ms;
        self.ctx.total_ticks += 1;
        let prev_mode = self.ctx.state.mode;

        // 1. Sample once
        let mut snapshot = hw.read_all();
        snapshot.arm_requested |= core::mem::take(&mut self.arm_pending);
        self.ctx.sensors = snapshot;

        // 2. Smoke pre-empts everything, otherwise exactly one mode handler
        if self.smoke.evaluate(&mut self.ctx) {
            self.smoke.apply(&mut self.ctx);
        } else {
            self.fsm.tick(&mut self.ctx);
        }

        // 3. Apply outputs
        self.flush(hw, sink);

        let new_mode = self.ctx.state.mode;
        if new_mode != prev_mode {
            sink.emit(&AppEvent::ModeChanged {
                from: prev_mode,
                to: new_mode,
            });
        }

        if now_ms.saturating_sub(self.last_telemetry_ms) >= self.ctx.config.telemetry_interval_ms {
            self.last_telemetry_ms = now_ms;
            sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
        }
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an external command (panel button, serial console, bridge).
    pub fn handle_command(
        &mut self,
        cmd: AppCommand,
        hw: &mut (impl ActuatorPort + AlertPort),
        sink: &mut impl EventSink,
    ) {
        match cmd {
            AppCommand::ResetSmoke => {
                self.ctx.outputs.clear();
                match self.smoke.request_reset(&mut self.ctx) {
                    ResetOutcome::NotActive => info!("smoke reset ignored: override not active"),
                    ResetOutcome::Cleared | ResetOutcome::StillSmoky { .. } => {}
                }
                self.flush(hw, sink);
            }
            AppCommand::Arm => {
                if self.ctx.state.mode == Mode::Normal {
                    info!("remote arm request queued");
                    self.arm_pending = true;
                } else {
                    warn!("arm ignored in {}", self.ctx.state.mode.name());
                }
            }
            AppCommand::RequestTelemetry => {
                sink.emit(&AppEvent::Telemetry(self.build_telemetry()));
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Build a telemetry snapshot from the current context.
    pub fn build_telemetry(&self) -> TelemetryData {
        let s = &self.ctx.state;
        TelemetryData {
            uptime_ms: self.ctx.now_ms,
            ticks: self.ctx.total_ticks,
            mode: s.mode,
            smoke_active: s.smoke_active,
            temperature_c: self.ctx.sensors.temperature_c,
            humidity_pct: self.ctx.sensors.humidity_pct,
            smoke_raw: self.ctx.sensors.smoke_raw,
            hvac: s.hvac.mode(),
            fan_duty: s.fan_duty,
            led_duty: s.led_duty,
            strike_engaged: s.strike_engaged,
            siren_active: s.siren_active,
        }
    }

    /// Current security mode.
    pub fn mode(&self) -> Mode {
        self.ctx.state.mode
    }

    /// Every output level and timer.
    pub fn state(&self) -> &ControllerState {
        &self.ctx.state
    }

    pub fn is_smoke_active(&self) -> bool {
        self.smoke.is_active()
    }

    // ── Internal ──────────────────────────────────────────────

    /// Drain the tick's outputs: actuator writes in decision order, then
    /// alerts, then notices.
    fn flush(&mut self, hw: &mut (impl ActuatorPort + AlertPort), sink: &mut impl EventSink) {
        for cmd in &self.ctx.outputs.commands {
            match *cmd {
                ActuatorCommand::Hvac(mode) => hw.set_hvac(mode),
                ActuatorCommand::FanDuty(duty) => hw.set_fan_duty(duty),
                ActuatorCommand::LedDuty(duty) => hw.set_led_duty(duty),
                ActuatorCommand::Strike(engaged) => hw.set_strike(engaged),
                ActuatorCommand::Siren(on) => hw.set_siren(on),
                ActuatorCommand::SmokePattern => hw.start_smoke_pattern(),
            }
        }

        for &alert in &self.ctx.outputs.alerts {
            if let Err(error) = hw.send_alert(alert) {
                warn!("alert '{}' not sent: {}", alert.message(), error);
                sink.emit(&AppEvent::AlertFailed { alert, error });
            }
        }

        for &notice in &self.ctx.outputs.notices {
            sink.emit(&AppEvent::Notice(notice));
        }

        self.ctx.outputs.clear();
    }
}
