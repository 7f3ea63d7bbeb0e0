//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], every actuator driver, the panel button, and
//! the UART link, exposing them through [`SensorPort`], [`ActuatorPort`]
//! and [`AlertPort`].  This is the only module in the system that
//! touches actual hardware.  On non-espidf targets, the underlying
//! drivers use cfg-gated simulation stubs.
//!
//! Actuator writes are fire-and-forget at the port boundary: a failed
//! write is logged here and retried implicitly, since the control core
//! re-issues the same command on the next tick.

use core::fmt::Display;

use log::{info, warn};

use crate::adapters::time::MonotonicClock;
use crate::adapters::uart::UartLink;
use crate::app::ports::{ActuatorPort, AlertPort, Clock, SensorPort};
use crate::drivers::button::{ButtonEvent, PanelButton};
use crate::drivers::hvac::HvacRelays;
use crate::drivers::pwm::PwmOutput;
use crate::drivers::siren::SirenDriver;
use crate::drivers::strike::StrikeDriver;
use crate::error::CommsError;
use crate::fsm::context::{Alert, HvacMode, SensorSnapshot};
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter {
    sensor_hub: SensorHub,
    hvac: HvacRelays,
    fan: PwmOutput,
    led: PwmOutput,
    strike: StrikeDriver,
    siren: SirenDriver,
    button: PanelButton,
    link: UartLink,
    clock: MonotonicClock,
    arm_pending: bool,
    reset_pending: bool,
}

impl HardwareAdapter {
    pub fn new(sensor_hub: SensorHub, button: PanelButton, link: UartLink, clock: MonotonicClock) -> Self {
        Self {
            sensor_hub,
            hvac: HvacRelays::new(),
            fan: PwmOutput::fan(),
            led: PwmOutput::led_strip(),
            strike: StrikeDriver::new(),
            siren: SirenDriver::new(),
            button,
            link,
            clock,
            arm_pending: false,
            reset_pending: false,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    /// Per-tick housekeeping that runs outside the control decision:
    /// advance the siren cadence and sample the panel button.
    ///
    /// A short press queues an arm request for the next snapshot; a long
    /// press queues a smoke reset request for the main loop.
    pub fn service_outputs(&mut self, now_ms: u64) {
        log_failure("siren", self.siren.service(now_ms));

        match self.button.poll(now_ms) {
            Some(ButtonEvent::ShortPress) => {
                info!("button: arm requested");
                self.arm_pending = true;
            }
            Some(ButtonEvent::LongPress) => {
                info!("button: smoke reset requested");
                self.reset_pending = true;
            }
            None => {}
        }
    }

    /// Consume a pending smoke reset request from the panel button.
    pub fn take_reset_request(&mut self) -> bool {
        core::mem::take(&mut self.reset_pending)
    }

    pub fn hvac_mode(&self) -> HvacMode {
        self.hvac.mode()
    }

    pub fn siren(&self) -> &SirenDriver {
        &self.siren
    }
}

fn log_failure<E: Display>(what: &str, result: Result<(), E>) {
    if let Err(e) = result {
        warn!("{}: {}", what, e);
    }
}

// ── SensorPort implementation ─────────────────────────────────

impl SensorPort for HardwareAdapter {
    fn read_all(&mut self) -> SensorSnapshot {
        let disarm_code_valid = self.link.poll();
        if let Some(secs) = self.link.take_time_sync() {
            match self.clock.set_wall_clock(secs) {
                Ok(()) => info!("clock: synced to {} from bridge", secs),
                Err(e) => warn!("clock: {} ({})", e, secs),
            }
        }

        let mut snapshot = self.sensor_hub.read_all(self.clock.current_hour());
        snapshot.arm_requested = core::mem::take(&mut self.arm_pending);
        snapshot.disarm_code_valid = disarm_code_valid;
        snapshot
    }
}

// ── ActuatorPort implementation ───────────────────────────────

impl ActuatorPort for HardwareAdapter {
    fn set_hvac(&mut self, mode: HvacMode) {
        if let Err(e) = self.hvac.set(mode) {
            warn!("hvac: {} ({:?} requested), forcing off", e, mode);
            self.hvac.force_off();
        }
    }

    fn set_fan_duty(&mut self, duty: u8) {
        log_failure("fan", self.fan.set(duty));
    }

    fn set_led_duty(&mut self, duty: u8) {
        log_failure("led strip", self.led.set(duty));
    }

    fn set_strike(&mut self, engaged: bool) {
        log_failure("strike", self.strike.set(engaged));
    }

    fn set_siren(&mut self, on: bool) {
        log_failure("siren", self.siren.set_steady(on));
    }

    fn start_smoke_pattern(&mut self) {
        self.siren.start_smoke_pattern();
    }

    fn all_off(&mut self) {
        self.hvac.force_off();
        log_failure("fan", self.fan.set(0));
        log_failure("led strip", self.led.set(0));
        log_failure("strike", self.strike.set(false));
        log_failure("siren", self.siren.set_steady(false));
    }
}

// ── AlertPort implementation ──────────────────────────────────

impl AlertPort for HardwareAdapter {
    fn send_alert(&mut self, alert: Alert) -> Result<(), CommsError> {
        self.link.send_alert(alert)
    }
}
