//! Outbound application events.
//!
//! The [`AppService`](super::service::AppService) emits these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them.

use serde::Serialize;

use crate::error::CommsError;
use crate::fsm::Mode;
use crate::fsm::context::{Alert, HvacMode, Notice};

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The service has started (carries the initial mode).
    Started(Mode),

    /// The security mode changed.
    ModeChanged { from: Mode, to: Mode },

    /// Something the controller decided this tick worth recording.
    Notice(Notice),

    /// An alert line could not be delivered.
    AlertFailed { alert: Alert, error: CommsError },

    /// Periodic or requested telemetry snapshot.
    Telemetry(TelemetryData),
}

/// A point-in-time telemetry snapshot suitable for logging or transmission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetryData {
    pub uptime_ms: u64,
    /// Control ticks run since start.
    pub ticks: u64,
    pub mode: Mode,
    pub smoke_active: bool,
    pub temperature_c: f32,
    pub humidity_pct: f32,
    pub smoke_raw: u16,
    pub hvac: HvacMode,
    pub fan_duty: u8,
    pub led_duty: u8,
    pub strike_engaged: bool,
    pub siren_active: bool,
}
