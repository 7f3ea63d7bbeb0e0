//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ AppService (domain)
//! ```
//!
//! Driven adapters (sensors, actuators, the alert link, event sinks, the
//! clock) implement these traits.  The [`AppService`](super::service::AppService)
//! consumes them via generics, so the domain core never touches hardware
//! directly.

use crate::error::CommsError;
use crate::fsm::context::{Alert, HvacMode, SensorSnapshot};

// ───────────────────────────────────────────────────────────────
// Sensor port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: the domain calls this once per tick.
///
/// Implementations resolve wiring details (active-low door, ADC
/// conversion, sunset window) and apply their own fallback on read
/// failures; the snapshot they return is always usable.  `arm_requested`
/// and `disarm_code_valid` are edge events: each request is reported in
/// exactly one snapshot.
pub trait SensorPort {
    fn read_all(&mut self) -> SensorSnapshot;
}

// ───────────────────────────────────────────────────────────────
// Actuator port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// Write-side port: the domain calls this to command actuators.
pub trait ActuatorPort {
    /// Drive the heat/cool relays.  Implementations must never energise
    /// both at once.
    fn set_hvac(&mut self, mode: HvacMode);

    /// Fan PWM duty, 0–255.
    fn set_fan_duty(&mut self, duty: u8);

    /// LED strip PWM duty, 0–255.
    fn set_led_duty(&mut self, duty: u8);

    /// `true` locks the door.
    fn set_strike(&mut self, engaged: bool);

    /// Steady intrusion siren on/off.  Also cancels the smoke pattern.
    fn set_siren(&mut self, on: bool);

    /// Switch the siren to the fire-alarm cadence.
    fn start_smoke_pattern(&mut self);

    /// Every output to its power-on level.
    fn all_off(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Alert port (driven adapter: domain → remote bridge)
// ───────────────────────────────────────────────────────────────

/// Sends one `ALERT:<message>` line to the remote bridge.
pub trait AlertPort {
    fn send_alert(&mut self, alert: Alert) -> Result<(), CommsError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic tick source plus wall-clock hour.
pub trait Clock {
    /// Milliseconds since boot.  Never goes backwards.
    fn now_ms(&self) -> u64;

    /// Local hour of day (0–23), or `None` before the wall clock is set.
    fn current_hour(&self) -> Option<u8>;
}
