//! Inbound commands to the application service.
//!
//! These represent actions requested by the outside world (panel button,
//! serial console, remote bridge) that the
//! [`AppService`](super::service::AppService) interprets and acts upon.

/// Commands that external adapters can send into the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    /// Clear a latched smoke override once readings have stayed clear.
    ResetSmoke,

    /// Arm the system; equivalent to the arm input on the next tick.
    Arm,

    /// Emit a telemetry event now.
    RequestTelemetry,
}
