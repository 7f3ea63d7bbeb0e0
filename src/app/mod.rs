//! Application core: pure domain logic, zero I/O.
//!
//! Contains the per-tick arbiter that ties the smoke override, the
//! security FSM and the comfort controllers together.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod commands;
pub mod events;
pub mod ports;
pub mod service;
