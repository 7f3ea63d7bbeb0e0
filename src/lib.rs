//! RoomCtl firmware library.
//!
//! Exposes the pure-logic modules for integration testing and the
//! hardware adapters for the binary.  All ESP-IDF-specific code is
//! guarded by `#[cfg(target_os = "espidf")]` within each module; on the
//! host the drivers fall back to simulation stubs.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod control;
pub mod error;
pub mod fsm;
pub mod safety;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
pub mod pins;
pub mod sensors;
