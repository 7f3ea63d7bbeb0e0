//! Comfort and convenience controllers invoked by the mode handlers.

pub mod lighting;
pub mod thermal;
