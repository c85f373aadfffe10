//! Render device contract and the headless CPU device.

/// Render device trait and read-back decoding.
pub mod device;
/// Deterministic proxy renderer.
pub mod headless;
