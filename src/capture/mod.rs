//! Capture runs: sequencing, guards and progress.

/// Cancellation token and policy.
pub mod cancel;
/// One-run-at-a-time guard.
pub mod gate;
/// UI hooks toggled around a run.
pub mod host;
/// The run sequencer.
pub mod orchestrator;
/// Progress events and sinks.
pub mod progress;
