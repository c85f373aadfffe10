/// Deterministic frame sampling.
pub mod sampler;
