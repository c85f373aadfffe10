/// Artifact persistence.
pub mod sink;
