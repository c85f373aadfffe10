//! Sprite-sheet composition and its sidecar files.

/// Grid atlas composition.
pub mod composer;
/// Sheet artifact and metadata.
pub mod metadata;
/// Output file naming.
pub mod naming;
