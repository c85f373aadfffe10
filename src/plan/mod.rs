//! Run planning: user settings, the validated plan and camera angles.

/// Validated capture plan and grid geometry.
pub mod capture_plan;
/// User-facing capture settings.
pub mod settings;
/// Angle sets, labels and the orbit ring.
pub mod viewpoint;
