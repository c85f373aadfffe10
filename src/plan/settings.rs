use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{CaptureError, CaptureResult};

/// Frame count used when the user leaves the field empty or zero.
pub const DEFAULT_FRAME_COUNT: u32 = 16;
/// Column count used when the user leaves the field empty or zero.
pub const DEFAULT_COLUMNS: u32 = 4;
/// Cell edge used when the user leaves a cell dimension empty or zero.
pub const DEFAULT_CELL_EDGE: u32 = 480;

/// User-facing capture configuration, read once when a run starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CaptureSettings {
    /// Frames sampled per angle.
    pub frame_count: u32,
    /// Atlas grid width in cells.
    pub columns: u32,
    /// Cell width in pixels.
    pub cell_width: u32,
    /// Cell height in pixels.
    pub cell_height: u32,
    /// Crop each frame to its content and centre it in the cell.
    pub optimize: bool,
    /// Capture the 8-angle ring instead of the front/back pair.
    pub isometric: bool,
}

impl Default for CaptureSettings {
    fn default() -> Self {
        Self {
            frame_count: DEFAULT_FRAME_COUNT,
            columns: DEFAULT_COLUMNS,
            cell_width: DEFAULT_CELL_EDGE,
            cell_height: DEFAULT_CELL_EDGE,
            optimize: false,
            isometric: false,
        }
    }
}

impl CaptureSettings {
    /// Replace empty (zero) numeric inputs with their defaults.
    pub fn sanitized(self) -> Self {
        fn or_default(v: u32, d: u32) -> u32 {
            if v == 0 { d } else { v }
        }

        Self {
            frame_count: or_default(self.frame_count, DEFAULT_FRAME_COUNT),
            columns: or_default(self.columns, DEFAULT_COLUMNS),
            cell_width: or_default(self.cell_width, DEFAULT_CELL_EDGE),
            cell_height: or_default(self.cell_height, DEFAULT_CELL_EDGE),
            ..self
        }
    }

    /// Parse settings from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> CaptureResult<Self> {
        serde_json::from_str(json)
            .map_err(|e| CaptureError::validation(format!("invalid capture settings: {e}")))
    }

    /// Read settings from a JSON file.
    pub fn load(path: &Path) -> CaptureResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read capture settings '{}'", path.display()))?;
        Self::from_json(&text)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/settings.rs"]
mod tests;
