use crate::{
    foundation::core::CellSize,
    foundation::error::{CaptureError, CaptureResult},
    plan::settings::CaptureSettings,
    plan::viewpoint::{AngleSpec, plan_angles},
};

/// Immutable description of one capture run.
#[derive(Clone, Debug, PartialEq)]
pub struct CapturePlan {
    frame_count: u32,
    columns: u32,
    cell: CellSize,
    optimize: bool,
    angles: Vec<AngleSpec>,
}

impl CapturePlan {
    /// Create a validated plan.
    pub fn new(
        frame_count: u32,
        columns: u32,
        cell: CellSize,
        optimize: bool,
        angles: Vec<AngleSpec>,
    ) -> CaptureResult<Self> {
        if frame_count == 0 {
            return Err(CaptureError::validation("frame count must be >= 1"));
        }
        if columns == 0 {
            return Err(CaptureError::validation("columns must be >= 1"));
        }
        if cell.width == 0 || cell.height == 0 {
            return Err(CaptureError::validation("cell size must be > 0 on both axes"));
        }
        if angles.is_empty() {
            return Err(CaptureError::validation("a plan needs at least one angle"));
        }
        if let Some(bad) = angles.iter().find(|a| a.label.is_empty()) {
            return Err(CaptureError::validation(format!(
                "angle {:?} has an empty label",
                bad.degrees
            )));
        }
        let rows = frame_count.div_ceil(columns);
        let (Some(width), Some(height)) = (
            columns.checked_mul(cell.width),
            rows.checked_mul(cell.height),
        ) else {
            return Err(CaptureError::validation(format!(
                "atlas of {columns}x{rows} cells of {}x{}px exceeds u32 pixels",
                cell.width, cell.height
            )));
        };
        if u64::from(width) * u64::from(height) * 4 > isize::MAX as u64 {
            return Err(CaptureError::validation(format!(
                "atlas of {width}x{height} is too large"
            )));
        }
        Ok(Self {
            frame_count,
            columns,
            cell,
            optimize,
            angles,
        })
    }

    /// Build a plan from user settings, with angles from the viewpoint planner.
    pub fn from_settings(settings: &CaptureSettings) -> CaptureResult<Self> {
        Self::new(
            settings.frame_count,
            settings.columns,
            CellSize::new(settings.cell_width, settings.cell_height)?,
            settings.optimize,
            plan_angles(settings.isometric),
        )
    }

    /// Replace the angle set, keeping the grid parameters.
    pub fn with_angles(self, angles: Vec<AngleSpec>) -> CaptureResult<Self> {
        Self::new(
            self.frame_count,
            self.columns,
            self.cell,
            self.optimize,
            angles,
        )
    }

    /// Frames sampled per angle.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Atlas grid width in cells.
    pub fn columns(&self) -> u32 {
        self.columns
    }

    /// Atlas grid height in cells: `ceil(frame_count / columns)`.
    pub fn rows(&self) -> u32 {
        self.frame_count.div_ceil(self.columns)
    }

    /// Per-cell pixel size.
    pub fn cell(&self) -> CellSize {
        self.cell
    }

    /// Whether frames are cropped to their content.
    pub fn optimize(&self) -> bool {
        self.optimize
    }

    /// Angles in capture order.
    pub fn angles(&self) -> &[AngleSpec] {
        &self.angles
    }

    /// `true` when file names carry an angle suffix.
    pub fn is_multi_angle(&self) -> bool {
        self.angles.len() > 1
    }

    /// Atlas canvas size `(columns * cell_width, rows * cell_height)`; fits `u32` for any
    /// validated plan.
    pub fn atlas_size(&self) -> (u32, u32) {
        (
            self.columns * self.cell.width,
            self.rows() * self.cell.height,
        )
    }

    /// `(row, column)` of frame `index`, or `None` past the last frame.
    pub fn grid_position(&self, index: u32) -> Option<(u32, u32)> {
        if index >= self.frame_count {
            return None;
        }
        Some((index / self.columns, index % self.columns))
    }

    /// Top-left pixel of frame `index`'s cell.
    pub fn cell_origin(&self, index: u32) -> Option<(u32, u32)> {
        self.grid_position(index)
            .map(|(row, col)| (col * self.cell.width, row * self.cell.height))
    }

    /// Scrub position in `[0, 1]` for frame `index`.
    ///
    /// The first and last frames land exactly on `0` and `1`; a single-frame plan samples `0`.
    pub fn normalized_time(&self, index: u32) -> f64 {
        if self.frame_count <= 1 {
            return 0.0;
        }
        f64::from(index.min(self.frame_count - 1)) / f64::from(self.frame_count - 1)
    }

    /// Absolute clip times for every frame of a clip lasting `duration_secs`.
    pub fn sample_times(&self, duration_secs: f64) -> Vec<f64> {
        (0..self.frame_count)
            .map(|i| self.normalized_time(i) * duration_secs)
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/capture_plan.rs"]
mod tests;
