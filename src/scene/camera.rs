use crate::{
    foundation::core::{DVec2, DVec3},
    plan::viewpoint::CameraPlacement,
};

/// Character height the preview frames around.
pub const MODEL_HEIGHT: f64 = 1.8;
/// Distance of the preview camera from the pivot plane.
pub const PREVIEW_CAMERA_DISTANCE: f64 = 10.0;
/// Initial orthographic zoom factor (half-height of the view volume).
pub const DEFAULT_ZOOM: f64 = 2.0;
/// Zoom after a reset when a model is loaded.
pub const RESET_ZOOM_WITH_MODEL: f64 = 1.5;
/// Zoom after a reset with an empty scene.
pub const RESET_ZOOM_EMPTY: f64 = 2.5;
/// Pan distance per nudge.
pub const PAN_STEP: f64 = 0.25;
/// Smallest zoom factor the rig accepts.
pub const MIN_ZOOM: f64 = 0.05;

/// Orthographic view-volume half extents.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct OrthoExtents {
    /// Left plane.
    pub left: f64,
    /// Right plane.
    pub right: f64,
    /// Top plane.
    pub top: f64,
    /// Bottom plane.
    pub bottom: f64,
}

impl OrthoExtents {
    /// Square volume `±zoom` on both axes.
    pub fn square(zoom: f64) -> Self {
        Self::for_aspect(zoom, 1.0)
    }

    /// Volume `(±zoom * aspect, ±zoom)` so a `w x h` target is filled without letterboxing.
    pub fn for_aspect(zoom: f64, aspect: f64) -> Self {
        Self {
            left: -zoom * aspect,
            right: zoom * aspect,
            top: zoom,
            bottom: -zoom,
        }
    }

    /// Horizontal span.
    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    /// Vertical span.
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Position, target and projection of the capture camera.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraPose {
    /// Camera position in world space.
    pub position: DVec3,
    /// Point the camera looks at.
    pub look_at: DVec3,
    /// Orthographic extents.
    pub extents: OrthoExtents,
}

impl CameraPose {
    /// Move the camera to a ring placement and re-aim it at the pivot.
    pub fn place(&mut self, placement: CameraPlacement) {
        self.position = placement.position;
        self.look_at = placement.look_at;
    }

    /// Orthonormal `(right, up, forward)` basis with world +Y as the up hint.
    pub fn basis(&self) -> (DVec3, DVec3, DVec3) {
        let forward = (self.look_at - self.position).try_normalize().unwrap_or(DVec3::NEG_Z);
        let mut right = forward.cross(DVec3::Y);
        if right.length_squared() < 1e-12 {
            // Looking straight up or down.
            right = DVec3::X;
        }
        let right = right.normalize();
        let up = right.cross(forward).normalize();
        (right, up, forward)
    }

    /// Project a world point into normalized view coordinates: x in `[0,1]` left to right,
    /// y in `[0,1]` top to bottom. Points outside the volume fall outside that range.
    pub fn project_unit(&self, world: DVec3) -> DVec2 {
        let (right, up, _) = self.basis();
        let rel = world - self.position;
        let vx = rel.dot(right);
        let vy = rel.dot(up);
        let e = &self.extents;
        DVec2::new(
            (vx - e.left) / e.width(),
            (e.top - vy) / e.height(),
        )
    }
}

/// Pan and zoom state of the sprite preview camera.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PreviewRig {
    /// Orthographic zoom factor.
    pub zoom: f64,
    /// Pan offset (x right, y up) in world units.
    pub pan: DVec2,
    /// Height of the framed model.
    pub model_height: f64,
}

impl Default for PreviewRig {
    fn default() -> Self {
        Self {
            zoom: DEFAULT_ZOOM,
            pan: DVec2::ZERO,
            model_height: MODEL_HEIGHT,
        }
    }
}

impl PreviewRig {
    /// Orbit pivot: the panned point half-way up the model.
    pub fn pivot(&self) -> DVec3 {
        DVec3::new(self.pan.x, self.model_height / 2.0 + self.pan.y, 0.0)
    }

    /// Camera pose of the front-facing preview.
    pub fn preview_pose(&self) -> CameraPose {
        let pivot = self.pivot();
        CameraPose {
            position: DVec3::new(pivot.x, pivot.y, PREVIEW_CAMERA_DISTANCE),
            look_at: pivot,
            extents: OrthoExtents::square(self.zoom),
        }
    }

    /// Reset `camera` to the preview pose.
    pub fn apply(&self, camera: &mut CameraPose) {
        *camera = self.preview_pose();
    }

    /// Pan by whole steps along x/y.
    pub fn nudge(&mut self, dir_x: f64, dir_y: f64) {
        self.pan += DVec2::new(dir_x, dir_y) * PAN_STEP;
    }

    /// Multiply the zoom factor, never dropping below [`MIN_ZOOM`].
    pub fn zoom_by(&mut self, factor: f64) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).max(MIN_ZOOM);
        }
    }

    /// Clear panning and pick the reset zoom.
    pub fn reset(&mut self, model_loaded: bool) {
        self.pan = DVec2::ZERO;
        self.zoom = if model_loaded {
            RESET_ZOOM_WITH_MODEL
        } else {
            RESET_ZOOM_EMPTY
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/camera.rs"]
mod tests;
