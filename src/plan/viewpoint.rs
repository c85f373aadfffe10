//! Viewpoint planning: which angles to capture and where the camera sits for each one.

use crate::foundation::core::DVec3;

/// Label used for the "keep the current view" angle.
pub const CURRENT_VIEW_LABEL: &str = "CurrentView";

/// Azimuths of the 8-way isometric ring, in capture order.
pub const ISOMETRIC_ANGLES: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Azimuths of the front/back pair, in capture order.
pub const FRONT_BACK_ANGLES: [f64; 2] = [90.0, -90.0];

/// Orbit radius used when the live camera sits (almost) straight above the pivot.
pub const DEFAULT_ORBIT_DISTANCE: f64 = 10.0;

const DEGENERATE_DISTANCE: f64 = 1e-6;

const COMPASS_LABELS: [(u32, &str); 8] = [
    (0, "S"),
    (45, "SW"),
    (90, "W"),
    (135, "NW"),
    (180, "N"),
    (225, "NE"),
    (270, "E"),
    (315, "SE"),
];

/// One requested capture angle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AngleSpec {
    /// Azimuth in degrees, or `None` to keep the current view.
    pub degrees: Option<f64>,
    /// Direction code used in file names and metadata.
    pub label: String,
}

impl AngleSpec {
    /// Angle at `degrees`, labelled through the compass table.
    pub fn at(degrees: f64) -> Self {
        Self {
            degrees: Some(degrees),
            label: angle_label(Some(degrees)),
        }
    }

    /// The "use current view" angle.
    pub fn current_view() -> Self {
        Self {
            degrees: None,
            label: CURRENT_VIEW_LABEL.to_string(),
        }
    }
}

/// Direction code for an azimuth.
///
/// Angles are folded into `[0, 360)` before the lookup; anything off the 45° grid is
/// labelled `angle{deg}` with the caller's original value.
pub fn angle_label(degrees: Option<f64>) -> String {
    let Some(deg) = degrees else {
        return CURRENT_VIEW_LABEL.to_string();
    };

    let folded = deg.rem_euclid(360.0);
    let rounded = folded.round();
    if (folded - rounded).abs() < 1e-9 {
        let key = (rounded as u32) % 360;
        if let Some((_, label)) = COMPASS_LABELS.iter().find(|(a, _)| *a == key) {
            return (*label).to_string();
        }
    }
    format!("angle{deg}")
}

/// Compass labels known to the angle table.
pub fn is_compass_label(label: &str) -> bool {
    COMPASS_LABELS.iter().any(|(_, l)| *l == label)
}

/// Ordered angle set for a run: the 8-way ring, or the front/back pair.
pub fn plan_angles(isometric: bool) -> Vec<AngleSpec> {
    let angles: &[f64] = if isometric {
        &ISOMETRIC_ANGLES
    } else {
        &FRONT_BACK_ANGLES
    };
    angles.iter().copied().map(AngleSpec::at).collect()
}

/// A concrete camera placement on the ring.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct CameraPlacement {
    /// Camera position in world space.
    pub position: DVec3,
    /// Point the camera looks at (the orbit pivot).
    pub look_at: DVec3,
}

/// Constant-radius, constant-elevation ring around a pivot.
///
/// Sampled once from the live preview camera and reused for every angle of a run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitRing {
    /// Point the ring circles around.
    pub pivot: DVec3,
    /// Horizontal camera-to-pivot distance.
    pub horizontal_distance: f64,
    /// Vertical camera offset above the pivot.
    pub vertical_offset: f64,
}

impl OrbitRing {
    /// Derive the ring from the current camera position and the pivot.
    pub fn from_camera(camera_position: DVec3, pivot: DVec3) -> Self {
        let to_camera = camera_position - pivot;
        let mut horizontal_distance = DVec3::new(to_camera.x, 0.0, to_camera.z).length();
        if !horizontal_distance.is_finite() || horizontal_distance < DEGENERATE_DISTANCE {
            horizontal_distance = DEFAULT_ORBIT_DISTANCE;
        }
        Self {
            pivot,
            horizontal_distance,
            vertical_offset: to_camera.y,
        }
    }

    /// Camera placement for `angle_deg` (0° looks from +Z, 90° from +X).
    pub fn placement(&self, angle_deg: f64) -> CameraPlacement {
        let rad = angle_deg.to_radians();
        let position = self.pivot
            + DVec3::new(
                self.horizontal_distance * rad.sin(),
                self.vertical_offset,
                self.horizontal_distance * rad.cos(),
            );
        CameraPlacement {
            position,
            look_at: self.pivot,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/plan/viewpoint.rs"]
mod tests;
