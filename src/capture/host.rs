/// User-facing controls the recorder toggles around a run.
///
/// Every hook has a no-op default so embedders only implement what they have.
pub trait CaptureHost {
    /// Enable or disable the record button.
    fn set_record_enabled(&mut self, _enabled: bool) {}

    /// Enable or disable interactive orbit controls.
    fn set_orbit_controls_enabled(&mut self, _enabled: bool) {}

    /// Current orbit controls state, restored after the run.
    fn orbit_controls_enabled(&self) -> bool {
        false
    }

    /// Leave the orthographic preview mode if it is active.
    fn leave_ortho_preview(&mut self) {}
}

/// Host without any controls.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopHost;

impl CaptureHost for NoopHost {}
