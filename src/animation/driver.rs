/// A named animation clip. Only its duration matters to the capture pipeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct AnimationClip {
    /// Clip name as authored in the model file.
    pub name: String,
    /// Clip length in seconds (>= 0).
    pub duration_secs: f64,
}

impl AnimationClip {
    /// Create a clip; negative or non-finite durations clamp to zero.
    pub fn new(name: impl Into<String>, duration_secs: f64) -> Self {
        let duration_secs = if duration_secs.is_finite() {
            duration_secs.max(0.0)
        } else {
            0.0
        };
        Self {
            name: name.into(),
            duration_secs,
        }
    }
}

/// The animation-driving subsystem (mixer + active action).
///
/// The pipeline only scrubs: it never relies on wall-clock playback while capturing.
pub trait AnimationDriver {
    /// Clip of the active action, if a model and action are loaded.
    fn active_clip(&self) -> Option<AnimationClip>;

    /// Stop the active action and rewind it.
    fn stop(&mut self);

    /// Start (or keep) the active action running.
    fn play(&mut self);

    /// Pause or resume the active action without rewinding.
    fn set_paused(&mut self, paused: bool);

    /// Whether the active action is paused.
    fn is_paused(&self) -> bool;

    /// Whether the active action is running (played and not stopped).
    fn is_running(&self) -> bool;

    /// Set the active action's local time in seconds.
    fn set_time(&mut self, secs: f64);

    /// Advance the driver by `delta_secs` and commit the resulting pose to the scene.
    fn advance(&mut self, delta_secs: f64);
}

/// Snapshot of play/pause state, restored after a capture run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlaybackState {
    /// Action was running.
    pub running: bool,
    /// Action was paused.
    pub paused: bool,
}

impl PlaybackState {
    /// Read the driver's current state.
    pub fn capture<A: AnimationDriver + ?Sized>(driver: &A) -> Self {
        Self {
            running: driver.is_running(),
            paused: driver.is_paused(),
        }
    }

    /// Put the driver back into this state.
    pub fn restore<A: AnimationDriver + ?Sized>(self, driver: &mut A) {
        if self.running {
            if !driver.is_running() {
                driver.play();
            }
            driver.set_paused(self.paused);
        } else {
            driver.stop();
            driver.set_paused(self.paused);
        }
    }
}
