use std::{cell::Cell, rc::Rc};

use crate::{
    animation::driver::{AnimationClip, AnimationDriver},
    foundation::error::{CaptureError, CaptureResult},
};

/// Pose committed to the scene by the last [`AnimationDriver::advance`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Pose {
    /// Clip-local time of the pose in seconds.
    pub time_secs: f64,
    /// Duration of the posed clip.
    pub duration_secs: f64,
}

impl Pose {
    /// Position of the pose within its clip, in `[0, 1]`.
    pub fn phase(&self) -> f64 {
        if self.duration_secs <= 0.0 {
            return 0.0;
        }
        (self.time_secs / self.duration_secs).clamp(0.0, 1.0)
    }
}

/// Shared read handle on the committed pose; stands in for the scene graph.
#[derive(Clone, Debug, Default)]
pub struct PoseProbe(Rc<Cell<Option<Pose>>>);

impl PoseProbe {
    /// Last committed pose, `None` before the first commit.
    pub fn get(&self) -> Option<Pose> {
        self.0.get()
    }

    fn set(&self, pose: Option<Pose>) {
        self.0.set(pose);
    }
}

/// A scrubbable player over a list of clips with one active selection.
#[derive(Debug)]
pub struct ClipPlayer {
    clips: Vec<AnimationClip>,
    active: Option<usize>,
    time_secs: f64,
    running: bool,
    paused: bool,
    probe: PoseProbe,
}

impl ClipPlayer {
    /// Create a player; the first clip (if any) becomes active and starts playing.
    pub fn new(clips: Vec<AnimationClip>) -> Self {
        let active = if clips.is_empty() { None } else { Some(0) };
        Self {
            clips,
            active,
            time_secs: 0.0,
            running: active.is_some(),
            paused: false,
            probe: PoseProbe::default(),
        }
    }

    /// Handle on the committed pose.
    pub fn probe(&self) -> PoseProbe {
        self.probe.clone()
    }

    /// Names of all clips in load order.
    pub fn clip_names(&self) -> impl Iterator<Item = &str> {
        self.clips.iter().map(|c| c.name.as_str())
    }

    /// Make the clip called `name` active and play it from the start.
    pub fn select(&mut self, name: &str) -> CaptureResult<()> {
        let idx = self
            .clips
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| CaptureError::precondition(format!("no animation named '{name}'")))?;
        self.active = Some(idx);
        self.time_secs = 0.0;
        self.running = true;
        self.paused = false;
        Ok(())
    }

    /// Drop the active selection (as when the model is unloaded).
    pub fn clear(&mut self) {
        self.active = None;
        self.running = false;
        self.probe.set(None);
    }

    /// Current clip-local time.
    pub fn time(&self) -> f64 {
        self.time_secs
    }

    fn active_duration(&self) -> Option<f64> {
        self.active.map(|i| self.clips[i].duration_secs)
    }
}

impl AnimationDriver for ClipPlayer {
    fn active_clip(&self) -> Option<AnimationClip> {
        self.active.map(|i| self.clips[i].clone())
    }

    fn stop(&mut self) {
        self.running = false;
        self.time_secs = 0.0;
    }

    fn play(&mut self) {
        if self.active.is_some() {
            self.running = true;
        }
    }

    fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    fn is_paused(&self) -> bool {
        self.paused
    }

    fn is_running(&self) -> bool {
        self.running
    }

    fn set_time(&mut self, secs: f64) {
        let duration = self.active_duration().unwrap_or(0.0);
        self.time_secs = if secs.is_finite() {
            secs.clamp(0.0, duration)
        } else {
            0.0
        };
    }

    fn advance(&mut self, delta_secs: f64) {
        let Some(duration) = self.active_duration() else {
            return;
        };
        if self.running && !self.paused && duration > 0.0 {
            self.time_secs = (self.time_secs + delta_secs).rem_euclid(duration);
        }
        self.probe.set(Some(Pose {
            time_secs: self.time_secs,
            duration_secs: duration,
        }));
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/player.rs"]
mod tests;
