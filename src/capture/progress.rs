//! Progress reporting for capture runs.

/// One step of a capture run. Angle positions are 1-based, frame positions are 1-based counts.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CaptureEvent {
    /// The run passed its entry checks.
    RunStarted {
        /// Clip being recorded.
        animation: String,
        /// Number of planned angles.
        angles: usize,
        /// Frames per angle.
        frames: u32,
    },
    /// An angle's camera is placed and sampling begins.
    AngleStarted {
        /// Sheet file base.
        base_name: String,
        /// 1-based angle position.
        angle: usize,
        /// Total angles.
        total_angles: usize,
        /// Frames to sample.
        frames: u32,
    },
    /// A frame was sampled.
    FrameCaptured {
        /// Sheet file base.
        base_name: String,
        /// 1-based angle position.
        angle: usize,
        /// Total angles.
        total_angles: usize,
        /// Frames sampled so far in this angle, including this one.
        frame: u32,
        /// Frames to sample.
        frames: u32,
    },
    /// A frame failed to decode or timed out and was left blank.
    FrameSkipped {
        /// Sheet file base.
        base_name: String,
        /// 0-based frame index.
        index: u32,
        /// Failure text.
        reason: String,
    },
    /// An angle produced its sheet.
    AngleCompleted {
        /// Angle label.
        label: String,
        /// Sheet file base.
        base_name: String,
        /// Frames drawn into the sheet.
        frames_drawn: usize,
    },
    /// An angle was skipped without error (for example a zero-length clip).
    AngleSkipped {
        /// Angle label.
        label: String,
        /// Why it was skipped.
        reason: String,
    },
    /// An angle failed; the run moves on to the next one.
    AngleFailed {
        /// Angle label.
        label: String,
        /// Failure text.
        error: String,
    },
    /// The run ended and the render state was restored.
    RunFinished {
        /// Sheets returned.
        sheets: usize,
        /// Angles that failed.
        failures: usize,
        /// Whether the run was cancelled.
        cancelled: bool,
    },
}

impl CaptureEvent {
    /// Human-readable status text.
    pub fn status_line(&self) -> String {
        match self {
            Self::RunStarted {
                animation,
                angles,
                frames,
            } => format!("Recording {animation}: {angles} angle(s), {frames} frame(s) each"),
            Self::AngleStarted {
                base_name,
                angle,
                total_angles,
                frames,
            } => format!("Recording {base_name} (Angle {angle}/{total_angles}): Frame 0/{frames}"),
            Self::FrameCaptured {
                base_name,
                angle,
                total_angles,
                frame,
                frames,
            } => format!(
                "Recording {base_name} (Angle {angle}/{total_angles}): Frame {frame}/{frames}"
            ),
            Self::FrameSkipped {
                base_name,
                index,
                reason,
            } => format!("Skipped frame {index} of {base_name}: {reason}"),
            Self::AngleCompleted {
                label, base_name, ..
            } => format!("Angle {label} captured for {base_name}."),
            Self::AngleSkipped { label, reason } => format!("Skipped angle {label}: {reason}"),
            Self::AngleFailed { label, error } => format!("Error capturing angle {label}: {error}"),
            Self::RunFinished {
                cancelled: true,
                sheets,
                ..
            } => format!("Recording cancelled after {sheets} sheet(s)."),
            Self::RunFinished {
                failures: 0,
                sheets,
                ..
            } => format!("All sprite sheets captured! ({sheets})"),
            Self::RunFinished {
                sheets, failures, ..
            } => format!("Recording finished with {failures} failed angle(s), {sheets} sheet(s)."),
        }
    }
}

/// Receives progress events.
pub trait ProgressSink {
    /// Handle one event.
    fn on_event(&mut self, event: &CaptureEvent);
}

/// Logs each event's status line through `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingProgress;

impl ProgressSink for TracingProgress {
    fn on_event(&mut self, event: &CaptureEvent) {
        match event {
            CaptureEvent::AngleFailed { .. } | CaptureEvent::FrameSkipped { .. } => {
                tracing::warn!("{}", event.status_line());
            }
            CaptureEvent::FrameCaptured { .. } => tracing::debug!("{}", event.status_line()),
            _ => tracing::info!("{}", event.status_line()),
        }
    }
}

/// Keeps every event, for tests and batch reports.
#[derive(Clone, Debug, Default)]
pub struct RecordedProgress {
    /// Events in arrival order.
    pub events: Vec<CaptureEvent>,
}

impl RecordedProgress {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for RecordedProgress {
    fn on_event(&mut self, event: &CaptureEvent) {
        self.events.push(event.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/progress.rs"]
mod tests;
