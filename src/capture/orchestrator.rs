use std::cell::Cell;

use chrono::Utc;

use crate::{
    animation::driver::{AnimationDriver, PlaybackState},
    atlas::{
        composer::{RenderedFrame, compose},
        metadata::SpriteSheetArtifact,
        naming::sheet_base_name,
    },
    capture::{
        cancel::{CancelPolicy, CancelToken},
        gate::CaptureGate,
        host::CaptureHost,
        progress::{CaptureEvent, ProgressSink},
    },
    foundation::core::Viewport,
    foundation::error::{CaptureError, CaptureResult},
    output::sink::{ArtifactSink, persist_artifact},
    plan::{
        capture_plan::CapturePlan,
        viewpoint::{AngleSpec, OrbitRing},
    },
    render::device::RenderDevice,
    sample::sampler::{FrameSampler, SamplerOptions},
    scene::{
        camera::OrthoExtents,
        context::{RenderContext, RenderSnapshot},
    },
};

/// Tunables for [`CaptureOrchestrator`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OrchestratorOptions {
    /// Frame sampling options.
    pub sampler: SamplerOptions,
    /// What a cancelled run returns.
    pub cancel_policy: CancelPolicy,
}

/// Where a run currently is.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CapturePhase {
    /// No run in progress.
    #[default]
    Idle,
    /// Entry checks passed; state saved, angles about to run.
    Planning,
    /// Sampling `frame` of the angle at `angle` (both 0-based).
    Sampling {
        /// Angle position.
        angle: usize,
        /// Frame index.
        frame: u32,
    },
    /// Composing the atlas of the angle at `angle`.
    Composing {
        /// Angle position.
        angle: usize,
    },
    /// The angle at `angle` failed; the run continues with the next one.
    Failed {
        /// Angle position.
        angle: usize,
    },
}

/// Everything a run touches, borrowed for its duration.
pub struct CaptureEnv<'a, D> {
    /// Animation driver of the loaded model.
    pub driver: &'a mut dyn AnimationDriver,
    /// Shared render state.
    pub ctx: &'a mut RenderContext<D>,
    /// UI controls toggled around the run.
    pub host: &'a mut dyn CaptureHost,
    /// Progress receiver.
    pub progress: &'a mut dyn ProgressSink,
    /// Where finished sheets are saved; `None` only returns them.
    pub sink: Option<&'a mut dyn ArtifactSink>,
    /// Cooperative cancel flag.
    pub cancel: CancelToken,
}

/// Outcome of a run that passed its entry checks.
#[derive(Debug, Default)]
pub struct CaptureReport {
    /// One sheet per successful angle, in plan order.
    pub artifacts: Vec<SpriteSheetArtifact>,
    /// Angle failures ([`CaptureError::AngleCapture`]) and persistence failures.
    pub failures: Vec<CaptureError>,
    /// Labels of angles skipped without error.
    pub skipped_angles: Vec<String>,
    /// Whether the run stopped on its cancel token.
    pub cancelled: bool,
}

/// Runs capture plans: every angle, every frame, then the atlas.
#[derive(Debug, Default)]
pub struct CaptureOrchestrator {
    sampler: FrameSampler,
    cancel_policy: CancelPolicy,
    gate: CaptureGate,
    phase: Cell<CapturePhase>,
}

enum AngleOutcome {
    Captured {
        artifact: Box<SpriteSheetArtifact>,
        frames_drawn: usize,
    },
    Skipped(String),
}

impl CaptureOrchestrator {
    /// Create an orchestrator with its own gate.
    pub fn new(opts: OrchestratorOptions) -> Self {
        Self {
            sampler: FrameSampler::new(opts.sampler),
            cancel_policy: opts.cancel_policy,
            gate: CaptureGate::new(),
            phase: Cell::new(CapturePhase::Idle),
        }
    }

    /// Share `gate` with other entry points.
    pub fn with_gate(mut self, gate: CaptureGate) -> Self {
        self.gate = gate;
        self
    }

    /// The concurrency gate.
    pub fn gate(&self) -> &CaptureGate {
        &self.gate
    }

    /// Current phase.
    pub fn phase(&self) -> CapturePhase {
        self.phase.get()
    }

    /// Capture every angle of `plan` and return the resulting sheets.
    ///
    /// Fails only at entry: [`CaptureError::Concurrency`] when another run holds the gate and
    /// [`CaptureError::Precondition`] when no clip is active. After that every failure is
    /// isolated to its frame or angle and reported in the [`CaptureReport`]. The render
    /// context, preview rig, playback state and host controls are restored before this
    /// returns, and also when the future is dropped mid-run.
    ///
    /// With a frame wait timeout set (the default), the future must be polled inside a tokio
    /// runtime with the time driver enabled.
    #[tracing::instrument(
        skip_all,
        fields(angles = plan.angles().len(), frames = plan.frame_count())
    )]
    pub async fn run_capture<D: RenderDevice>(
        &self,
        plan: &CapturePlan,
        env: &mut CaptureEnv<'_, D>,
    ) -> CaptureResult<CaptureReport> {
        let _claim = self.gate.try_claim()?;
        let clip = env.driver.active_clip().ok_or_else(|| {
            CaptureError::precondition("load a model and select an animation first")
        })?;

        self.phase.set(CapturePhase::Planning);
        let session = RecordingSession::begin(env, &self.phase);
        let preview = session.saved.render;
        let run = &mut *session.env;
        run.progress.on_event(&CaptureEvent::RunStarted {
            animation: clip.name.clone(),
            angles: plan.angles().len(),
            frames: plan.frame_count(),
        });

        let ring = OrbitRing::from_camera(preview.camera.position, preview.rig.pivot());
        let mut report = CaptureReport::default();

        for (i, angle) in plan.angles().iter().enumerate() {
            if run.cancel.is_cancelled() {
                report.cancelled = true;
                break;
            }
            match angle.degrees {
                Some(deg) => {
                    run.ctx.camera.place(ring.placement(deg));
                    run.ctx.rig.zoom = preview.rig.zoom;
                    run.ctx.camera.extents = OrthoExtents::square(preview.rig.zoom);
                }
                None => {
                    run.ctx.camera = preview.camera;
                    run.ctx.rig = preview.rig;
                }
            }
            let base_name = sheet_base_name(&clip.name, &angle.label, plan.is_multi_angle());

            match self.capture_angle(plan, i, angle, &base_name, run).await {
                Ok(AngleOutcome::Captured {
                    artifact,
                    frames_drawn,
                }) => {
                    run.progress.on_event(&CaptureEvent::AngleCompleted {
                        label: angle.label.clone(),
                        base_name,
                        frames_drawn,
                    });
                    report.artifacts.push(*artifact);
                }
                Ok(AngleOutcome::Skipped(reason)) => {
                    tracing::warn!(angle = %angle.label, %reason, "angle skipped");
                    run.progress.on_event(&CaptureEvent::AngleSkipped {
                        label: angle.label.clone(),
                        reason,
                    });
                    report.skipped_angles.push(angle.label.clone());
                }
                Err(CaptureError::Cancelled) => {
                    tracing::info!(angle = %angle.label, "capture cancelled");
                    report.cancelled = true;
                    break;
                }
                Err(e) => {
                    self.phase.set(CapturePhase::Failed { angle: i });
                    let err = CaptureError::angle(angle.label.clone(), e);
                    tracing::error!(angle = %angle.label, error = %err, "angle failed");
                    run.progress.on_event(&CaptureEvent::AngleFailed {
                        label: angle.label.clone(),
                        error: err.to_string(),
                    });
                    report.failures.push(err);
                }
            }
        }

        if report.cancelled && self.cancel_policy == CancelPolicy::DiscardPartial {
            report.artifacts.clear();
        }
        if let Some(sink) = run.sink.as_deref_mut() {
            persist_all(sink, &mut report);
        }

        drop(session);
        env.progress.on_event(&CaptureEvent::RunFinished {
            sheets: report.artifacts.len(),
            failures: report.failures.len(),
            cancelled: report.cancelled,
        });
        Ok(report)
    }

    /// Sample every frame of one angle and compose its sheet.
    #[tracing::instrument(skip_all, fields(angle = %angle.label, base = %base_name))]
    async fn capture_angle<D: RenderDevice>(
        &self,
        plan: &CapturePlan,
        angle_index: usize,
        angle: &AngleSpec,
        base_name: &str,
        env: &mut CaptureEnv<'_, D>,
    ) -> CaptureResult<AngleOutcome> {
        let total_angles = plan.angles().len();
        let frames = plan.frame_count();
        env.progress.on_event(&CaptureEvent::AngleStarted {
            base_name: base_name.to_string(),
            angle: angle_index + 1,
            total_angles,
            frames,
        });

        let clip = env
            .driver
            .active_clip()
            .ok_or_else(|| CaptureError::precondition("no current animation clip for angle"))?;
        if clip.duration_secs <= 0.0 {
            return Ok(AngleOutcome::Skipped(format!(
                "animation '{}' has zero duration",
                clip.name
            )));
        }
        let clip = self.sampler.prepare(&mut *env.driver)?;
        tracing::debug!(duration = clip.duration_secs, frames, "angle capture started");

        let size = Viewport::from(plan.cell());
        let mut collected = Vec::with_capacity(frames as usize);
        for index in 0..frames {
            if env.cancel.is_cancelled() {
                return Err(CaptureError::Cancelled);
            }
            self.phase.set(CapturePhase::Sampling {
                angle: angle_index,
                frame: index,
            });

            let t = plan.normalized_time(index);
            match self
                .sampler
                .sample_frame(&mut *env.driver, &mut *env.ctx, t, size)
                .await
            {
                Ok(image) => {
                    collected.push(RenderedFrame { index, image });
                    env.progress.on_event(&CaptureEvent::FrameCaptured {
                        base_name: base_name.to_string(),
                        angle: angle_index + 1,
                        total_angles,
                        frame: index + 1,
                        frames,
                    });
                }
                Err(e) if e.is_frame_local() => {
                    tracing::warn!(frame = index, error = %e, "frame skipped");
                    env.progress.on_event(&CaptureEvent::FrameSkipped {
                        base_name: base_name.to_string(),
                        index,
                        reason: e.to_string(),
                    });
                }
                Err(e) => return Err(e),
            }
        }

        self.phase.set(CapturePhase::Composing { angle: angle_index });
        let sheet = compose(&collected, plan)?;
        let frames_drawn = sheet.frames_drawn();
        let artifact = SpriteSheetArtifact::new(
            base_name.to_string(),
            &angle.label,
            &clip.name,
            plan,
            sheet,
            Utc::now(),
        )?;
        Ok(AngleOutcome::Captured {
            artifact: Box::new(artifact),
            frames_drawn,
        })
    }
}

fn persist_all(sink: &mut dyn ArtifactSink, report: &mut CaptureReport) {
    let mut saved = Vec::with_capacity(report.artifacts.len());
    for artifact in report.artifacts.drain(..) {
        match persist_artifact(sink, &artifact) {
            Ok(()) => saved.push(artifact),
            Err(e) => {
                tracing::error!(sheet = %artifact.base_name, error = %e, "saving sheet failed");
                report
                    .failures
                    .push(CaptureError::angle(artifact.angle_label.clone(), e));
            }
        }
    }
    report.artifacts = saved;
}

/// State saved at run start.
#[derive(Clone, Copy, Debug)]
struct SavedState {
    render: RenderSnapshot,
    playback: PlaybackState,
    orbit_controls: bool,
}

/// Puts the host into recording mode and restores everything when dropped.
struct RecordingSession<'e, 'a, D: RenderDevice> {
    env: &'e mut CaptureEnv<'a, D>,
    saved: SavedState,
    phase: &'e Cell<CapturePhase>,
}

impl<'e, 'a, D: RenderDevice> RecordingSession<'e, 'a, D> {
    fn begin(env: &'e mut CaptureEnv<'a, D>, phase: &'e Cell<CapturePhase>) -> Self {
        env.host.set_record_enabled(false);
        env.host.leave_ortho_preview();
        let saved = SavedState {
            render: env.ctx.snapshot(),
            playback: PlaybackState::capture(&*env.driver),
            orbit_controls: env.host.orbit_controls_enabled(),
        };
        env.ctx.overlays_visible = false;
        env.host.set_orbit_controls_enabled(false);
        Self { env, saved, phase }
    }
}

impl<D: RenderDevice> Drop for RecordingSession<'_, '_, D> {
    fn drop(&mut self) {
        self.env.ctx.restore(self.saved.render);
        self.saved.playback.restore(&mut *self.env.driver);
        self.env
            .host
            .set_orbit_controls_enabled(self.saved.orbit_controls);
        self.env.host.set_record_enabled(true);
        self.phase.set(CapturePhase::Idle);
        tracing::debug!("render state restored");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/orchestrator.rs"]
mod tests;
