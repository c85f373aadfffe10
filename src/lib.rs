//! Spritecap captures animated models into sprite-sheet atlases.
//!
//! A run scrubs the active animation clip to evenly spaced times, renders each pose through an
//! orthographic camera at a fixed cell size, and lays the frames out on a grid:
//!
//! - Build a [`CapturePlan`] (usually from [`CaptureSettings`])
//! - Borrow the live state into a [`CaptureEnv`]
//! - Run it with a [`CaptureOrchestrator`] and collect one [`SpriteSheetArtifact`] per angle
//!
//! The render state (camera, preview rig, viewport, overlays) is restored after every run.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Content-bounds analysis.
pub mod analyze;
/// Animation driving.
pub mod animation;
/// Atlas composition, naming and metadata.
pub mod atlas;
/// Capture orchestration.
pub mod capture;
/// Shared types and errors.
pub mod foundation;
/// Artifact persistence.
pub mod output;
/// Run planning.
pub mod plan;
/// Render devices.
pub mod render;
/// Frame sampling.
pub mod sample;
/// Camera and render context.
pub mod scene;

pub use crate::analyze::bounds::{BoundsAnalysis, FrameBounds, analyze};
pub use crate::animation::driver::{AnimationClip, AnimationDriver, PlaybackState};
pub use crate::animation::player::{ClipPlayer, PoseProbe};
pub use crate::atlas::composer::{RenderedFrame, SpriteSheet, compose};
pub use crate::atlas::metadata::{SheetMetadata, SpriteSheetArtifact};
pub use crate::capture::cancel::{CancelPolicy, CancelToken};
pub use crate::capture::gate::CaptureGate;
pub use crate::capture::host::{CaptureHost, NoopHost};
pub use crate::capture::orchestrator::{
    CaptureEnv, CaptureOrchestrator, CapturePhase, CaptureReport, OrchestratorOptions,
};
pub use crate::capture::progress::{CaptureEvent, ProgressSink, RecordedProgress, TracingProgress};
pub use crate::foundation::core::{CellSize, FrameRGBA, Viewport};
pub use crate::foundation::error::{CaptureError, CaptureResult};
pub use crate::output::sink::{ArtifactSink, DirectorySink, InMemoryArtifactSink, persist_artifact};
pub use crate::plan::capture_plan::CapturePlan;
pub use crate::plan::settings::CaptureSettings;
pub use crate::plan::viewpoint::{AngleSpec, OrbitRing, plan_angles};
pub use crate::render::device::{Readback, RenderDevice};
pub use crate::render::headless::HeadlessDevice;
pub use crate::sample::sampler::{FrameSampler, SamplerOptions};
pub use crate::scene::camera::{CameraPose, PreviewRig};
pub use crate::scene::context::RenderContext;
