use super::*;
use crate::{
    animation::{driver::AnimationClip, player::ClipPlayer},
    capture::progress::RecordedProgress,
    foundation::core::{CellSize, DVec2, DVec3},
    plan::viewpoint::plan_angles,
    render::{device::Readback, headless::HeadlessDevice},
    scene::camera::{CameraPose, PreviewRig},
};

/// Headless device with scripted faults.
struct ScriptedDevice {
    inner: HeadlessDevice,
    reads: u32,
    garbage_reads: Vec<u32>,
    fail_positive_x: bool,
    renders: Vec<(DVec3, bool)>,
}

impl RenderDevice for ScriptedDevice {
    fn viewport(&self) -> Viewport {
        self.inner.viewport()
    }

    fn set_viewport(&mut self, size: Viewport) {
        self.inner.set_viewport(size);
    }

    async fn next_frame(&mut self) {
        self.inner.next_frame().await;
    }

    async fn render(&mut self, camera: &CameraPose, overlays: bool) -> CaptureResult<()> {
        self.renders.push((camera.position, overlays));
        if self.fail_positive_x && camera.position.x > 0.5 {
            return Err(CaptureError::render("context lost"));
        }
        self.inner.render(camera, overlays).await
    }

    async fn read_pixels(&mut self) -> CaptureResult<Readback> {
        let n = self.reads;
        self.reads += 1;
        if self.garbage_reads.contains(&n) {
            return Ok(Readback::Encoded(vec![1, 2, 3]));
        }
        self.inner.read_pixels().await
    }
}

#[derive(Default)]
struct TestHost {
    record_enabled: Option<bool>,
    orbit: bool,
    orbit_changes: Vec<bool>,
    left_preview: u32,
}

impl CaptureHost for TestHost {
    fn set_record_enabled(&mut self, enabled: bool) {
        self.record_enabled = Some(enabled);
    }

    fn set_orbit_controls_enabled(&mut self, enabled: bool) {
        self.orbit = enabled;
        self.orbit_changes.push(enabled);
    }

    fn orbit_controls_enabled(&self) -> bool {
        self.orbit
    }

    fn leave_ortho_preview(&mut self) {
        self.left_preview += 1;
    }
}

/// Cancels its token once `after` frames of angle `angle` are captured.
struct CancelAfter {
    token: CancelToken,
    angle: usize,
    after: u32,
}

impl ProgressSink for CancelAfter {
    fn on_event(&mut self, event: &CaptureEvent) {
        if let CaptureEvent::FrameCaptured { angle, frame, .. } = event
            && *angle == self.angle
            && *frame == self.after
        {
            self.token.cancel();
        }
    }
}

struct Bench {
    player: ClipPlayer,
    ctx: RenderContext<ScriptedDevice>,
    host: TestHost,
    progress: RecordedProgress,
}

fn bench(duration: f64) -> Bench {
    let player = ClipPlayer::new(vec![AnimationClip::new("Walk Cycle", duration)]);
    let dev = ScriptedDevice {
        inner: HeadlessDevice::new(Viewport::new(500, 400)).with_probe(player.probe()),
        reads: 0,
        garbage_reads: Vec::new(),
        fail_positive_x: false,
        renders: Vec::new(),
    };
    let rig = PreviewRig {
        zoom: 1.7,
        pan: DVec2::new(0.5, 0.25),
        ..PreviewRig::default()
    };
    Bench {
        player,
        ctx: RenderContext::new(dev, rig),
        host: TestHost {
            orbit: true,
            ..TestHost::default()
        },
        progress: RecordedProgress::new(),
    }
}

fn plan(frames: u32, isometric: bool) -> CapturePlan {
    CapturePlan::new(
        frames,
        2,
        CellSize::new(32, 32).unwrap(),
        false,
        plan_angles(isometric),
    )
    .unwrap()
}

async fn run(
    orch: &CaptureOrchestrator,
    plan: &CapturePlan,
    b: &mut Bench,
    cancel: CancelToken,
) -> CaptureResult<CaptureReport> {
    let mut env = CaptureEnv {
        driver: &mut b.player,
        ctx: &mut b.ctx,
        host: &mut b.host,
        progress: &mut b.progress,
        sink: None,
        cancel,
    };
    orch.run_capture(plan, &mut env).await
}

#[tokio::test]
async fn front_back_run_yields_one_sheet_per_angle() {
    let mut b = bench(1.0);
    let orch = CaptureOrchestrator::default();
    let report = run(&orch, &plan(3, false), &mut b, CancelToken::new())
        .await
        .unwrap();

    let names: Vec<_> = report
        .artifacts
        .iter()
        .map(|a| a.image_file_name())
        .collect();
    assert_eq!(
        names,
        vec!["Walk_Cycle_W_32x32px_sheet.png", "Walk_Cycle_E_32x32px_sheet.png"]
    );
    assert!(report.failures.is_empty());
    assert!(!report.cancelled);
    assert_eq!(report.artifacts[1].metadata.angle, "E");
    assert_eq!(report.artifacts[0].metadata.rows, 2);
    assert_eq!(orch.phase(), CapturePhase::Idle);
}

#[tokio::test]
async fn angles_orbit_the_panned_pivot_with_overlays_hidden() {
    let mut b = bench(1.0);
    let orch = CaptureOrchestrator::default();
    run(&orch, &plan(2, false), &mut b, CancelToken::new())
        .await
        .unwrap();

    let renders = &b.ctx.device.renders;
    assert_eq!(renders.len(), 4);
    assert!(renders.iter().all(|(_, overlays)| !overlays));
    // Preview camera sits 10 units in front of the pivot at (0.5, 1.15, 0).
    let (first, _) = renders[0];
    let (last, _) = renders[3];
    assert!((first.x - 10.5).abs() < 1e-9);
    assert!((last.x + 9.5).abs() < 1e-9);
    assert!((first.y - 1.15).abs() < 1e-9);
}

#[tokio::test]
async fn render_state_host_and_playback_are_restored() {
    let mut b = bench(1.0);
    b.player.set_paused(true);
    let before = b.ctx.snapshot();
    let orch = CaptureOrchestrator::default();
    run(&orch, &plan(4, true), &mut b, CancelToken::new())
        .await
        .unwrap();

    assert_eq!(b.ctx.snapshot(), before);
    assert!(b.player.is_running());
    assert!(b.player.is_paused());
    assert_eq!(b.host.record_enabled, Some(true));
    assert_eq!(b.host.orbit_changes, vec![false, true]);
    assert_eq!(b.host.left_preview, 1);
}

#[tokio::test]
async fn render_failure_fails_only_that_angle() {
    let mut b = bench(1.0);
    b.ctx.device.fail_positive_x = true;
    let before = b.ctx.snapshot();
    let orch = CaptureOrchestrator::default();
    let report = run(&orch, &plan(2, false), &mut b, CancelToken::new())
        .await
        .unwrap();

    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].angle_label, "E");
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(
        &report.failures[0],
        CaptureError::AngleCapture { label, .. } if label == "W"
    ));
    assert!(
        b.progress
            .events
            .iter()
            .any(|e| matches!(e, CaptureEvent::AngleFailed { label, .. } if label == "W"))
    );
    assert_eq!(b.ctx.snapshot(), before);
}

#[tokio::test]
async fn undecodable_frames_are_skipped_and_keep_their_cell() {
    let mut b = bench(1.0);
    b.ctx.device.garbage_reads = vec![1];
    let p = CapturePlan::new(
        3,
        3,
        CellSize::new(16, 16).unwrap(),
        false,
        vec![AngleSpec::current_view()],
    )
    .unwrap();
    let orch = CaptureOrchestrator::default();
    let report = run(&orch, &p, &mut b, CancelToken::new()).await.unwrap();

    assert_eq!(report.artifacts.len(), 1);
    let art = &report.artifacts[0];
    assert_eq!(art.metadata.frames, 3);
    let img = art.decode_image().unwrap();
    let cell_is_blank =
        |x0: u32| (0..16).all(|y| (x0..x0 + 16).all(|x| img.get_pixel(x, y).0[3] == 0));
    assert!(!cell_is_blank(0));
    assert!(cell_is_blank(16));
    assert!(!cell_is_blank(32));
    assert!(b.progress.events.iter().any(|e| matches!(
        e,
        CaptureEvent::FrameSkipped { index: 1, .. }
    )));
    assert!(b.progress.events.iter().any(|e| matches!(
        e,
        CaptureEvent::AngleCompleted { frames_drawn: 2, .. }
    )));
}

#[tokio::test]
async fn current_view_after_a_placed_angle_uses_the_preview_pose() {
    let current = |angles: Vec<AngleSpec>| {
        CapturePlan::new(1, 1, CellSize::new(64, 64).unwrap(), false, angles).unwrap()
    };
    let orch = CaptureOrchestrator::default();

    let mut alone = bench(1.0);
    let preview = alone.ctx.camera.position;
    let single = run(
        &orch,
        &current(vec![AngleSpec::current_view()]),
        &mut alone,
        CancelToken::new(),
    )
    .await
    .unwrap();

    let mut mixed = bench(1.0);
    let after = run(
        &orch,
        &current(vec![AngleSpec::at(90.0), AngleSpec::current_view()]),
        &mut mixed,
        CancelToken::new(),
    )
    .await
    .unwrap();

    assert_eq!(after.artifacts.len(), 2);
    let (placed, _) = mixed.ctx.device.renders[0];
    let (last, _) = *mixed.ctx.device.renders.last().unwrap();
    assert!((placed - preview).length() > 1.0);
    assert_eq!(last, preview);
    assert_eq!(
        after.artifacts[1].decode_image().unwrap(),
        single.artifacts[0].decode_image().unwrap()
    );
}

#[tokio::test]
async fn zero_duration_clip_skips_every_angle() {
    let mut b = bench(0.0);
    let orch = CaptureOrchestrator::default();
    let report = run(&orch, &plan(2, false), &mut b, CancelToken::new())
        .await
        .unwrap();
    assert!(report.artifacts.is_empty());
    assert!(report.failures.is_empty());
    assert_eq!(report.skipped_angles, vec!["W".to_string(), "E".to_string()]);
    assert_eq!(b.ctx.device.inner.frames_rendered(), 0);
}

#[tokio::test]
async fn missing_clip_is_rejected_before_touching_state() {
    let mut b = bench(1.0);
    b.player.clear();
    let before = b.ctx.snapshot();
    let orch = CaptureOrchestrator::default();
    let err = run(&orch, &plan(2, false), &mut b, CancelToken::new())
        .await
        .unwrap_err();

    assert!(matches!(err, CaptureError::Precondition(_)));
    assert!(!orch.gate().is_busy());
    assert_eq!(b.host.record_enabled, None);
    assert!(b.progress.events.is_empty());
    assert_eq!(b.ctx.snapshot(), before);
}

async fn cancelled_run(policy: CancelPolicy) -> (CaptureReport, Bench) {
    let mut b = bench(1.0);
    let before = b.ctx.snapshot();
    let token = CancelToken::new();
    let mut progress = CancelAfter {
        token: token.clone(),
        angle: 2,
        after: 1,
    };
    let orch = CaptureOrchestrator::new(OrchestratorOptions {
        cancel_policy: policy,
        ..OrchestratorOptions::default()
    });
    let mut env = CaptureEnv {
        driver: &mut b.player,
        ctx: &mut b.ctx,
        host: &mut b.host,
        progress: &mut progress,
        sink: None,
        cancel: token,
    };
    let report = orch.run_capture(&plan(3, false), &mut env).await.unwrap();
    assert_eq!(b.ctx.snapshot(), before);
    (report, b)
}

#[tokio::test]
async fn cancel_keeps_finished_sheets_by_default() {
    let (report, _) = cancelled_run(CancelPolicy::KeepPartial).await;
    assert!(report.cancelled);
    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.artifacts[0].angle_label, "W");
}

#[tokio::test]
async fn cancel_can_discard_everything() {
    let (report, b) = cancelled_run(CancelPolicy::DiscardPartial).await;
    assert!(report.cancelled);
    assert!(report.artifacts.is_empty());
    // Angle 1 sampled 3 frames, angle 2 stopped after its first.
    assert_eq!(b.ctx.device.inner.frames_rendered(), 4);
}
