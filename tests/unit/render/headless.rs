use super::*;
use crate::{
    animation::{
        driver::{AnimationClip, AnimationDriver},
        player::ClipPlayer,
    },
    plan::viewpoint::OrbitRing,
    scene::camera::PreviewRig,
};

fn opaque_in_row(frame: &FrameRGBA, y: u32) -> usize {
    (0..frame.width)
        .filter(|&x| frame.alpha_at(x, y).unwrap() > 0)
        .count()
}

#[test]
fn front_view_draws_centred_torso_on_transparent_background() {
    let dev = HeadlessDevice::new(Viewport::new(64, 64));
    let cam = PreviewRig::default().preview_pose();
    let f = dev.rasterize(&cam, false);
    assert_eq!(f.alpha_at(32, 32), Some(255));
    assert_eq!(f.alpha_at(0, 0), Some(0));
    assert_eq!(f.alpha_at(63, 63), Some(0));
}

#[test]
fn overlays_only_drawn_when_visible() {
    let dev = HeadlessDevice::new(Viewport::new(64, 64));
    let cam = PreviewRig::default().preview_pose();
    assert_eq!(dev.rasterize(&cam, true).alpha_at(0, 46), Some(255));
    assert_eq!(dev.rasterize(&cam, false).alpha_at(0, 46), Some(0));
}

#[test]
fn side_view_is_narrower_than_front_view() {
    let dev = HeadlessDevice::new(Viewport::new(64, 64));
    let rig = PreviewRig::default();
    let front = rig.preview_pose();
    let mut side = front;
    let ring = OrbitRing::from_camera(front.position, rig.pivot());
    side.place(ring.placement(90.0));

    let wf = opaque_in_row(&dev.rasterize(&front, false), 40);
    let ws = opaque_in_row(&dev.rasterize(&side, false), 40);
    assert!(ws < wf, "side {ws} front {wf}");
}

#[test]
fn pose_changes_the_picture() {
    let mut player = ClipPlayer::new(vec![AnimationClip::new("walk", 1.0)]);
    let dev = HeadlessDevice::new(Viewport::new(64, 64)).with_probe(player.probe());
    let cam = PreviewRig::default().preview_pose();

    player.set_paused(true);
    player.set_time(0.0);
    player.advance(0.0);
    let a = dev.rasterize(&cam, false);
    player.set_time(0.25);
    player.advance(0.0);
    let b = dev.rasterize(&cam, false);
    assert_ne!(a, b);
}

#[tokio::test]
async fn read_before_render_fails_and_encoded_readback_decodes() {
    let mut dev = HeadlessDevice::new(Viewport::new(16, 8)).with_encoded_readback(true);
    assert!(matches!(
        dev.read_pixels().await,
        Err(CaptureError::Render(_))
    ));

    let cam = PreviewRig::default().preview_pose();
    dev.render(&cam, false).await.unwrap();
    assert_eq!(dev.frames_rendered(), 1);
    let Readback::Encoded(bytes) = dev.read_pixels().await.unwrap() else {
        panic!("expected encoded readback");
    };
    let frame = crate::render::device::decode_readback(Readback::Encoded(bytes)).unwrap();
    assert_eq!((frame.width, frame.height), (16, 8));
}
