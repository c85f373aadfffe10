use super::*;
use crate::{
    foundation::core::DVec2,
    render::{device::decode_readback, headless::HeadlessDevice},
};

fn ctx() -> RenderContext<HeadlessDevice> {
    RenderContext::new(HeadlessDevice::new(Viewport::new(300, 300)), PreviewRig::default())
}

#[test]
fn lease_applies_cell_size_and_aspect_then_restores() {
    let mut c = ctx();
    let before = c.snapshot();
    {
        let lease = c.lease_viewport(Viewport::new(200, 100));
        let inner = lease.context();
        assert_eq!(inner.device.viewport(), Viewport::new(200, 100));
        assert_eq!(inner.camera.extents, OrthoExtents::for_aspect(2.0, 2.0));
    }
    assert_eq!(c.snapshot(), before);
}

#[tokio::test]
async fn lease_renders_at_leased_size() {
    let mut c = ctx();
    let frame = {
        let mut lease = c.lease_viewport(Viewport::new(40, 20));
        decode_readback(lease.render_and_read().await.unwrap()).unwrap()
    };
    assert_eq!((frame.width, frame.height), (40, 20));
    assert_eq!(c.device.viewport(), Viewport::new(300, 300));
}

#[test]
fn lease_restores_when_dropped_unused() {
    let mut c = ctx();
    let before = c.snapshot();
    {
        let _lease = c.lease_viewport(Viewport::new(8, 8));
        // Dropped without rendering, as when a capture future is abandoned mid-frame.
    }
    assert_eq!(c.snapshot(), before);
}

#[test]
fn snapshot_restore_covers_rig_camera_and_overlays() {
    let mut c = ctx();
    let snap = c.snapshot();
    c.rig.nudge(2.0, 1.0);
    c.rig.zoom_by(3.0);
    c.sync_preview();
    c.overlays_visible = false;
    c.device.set_viewport(Viewport::new(1, 1));
    assert_ne!(c.snapshot(), snap);

    c.restore(snap);
    assert_eq!(c.snapshot(), snap);
    assert_eq!(c.rig.pan, DVec2::ZERO);
}
