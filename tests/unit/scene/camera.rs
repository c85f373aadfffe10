use super::*;

fn close(a: DVec3, b: DVec3) -> bool {
    (a - b).length() < 1e-9
}

#[test]
fn extents_follow_aspect() {
    let e = OrthoExtents::for_aspect(2.0, 1.5);
    assert_eq!((e.left, e.right, e.top, e.bottom), (-3.0, 3.0, 2.0, -2.0));
    assert_eq!(e.width(), 6.0);
    assert_eq!(e.height(), 4.0);
    assert_eq!(OrthoExtents::square(1.0).width(), 2.0);
}

#[test]
fn preview_pose_frames_the_panned_pivot() {
    let mut rig = PreviewRig::default();
    rig.nudge(1.0, -2.0);
    assert_eq!(rig.pan, DVec2::new(0.25, -0.5));
    let pose = rig.preview_pose();
    assert!(close(pose.look_at, DVec3::new(0.25, 0.4, 0.0)));
    assert!(close(pose.position, DVec3::new(0.25, 0.4, 10.0)));
    assert_eq!(pose.extents, OrthoExtents::square(2.0));
}

#[test]
fn reset_and_zoom() {
    let mut rig = PreviewRig::default();
    rig.nudge(3.0, 3.0);
    rig.reset(true);
    assert_eq!(rig.pan, DVec2::ZERO);
    assert_eq!(rig.zoom, RESET_ZOOM_WITH_MODEL);
    rig.reset(false);
    assert_eq!(rig.zoom, RESET_ZOOM_EMPTY);

    rig.zoom_by(0.5);
    assert_eq!(rig.zoom, 1.25);
    rig.zoom_by(0.0);
    assert_eq!(rig.zoom, 1.25);
    rig.zoom_by(1e-9);
    assert_eq!(rig.zoom, MIN_ZOOM);
}

#[test]
fn basis_is_orthonormal_for_front_and_side_views() {
    let mut pose = PreviewRig::default().preview_pose();
    let (r, u, f) = pose.basis();
    assert!(close(r, DVec3::X));
    assert!(close(u, DVec3::Y));
    assert!(close(f, DVec3::NEG_Z));

    pose.place(CameraPlacement {
        position: DVec3::new(10.0, 0.9, 0.0),
        look_at: DVec3::new(0.0, 0.9, 0.0),
    });
    let (r, u, f) = pose.basis();
    assert!(r.dot(u).abs() < 1e-12);
    assert!(r.dot(f).abs() < 1e-12);
    assert!(close(u, DVec3::Y));
}

#[test]
fn basis_survives_top_down_view() {
    let pose = CameraPose {
        position: DVec3::new(0.0, 10.0, 0.0),
        look_at: DVec3::ZERO,
        extents: OrthoExtents::square(1.0),
    };
    let (r, u, f) = pose.basis();
    assert!(r.is_finite() && u.is_finite() && f.is_finite());
    assert!(close(f, DVec3::NEG_Y));
}

#[test]
fn projection_maps_pivot_to_centre() {
    let pose = PreviewRig::default().preview_pose();
    let p = pose.project_unit(pose.look_at);
    assert!((p.x - 0.5).abs() < 1e-12);
    assert!((p.y - 0.5).abs() < 1e-12);

    // Top-left corner of the view volume.
    let corner = pose.look_at + DVec3::new(-2.0, 2.0, 0.0);
    let p = pose.project_unit(corner);
    assert!(p.x.abs() < 1e-12);
    assert!(p.y.abs() < 1e-12);
}
