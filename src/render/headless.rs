//! CPU proxy renderer used when no GPU scene is attached.
//!
//! The "character" is two boxes (torso and a swinging limb) posed from the committed animation
//! phase and projected through the orthographic capture camera. Output is deterministic for a
//! given pose, camera and viewport, which makes it suitable for tests and dry runs.

use std::f64::consts::TAU;

use crate::{
    animation::player::PoseProbe,
    foundation::core::{DVec3, FrameRGBA, Viewport},
    foundation::error::{CaptureError, CaptureResult},
    render::device::{Readback, RenderDevice, encode_png},
    scene::camera::{CameraPose, MODEL_HEIGHT},
};

const TORSO_HALF: DVec3 = DVec3::new(0.3, MODEL_HEIGHT / 2.0, 0.15);
const LIMB_HALF: DVec3 = DVec3::new(0.1, 0.1, 0.1);
const SWAY: f64 = 0.3;
const TORSO_RGBA: [u8; 4] = [214, 140, 96, 255];
const LIMB_RGBA: [u8; 4] = [96, 140, 214, 255];
const OVERLAY_RGBA: [u8; 4] = [136, 136, 136, 255];

/// Deterministic software [`RenderDevice`].
#[derive(Debug)]
pub struct HeadlessDevice {
    viewport: Viewport,
    probe: Option<PoseProbe>,
    encoded_readback: bool,
    last: Option<FrameRGBA>,
    frames_rendered: u64,
}

impl HeadlessDevice {
    /// Device with a target of `viewport` pixels and no pose source (rest pose).
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            probe: None,
            encoded_readback: false,
            last: None,
            frames_rendered: 0,
        }
    }

    /// Pose the proxy from the given probe.
    pub fn with_probe(mut self, probe: PoseProbe) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Hand back PNG bytes instead of raw pixels, like a canvas `toDataURL`.
    pub fn with_encoded_readback(mut self, encoded: bool) -> Self {
        self.encoded_readback = encoded;
        self
    }

    /// Number of completed renders.
    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    fn phase(&self) -> f64 {
        self.probe
            .as_ref()
            .and_then(PoseProbe::get)
            .map(|p| p.phase())
            .unwrap_or(0.0)
    }

    fn rasterize(&self, camera: &CameraPose, overlays_visible: bool) -> FrameRGBA {
        let Viewport { width, height } = self.viewport;
        let mut frame = FrameRGBA::transparent(width, height);
        if width == 0 || height == 0 {
            return frame;
        }

        if overlays_visible {
            let ground = camera.project_unit(DVec3::ZERO);
            let y = (ground.y * f64::from(height)).floor();
            if (0.0..f64::from(height)).contains(&y) {
                fill_rect(&mut frame, 0, y as u32, width, y as u32 + 1, OVERLAY_RGBA);
            }
        }

        let angle = self.phase() * TAU;
        let torso_centre = DVec3::new(SWAY * angle.sin(), MODEL_HEIGHT / 2.0, 0.0);
        let limb_centre = DVec3::new(
            torso_centre.x + 2.0 * SWAY * angle.sin(),
            MODEL_HEIGHT * 0.66 + SWAY * angle.cos(),
            0.0,
        );
        draw_box(&mut frame, camera, torso_centre, TORSO_HALF, TORSO_RGBA);
        draw_box(&mut frame, camera, limb_centre, LIMB_HALF, LIMB_RGBA);
        frame
    }
}

fn draw_box(frame: &mut FrameRGBA, camera: &CameraPose, centre: DVec3, half: DVec3, rgba: [u8; 4]) {
    let (w, h) = (f64::from(frame.width), f64::from(frame.height));
    let mut min = (f64::INFINITY, f64::INFINITY);
    let mut max = (f64::NEG_INFINITY, f64::NEG_INFINITY);
    for sx in [-1.0, 1.0] {
        for sy in [-1.0, 1.0] {
            for sz in [-1.0, 1.0] {
                let corner = centre + half * DVec3::new(sx, sy, sz);
                let p = camera.project_unit(corner);
                min = (min.0.min(p.x * w), min.1.min(p.y * h));
                max = (max.0.max(p.x * w), max.1.max(p.y * h));
            }
        }
    }

    let x0 = min.0.floor().clamp(0.0, w) as u32;
    let y0 = min.1.floor().clamp(0.0, h) as u32;
    let x1 = max.0.ceil().clamp(0.0, w) as u32;
    let y1 = max.1.ceil().clamp(0.0, h) as u32;
    fill_rect(frame, x0, y0, x1, y1, rgba);
}

fn fill_rect(frame: &mut FrameRGBA, x0: u32, y0: u32, x1: u32, y1: u32, rgba: [u8; 4]) {
    let stride = frame.width as usize * 4;
    for y in y0..y1.min(frame.height) {
        for x in x0..x1.min(frame.width) {
            let i = y as usize * stride + x as usize * 4;
            frame.data[i..i + 4].copy_from_slice(&rgba);
        }
    }
}

impl RenderDevice for HeadlessDevice {
    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn set_viewport(&mut self, size: Viewport) {
        self.viewport = size;
    }

    async fn next_frame(&mut self) {
        tokio::task::yield_now().await;
    }

    async fn render(&mut self, camera: &CameraPose, overlays_visible: bool) -> CaptureResult<()> {
        let frame = self.rasterize(camera, overlays_visible);
        self.last = Some(frame);
        self.frames_rendered += 1;
        tokio::task::yield_now().await;
        Ok(())
    }

    async fn read_pixels(&mut self) -> CaptureResult<Readback> {
        let frame = self
            .last
            .as_ref()
            .ok_or_else(|| CaptureError::render("read_pixels called before any render"))?;
        if self.encoded_readback {
            Ok(Readback::Encoded(encode_png(frame)?))
        } else {
            Ok(Readback::Rgba(frame.clone()))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/headless.rs"]
mod tests;
