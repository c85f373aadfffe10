use crate::{
    foundation::core::Viewport,
    foundation::error::CaptureResult,
    render::device::{Readback, RenderDevice},
    scene::camera::{CameraPose, OrthoExtents, PreviewRig},
};

/// The shared render state: device, camera and preview rig.
///
/// Whoever holds `&mut RenderContext` (live preview or a capture run) owns camera pose,
/// viewport size and overlay visibility for that time.
#[derive(Debug)]
pub struct RenderContext<D> {
    /// Render device with the shared target.
    pub device: D,
    /// Capture (orthographic) camera.
    pub camera: CameraPose,
    /// Pan/zoom preview state.
    pub rig: PreviewRig,
    /// Whether helper overlays (grid, axes, boxes) are drawn.
    pub overlays_visible: bool,
}

/// Saved copy of everything a capture run may touch in a [`RenderContext`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderSnapshot {
    /// Camera pose.
    pub camera: CameraPose,
    /// Preview rig.
    pub rig: PreviewRig,
    /// Device viewport size.
    pub viewport: Viewport,
    /// Overlay visibility.
    pub overlays_visible: bool,
}

impl<D: RenderDevice> RenderContext<D> {
    /// Wrap a device with the camera at the rig's preview pose and overlays on.
    pub fn new(device: D, rig: PreviewRig) -> Self {
        Self {
            device,
            camera: rig.preview_pose(),
            rig,
            overlays_visible: true,
        }
    }

    /// Move the camera back to the rig's preview pose.
    pub fn sync_preview(&mut self) {
        self.rig.apply(&mut self.camera);
    }

    /// Copy the mutable render state.
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            camera: self.camera,
            rig: self.rig,
            viewport: self.device.viewport(),
            overlays_visible: self.overlays_visible,
        }
    }

    /// Write a snapshot back.
    pub fn restore(&mut self, snap: RenderSnapshot) {
        self.camera = snap.camera;
        self.rig = snap.rig;
        self.device.set_viewport(snap.viewport);
        self.overlays_visible = snap.overlays_visible;
    }

    /// Resize the target to `size` and fit the camera extents to its aspect.
    ///
    /// Both are restored when the returned lease drops, whatever happens in between.
    pub fn lease_viewport(&mut self, size: Viewport) -> ViewportLease<'_, D> {
        let saved_viewport = self.device.viewport();
        let saved_extents = self.camera.extents;
        self.device.set_viewport(size);
        self.camera.extents = OrthoExtents::for_aspect(self.rig.zoom, size.aspect());
        ViewportLease {
            ctx: self,
            saved_viewport,
            saved_extents,
        }
    }
}

/// Scoped claim on the viewport size and camera extents.
pub struct ViewportLease<'a, D: RenderDevice> {
    ctx: &'a mut RenderContext<D>,
    saved_viewport: Viewport,
    saved_extents: OrthoExtents,
}

impl<D: RenderDevice> ViewportLease<'_, D> {
    /// The context as seen under the lease.
    pub fn context(&self) -> &RenderContext<D> {
        self.ctx
    }

    /// Render through the leased camera, then read the pixels back.
    pub async fn render_and_read(&mut self) -> CaptureResult<Readback> {
        let RenderContext {
            device,
            camera,
            overlays_visible,
            ..
        } = &mut *self.ctx;
        device.render(camera, *overlays_visible).await?;
        device.read_pixels().await
    }
}

impl<D: RenderDevice> Drop for ViewportLease<'_, D> {
    fn drop(&mut self) {
        self.ctx.device.set_viewport(self.saved_viewport);
        self.ctx.camera.extents = self.saved_extents;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/context.rs"]
mod tests;
