use std::future::Future;

use crate::{
    foundation::core::{FrameRGBA, Viewport},
    foundation::error::{CaptureError, CaptureResult},
    scene::camera::CameraPose,
};

/// Pixels handed back by a device after a render.
#[derive(Clone, Debug)]
pub enum Readback {
    /// Raw straight-alpha RGBA8 pixels.
    Rgba(FrameRGBA),
    /// An encoded image (PNG or any format the `image` crate reads).
    Encoded(Vec<u8>),
}

/// The render subsystem as seen by the capture pipeline.
///
/// Rendering is asynchronous relative to scene updates: every method returning a future
/// suspends until the device confirms the corresponding step. Implementations are driven from
/// a single task; no method is called while another one's future is pending.
pub trait RenderDevice {
    /// Current size of the shared render target.
    fn viewport(&self) -> Viewport;

    /// Resize the shared render target.
    fn set_viewport(&mut self, size: Viewport);

    /// Suspend until the next render cycle has run.
    fn next_frame(&mut self) -> impl Future<Output = ()>;

    /// Render the scene through `camera`; resolves once the frame is complete.
    ///
    /// `overlays_visible` controls helper geometry (grid, axes, bounding boxes).
    fn render(
        &mut self,
        camera: &CameraPose,
        overlays_visible: bool,
    ) -> impl Future<Output = CaptureResult<()>>;

    /// Read back the last rendered frame; resolves once pixels are available.
    fn read_pixels(&mut self) -> impl Future<Output = CaptureResult<Readback>>;
}

/// Turn a read-back into a decoded bitmap.
///
/// Malformed raw buffers, undecodable bytes and zero-sized images all fail with
/// [`CaptureError::Decode`].
pub fn decode_readback(readback: Readback) -> CaptureResult<FrameRGBA> {
    let frame = match readback {
        Readback::Rgba(frame) => {
            if !frame.is_well_formed() {
                return Err(CaptureError::decode(format!(
                    "raw readback holds {} bytes, expected {}x{}x4",
                    frame.data.len(),
                    frame.width,
                    frame.height
                )));
            }
            frame
        }
        Readback::Encoded(bytes) => {
            let img = image::load_from_memory(&bytes)
                .map_err(|e| CaptureError::decode(format!("decode readback image: {e}")))?;
            FrameRGBA::from_image(img.to_rgba8())
        }
    };

    if frame.is_empty() {
        return Err(CaptureError::decode("readback has zero natural size"));
    }
    Ok(frame)
}

/// Encode a frame as PNG bytes.
pub fn encode_png(frame: &FrameRGBA) -> CaptureResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::write_buffer_with_format(
        &mut std::io::Cursor::new(&mut buf),
        &frame.data,
        frame.width,
        frame.height,
        image::ExtendedColorType::Rgba8,
        image::ImageFormat::Png,
    )
    .map_err(|e| CaptureError::Other(anyhow::Error::new(e).context("encode png")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/render/device.rs"]
mod tests;
