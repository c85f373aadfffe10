use crate::foundation::error::{CaptureError, CaptureResult};

pub use glam::{DVec2, DVec3};

/// Pixel size of the shared render target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Viewport {
    /// Create a viewport of `width x height` pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width over height; `1.0` for degenerate sizes.
    pub fn aspect(self) -> f64 {
        if self.width == 0 || self.height == 0 {
            return 1.0;
        }
        f64::from(self.width) / f64::from(self.height)
    }
}

/// Pixel size of one atlas cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CellSize {
    /// Cell width in pixels.
    pub width: u32,
    /// Cell height in pixels.
    pub height: u32,
}

impl CellSize {
    /// Create a validated cell size (both dimensions > 0).
    pub fn new(width: u32, height: u32) -> CaptureResult<Self> {
        if width == 0 || height == 0 {
            return Err(CaptureError::validation("cell size must be > 0 on both axes"));
        }
        Ok(Self { width, height })
    }
}

impl From<CellSize> for Viewport {
    fn from(cell: CellSize) -> Self {
        Self {
            width: cell.width,
            height: cell.height,
        }
    }
}

/// A decoded frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameRGBA {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
}

impl FrameRGBA {
    /// Fully transparent frame of the given size.
    pub fn transparent(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; (width as usize) * (height as usize) * 4],
        }
    }

    /// `true` when the frame has no natural size (never decoded, or zero-sized).
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// `true` when `data` matches `width * height * 4`.
    pub fn is_well_formed(&self) -> bool {
        (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|px| px.checked_mul(4))
            .is_some_and(|len| len == self.data.len())
    }

    /// Alpha at `(x, y)`, or `None` outside the frame.
    pub fn alpha_at(&self, x: u32, y: u32) -> Option<u8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = ((y as usize) * (self.width as usize) + (x as usize)) * 4 + 3;
        self.data.get(idx).copied()
    }

    /// Wrap an `image` buffer without copying.
    pub fn from_image(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }

    /// Convert into an `image` buffer, checking the byte length.
    pub fn into_image(self) -> CaptureResult<image::RgbaImage> {
        let (w, h) = (self.width, self.height);
        image::RgbaImage::from_raw(w, h, self.data)
            .ok_or_else(|| CaptureError::decode(format!("frame buffer does not match {w}x{h}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
