use crate::foundation::core::{CellSize, FrameRGBA};

/// Pixels with alpha at or below this value are treated as empty (anti-aliasing fringe).
pub const ALPHA_THRESHOLD: u8 = 10;

/// Tight content box in source-frame pixels. Width and height are always >= 1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameBounds {
    /// Left edge (inclusive).
    pub left: u32,
    /// Top edge (inclusive).
    pub top: u32,
    /// Box width.
    pub width: u32,
    /// Box height.
    pub height: u32,
}

impl FrameBounds {
    /// Bounds covering a whole `width x height` image.
    pub fn full(width: u32, height: u32) -> Self {
        Self {
            left: 0,
            top: 0,
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Whether `(x, y)` lies inside the box.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.left
            && y >= self.top
            && x - self.left < self.width
            && y - self.top < self.height
    }
}

/// Result of a content scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct BoundsAnalysis {
    /// Bounds to crop to.
    pub bounds: FrameBounds,
    /// Pixel data could not be trusted; `bounds` is a full-cell fallback and the frame should
    /// be drawn stretched instead of cropped.
    pub degraded: bool,
    /// At least one pixel passed the alpha threshold.
    pub content_found: bool,
}

/// Edge margin kept around content: `ceil(1% of min(width, height))`.
pub fn margin_for(width: u32, height: u32) -> u32 {
    width.min(height).div_ceil(100)
}

/// Find the box enclosing every pixel with alpha above [`ALPHA_THRESHOLD`].
///
/// - Frames with no such pixel report the full frame.
/// - Zero-sized or malformed frames report a full `fallback` cell, tagged degraded.
/// - Otherwise the tight box grows by [`margin_for`] on every side, clamped to the frame.
pub fn analyze(frame: &FrameRGBA, fallback: CellSize) -> BoundsAnalysis {
    if frame.is_empty() || !frame.is_well_formed() {
        tracing::warn!(
            width = frame.width,
            height = frame.height,
            bytes = frame.data.len(),
            "frame pixels unusable, falling back to full cell"
        );
        return BoundsAnalysis {
            bounds: FrameBounds::full(fallback.width, fallback.height),
            degraded: true,
            content_found: false,
        };
    }

    let (w, h) = (frame.width, frame.height);
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0u32;
    let mut max_y = 0u32;
    let mut found = false;

    for (y, row) in frame.data.chunks_exact(w as usize * 4).enumerate() {
        for (x, px) in row.chunks_exact(4).enumerate() {
            if px[3] > ALPHA_THRESHOLD {
                let (x, y) = (x as u32, y as u32);
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);
                found = true;
            }
        }
    }

    if !found {
        tracing::debug!(width = w, height = h, "no content above alpha threshold");
        return BoundsAnalysis {
            bounds: FrameBounds::full(w, h),
            degraded: false,
            content_found: false,
        };
    }

    let margin = margin_for(w, h);
    let left = min_x.saturating_sub(margin);
    let top = min_y.saturating_sub(margin);
    let right = (max_x + margin).min(w - 1);
    let bottom = (max_y + margin).min(h - 1);

    BoundsAnalysis {
        bounds: FrameBounds {
            left,
            top,
            width: (right - left + 1).max(1),
            height: (bottom - top + 1).max(1),
        },
        degraded: false,
        content_found: true,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/analyze/bounds.rs"]
mod tests;
