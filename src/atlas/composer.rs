use image::{ImageBuffer, Rgba, RgbaImage, imageops};
use rayon::prelude::*;

use crate::{
    analyze::bounds::{BoundsAnalysis, FrameBounds, analyze},
    foundation::core::{CellSize, FrameRGBA},
    foundation::error::{CaptureError, CaptureResult},
    plan::capture_plan::CapturePlan,
};

/// A captured frame and its position in the angle's sequence.
#[derive(Clone, Debug)]
pub struct RenderedFrame {
    /// 0-based frame index; decides the grid cell.
    pub index: u32,
    /// Decoded pixels.
    pub image: FrameRGBA,
}

/// How one frame ended up in its cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    /// Whole frame scaled to fill the cell.
    Stretched,
    /// Content box drawn at native size, centred in the cell.
    Cropped {
        /// Source box.
        bounds: FrameBounds,
        /// Horizontal offset inside the cell (negative when the box is wider than the cell).
        offset_x: i64,
        /// Vertical offset inside the cell.
        offset_y: i64,
    },
    /// Frame was unusable; the cell stays blank.
    Skipped,
}

/// A composed atlas before encoding.
#[derive(Clone, Debug)]
pub struct SpriteSheet {
    /// Atlas pixels, `columns * cell_width` by `rows * cell_height`.
    pub image: RgbaImage,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Placement per input frame, in input order.
    pub placements: Vec<Placement>,
}

impl SpriteSheet {
    /// Frames that were actually drawn.
    pub fn frames_drawn(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| !matches!(p, Placement::Skipped))
            .count()
    }
}

/// Decide how a frame is placed given its bounds analysis.
pub fn placement_for(analysis: Option<&BoundsAnalysis>, cell: CellSize) -> Placement {
    let Some(a) = analysis else {
        return Placement::Stretched;
    };
    if a.degraded || a.bounds.width == 0 || a.bounds.height == 0 {
        return Placement::Stretched;
    }
    Placement::Cropped {
        bounds: a.bounds,
        offset_x: (i64::from(cell.width) - i64::from(a.bounds.width)).div_euclid(2),
        offset_y: (i64::from(cell.height) - i64::from(a.bounds.height)).div_euclid(2),
    }
}

/// Lay `frames` out on the plan's grid.
///
/// Frames are placed by index (`row = i / columns`, `column = i % columns`). Unusable frames and
/// indices outside the plan are skipped, leaving their cell blank. With `optimize`, each frame
/// is cropped to its content and centred; frames with degraded bounds fall back to a stretched
/// draw.
#[tracing::instrument(skip_all, fields(frames = frames.len(), optimize = plan.optimize()))]
pub fn compose(frames: &[RenderedFrame], plan: &CapturePlan) -> CaptureResult<SpriteSheet> {
    if frames.is_empty() {
        return Err(CaptureError::composition("no frames to compose"));
    }

    let cell = plan.cell();
    let (width, height) = plan.atlas_size();
    let bytes = u64::from(width) * u64::from(height) * 4;
    if bytes > isize::MAX as u64 {
        return Err(CaptureError::composition(format!(
            "atlas of {width}x{height} is too large"
        )));
    }
    let mut canvas = RgbaImage::new(width, height);

    let analyses: Vec<Option<BoundsAnalysis>> = if plan.optimize() {
        frames
            .par_iter()
            .map(|f| Some(analyze(&f.image, cell)))
            .collect()
    } else {
        vec![None; frames.len()]
    };

    let mut placements = Vec::with_capacity(frames.len());
    for (frame, analysis) in frames.iter().zip(&analyses) {
        let Some((x, y)) = plan.cell_origin(frame.index) else {
            tracing::warn!(index = frame.index, "frame index outside the grid, skipping");
            placements.push(Placement::Skipped);
            continue;
        };
        let Some(src) = view(&frame.image) else {
            tracing::warn!(index = frame.index, "frame has no usable pixels, leaving cell blank");
            placements.push(Placement::Skipped);
            continue;
        };

        let placement = placement_for(analysis.as_ref(), cell);
        if let Some(a) = analysis
            && a.degraded
        {
            tracing::warn!(index = frame.index, "bounds degraded, drawing full frame");
        }
        match placement {
            Placement::Stretched => draw_stretched(&mut canvas, &src, x, y, cell),
            Placement::Cropped {
                bounds,
                offset_x,
                offset_y,
            } => draw_cropped(&mut canvas, &src, (x, y), cell, bounds, (offset_x, offset_y)),
            Placement::Skipped => {}
        }
        placements.push(placement);
    }

    Ok(SpriteSheet {
        image: canvas,
        columns: plan.columns(),
        rows: plan.rows(),
        placements,
    })
}

type FrameView<'a> = ImageBuffer<Rgba<u8>, &'a [u8]>;

fn view(frame: &FrameRGBA) -> Option<FrameView<'_>> {
    if frame.is_empty() || !frame.is_well_formed() {
        return None;
    }
    ImageBuffer::from_raw(frame.width, frame.height, frame.data.as_slice())
}

fn draw_stretched(canvas: &mut RgbaImage, src: &FrameView<'_>, x: u32, y: u32, cell: CellSize) {
    if src.dimensions() == (cell.width, cell.height) {
        imageops::replace(canvas, src, i64::from(x), i64::from(y));
        return;
    }
    let scaled = imageops::resize(src, cell.width, cell.height, imageops::FilterType::Triangle);
    imageops::replace(canvas, &scaled, i64::from(x), i64::from(y));
}

fn draw_cropped(
    canvas: &mut RgbaImage,
    src: &FrameView<'_>,
    origin: (u32, u32),
    cell: CellSize,
    bounds: FrameBounds,
    offset: (i64, i64),
) {
    // Clip the box to the frame, then to the cell, so content never spills into a neighbour.
    let bw = bounds.width.min(src.width().saturating_sub(bounds.left));
    let bh = bounds.height.min(src.height().saturating_sub(bounds.top));
    let skip_x = (-offset.0).max(0) as u32;
    let skip_y = (-offset.1).max(0) as u32;
    let dst_x = offset.0.max(0) as u32;
    let dst_y = offset.1.max(0) as u32;
    let draw_w = bw.saturating_sub(skip_x).min(cell.width.saturating_sub(dst_x));
    let draw_h = bh.saturating_sub(skip_y).min(cell.height.saturating_sub(dst_y));
    if draw_w == 0 || draw_h == 0 {
        return;
    }

    let (sx, sy) = (bounds.left + skip_x, bounds.top + skip_y);
    let part = RgbaImage::from_fn(draw_w, draw_h, |x, y| *src.get_pixel(sx + x, sy + y));
    imageops::replace(
        canvas,
        &part,
        i64::from(origin.0 + dst_x),
        i64::from(origin.1 + dst_y),
    );
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/composer.rs"]
mod tests;
