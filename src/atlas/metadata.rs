use chrono::{DateTime, SecondsFormat, Utc};

use crate::{
    atlas::composer::SpriteSheet,
    atlas::naming::{metadata_angle, metadata_file_name, sheet_file_name},
    foundation::core::{CellSize, FrameRGBA},
    foundation::error::{CaptureError, CaptureResult},
    plan::capture_plan::CapturePlan,
    render::device::encode_png,
};

/// Sidecar descriptor written next to every sheet.
///
/// Key names and order match the files existing tooling already parses.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SheetMetadata {
    /// Cell width in pixels.
    pub frame_width: u32,
    /// Cell height in pixels.
    pub frame_height: u32,
    /// Planned frames per angle (skipped frames keep their blank cell).
    pub frames: u32,
    /// Grid columns.
    pub columns: u32,
    /// Grid rows.
    pub rows: u32,
    /// Unsanitized clip name.
    pub animation_name: String,
    /// Angle label derived from the file base.
    pub angle: String,
    /// Whether frames were cropped to content.
    pub optimized: bool,
    /// Creation time, ISO-8601 UTC with milliseconds.
    pub date: String,
}

/// Final output for one angle: PNG bytes plus metadata.
#[derive(Clone, Debug)]
pub struct SpriteSheetArtifact {
    /// File base (sanitized clip name and optional angle suffix).
    pub base_name: String,
    /// Angle label this sheet was captured from.
    pub angle_label: String,
    /// Cell size used for the file name.
    pub cell: CellSize,
    /// Encoded PNG image.
    pub png: Vec<u8>,
    /// Sidecar metadata.
    pub metadata: SheetMetadata,
}

impl SpriteSheetArtifact {
    /// Encode `sheet` and describe it.
    pub fn new(
        base_name: String,
        angle_label: &str,
        animation_name: &str,
        plan: &CapturePlan,
        sheet: SpriteSheet,
        created: DateTime<Utc>,
    ) -> CaptureResult<Self> {
        let (columns, rows) = (sheet.columns, sheet.rows);
        let png = encode_png(&FrameRGBA::from_image(sheet.image))?;
        let metadata = SheetMetadata {
            frame_width: plan.cell().width,
            frame_height: plan.cell().height,
            frames: plan.frame_count(),
            columns,
            rows,
            animation_name: animation_name.to_string(),
            angle: metadata_angle(&base_name, angle_label),
            optimized: plan.optimize(),
            date: created.to_rfc3339_opts(SecondsFormat::Millis, true),
        };
        Ok(Self {
            base_name,
            angle_label: angle_label.to_string(),
            cell: plan.cell(),
            png,
            metadata,
        })
    }

    /// `{base}_{w}x{h}px_sheet.png`
    pub fn image_file_name(&self) -> String {
        sheet_file_name(&self.base_name, self.cell)
    }

    /// `{base}_metadata.json`
    pub fn metadata_file_name(&self) -> String {
        metadata_file_name(&self.base_name)
    }

    /// Pretty-printed (two-space) metadata JSON.
    pub fn metadata_json(&self) -> CaptureResult<String> {
        serde_json::to_string_pretty(&self.metadata)
            .map_err(|e| CaptureError::Other(anyhow::Error::new(e).context("serialize metadata")))
    }

    /// Decode the PNG back into pixels.
    pub fn decode_image(&self) -> CaptureResult<image::RgbaImage> {
        image::load_from_memory(&self.png)
            .map(|img| img.to_rgba8())
            .map_err(|e| CaptureError::decode(format!("decode sheet png: {e}")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/metadata.rs"]
mod tests;
