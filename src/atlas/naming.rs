//! Output file naming. Downstream tooling parses these names, so the format is fixed:
//! `{base}_{w}x{h}px_sheet.png` and `{base}_metadata.json`, where `base` is the sanitized clip
//! name optionally followed by `_{angleLabel}`.

use crate::{foundation::core::CellSize, plan::viewpoint::is_compass_label};

/// Base used when the clip name sanitizes to nothing.
pub const FALLBACK_BASE: &str = "spritesheet";

/// Replace every character outside `[A-Za-z0-9_-]` with `_`.
pub fn sanitize_animation_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// File base for one angle's sheet.
pub fn sheet_base_name(animation_name: &str, angle_label: &str, multi_angle: bool) -> String {
    let mut base = sanitize_animation_name(animation_name);
    if base.is_empty() {
        base.push_str(FALLBACK_BASE);
    }
    if multi_angle {
        base.push('_');
        base.push_str(angle_label);
    }
    base
}

/// `{base}_{w}x{h}px_sheet.png`
pub fn sheet_file_name(base: &str, cell: CellSize) -> String {
    format!("{base}_{}x{}px_sheet.png", cell.width, cell.height)
}

/// `{base}_metadata.json`
pub fn metadata_file_name(base: &str) -> String {
    format!("{base}_metadata.json")
}

/// Angle label recovered from a file base.
///
/// `_angle{deg}` yields `{deg}`; a `_CurrentView` suffix yields `CurrentView`; a trailing
/// compass code yields that code; anything else (including single-angle sheets) is `Default`.
pub fn angle_from_base_name(base: &str) -> String {
    const ANGLE_TAG: &str = "_angle";
    if let Some(pos) = base.rfind(ANGLE_TAG) {
        return base[pos + ANGLE_TAG.len()..].to_string();
    }
    if base.contains("_CurrentView") {
        return "CurrentView".to_string();
    }
    if let Some((_, suffix)) = base.rsplit_once('_')
        && is_compass_label(suffix)
    {
        return suffix.to_string();
    }
    "Default".to_string()
}

/// Metadata angle for a sheet saved under `base` for the angle labelled `angle_label`.
///
/// Only a base that carries the `_{angle_label}` suffix is parsed, so a single-angle sheet of a
/// clip named like `Run_N` still reports `Default`.
pub fn metadata_angle(base: &str, angle_label: &str) -> String {
    match base.strip_suffix(angle_label) {
        Some(rest) if !angle_label.is_empty() && rest.ends_with('_') => angle_from_base_name(base),
        _ => "Default".to_string(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/atlas/naming.rs"]
mod tests;
