use chrono::TimeZone;

use super::*;
use crate::{
    atlas::composer::{Placement, SpriteSheet},
    foundation::core::CellSize,
    plan::{capture_plan::CapturePlan, viewpoint::AngleSpec},
};

fn artifact() -> SpriteSheetArtifact {
    let plan = CapturePlan::new(
        1,
        1,
        CellSize::new(4, 4).unwrap(),
        false,
        vec![AngleSpec::current_view()],
    )
    .unwrap();
    let sheet = SpriteSheet {
        image: image::RgbaImage::new(4, 4),
        columns: 1,
        rows: 1,
        placements: vec![Placement::Stretched],
    };
    let created = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
    SpriteSheetArtifact::new("Idle".to_string(), "CurrentView", "Idle", &plan, sheet, created)
        .unwrap()
}

#[test]
fn persist_writes_image_then_metadata() {
    let mut sink = InMemoryArtifactSink::new();
    persist_artifact(&mut sink, &artifact()).unwrap();

    let names: Vec<_> = sink.files().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["Idle_4x4px_sheet.png", "Idle_metadata.json"]);
    assert!(sink.get("Idle_4x4px_sheet.png").unwrap().starts_with(b"\x89PNG"));
    let json: serde_json::Value =
        serde_json::from_slice(sink.get("Idle_metadata.json").unwrap()).unwrap();
    assert_eq!(json["frameWidth"], 4);
    assert_eq!(json["date"], "2024-01-02T03:04:05.000Z");
}

#[test]
fn directory_sink_creates_dir_and_leaves_no_partials() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("sheets").join("walk");
    let mut sink = DirectorySink::new(&out);
    persist_artifact(&mut sink, &artifact()).unwrap();

    let mut entries: Vec<_> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    entries.sort();
    assert_eq!(entries, vec!["Idle_4x4px_sheet.png", "Idle_metadata.json"]);
}

#[test]
fn directory_sink_reports_unwritable_target() {
    let tmp = tempfile::tempdir().unwrap();
    let blocker = tmp.path().join("file");
    std::fs::write(&blocker, b"x").unwrap();
    let mut sink = DirectorySink::new(blocker.join("nested"));
    let err = sink.save("a.png", b"data").unwrap_err();
    assert!(err.to_string().contains("create output dir"));
}
