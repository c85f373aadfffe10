use super::*;

#[test]
fn sanitize_keeps_word_chars_and_dashes() {
    assert_eq!(sanitize_animation_name("Armature|Walk Cycle"), "Armature_Walk_Cycle");
    assert_eq!(sanitize_animation_name("run-fast_2"), "run-fast_2");
    assert_eq!(sanitize_animation_name("café"), "caf_");
}

#[test]
fn base_name_appends_label_only_for_multi_angle_runs() {
    assert_eq!(sheet_base_name("Walk", "S", true), "Walk_S");
    assert_eq!(sheet_base_name("Walk", "CurrentView", false), "Walk");
    assert_eq!(sheet_base_name("", "N", true), "spritesheet_N");
}

#[test]
fn file_names_follow_convention() {
    let cell = CellSize {
        width: 128,
        height: 96,
    };
    assert_eq!(sheet_file_name("Walk_S", cell), "Walk_S_128x96px_sheet.png");
    assert_eq!(metadata_file_name("Walk_S"), "Walk_S_metadata.json");
}

#[test]
fn angle_is_recovered_from_base() {
    assert_eq!(angle_from_base_name("Walk_angle30"), "30");
    assert_eq!(angle_from_base_name("Walk_CurrentView"), "CurrentView");
    assert_eq!(angle_from_base_name("Walk_NE"), "NE");
    assert_eq!(angle_from_base_name("Walk"), "Default");
    assert_eq!(angle_from_base_name("Walk_Cycle"), "Default");
}

#[test]
fn metadata_angle_reads_only_the_label_suffix() {
    assert_eq!(metadata_angle("Run_N", "CurrentView"), "Default");
    assert_eq!(metadata_angle("Run_N_S", "S"), "S");
    assert_eq!(metadata_angle("Walk_angle30", "angle30"), "30");
    assert_eq!(metadata_angle("Walk_CurrentView", "CurrentView"), "CurrentView");
    assert_eq!(metadata_angle("Walk", ""), "Default");
}
