use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CaptureError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CaptureError::precondition("x")
            .to_string()
            .contains("precondition error:")
    );
    assert!(
        CaptureError::concurrency("x")
            .to_string()
            .contains("concurrency error:")
    );
    assert!(CaptureError::decode("x").to_string().contains("decode error:"));
    assert!(
        CaptureError::composition("x")
            .to_string()
            .contains("composition error:")
    );
}

#[test]
fn angle_wraps_label_and_source() {
    let err = CaptureError::angle("NE", CaptureError::render("device lost"));
    let text = err.to_string();
    assert!(text.contains("'NE'"));
    assert!(text.contains("device lost"));
    let src = std::error::Error::source(&err).unwrap();
    assert!(src.to_string().contains("render error:"));
}

#[test]
fn frame_local_errors() {
    assert!(CaptureError::decode("x").is_frame_local());
    assert!(CaptureError::timeout("x").is_frame_local());
    assert!(!CaptureError::render("x").is_frame_local());
    assert!(!CaptureError::precondition("x").is_frame_local());
    assert!(!CaptureError::Cancelled.is_frame_local());
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CaptureError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
