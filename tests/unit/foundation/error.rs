use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        ScrubError::configuration("x")
            .to_string()
            .contains("configuration error:")
    );
    assert!(ScrubError::render("x").to_string().contains("render error:"));
    assert!(
        ScrubError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn load_failure_names_frame_and_locator() {
    let err = ScrubError::from(LoadFailure::new(
        FrameIndex(4),
        "/Frames/frame_005.jpg",
        "404",
    ));
    let msg = err.to_string();
    assert!(msg.contains("frame 4"));
    assert!(msg.contains("frame_005.jpg"));
    assert!(msg.contains("404"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = ScrubError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
