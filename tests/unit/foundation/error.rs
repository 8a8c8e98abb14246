use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        GrailError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        GrailError::message("x")
            .to_string()
            .contains("message error:")
    );
    assert!(GrailError::render("x").to_string().contains("render error:"));
    assert!(
        GrailError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(GrailError::invalid_layer(99).to_string(), "invalid layer: 99");
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = GrailError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
