use super::*;

#[test]
fn loads_from_json_with_defaults() {
    let ctx = StaticLengthContext::from_json_str(
        r#"{
            "root_font_size_px": 10,
            "parents": { ".box": { "font_size_px": 20, "computed_px": { "width": 400 } } }
        }"#,
    )
    .unwrap();

    assert_eq!(ctx.root_font_size_px().unwrap(), 10.0);
    assert_eq!(ctx.viewport_width_px().unwrap(), 1280.0);
    assert_eq!(ctx.viewport_height_px().unwrap(), 720.0);

    let target = TargetRef::from(".box");
    assert_eq!(ctx.parent_font_size_px(&target).unwrap(), 20.0);
    assert_eq!(
        ctx.parent_computed_value_px(&target, "width").unwrap(),
        400.0
    );
}

#[test]
fn unknown_parent_falls_back_to_root_font_size() {
    let ctx = StaticLengthContext::default();
    assert_eq!(
        ctx.parent_font_size_px(&TargetRef::from(".nowhere")).unwrap(),
        16.0
    );
}

#[test]
fn missing_computed_value_is_a_context_error() {
    let ctx = StaticLengthContext::default();
    let err = ctx
        .parent_computed_value_px(&TargetRef::from(".box"), "height")
        .unwrap_err();
    assert!(matches!(err, EaserError::Context(_)));
}

#[test]
fn rejects_negative_metrics_and_unknown_fields() {
    let err = StaticLengthContext::from_json_str(r#"{ "viewport_width_px": -1 }"#).unwrap_err();
    assert!(matches!(err, EaserError::Config(_)));

    let err = StaticLengthContext::from_json_str(r#"{ "zoom": 2 }"#).unwrap_err();
    assert!(matches!(err, EaserError::Serde(_)));
}
