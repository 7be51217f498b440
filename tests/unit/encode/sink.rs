use super::*;

#[test]
fn rendered_value_accessors_and_display() {
    let text = RenderedValue::Text("12.5px".to_owned());
    assert_eq!(text.as_text(), Some("12.5px"));
    assert_eq!(text.as_number(), None);
    assert_eq!(text.to_string(), "12.5px");

    let num = RenderedValue::Number(0.25);
    assert_eq!(num.as_number(), Some(0.25));
    assert_eq!(num.as_text(), None);
    assert_eq!(num.to_string(), "0.25");
    assert_eq!(RenderedValue::Number(3.0).to_string(), "3");
}

#[test]
fn recording_sink_stamps_values_with_tick_time() {
    let mut sink = RecordingSink::new();
    sink.on_tick(16.5);
    sink.apply("width", &RenderedValue::Text("1px".into())).unwrap();
    sink.apply("opacity", &RenderedValue::Number(0.5)).unwrap();
    sink.on_tick(33.0);
    sink.apply("width", &RenderedValue::Text("2px".into())).unwrap();

    assert_eq!(sink.applied().len(), 3);
    assert_eq!(sink.applied()[0].at_ms, 16.5);
    assert_eq!(sink.applied()[2].at_ms, 33.0);
    let widths: Vec<_> = sink.values_for("width").map(ToString::to_string).collect();
    assert_eq!(widths, ["1px", "2px"]);
    assert_eq!(sink.last_for("opacity"), Some(&RenderedValue::Number(0.5)));
    assert_eq!(sink.last_for("height"), None);

    sink.clear();
    assert!(sink.applied().is_empty());
}

#[test]
fn last_for_result_outlives_the_property_name() {
    let mut sink = RecordingSink::new();
    sink.apply("left", &RenderedValue::Text("1px".into())).unwrap();
    sink.apply("left", &RenderedValue::Text("2px".into())).unwrap();

    let last = {
        let property = String::from("left");
        sink.last_for(&property)
    };
    assert_eq!(last, Some(&RenderedValue::Text("2px".into())));
}

#[test]
fn forwarding_impls_reach_the_inner_sink() {
    fn feed(mut sink: impl Sink) {
        sink.on_tick(5.0);
        sink.apply("top", &RenderedValue::Number(1.0)).unwrap();
    }

    let mut inner = RecordingSink::new();
    feed(&mut inner);
    assert_eq!(inner.applied()[0].at_ms, 5.0);

    let mut boxed: Box<dyn Sink> = Box::new(RecordingSink::new());
    boxed.apply("top", &RenderedValue::Number(2.0)).unwrap();
}
