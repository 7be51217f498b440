use super::*;
use crate::encode::sink::{RecordingSink, RenderedValue};
use crate::value::color::Color;
use crate::value::context::{ParentMetrics, StaticLengthContext};

fn width(from: impl Into<RawValue>, to: impl Into<RawValue>, ms: Millis) -> Transition {
    Transition::new().from(from).to(to).property("width").duration(ms)
}

fn play_to_end(r: &mut Runnable, sink: &mut RecordingSink) -> usize {
    let mut ticks = 0;
    loop {
        ticks += 1;
        if r.play(sink).unwrap() == Progress::Complete {
            return ticks;
        }
    }
}

#[test]
fn one_second_has_sixty_frames() {
    let r = width(0, 100, 1000).build(None, Fps::SIXTY).unwrap();
    assert_eq!(r.frame_count(), 60);
    assert!((r.tick_interval_ms() - 1000.0 / 60.0).abs() < 1e-12);
    assert_eq!(r.frames()[0], Frame::Style(0.0));
    assert_eq!(r.frames()[30], Frame::Style(50.0));
}

#[test]
fn frames_are_monotonic_for_increasing_transition() {
    let r = width(0, 100, 500).build(None, Fps::SIXTY).unwrap();
    let values: Vec<f64> = r
        .frames()
        .iter()
        .map(|f| match f {
            Frame::Style(v) => *v,
            other => panic!("unexpected frame {other:?}"),
        })
        .collect();
    assert_eq!(values.len(), 30);
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
    assert!(values.iter().all(|v| (0.0..100.0).contains(v)));
}

#[test]
fn play_ends_on_exact_declared_value_and_rewinds() {
    let mut r = width(0, 100, 1000).build(None, Fps::SIXTY).unwrap();
    let mut sink = RecordingSink::new();

    assert_eq!(play_to_end(&mut r, &mut sink), 61);
    assert_eq!(sink.applied().len(), 61);
    assert_eq!(
        sink.last_for("width"),
        Some(&RenderedValue::Text("100px".to_owned()))
    );
    assert_eq!(r.cursor(), 0);
    assert_eq!(r.state(), NodeState::Complete);

    sink.clear();
    assert_eq!(play_to_end(&mut r, &mut sink), 61);
    assert_eq!(
        sink.applied()[0].value,
        RenderedValue::Text("0px".to_owned())
    );
}

#[test]
fn end_value_is_not_rounded_like_intermediate_frames() {
    let mut r = width(0, "12.34px", 100).build(None, Fps::SIXTY).unwrap();
    let mut sink = RecordingSink::new();
    play_to_end(&mut r, &mut sink);
    assert_eq!(
        sink.last_for("width"),
        Some(&RenderedValue::Text("12.34px".to_owned()))
    );
}

#[test]
fn same_unit_keeps_its_suffix() {
    let mut r = width("1em", "3em", 100).build(None, Fps::SIXTY).unwrap();
    let mut sink = RecordingSink::new();
    play_to_end(&mut r, &mut sink);
    assert_eq!(r.unit(), Unit::Em);
    assert_eq!(sink.applied()[0].value, RenderedValue::Text("1em".to_owned()));
    assert_eq!(sink.last_for("width"), Some(&RenderedValue::Text("3em".to_owned())));
}

#[test]
fn relative_units_are_converted_through_the_context() {
    let ctx = StaticLengthContext::default().with_parent(
        ".card",
        ParentMetrics {
            font_size_px: Some(10.0),
            computed_px: [("width".to_owned(), 300.0)].into_iter().collect(),
        },
    );

    let r = width("2em", "50%", 1000)
        .target(".card")
        .build(Some(&ctx), Fps::SIXTY)
        .unwrap();
    assert_eq!(r.unit(), Unit::Px);
    assert_eq!(r.frames()[0], Frame::Style(20.0));
    assert_eq!(r.end_frame(), Frame::Style(150.0));
}

#[test]
fn relative_units_without_context_fail_at_construction() {
    let err = width(0, "2rem", 100).build(None, Fps::SIXTY).unwrap_err();
    assert!(matches!(err, EaserError::Context(_)));
}

#[test]
fn color_frames_are_per_channel() {
    let mut r = Transition::new()
        .from("#000")
        .to("rgba(255, 0, 100, 0.5)")
        .property("background-color")
        .duration(1000)
        .build(None, Fps::SIXTY)
        .unwrap();
    assert_eq!(r.property(), "backgroundColor");
    assert_eq!(r.frames()[30], Frame::Color([127.5, 0.0, 50.0, 0.75]));

    let mut sink = RecordingSink::new();
    play_to_end(&mut r, &mut sink);
    assert_eq!(sink.applied()[0].value, RenderedValue::Text("rgba(0,0,0,1)".to_owned()));
    assert_eq!(
        sink.last_for("backgroundColor"),
        Some(&RenderedValue::Text("rgba(255,0,100,0.5)".to_owned()))
    );
    assert_eq!(r.to(), &Value::Color(Color::rgba(255.0, 0.0, 100.0, 0.5)));
}

#[test]
fn value_mode_applies_numbers() {
    let mut r = Transition::new()
        .value()
        .from(10)
        .to(20)
        .property("scrollTop")
        .duration(50)
        .build(None, Fps::SIXTY)
        .unwrap();
    let mut sink = RecordingSink::new();
    play_to_end(&mut r, &mut sink);
    assert_eq!(sink.applied()[0].value, RenderedValue::Number(10.0));
    assert_eq!(sink.last_for("scrollTop"), Some(&RenderedValue::Number(20.0)));
}

#[test]
fn zero_frame_transition_applies_end_immediately() {
    let mut r = width(0, 40, 10).build(None, Fps::SIXTY).unwrap();
    assert_eq!(r.frame_count(), 0);
    assert_eq!(r.tick_interval_ms(), 0.0);

    let mut sink = RecordingSink::new();
    assert_eq!(play_to_end(&mut r, &mut sink), 1);
    assert_eq!(sink.last_for("width"), Some(&RenderedValue::Text("40px".to_owned())));
}

#[test]
fn delay_counts_toward_duration() {
    let r = width(0, 1, 300).delay(200).build(None, Fps::SIXTY).unwrap();
    assert_eq!(r.duration_ms(), 500);
    assert_eq!(r.delay_ms(), 200);
    assert_eq!(r.frame_count(), 18);
}

#[test]
fn mismatched_kinds_fail_at_construction() {
    let err = width("#fff", 10, 100).build(None, Fps::SIXTY).unwrap_err();
    assert!(matches!(err, EaserError::TypeMismatch(_)));
}

#[test]
fn missing_fields_are_config_errors() {
    let err = Transition::new().to(1).duration(10).build(None, Fps::SIXTY).unwrap_err();
    assert!(matches!(err, EaserError::Config(_)));

    let err = Transition::new().property("x").build(None, Fps::SIXTY).unwrap_err();
    assert!(matches!(err, EaserError::Config(_)));
}

#[test]
fn missing_from_defaults_to_zero() {
    let r = Transition::new().to(10).property("x").build(None, Fps::SIXTY).unwrap();
    assert_eq!(r.from(), &Value::Styled(0.0, Unit::Px));
}

#[test]
fn sink_failure_leaves_runnable_failed() {
    struct Refuse;
    impl Sink for Refuse {
        fn apply(&mut self, _: &str, _: &RenderedValue) -> EaserResult<()> {
            Err(EaserError::sink("detached"))
        }
    }

    let mut r = width(0, 1, 100).build(None, Fps::SIXTY).unwrap();
    let err = r.play(&mut Refuse).unwrap_err();
    assert!(matches!(err, EaserError::Sink(_)));
    assert_eq!(r.state(), NodeState::Failed);

    r.reset();
    assert_eq!(r.state(), NodeState::Idle);
    assert_eq!(r.cursor(), 0);
}

#[test]
fn overflowing_delay_is_a_config_error() {
    let err = width(0, 1, 1)
        .delay(u64::MAX)
        .build(None, Fps::SIXTY)
        .unwrap_err();
    assert!(matches!(err, EaserError::Config(_)));

    let r = width(0, 1, 0).delay(u64::MAX).build(None, Fps::SIXTY).unwrap();
    assert_eq!(r.duration_ms(), u64::MAX);
}

#[test]
fn frame_count_is_capped() {
    let err = width(0, 1, 1_000_000_000_000)
        .build(None, Fps::SIXTY)
        .unwrap_err();
    assert!(matches!(err, EaserError::Config(_)));
    assert!(err.is_construction());

    // One frame past the cap at 1 fps.
    let ms = (Runnable::MAX_FRAMES as u64 + 1) * 1000;
    let slow = Fps::new(1, 1).unwrap();
    assert!(matches!(
        width(0, 1, ms).build(None, slow),
        Err(EaserError::Config(_))
    ));
}
