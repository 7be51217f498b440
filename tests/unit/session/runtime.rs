use super::*;
use crate::animation::runnable::NodeState;
use crate::animation::transition::Transition;
use crate::composition::dsl::{parallel, sequence};
use crate::encode::sink::{RecordingSink, RenderedValue};

fn width(ms: u64) -> Transition {
    Transition::new().from(0).to(100).property("width").duration(ms)
}

fn runtime() -> Runtime<RecordingSink> {
    let mut rt = Runtime::manual();
    rt.attach(RecordingSink::new());
    rt
}

#[test]
fn run_requires_an_attached_sink() {
    let mut rt: Runtime<RecordingSink> = Runtime::manual();
    let tree = rt.composer(None).runnable(&width(100)).unwrap();
    let err = rt.run(tree).unwrap_err();
    assert!(matches!(err, EaserError::Config(_)));
}

#[test]
fn handle_reports_completion() {
    let mut rt = runtime();
    let tree = rt.composer(None).runnable(&width(100)).unwrap();
    let handle = rt.run(tree).unwrap();
    assert_eq!(handle.state(), PlaybackState::Running);
    assert_eq!(rt.active(), 1);

    rt.run_until_idle().unwrap();
    assert!(handle.is_complete());
    assert!(handle.clone().is_finished());
    assert_eq!(rt.active(), 0);
    assert!((rt.now_ms() - 100.0).abs() < 1e-6);
}

#[test]
fn advance_by_delivers_only_due_ticks() {
    let mut rt = runtime();
    let tree = rt.composer(None).runnable(&width(1000)).unwrap();
    let handle = rt.run(tree).unwrap();

    rt.advance_by(500.0).unwrap();
    assert_eq!(rt.now_ms(), 500.0);
    // Frames at 0, 16.7, ..., 500 inclusive.
    assert_eq!(rt.sink().unwrap().applied().len(), 31);
    assert!(!handle.is_finished());

    rt.advance_by(600.0).unwrap();
    assert!(handle.is_complete());
    assert_eq!(rt.sink().unwrap().applied().len(), 61);
}

#[test]
fn empty_tree_completes_without_ticks() {
    let mut rt = runtime();
    let handle = rt.run(sequence(Vec::<Transition>::new()).unwrap()).unwrap();
    assert!(handle.is_complete());
    assert!(!rt.step().unwrap());
}

#[test]
fn cancel_is_idempotent_and_requires_reset() {
    let mut rt = runtime();
    let handle = rt.run(parallel([width(300), width(300)]).unwrap()).unwrap();
    rt.advance_by(50.0).unwrap();

    rt.cancel(&handle);
    rt.cancel(&handle);
    assert_eq!(handle.state(), PlaybackState::Cancelled);
    assert_eq!(rt.clock().pending(), 0);

    let applied = rt.sink().unwrap().applied().len();
    rt.advance_by(500.0).unwrap();
    assert_eq!(rt.sink().unwrap().applied().len(), applied);

    let mut tree = rt.take_tree(&handle).unwrap();
    assert_eq!(tree.state(), NodeState::Cancelled);
    tree.reset();
    let again = rt.play(tree).unwrap();
    assert!(again.is_complete());
}

#[test]
fn cancelled_tree_is_rejected_without_reset() {
    let mut rt = runtime();
    let handle = rt.run(sequence([width(300)]).unwrap()).unwrap();
    rt.advance_by(20.0).unwrap();
    rt.cancel(&handle);

    let tree = rt.take_tree(&handle).unwrap();
    let err = rt.run(tree).unwrap_err();
    assert!(matches!(err, EaserError::Config(_)));
    assert_eq!(rt.active(), 0);
}

#[test]
fn take_tree_waits_for_the_playback_to_finish() {
    let mut rt = runtime();
    let tree = rt.composer(None).runnable(&width(100)).unwrap();
    let handle = rt.run(tree).unwrap();
    assert!(rt.take_tree(&handle).is_none());
    rt.run_until_idle().unwrap();
    let tree = rt.take_tree(&handle).unwrap();
    assert_eq!(tree.state(), NodeState::Complete);
    assert!(rt.take_tree(&handle).is_none());
}

#[test]
fn failed_tick_stops_only_its_playback() {
    #[derive(Default)]
    struct RejectHeight {
        applied: Vec<String>,
    }
    impl Sink for RejectHeight {
        fn apply(&mut self, property: &str, _: &RenderedValue) -> EaserResult<()> {
            if property == "height" {
                return Err(EaserError::sink("height is read-only"));
            }
            self.applied.push(property.to_owned());
            Ok(())
        }
    }

    let mut rt = Runtime::manual();
    rt.attach(RejectHeight::default());
    let bad_tree =
        parallel([width(100), Transition::new().to(5).property("height").duration(100)]).unwrap();
    let good_tree = rt
        .composer(None)
        .runnable(&Transition::new().to(1).property("top").duration(100))
        .unwrap();
    let bad = rt.run(bad_tree).unwrap();
    let good = rt.run(good_tree).unwrap();

    let mut failures = 0;
    loop {
        match rt.step() {
            Ok(true) => {}
            Ok(false) => break,
            Err(err) => {
                assert!(matches!(err, EaserError::Sink(_)));
                failures += 1;
            }
        }
    }

    assert_eq!(failures, 1);
    assert_eq!(bad.state(), PlaybackState::Failed);
    assert!(good.is_complete());

    let applied = &rt.sink().unwrap().applied;
    assert!(!applied.iter().any(|p| p == "height"));
    assert_eq!(applied.iter().filter(|p| *p == "top").count(), 7);
    // "width" got its first frame before "height" failed at the same instant.
    assert_eq!(applied.iter().filter(|p| *p == "width").count(), 1);

    let tree = rt.take_tree(&bad).unwrap();
    assert_eq!(tree.state(), NodeState::Failed);
}

#[test]
fn opts_load_from_json() {
    let opts = RuntimeOpts::from_json_str(r#"{ "fps": { "num": 30, "den": 1 }, "label": "intro" }"#)
        .unwrap();
    assert_eq!(opts.fps, Fps::new(30, 1).unwrap());
    assert_eq!(opts.label.as_deref(), Some("intro"));

    let rt: Runtime<RecordingSink> = Runtime::with_opts(ManualClock::new(), opts);
    let r = rt.composer(None).runnable(&width(1000)).unwrap();
    assert_eq!(r.frame_count(), 30);

    assert!(RuntimeOpts::from_json_str(r#"{ "fps": { "num": 0, "den": 1 } }"#).is_err());
    assert_eq!(RuntimeOpts::from_json_str("{}").unwrap(), RuntimeOpts::default());
}
