use super::*;

#[test]
fn fps_rejects_zero_parts() {
    assert!(Fps::new(0, 1).is_err());
    assert!(Fps::new(60, 0).is_err());
    assert_eq!(Fps::new(60, 1).unwrap(), Fps::SIXTY);
}

#[test]
fn frame_count_floors() {
    let fps = Fps::SIXTY;
    assert_eq!(fps.frame_count(1000), 60);
    assert_eq!(fps.frame_count(500), 30);
    assert_eq!(fps.frame_count(250), 15);
    assert_eq!(fps.frame_count(16), 0);
    assert_eq!(fps.frame_count(17), 1);
    assert_eq!(fps.frame_count(0), 0);

    let ntsc = Fps::new(30000, 1001).unwrap();
    assert_eq!(ntsc.frame_count(1001), 30);
}

#[test]
fn frame_duration_matches_rate() {
    assert!((Fps::SIXTY.frame_duration_ms() - 1000.0 / 60.0).abs() < 1e-12);
}

#[test]
fn number_formatting_trims_zeros() {
    assert_eq!(format_number(100.0, 1), "100");
    assert_eq!(format_number(12.5, 1), "12.5");
    assert_eq!(format_number(0.5, 3), "0.5");
    assert_eq!(format_number(-0.0, 1), "0");
    assert_eq!(format_number(1.0 / 3.0, 3), "0.333");
}

#[test]
fn round_tenth_is_stable() {
    assert_eq!(round_tenth(12.345), 12.3);
    assert_eq!(round_tenth(99.96), 100.0);
    assert_eq!(round_tenth(-0.01), 0.0);
}
