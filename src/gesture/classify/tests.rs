use super::*;

const T: u32 = DEFAULT_THRESHOLD;
const TI: i64 = DEFAULT_THRESHOLD as i64;

#[test]
fn below_threshold_on_both_axes_is_tap() {
    assert_eq!(classify(0, 0, T), Gesture::Tap);
    for (ax, ay) in [(99, 99), (-99, 99), (99, -99), (-99, -99), (0, 99), (-99, 0), (50, -3)] {
        assert_eq!(classify(ax, ay, T), Gesture::Tap, "({ax}, {ay})");
    }
}

#[test]
fn exact_threshold_on_one_axis_is_a_swipe() {
    assert_eq!(classify(TI, 0, T), Gesture::Right);
    assert_eq!(classify(-TI, 0, T), Gesture::Left);
    assert_eq!(classify(0, TI, T), Gesture::Down);
    assert_eq!(classify(0, -TI, T), Gesture::Up);
}

#[test]
fn dominant_axis_decides_direction() {
    assert_eq!(classify(170, 15, T), Gesture::Right);
    assert_eq!(classify(-400, 399, T), Gesture::Left);
    assert_eq!(classify(20, -250, T), Gesture::Up);
    // Minor axis below threshold still counts toward dominance.
    assert_eq!(classify(99, 120, T), Gesture::Down);
}

#[test]
fn ties_resolve_to_vertical_axis() {
    assert_eq!(classify(TI, TI, T), Gesture::Down);
    assert_eq!(classify(-TI, TI, T), Gesture::Down);
    assert_eq!(classify(TI, -TI, T), Gesture::Up);
    assert_eq!(classify(-TI, -TI, T), Gesture::Up);
}

#[test]
fn zero_threshold_never_taps() {
    assert_eq!(classify(0, 0, 0), Gesture::Up);
    assert_eq!(classify(1, 0, 0), Gesture::Right);
}

#[test]
fn extreme_accumulators_do_not_overflow_abs() {
    assert_eq!(classify(i64::MIN, 0, T), Gesture::Left);
    assert_eq!(classify(0, i64::MIN, T), Gesture::Up);
    assert_eq!(classify(i64::MAX, i64::MIN, T), Gesture::Up);
}
