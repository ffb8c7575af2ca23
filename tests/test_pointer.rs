//! Tests for `pictap::pointer` - edge latching, the frame cycle, and the
//! derived repeat / long-press / double-click signals.

use pictap::config::ValidatedTimings;
use pictap::pointer::{PointerSample, PointerTracker};

/// Engine defaults: long press 24 frames, refire 60, repeat 24/6,
/// double-click window 18.
fn make_tracker() -> PointerTracker {
    PointerTracker::new(ValidatedTimings::default())
}

fn press(tracker: &mut PointerTracker, x: f64, y: f64) {
    tracker.feed(PointerSample::Press { x, y });
}

/// Advance n frames without new samples.
fn run_frames(tracker: &mut PointerTracker, n: u64) {
    for _ in 0..n {
        tracker.update();
    }
}

// -- Edge promotion -------------------------------------------

#[test]
fn test_press_edge_lasts_one_frame() {
    let mut t = make_tracker();
    press(&mut t, 10.0, 10.0);
    t.update();
    assert!(t.snapshot().triggered);
    t.update();
    assert!(!t.snapshot().triggered);
}

#[test]
fn test_release_edge_lasts_one_frame() {
    let mut t = make_tracker();
    press(&mut t, 10.0, 10.0);
    t.update();
    t.feed(PointerSample::Release { x: 10.0, y: 10.0 });
    t.update();
    let snap = t.snapshot();
    assert!(snap.released);
    assert!(!snap.pressed);
    t.update();
    assert!(!t.snapshot().released);
}

#[test]
fn test_cancel_edge() {
    let mut t = make_tracker();
    t.feed(PointerSample::Cancel { x: 3.0, y: 4.0 });
    t.update();
    let snap = t.snapshot();
    assert!(snap.cancelled);
    assert!(!snap.pressed);
    assert_eq!((snap.x, snap.y), (3.0, 4.0));
}

#[test]
fn test_wheel_edge_lasts_one_frame() {
    let mut t = make_tracker();
    t.feed(PointerSample::WheelPress { x: 5.0, y: 5.0 });
    t.update();
    assert!(t.snapshot().wheel_triggered);
    t.update();
    assert!(!t.snapshot().wheel_triggered);
}

#[test]
fn test_moved_flag() {
    let mut t = make_tracker();
    t.feed(PointerSample::Move { x: 1.0, y: 2.0 });
    t.update();
    assert!(t.snapshot().moved);
    t.update();
    assert!(!t.snapshot().moved);
}

#[test]
fn test_edge_before_update_is_invisible() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    // Not promoted yet - the frame has not advanced.
    assert!(!t.snapshot().triggered);
}

#[test]
fn test_position_follows_samples() {
    let mut t = make_tracker();
    t.feed(PointerSample::Move { x: 7.0, y: 8.0 });
    t.update();
    assert_eq!((t.snapshot().x, t.snapshot().y), (7.0, 8.0));
    t.feed(PointerSample::Move { x: 9.0, y: 1.0 });
    // Position is current immediately, even mid-frame.
    assert_eq!(t.position(), (9.0, 1.0));
}

// -- Pressed level and long press -----------------------------

#[test]
fn test_pressed_is_level_triggered() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    run_frames(&mut t, 5);
    assert!(t.snapshot().pressed);
    t.feed(PointerSample::Release { x: 0.0, y: 0.0 });
    t.update();
    assert!(!t.snapshot().pressed);
}

#[test]
fn test_long_press_fires_at_threshold() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    run_frames(&mut t, 23);
    assert!(!t.snapshot().long_pressed);
    t.update();
    assert!(t.snapshot().long_pressed);
}

#[test]
fn test_long_press_needs_press() {
    let mut t = make_tracker();
    run_frames(&mut t, 30);
    assert!(!t.snapshot().long_pressed);
}

#[test]
fn test_suppress_long_press_delays_refire() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    run_frames(&mut t, 24);
    assert!(t.snapshot().long_pressed);

    t.suppress_long_press();
    assert_eq!(t.pressed_frames, -60);
    run_frames(&mut t, 83);
    assert!(!t.snapshot().long_pressed);
    // 60 refire frames + 24 threshold frames after the reset.
    t.update();
    assert!(t.snapshot().long_pressed);
}

#[test]
fn test_release_resets_press_tracking() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    run_frames(&mut t, 30);
    t.feed(PointerSample::Release { x: 0.0, y: 0.0 });
    t.update();
    assert!(t.press_start().is_none());
    assert_eq!(t.pressed_distance, 0.0);
}

// -- Repeat ---------------------------------------------------

#[test]
fn test_repeat_on_press_edge() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    t.update();
    assert!(t.snapshot().repeated);
}

#[test]
fn test_repeat_silent_before_wait() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    t.update();
    for _ in 0..22 {
        t.update();
        assert!(!t.snapshot().repeated, "frame {}", t.pressed_frames);
    }
}

#[test]
fn test_repeat_cadence_after_wait() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    run_frames(&mut t, 24);
    // 24 % 6 == 0 and the wait has elapsed.
    assert!(t.snapshot().repeated);
    t.update();
    assert!(!t.snapshot().repeated);
    run_frames(&mut t, 5);
    // Frame 30: next repeat tick.
    assert!(t.snapshot().repeated);
}

// -- Double click ---------------------------------------------

#[test]
fn test_double_click_within_window() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    t.update();
    t.feed(PointerSample::Release { x: 0.0, y: 0.0 });
    run_frames(&mut t, 9);
    press(&mut t, 0.0, 0.0);
    t.update();
    let snap = t.snapshot();
    assert!(snap.double_triggered);
    assert!(snap.triggered);
}

#[test]
fn test_double_click_window_expired() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    t.update();
    t.feed(PointerSample::Release { x: 0.0, y: 0.0 });
    run_frames(&mut t, 19);
    press(&mut t, 0.0, 0.0);
    t.update();
    assert!(!t.snapshot().double_triggered);
}

#[test]
fn test_single_press_never_doubles() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    run_frames(&mut t, 40);
    assert!(!t.snapshot().double_triggered);
}

#[test]
fn test_triple_press_doubles_twice() {
    let mut t = make_tracker();
    for _ in 0..2 {
        press(&mut t, 0.0, 0.0);
        t.update();
        t.feed(PointerSample::Release { x: 0.0, y: 0.0 });
        run_frames(&mut t, 3);
    }
    press(&mut t, 0.0, 0.0);
    t.update();
    // The third press is again within the window of the second.
    assert!(t.snapshot().double_triggered);
}

// -- Press distance and start position ------------------------

#[test]
fn test_press_start_recorded() {
    let mut t = make_tracker();
    press(&mut t, 12.0, 34.0);
    t.update();
    assert_eq!(t.press_start(), Some((12.0, 34.0)));
}

#[test]
fn test_pressed_distance_is_manhattan_per_move() {
    let mut t = make_tracker();
    press(&mut t, 0.0, 0.0);
    t.update();
    t.feed(PointerSample::Move { x: 3.0, y: 4.0 });
    assert_eq!(t.pressed_distance, 7.0);
    t.feed(PointerSample::Move { x: 5.0, y: 4.0 });
    // Distance is per move step, not cumulative.
    assert_eq!(t.pressed_distance, 2.0);
}

#[test]
fn test_no_distance_while_unpressed() {
    let mut t = make_tracker();
    t.feed(PointerSample::Move { x: 3.0, y: 4.0 });
    t.feed(PointerSample::Move { x: 30.0, y: 40.0 });
    assert_eq!(t.pressed_distance, 0.0);
}
