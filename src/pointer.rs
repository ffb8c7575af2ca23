//! Frame-driven pointer state: raw sample latching and derived signals.
//!
//! The host's pointer driver reports raw edges ([`PointerSample`]) as they
//! happen; [`PointerTracker::update`] promotes whatever was latched since the
//! previous frame exactly once per frame and advances the press-duration
//! counters. The classifier never reads the tracker directly – it consumes an
//! immutable [`PointerSnapshot`] taken after the update, so one frame sees one
//! consistent pointer state.

use std::mem;

use crate::config::ValidatedTimings;

/// Raw pointer edge reported by the host driver between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerSample {
    Move { x: f64, y: f64 },
    /// Left-button (or touch) press.
    Press { x: f64, y: f64 },
    /// Right-button press.
    Cancel { x: f64, y: f64 },
    Release { x: f64, y: f64 },
    /// Middle-button press.
    WheelPress { x: f64, y: f64 },
}

/// One frame's pointer state, consumed by the gesture classifier.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PointerSnapshot {
    pub x: f64,
    pub y: f64,
    /// Pointer moved since the previous frame.
    pub moved: bool,
    /// Press edge this frame.
    pub triggered: bool,
    /// Right-press edge this frame.
    pub cancelled: bool,
    /// Release edge this frame.
    pub released: bool,
    /// Auto-repeat edge this frame.
    pub repeated: bool,
    /// Level-triggered: the press is currently held.
    pub pressed: bool,
    /// Held past the long-press threshold.
    pub long_pressed: bool,
    /// Wheel-click edge this frame.
    pub wheel_triggered: bool,
    /// Double-click edge this frame.
    pub double_triggered: bool,
}

/// Edges latched between frames, promoted and cleared by `update`.
#[derive(Debug, Default, Clone, Copy)]
struct Latched {
    moved: bool,
    triggered: bool,
    cancelled: bool,
    released: bool,
    wheel_triggered: bool,
    double_triggered: bool,
}

/// Accumulates raw samples and derives the per-frame gesture signals:
/// repeat and long-press from the held-duration counter, the double-click
/// edge from the frames elapsed since the previous press, and the wheel
/// edge from the middle button.
#[derive(Debug, Default)]
pub struct PointerTracker {
    pub timings: ValidatedTimings,

    latched: Latched,

    x: f64,
    y: f64,
    moved: bool,
    triggered: bool,
    cancelled: bool,
    released: bool,
    wheel_triggered: bool,
    double_triggered: bool,

    /// Press level and held duration - public for direct manipulation in tests.
    pub pressed: bool,
    pub pressed_frames: i64,

    /// Frames since the most recent press edge; drives the double-click window.
    frames_since_press: Option<u64>,

    press_start: Option<(f64, f64)>,
    prev: Option<(f64, f64)>,
    /// Manhattan distance between the two most recent move positions while pressed.
    pub pressed_distance: f64,
}

impl PointerTracker {
    pub fn new(timings: ValidatedTimings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    /// Latch one raw sample. Edges accumulate until the next [`update`](Self::update);
    /// the position is current immediately.
    pub fn feed(&mut self, sample: PointerSample) {
        match sample {
            PointerSample::Move { x, y } => {
                if self.pressed {
                    if let Some((px, py)) = self.prev {
                        self.pressed_distance = (px - x).abs() + (py - y).abs();
                    }
                }
                self.prev = Some((x, y));
                self.latched.moved = true;
                self.set_position(x, y);
            }
            PointerSample::Press { x, y } => {
                if self
                    .frames_since_press
                    .is_some_and(|n| n <= self.timings.double_click_frames)
                {
                    self.latched.double_triggered = true;
                }
                self.frames_since_press = Some(0);
                self.latched.triggered = true;
                self.pressed = true;
                self.pressed_frames = 0;
                self.press_start = Some((x, y));
                self.pressed_distance = 0.0;
                self.prev = Some((x, y));
                self.set_position(x, y);
            }
            PointerSample::Cancel { x, y } => {
                self.latched.cancelled = true;
                self.set_position(x, y);
            }
            PointerSample::Release { x, y } => {
                self.pressed = false;
                self.latched.released = true;
                self.press_start = None;
                self.pressed_distance = 0.0;
                self.prev = Some((x, y));
                self.set_position(x, y);
            }
            PointerSample::WheelPress { x, y } => {
                self.latched.wheel_triggered = true;
                self.set_position(x, y);
            }
        }
    }

    /// Promote the latched edges into the current frame and advance counters.
    /// Call exactly once per frame, before classification.
    pub fn update(&mut self) {
        let latched = mem::take(&mut self.latched);
        self.moved = latched.moved;
        self.triggered = latched.triggered;
        self.cancelled = latched.cancelled;
        self.released = latched.released;
        self.wheel_triggered = latched.wheel_triggered;
        self.double_triggered = latched.double_triggered;

        if let Some(n) = self.frames_since_press.as_mut() {
            *n = n.saturating_add(1);
        }
        if self.pressed {
            self.pressed_frames += 1;
        }
    }

    /// Immutable snapshot of the current frame, for the classifier.
    pub fn snapshot(&self) -> PointerSnapshot {
        PointerSnapshot {
            x: self.x,
            y: self.y,
            moved: self.moved,
            triggered: self.triggered,
            cancelled: self.cancelled,
            released: self.released,
            repeated: self.is_repeated(),
            pressed: self.pressed,
            long_pressed: self.is_long_pressed(),
            wheel_triggered: self.wheel_triggered,
            double_triggered: self.double_triggered,
        }
    }

    /// Held past the long-press threshold.
    pub fn is_long_pressed(&self) -> bool {
        self.pressed && self.pressed_frames >= self.timings.long_press_frames as i64
    }

    /// Auto-repeat: the press edge itself, then every `repeat_interval`
    /// frames once `repeat_wait` frames have elapsed.
    pub fn is_repeated(&self) -> bool {
        self.pressed
            && (self.triggered
                || (self.pressed_frames >= self.timings.repeat_wait_frames as i64
                    && self.pressed_frames % self.timings.repeat_interval_frames as i64 == 0))
    }

    /// Push the held-duration counter below zero so a long-press that just
    /// fired cannot re-trigger until the refire delay has elapsed again.
    pub fn suppress_long_press(&mut self) {
        self.pressed_frames = -(self.timings.long_press_refire_frames as i64);
    }

    /// Where the current press started, while one is held.
    pub fn press_start(&self) -> Option<(f64, f64)> {
        self.press_start
    }

    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn set_position(&mut self, x: f64, y: f64) {
        self.x = x;
        self.y = y;
    }
}
