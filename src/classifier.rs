//! Per-picture gesture classification - no I/O, fully testable.
//!
//! Each picture carries a [`GestureState`] for the hover edges; everything
//! else is derived from the frame's [`PointerSnapshot`] and the picture's
//! current geometry. [`classify`] resolves the frame to at most one firing
//! per picture.

use crate::config::Settings;
use crate::picture::{PictureView, is_touchable, is_transparent, screen_rect};
use crate::pointer::PointerSnapshot;
use crate::trigger::{Trigger, TriggerTable};

/// Hover bookkeeping for one picture.
///
/// `was_inside` persists across frames; the enter/exit edges are valid for
/// one classification pass only and are recomputed at the start of the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GestureState {
    was_inside: bool,
    entered: bool,
    exited: bool,
}

impl GestureState {
    /// Recompute the edge flags from this frame's inside/outside verdict.
    /// Both edges reset first; at most one is set afterwards. The transition
    /// is only evaluated on frames where the pointer moved.
    pub fn update(&mut self, inside: bool, moved: bool) {
        self.entered = false;
        self.exited = false;
        if !moved {
            return;
        }
        if inside {
            if !self.was_inside {
                self.entered = true;
                self.was_inside = true;
            }
        } else if self.was_inside {
            self.exited = true;
            self.was_inside = false;
        }
    }

    /// Pointer entered the picture this frame.
    pub fn entered(&self) -> bool {
        self.entered
    }

    /// Pointer left the picture this frame.
    pub fn exited(&self) -> bool {
        self.exited
    }

    pub fn was_inside(&self) -> bool {
        self.was_inside
    }
}

/// One qualifying gesture on one picture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Firing {
    pub trigger: Trigger,
    pub event_id: u32,
}

/// Update a picture's hover state from the frame's pointer position.
///
/// "Inside" means touchable, in rect, and (when transparency consideration
/// is on) over a non-transparent pixel - so hover-in never fires on a fully
/// transparent region, while leaving one still counts as an exit.
pub fn observe(
    state: &mut GestureState,
    view: &impl PictureView,
    snap: &PointerSnapshot,
    settings: &Settings,
) {
    let inside = is_touchable(view)
        && screen_rect(view).contains(snap.x, snap.y)
        && !(settings.transparency_consideration && is_transparent(view, snap.x, snap.y));
    state.update(inside, snap.moved);
}

/// Resolve the frame to the first qualifying bound kind, in ascending
/// trigger-number order.
///
/// Every kind except the hover edges is short-circuited by the picture being
/// touchable with the pointer in rect, and is additionally blocked when the
/// pointer sits on a fully transparent pixel (transparency consideration
/// on). A blocked kind does not stop the scan: a hover edge bound further
/// down can still fire.
pub fn classify(
    view: &impl PictureView,
    state: &GestureState,
    snap: &PointerSnapshot,
    table: &TriggerTable,
    settings: &Settings,
) -> Option<Firing> {
    let in_rect = is_touchable(view) && screen_rect(view).contains(snap.x, snap.y);

    for trigger in Trigger::ALL {
        let Some(event_id) = table.get(&trigger).copied() else {
            continue;
        };
        let qualified = match trigger {
            Trigger::OnFocus => state.entered(),
            Trigger::OutFocus => state.exited(),
            Trigger::Triggered => in_rect && snap.triggered,
            Trigger::Cancelled => in_rect && snap.cancelled,
            Trigger::LongPressed => in_rect && snap.long_pressed,
            Trigger::Released => in_rect && snap.released,
            Trigger::Repeated => in_rect && snap.repeated,
            Trigger::Pressed => in_rect && snap.pressed,
            Trigger::WheelTriggered => in_rect && snap.wheel_triggered,
            Trigger::DoubleTriggered => in_rect && snap.double_triggered,
        };
        if !qualified {
            continue;
        }
        // Qualification for non-focus kinds implies in_rect, so the
        // transparency sample below never runs on an untouchable picture.
        if !trigger.is_focus_edge()
            && settings.transparency_consideration
            && is_transparent(view, snap.x, snap.y)
        {
            continue;
        }
        return Some(Firing { trigger, event_id });
    }
    None
}
