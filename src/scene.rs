//! Pending-dispatch slot and per-frame integration.
//!
//! One [`TouchScene`] exists per scene context (map or battle). Each frame it
//! classifies every picture in traversal order, then the scene update drains
//! the single pending slot into the host's event interpreter. Classification
//! always happens before the drain, so a gesture detected this frame starts
//! its event no later than the same frame's scene update.

use std::collections::HashMap;

use log::{debug, info};

use crate::classifier::{self, GestureState};
use crate::config::Settings;
use crate::picture::PictureView;
use crate::pointer::PointerTracker;
use crate::trigger::{Trigger, TriggerBindings};

/// The single pending `(event, picture)` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCall {
    pub event_id: u32,
    pub picture_id: u32,
}

/// The host's scripted-event interpreter.
pub trait EventInterpreter {
    /// An event is currently running; dispatching now would re-enter.
    fn is_busy(&self) -> bool;
    /// The id resolves to an entry in the static event table.
    fn has_event(&self, event_id: u32) -> bool;
    /// Begin executing the event's instruction list.
    fn start(&mut self, event_id: u32);
}

/// The host's game-variable table, sink for the picture-id output variable.
pub trait VariableStore {
    fn set(&mut self, index: u32, value: u32);
}

/// Per-context gesture dispatch: the pending slot plus one
/// [`GestureState`] per picture slot.
///
/// States are keyed by picture id and persist across the picture being
/// erased and redrawn, the same way the host keeps one sprite per slot.
#[derive(Debug, Default)]
pub struct TouchScene {
    pending: Option<PendingCall>,
    states: HashMap<u32, GestureState>,
}

impl TouchScene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify every picture against this frame's pointer state.
    ///
    /// Pictures are visited in the order the iterator yields them (the host's
    /// draw order, topmost last). Each qualifying picture overwrites the
    /// pending slot, so the last writer in a frame wins - the slot is a
    /// single cell, not a queue. A long-press firing also pushes the
    /// held-duration counter back so it cannot re-fire next frame.
    pub fn classify<'a, V, I>(
        &mut self,
        tracker: &mut PointerTracker,
        pictures: I,
        bindings: &TriggerBindings,
        settings: &Settings,
    ) where
        V: PictureView + 'a,
        I: IntoIterator<Item = (u32, &'a V)>,
    {
        let snap = tracker.snapshot();
        for (picture_id, view) in pictures {
            let state = self.states.entry(picture_id).or_default();
            classifier::observe(state, view, &snap, settings);

            let Some(table) = bindings.lookup(picture_id) else {
                continue;
            };
            if let Some(firing) = classifier::classify(view, state, &snap, table, settings) {
                debug!(
                    "picture {picture_id}: {} -> event {}",
                    firing.trigger, firing.event_id
                );
                if firing.trigger == Trigger::LongPressed {
                    tracker.suppress_long_press();
                }
                self.pending = Some(PendingCall {
                    event_id: firing.event_id,
                    picture_id,
                });
            }
        }
    }

    /// Hand the pending call to the interpreter, if any.
    ///
    /// The slot is cleared unconditionally: a busy interpreter or an id with
    /// no event behind it silently drops the call rather than poisoning the
    /// next frame. When the event does start, the originating picture id is
    /// first written to the configured output variable (0 disables that).
    /// Returns whether an event was started.
    pub fn drain(
        &mut self,
        interpreter: &mut dyn EventInterpreter,
        variables: &mut dyn VariableStore,
        settings: &Settings,
    ) -> bool {
        let Some(call) = self.pending.take() else {
            return false;
        };
        if interpreter.is_busy() {
            debug!(
                "interpreter busy, dropping event {} from picture {}",
                call.event_id, call.picture_id
            );
            return false;
        }
        if !interpreter.has_event(call.event_id) {
            debug!("event {} does not resolve, dropping", call.event_id);
            return false;
        }
        if settings.picture_id_variable != 0 {
            variables.set(settings.picture_id_variable, call.picture_id);
        }
        info!("picture {}: starting event {}", call.picture_id, call.event_id);
        interpreter.start(call.event_id);
        true
    }

    /// The pending call, if one is waiting for the next drain.
    pub fn pending(&self) -> Option<PendingCall> {
        self.pending
    }

    /// Default map-touch handling (walk-to-click) must stay suppressed while
    /// a call is pending, so one click is never interpreted twice.
    pub fn map_touch_ok(&self) -> bool {
        self.pending.is_none()
    }

    /// Hover state of one picture slot, if any pointer pass has touched it.
    pub fn state(&self, picture_id: u32) -> Option<&GestureState> {
        self.states.get(&picture_id)
    }

    /// Drop all per-picture state and any pending call (screen reset).
    pub fn clear(&mut self) {
        self.pending = None;
        self.states.clear();
    }
}
