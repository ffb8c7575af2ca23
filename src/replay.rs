//! Trace replay: drive the full trigger pipeline from a text trace.
//!
//! The trace stands in for the host engine - it creates pictures, feeds
//! pointer samples, and advances frames, so the whole chain (tracker →
//! classifier → registry → dispatch) runs without a game attached.
//!
//! Trace lines, one per line, `#` starts a comment:
//!
//! ```text
//! PICTURE 1 160 120 64 48 0.5 0.5 1 1    # id x y w h [ax ay [sx sy]]
//! BIND 1 5 triggered
//! MOVE 160 120
//! PRESS
//! FRAME
//! RELEASE
//! FRAME 2
//! UNBIND 1
//! ```
//!
//! `SHOW`/`HIDE` toggle a picture's visibility and `ERASE` drops its bitmap,
//! so binding persistence across erase/redraw is observable from a trace.
//! Pointer keywords without coordinates reuse the last position.

use std::collections::{BTreeMap, HashMap};

use log::info;

use crate::command::{self, ScriptCommand};
use crate::config::{AppConfig, Limits, ReplayOptions, Settings};
use crate::picture::PictureView;
use crate::pointer::{PointerSample, PointerTracker};
use crate::scene::{EventInterpreter, TouchScene, VariableStore};
use crate::trigger::TriggerBindings;

// -- Trace parsing --------------------------------------------

/// One parsed trace line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceLine {
    Picture { id: u32, picture: ReplayPicture },
    Show { id: u32 },
    Hide { id: u32 },
    Erase { id: u32 },
    Move { x: f64, y: f64 },
    Press(Option<(f64, f64)>),
    Release(Option<(f64, f64)>),
    Cancel(Option<(f64, f64)>),
    Wheel(Option<(f64, f64)>),
    Frame { count: u64 },
    Command(ScriptCommand),
}

/// Parse one trace line. `Ok(None)` for blank lines and comments; `Err`
/// carries a message for the runner to report.
pub fn parse_trace_line(line: &str, limits: &Limits) -> Result<Option<TraceLine>, String> {
    let line = line.split('#').next().unwrap_or("").trim();
    if line.is_empty() {
        return Ok(None);
    }

    let mut parts = line.split_whitespace();
    let keyword = parts.next().unwrap_or("").to_ascii_uppercase();
    let parsed = match keyword.as_str() {
        "PICTURE" => {
            let id = required(parts.next(), "picture id")?;
            let x = required(parts.next(), "x")?;
            let y = required(parts.next(), "y")?;
            let w = required(parts.next(), "width")?;
            let h = required(parts.next(), "height")?;
            let mut picture = ReplayPicture::new(x, y, w, h);
            if let Some(ax) = parts.next() {
                picture.anchor_x = number(ax, "anchor x")?;
                picture.anchor_y = required(parts.next(), "anchor y")?;
            }
            if let Some(sx) = parts.next() {
                picture.scale_x = number(sx, "scale x")?;
                picture.scale_y = required(parts.next(), "scale y")?;
            }
            TraceLine::Picture {
                id: id as u32,
                picture,
            }
        }
        "SHOW" => TraceLine::Show {
            id: required(parts.next(), "picture id")? as u32,
        },
        "HIDE" => TraceLine::Hide {
            id: required(parts.next(), "picture id")? as u32,
        },
        "ERASE" => TraceLine::Erase {
            id: required(parts.next(), "picture id")? as u32,
        },
        "MOVE" => TraceLine::Move {
            x: required(parts.next(), "x")?,
            y: required(parts.next(), "y")?,
        },
        "PRESS" => TraceLine::Press(optional_pos(&mut parts)?),
        "RELEASE" => TraceLine::Release(optional_pos(&mut parts)?),
        "CANCEL" => TraceLine::Cancel(optional_pos(&mut parts)?),
        "WHEEL" => TraceLine::Wheel(optional_pos(&mut parts)?),
        "FRAME" => TraceLine::Frame {
            count: match parts.next() {
                Some(n) => number(n, "frame count")? as u64,
                None => 1,
            },
        },
        "BIND" | "UNBIND" => {
            // parse_command only rejects unknown names, which can't be
            // the case here.
            match command::parse_command(line, limits) {
                Some(cmd) => TraceLine::Command(cmd),
                None => return Err(format!("unparsable command '{line}'")),
            }
        }
        other => return Err(format!("unknown trace keyword '{other}'")),
    };
    Ok(Some(parsed))
}

fn number(arg: &str, what: &str) -> Result<f64, String> {
    arg.parse()
        .map_err(|_| format!("invalid {what} '{arg}'"))
}

fn required(arg: Option<&str>, what: &str) -> Result<f64, String> {
    match arg {
        Some(s) => number(s, what),
        None => Err(format!("missing {what}")),
    }
}

fn optional_pos<'a>(
    parts: &mut impl Iterator<Item = &'a str>,
) -> Result<Option<(f64, f64)>, String> {
    match parts.next() {
        None => Ok(None),
        Some(x) => Ok(Some((number(x, "x")?, required(parts.next(), "y")?))),
    }
}

// -- Replay picture -------------------------------------------

/// A fully opaque stand-in picture for trace replay.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReplayPicture {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub anchor_x: f64,
    pub anchor_y: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub visible: bool,
    pub bitmap: bool,
}

impl ReplayPicture {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            anchor_x: 0.0,
            anchor_y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            visible: true,
            bitmap: true,
        }
    }
}

impl PictureView for ReplayPicture {
    fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    fn anchor(&self) -> (f64, f64) {
        (self.anchor_x, self.anchor_y)
    }

    fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn visible(&self) -> bool {
        self.visible
    }

    fn has_bitmap(&self) -> bool {
        self.bitmap
    }

    fn alpha_at(&self, _bx: f64, _by: f64) -> u8 {
        255
    }
}

// -- Collaborator stands-in -----------------------------------

/// Interpreter stand-in: every id inside the event table is runnable, and
/// each started event can hold the interpreter busy for a configured number
/// of frames to exercise the dispatching state.
#[derive(Debug)]
pub struct ReplayInterpreter {
    event_max: u32,
    run_frames: u64,
    busy_frames: u64,
    /// Every event started, in order.
    pub started: Vec<u32>,
}

impl ReplayInterpreter {
    pub fn new(event_max: u32, run_frames: u64) -> Self {
        Self {
            event_max,
            run_frames,
            busy_frames: 0,
            started: Vec::new(),
        }
    }

    fn tick(&mut self) {
        self.busy_frames = self.busy_frames.saturating_sub(1);
    }
}

impl EventInterpreter for ReplayInterpreter {
    fn is_busy(&self) -> bool {
        self.busy_frames > 0
    }

    fn has_event(&self, event_id: u32) -> bool {
        (1..=self.event_max).contains(&event_id)
    }

    fn start(&mut self, event_id: u32) {
        self.started.push(event_id);
        self.busy_frames = self.run_frames;
    }
}

/// Variable-store stand-in that records every write.
#[derive(Debug, Default)]
pub struct RecordingVariables {
    values: HashMap<u32, u32>,
}

impl RecordingVariables {
    pub fn get(&self, index: u32) -> Option<u32> {
        self.values.get(&index).copied()
    }
}

impl VariableStore for RecordingVariables {
    fn set(&mut self, index: u32, value: u32) {
        self.values.insert(index, value);
    }
}

// -- Replay runner --------------------------------------------

/// Replays a trace against one map-style scene context.
#[derive(Debug)]
pub struct Replay {
    settings: Settings,
    limits: Limits,
    pictures: BTreeMap<u32, ReplayPicture>,
    bindings: TriggerBindings,
    scene: TouchScene,
    tracker: PointerTracker,
    interpreter: ReplayInterpreter,
    variables: RecordingVariables,
    frame: u64,
}

impl Replay {
    pub fn new(config: &AppConfig) -> Self {
        Self::with_options(
            config.settings,
            config.limits,
            config.replay,
            PointerTracker::new(config.timings),
        )
    }

    fn with_options(
        settings: Settings,
        limits: Limits,
        replay: ReplayOptions,
        tracker: PointerTracker,
    ) -> Self {
        Self {
            settings,
            limits,
            pictures: BTreeMap::new(),
            bindings: TriggerBindings::new(),
            scene: TouchScene::new(),
            tracker,
            interpreter: ReplayInterpreter::new(limits.event_max, replay.event_run_frames),
            variables: RecordingVariables::default(),
            frame: 0,
        }
    }

    /// Parse and apply one trace line.
    pub fn apply_line(&mut self, line: &str) -> Result<(), String> {
        if let Some(parsed) = parse_trace_line(line, &self.limits)? {
            self.apply(parsed);
        }
        Ok(())
    }

    /// Apply one parsed trace line.
    pub fn apply(&mut self, line: TraceLine) {
        match line {
            TraceLine::Picture { id, picture } => {
                self.pictures.insert(id, picture);
            }
            TraceLine::Show { id } => {
                if let Some(p) = self.pictures.get_mut(&id) {
                    p.visible = true;
                }
            }
            TraceLine::Hide { id } => {
                if let Some(p) = self.pictures.get_mut(&id) {
                    p.visible = false;
                }
            }
            TraceLine::Erase { id } => {
                if let Some(p) = self.pictures.get_mut(&id) {
                    p.bitmap = false;
                }
            }
            TraceLine::Move { x, y } => self.tracker.feed(PointerSample::Move { x, y }),
            TraceLine::Press(pos) => {
                let (x, y) = self.pos_or_current(pos);
                self.tracker.feed(PointerSample::Press { x, y });
            }
            TraceLine::Release(pos) => {
                let (x, y) = self.pos_or_current(pos);
                self.tracker.feed(PointerSample::Release { x, y });
            }
            TraceLine::Cancel(pos) => {
                let (x, y) = self.pos_or_current(pos);
                self.tracker.feed(PointerSample::Cancel { x, y });
            }
            TraceLine::Wheel(pos) => {
                let (x, y) = self.pos_or_current(pos);
                self.tracker.feed(PointerSample::WheelPress { x, y });
            }
            TraceLine::Frame { count } => {
                for _ in 0..count {
                    self.step_frame();
                }
            }
            TraceLine::Command(cmd) => command::apply_command(cmd, &mut self.bindings),
        }
    }

    /// One frame: tracker update, classification (suppressed while an event
    /// runs, map-context behavior), then the drain.
    fn step_frame(&mut self) {
        self.frame += 1;
        self.tracker.update();
        self.interpreter.tick();
        if !self.interpreter.is_busy() {
            let pictures = self.pictures.iter().map(|(id, p)| (*id, p));
            self.scene
                .classify(&mut self.tracker, pictures, &self.bindings, &self.settings);
        }
        if self
            .scene
            .drain(&mut self.interpreter, &mut self.variables, &self.settings)
        {
            info!("frame {}: event dispatched", self.frame);
        }
    }

    fn pos_or_current(&self, pos: Option<(f64, f64)>) -> (f64, f64) {
        pos.unwrap_or_else(|| self.tracker.position())
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Every event started, in dispatch order.
    pub fn started_events(&self) -> &[u32] {
        &self.interpreter.started
    }

    /// A recorded game-variable value (the picture-id output variable).
    pub fn variable(&self, index: u32) -> Option<u32> {
        self.variables.get(index)
    }

    /// The binding registry as mutated by the trace so far.
    pub fn bindings(&self) -> &TriggerBindings {
        &self.bindings
    }
}
