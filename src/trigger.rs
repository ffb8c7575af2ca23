//! Trigger kinds and the picture → event binding registry.
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString, IntoStaticStr};

/// The ten pointer-gesture kinds a picture binding can fire on.
///
/// Numbers are fixed (1..=10) and double as dispatch priority: when several
/// kinds qualify on the same frame, the lowest-numbered bound kind wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, IntoStaticStr)]
pub enum Trigger {
    /// Fresh press edge inside the picture.
    #[strum(serialize = "triggered")]
    Triggered = 1,
    /// Right-button press edge inside the picture.
    #[strum(serialize = "cancelled")]
    Cancelled = 2,
    /// Press held past the configured threshold inside the picture.
    #[strum(serialize = "long_pressed")]
    LongPressed = 3,
    /// Pointer entered the picture's rectangle this frame.
    #[strum(serialize = "on_focus")]
    OnFocus = 4,
    /// Pointer left the picture's rectangle this frame.
    #[strum(serialize = "out_focus")]
    OutFocus = 5,
    /// Press-release edge inside the picture.
    #[strum(serialize = "released")]
    Released = 6,
    /// Auto-repeat edge while held inside the picture.
    #[strum(serialize = "repeated")]
    Repeated = 7,
    /// Level-triggered: every frame the press is held inside the picture.
    #[strum(serialize = "pressed")]
    Pressed = 8,
    /// Middle-button press edge inside the picture.
    #[strum(serialize = "wheel_triggered")]
    WheelTriggered = 9,
    /// Second press edge within the double-click window, inside the picture.
    #[strum(serialize = "double_triggered")]
    DoubleTriggered = 10,
}

impl Trigger {
    /// All kinds in ascending dispatch priority.
    pub const ALL: [Self; 10] = [
        Self::Triggered,
        Self::Cancelled,
        Self::LongPressed,
        Self::OnFocus,
        Self::OutFocus,
        Self::Released,
        Self::Repeated,
        Self::Pressed,
        Self::WheelTriggered,
        Self::DoubleTriggered,
    ];

    /// The kind's fixed number (1..=10).
    pub fn number(self) -> u32 {
        self as u32
    }

    /// Kind for a trigger number, clamped into [1, 10].
    pub fn from_number(n: u32) -> Self {
        match n.clamp(1, 10) {
            1 => Self::Triggered,
            2 => Self::Cancelled,
            3 => Self::LongPressed,
            4 => Self::OnFocus,
            5 => Self::OutFocus,
            6 => Self::Released,
            7 => Self::Repeated,
            8 => Self::Pressed,
            9 => Self::WheelTriggered,
            _ => Self::DoubleTriggered,
        }
    }

    /// Hover edges (4 and 5) bypass the transparency check so a picture can
    /// still see the pointer leave across a transparent border.
    pub fn is_focus_edge(self) -> bool {
        matches!(self, Self::OnFocus | Self::OutFocus)
    }
}

/// Sparse trigger table of one picture: kind → bound event id.
pub type TriggerTable = BTreeMap<Trigger, u32>;

/// Registry mapping picture ids to their trigger tables.
///
/// Bindings are keyed by picture id only, so they survive the picture being
/// erased and redrawn under the same id. `unbind` removes every kind for the
/// picture at once; there is no per-kind unbind, matching the script surface.
///
/// The registry is part of the host's serialized screen state. Unset entries
/// are absent rather than zero, so "never bound" round-trips distinctly from
/// "bound to nothing". Both map-key levels serialize as strings (picture ids
/// and the kinds' snake_case names) to stay valid under TOML and JSON hosts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TriggerBindings {
    pictures: HashMap<u32, TriggerTable>,
}

impl TriggerBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind one `(picture, kind)` pair to an event id, overwriting any prior
    /// binding for that pair. Other kinds on the same picture are untouched.
    ///
    /// Ids are stored as given; range clamping happens at the script-command
    /// boundary ([`crate::command`]).
    pub fn bind(&mut self, picture_id: u32, event_id: u32, trigger: Trigger) {
        self.pictures
            .entry(picture_id)
            .or_default()
            .insert(trigger, event_id);
    }

    /// Remove every trigger kind bound to the picture. No-op if nothing
    /// was bound.
    pub fn unbind(&mut self, picture_id: u32) {
        self.pictures.remove(&picture_id);
    }

    /// The picture's trigger table, or `None` if it was never bound.
    pub fn lookup(&self, picture_id: u32) -> Option<&TriggerTable> {
        self.pictures.get(&picture_id)
    }

    /// The event bound to one `(picture, kind)` pair, if any.
    pub fn event_for(&self, picture_id: u32, trigger: Trigger) -> Option<u32> {
        self.pictures
            .get(&picture_id)
            .and_then(|table| table.get(&trigger))
            .copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pictures.is_empty()
    }
}

// Serialized layout: { "<picture id>": { "<kind name>": event_id, .. }, .. }

impl Serialize for TriggerBindings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let ordered: BTreeMap<u32, &TriggerTable> =
            self.pictures.iter().map(|(id, table)| (*id, table)).collect();
        let mut map = serializer.serialize_map(Some(ordered.len()))?;
        for (id, table) in ordered {
            let named: BTreeMap<&'static str, u32> = table
                .iter()
                .map(|(trigger, event)| (<&'static str>::from(*trigger), *event))
                .collect();
            map.serialize_entry(&id.to_string(), &named)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for TriggerBindings {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct BindingsVisitor;

        impl<'de> Visitor<'de> for BindingsVisitor {
            type Value = TriggerBindings;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of picture ids to trigger tables")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut pictures = HashMap::new();
                while let Some((id, named)) =
                    access.next_entry::<String, BTreeMap<String, u32>>()?
                {
                    let picture_id: u32 = id
                        .parse()
                        .map_err(|_| serde::de::Error::custom(format!("invalid picture id '{id}'")))?;
                    let mut table = TriggerTable::new();
                    for (name, event) in named {
                        let trigger: Trigger = name.parse().map_err(|_| {
                            serde::de::Error::custom(format!("unknown trigger kind '{name}'"))
                        })?;
                        table.insert(trigger, event);
                    }
                    pictures.insert(picture_id, table);
                }
                Ok(TriggerBindings { pictures })
            }
        }

        deserializer.deserialize_map(BindingsVisitor)
    }
}
