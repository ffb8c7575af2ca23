//! Script command surface: `BIND` / `UNBIND` text commands.
//!
//! Commands arrive as space-separated text from the game's script layer.
//! All numeric arguments are clamped into the configured limits here, at the
//! boundary - the registry itself stores whatever it is handed. Malformed
//! numbers parse as 0 and clamp to the lower bound; unknown command names
//! are ignored.

use log::debug;

use crate::config::Limits;
use crate::trigger::{Trigger, TriggerBindings};

/// A parsed, clamped script command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScriptCommand {
    Bind {
        picture_id: u32,
        event_id: u32,
        trigger: Trigger,
    },
    Unbind {
        picture_id: u32,
    },
}

/// Parse one command line. Returns `None` for unrecognized command names;
/// everything else yields a command with in-range arguments.
pub fn parse_command(line: &str, limits: &Limits) -> Option<ScriptCommand> {
    let mut parts = line.split_whitespace();
    let name = parts.next()?.to_ascii_uppercase();
    match name.as_str() {
        "BIND" => {
            let picture_id = arg_number(parts.next(), 1, limits.picture_max);
            let event_id = arg_number(parts.next(), 1, limits.event_max);
            let trigger = arg_trigger(parts.next());
            Some(ScriptCommand::Bind {
                picture_id,
                event_id,
                trigger,
            })
        }
        "UNBIND" => Some(ScriptCommand::Unbind {
            picture_id: arg_number(parts.next(), 1, limits.picture_max),
        }),
        _ => None,
    }
}

/// Feed a parsed command into the registry.
pub fn apply_command(command: ScriptCommand, bindings: &mut TriggerBindings) {
    match command {
        ScriptCommand::Bind {
            picture_id,
            event_id,
            trigger,
        } => {
            debug!("bind picture {picture_id} {trigger} -> event {event_id}");
            bindings.bind(picture_id, event_id, trigger);
        }
        ScriptCommand::Unbind { picture_id } => {
            debug!("unbind picture {picture_id}");
            bindings.unbind(picture_id);
        }
    }
}

/// Parse-or-zero, then clamp - the host script layer's forgiving numeric
/// argument handling.
fn arg_number(arg: Option<&str>, min: u32, max: u32) -> u32 {
    arg.and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0)
        .clamp(min, max)
}

/// A trigger argument is a kind name or a number clamped into [1, 10];
/// omitted defaults to the click kind.
fn arg_trigger(arg: Option<&str>) -> Trigger {
    let Some(arg) = arg else {
        return Trigger::Triggered;
    };
    arg.parse::<Trigger>()
        .unwrap_or_else(|_| Trigger::from_number(arg.parse().unwrap_or(0)))
}
