//! Configuration data structures and TOML parsing.
//!
//! The config file uses TOML format. Example:
//!
//! ```toml
//! [global]
//! log_level = "info"
//! transparency_consideration = true
//! picture_id_variable = 21
//!
//! [global.limits]
//! picture_max = 100
//! event_max = 1000
//! variable_max = 5000
//!
//! [global.timings]
//! frame_rate = 60.0
//! long_press_time = 0.4
//! long_press_refire_delay = 1.0
//! repeat_wait = 0.4
//! repeat_interval = 0.1
//! double_click_interval = 0.3
//!
//! [replay]
//! event_run_frames = 0
//! ```
//!
//! Every value has an engine default; an empty file is a valid config.
//! Timings are authored in seconds and validated into whole frames at the
//! configured frame rate.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Top-level error type used throughout the crate.
#[derive(Debug, Error)]
pub enum PictapError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Config validation error: {message}")]
    InvalidTimings { message: String },

    #[error("Failed to read trace file {path}: {source}")]
    TraceRead {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Root of the TOML config file.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    global: RawGlobal,
    replay: RawReplay,
}

/// The `[global]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawGlobal {
    log_level: Option<String>,
    log_file: Option<String>,
    transparency_consideration: Option<bool>,
    picture_id_variable: Option<u32>,
    #[serde(default)]
    limits: RawLimits,
    #[serde(default)]
    timings: RawTimings,
}

/// Id-range limits - all optional, engine defaults apply.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
struct RawLimits {
    picture_max: Option<u32>,
    event_max: Option<u32>,
    variable_max: Option<u32>,
}

/// Gesture timings in seconds - all optional, engine defaults apply.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
struct RawTimings {
    frame_rate: Option<f64>,
    long_press_time: Option<f64>,
    long_press_refire_delay: Option<f64>,
    repeat_wait: Option<f64>,
    repeat_interval: Option<f64>,
    double_click_interval: Option<f64>,
}

/// The `[replay]` section.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawReplay {
    event_run_frames: Option<u64>,
}

/// Valid id ranges for script-command clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Highest valid picture id (picture-slot capacity).
    pub picture_max: u32,
    /// Highest valid event id in the static event table.
    pub event_max: u32,
    /// Highest valid game-variable index.
    pub variable_max: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            picture_max: 100,
            event_max: 1000,
            variable_max: 5000,
        }
    }
}

/// Gesture timings converted to whole frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedTimings {
    pub long_press_frames: u64,
    pub long_press_refire_frames: u64,
    pub repeat_wait_frames: u64,
    pub repeat_interval_frames: u64,
    pub double_click_frames: u64,
}

impl Default for ValidatedTimings {
    fn default() -> Self {
        // Engine defaults at 60 fps: 0.4 s long press with a 1 s refire
        // delay, 0.4 s / 0.1 s repeat cadence, 0.3 s double-click window.
        Self {
            long_press_frames: 24,
            long_press_refire_frames: 60,
            repeat_wait_frames: 24,
            repeat_interval_frames: 6,
            double_click_frames: 18,
        }
    }
}

/// Runtime behavior switches consumed by the classifier and the drain.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Settings {
    /// When on, fully transparent pixels never count as a hit (hover
    /// edges excepted).
    pub transparency_consideration: bool,
    /// Game-variable index receiving the originating picture id on every
    /// dispatch; 0 disables the write.
    pub picture_id_variable: u32,
}

/// Replay-harness options.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplayOptions {
    /// Frames the replay interpreter stays busy per started event.
    pub event_run_frames: u64,
}

/// Top-level parsed configuration.
#[derive(Debug, Default)]
pub struct AppConfig {
    pub log_level: String,
    pub log_file: Option<String>,
    pub settings: Settings,
    pub limits: Limits,
    pub timings: ValidatedTimings,
    pub replay: ReplayOptions,
}

impl AppConfig {
    /// Built-in defaults, used when no config file is given.
    pub fn builtin() -> Self {
        Self {
            log_level: "info".to_string(),
            ..Self::default()
        }
    }
}

impl RawTimings {
    fn into_validated(self) -> Result<ValidatedTimings, PictapError> {
        let rate = self.frame_rate.unwrap_or(60.0);
        if !(rate > 0.0) {
            return Err(PictapError::InvalidTimings {
                message: format!("frame_rate must be positive, got {rate}"),
            });
        }
        let frames = |secs: f64, name: &str| -> Result<u64, PictapError> {
            if secs < 0.0 {
                return Err(PictapError::InvalidTimings {
                    message: format!("{name} must not be negative, got {secs}"),
                });
            }
            Ok((secs * rate).round() as u64)
        };
        Ok(ValidatedTimings {
            long_press_frames: frames(self.long_press_time.unwrap_or(0.4), "long_press_time")?,
            long_press_refire_frames: frames(
                self.long_press_refire_delay.unwrap_or(1.0),
                "long_press_refire_delay",
            )?,
            repeat_wait_frames: frames(self.repeat_wait.unwrap_or(0.4), "repeat_wait")?,
            // A zero interval would repeat every frame and divide by zero.
            repeat_interval_frames: frames(self.repeat_interval.unwrap_or(0.1), "repeat_interval")?
                .max(1),
            double_click_frames: frames(
                self.double_click_interval.unwrap_or(0.3),
                "double_click_interval",
            )?,
        })
    }
}

impl RawLimits {
    fn into_limits(self) -> Limits {
        let defaults = Limits::default();
        Limits {
            picture_max: self.picture_max.unwrap_or(defaults.picture_max).max(1),
            event_max: self.event_max.unwrap_or(defaults.event_max).max(1),
            variable_max: self.variable_max.unwrap_or(defaults.variable_max),
        }
    }
}

/// Parse a TOML config file and return the fully resolved `AppConfig`.
pub fn parse_config_file(path: &Path) -> Result<AppConfig, PictapError> {
    let raw: RawConfig =
        toml::from_str(&fs::read_to_string(path).map_err(|e| PictapError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?)
        .map_err(|e| PictapError::ConfigParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let limits = raw.global.limits.into_limits();
    let settings = Settings {
        transparency_consideration: raw.global.transparency_consideration.unwrap_or(false),
        // Out-of-range variable indexes clamp rather than fail, like every
        // other numeric input.
        picture_id_variable: raw
            .global
            .picture_id_variable
            .unwrap_or(0)
            .min(limits.variable_max),
    };

    Ok(AppConfig {
        log_level: raw.global.log_level.unwrap_or_else(|| "info".to_string()),
        log_file: raw.global.log_file,
        settings,
        limits,
        timings: raw.global.timings.into_validated()?,
        replay: ReplayOptions {
            event_run_frames: raw.replay.event_run_frames.unwrap_or(0),
        },
    })
}
