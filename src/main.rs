//! pictap – Pointer-gesture trigger layer for picture overlays.
//!
//! CLI entry point: replays pointer traces against a config and binding
//! script, printing every dispatched event.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::SystemTime;

use clap::Parser;
use log::{Level, LevelFilter, Log, Metadata, Record};

use pictap::config::{AppConfig, PictapError, parse_config_file};
use pictap::replay::Replay;
use pictap::trigger::Trigger;

#[derive(Parser)]
#[command(name = "pictap", about = "Replay pointer traces against picture trigger bindings")]
struct Cli {
    /// Trace file to replay ('-' or omitted reads stdin)
    trace: Option<PathBuf>,

    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// List the trigger kinds and their numbers, then exit
    #[arg(short, long)]
    list_triggers: bool,
}

/// Simple logger that writes to stderr and optionally to a log file.
struct PictapLogger {
    level: LevelFilter,
    file: Option<Mutex<File>>,
}

impl Log for PictapLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level && metadata.target().starts_with("pictap")
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let secs = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        let level = match record.level() {
            Level::Error => "ERROR",
            Level::Warn => "WARN",
            Level::Info => "INFO",
            Level::Debug => "DEBUG",
            Level::Trace => "TRACE",
        };
        let line = format!("[{secs} {level} pictap] {}\n", record.args());

        eprint!("{line}");

        if let Some(ref file_mutex) = self.file {
            if let Ok(mut f) = file_mutex.lock() {
                let _ = f.write_all(line.as_bytes());
            }
        }
    }

    fn flush(&self) {
        if let Some(ref file_mutex) = self.file {
            if let Ok(mut f) = file_mutex.lock() {
                let _ = f.flush();
            }
        }
    }
}

/// Print the ten trigger kinds with their numbers.
fn list_triggers() -> ExitCode {
    println!("\n=== pictap: Trigger Kinds ===\n");
    for trigger in Trigger::ALL {
        println!("  {:>2}  {}", trigger.number(), trigger);
    }
    println!(
        "\nBind one with:\n\
         \x20 BIND <pictureId> <eventId> [trigger]\n\
         where [trigger] is a number or a name above (default 1)."
    );
    ExitCode::SUCCESS
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.list_triggers {
        return list_triggers();
    }

    // Parse config first (before logger init) so we can read the configured
    // log level.
    let config = match cli.config.as_deref().map(parse_config_file) {
        Some(Ok(c)) => c,
        Some(Err(e)) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
        None => AppConfig::builtin(),
    };

    // Initialize logging: CLI --verbose overrides the config file setting.
    let log_level: LevelFilter = if cli.verbose {
        LevelFilter::Debug
    } else {
        config.log_level.parse().unwrap_or(LevelFilter::Info)
    };

    let log_file = config.log_file.as_deref().and_then(|path| {
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => Some(Mutex::new(file)),
            Err(e) => {
                eprintln!("Warning: cannot open log file '{path}': {e}");
                None
            }
        }
    });

    let logger = PictapLogger {
        level: log_level,
        file: log_file,
    };
    log::set_boxed_logger(Box::new(logger)).expect("Failed to set logger");
    log::set_max_level(log_level);

    // Set up signal handling so a stdin session stops cleanly.
    let running = Arc::new(AtomicBool::new(true));
    let running_handler = Arc::clone(&running);
    ctrlc::set_handler(move || {
        running_handler.store(false, Ordering::Relaxed);
    })
    .expect("Error setting Ctrl-C handler");

    let mut replay = Replay::new(&config);

    let reader: Box<dyn BufRead> = match cli.trace.as_deref() {
        None => {
            log::info!("Reading trace from stdin (Ctrl-C or EOF ends the session)");
            Box::new(BufReader::new(std::io::stdin()))
        }
        Some(path) if path.as_os_str() == "-" => {
            log::info!("Reading trace from stdin (Ctrl-C or EOF ends the session)");
            Box::new(BufReader::new(std::io::stdin()))
        }
        Some(path) => match File::open(path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(e) => {
                eprintln!(
                    "Error: {}",
                    PictapError::TraceRead {
                        path: path.to_path_buf(),
                        source: e,
                    }
                );
                return ExitCode::FAILURE;
            }
        },
    };

    for (line_no, line) in reader.lines().enumerate() {
        if !running.load(Ordering::Relaxed) {
            break;
        }
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                log::error!("trace read failed: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = replay.apply_line(&line) {
            log::warn!("trace line {}: {e}", line_no + 1);
        }
    }

    log::info!(
        "Replayed {} frame(s), {} event(s) dispatched",
        replay.frame(),
        replay.started_events().len()
    );
    ExitCode::SUCCESS
}
