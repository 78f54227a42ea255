//! Logging setup for paf.
//!
//! Uses the `log` facade with an `env_logger` backend. The level comes from,
//! in priority order:
//!
//! 1. `RUST_LOG` (if set)
//! 2. `--quiet` (errors only) or `--verbose` (debug, `-vv` trace)
//! 3. Info
//!
//! Debug builds print a timestamp and, when verbose, the module path. Release
//! builds print the level and message only.
//!
//! # Example
//!
//! ```rust,no_run
//! use paf::logging::init_logging;
//!
//! init_logging(1, false, true);
//! log::debug!("debug output, no colors");
//! ```

use std::env;
use std::io::Write;

use env_logger::{Builder, WriteStyle};
use log::LevelFilter;

/// Initialize the logger from the global CLI flags.
///
/// Call once, before anything logs. Later calls are ignored.
pub fn init_logging(verbose: u8, quiet: bool, no_color: bool) {
    let from_env = env::var("RUST_LOG").is_ok();

    let mut builder = Builder::new();
    if from_env {
        builder.parse_default_env();
    } else {
        builder.filter_level(determine_level(verbose, quiet));
    }
    builder.write_style(if no_color {
        WriteStyle::Never
    } else {
        WriteStyle::Auto
    });
    configure_format(&mut builder, verbose);

    if builder.try_init().is_err() {
        return;
    }
    log::debug!(
        "Logging initialized at level {} ({})",
        current_level_name(),
        if from_env { "RUST_LOG" } else { "flags" }
    );
}

/// Map CLI flags to a level. `quiet` wins over `verbose`.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        return LevelFilter::Error;
    }
    match verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

fn configure_format(builder: &mut Builder, verbose: u8) {
    #[cfg(debug_assertions)]
    {
        builder.format(move |buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            if verbose >= 1 {
                writeln!(
                    buf,
                    "{} {style}{:<5}{style:#} [{}] {}",
                    buf.timestamp_seconds(),
                    level,
                    record.module_path().unwrap_or("unknown"),
                    record.args()
                )
            } else {
                writeln!(
                    buf,
                    "{} {style}{:<5}{style:#} {}",
                    buf.timestamp_seconds(),
                    level,
                    record.args()
                )
            }
        });
    }

    #[cfg(not(debug_assertions))]
    {
        let _ = verbose;
        builder.format(|buf, record| {
            let level = record.level();
            let style = buf.default_level_style(level);
            writeln!(buf, "{style}{:<5}{style:#} {}", level, record.args())
        });
    }
}

/// Name of the active maximum log level.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
