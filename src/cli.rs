//! Command-line interface definitions for paf.
//!
//! Global options (verbosity, color, error format) plus one subcommand per
//! registered action.
//!
//! # Example
//!
//! ```bash
//! # Write groups of identical files to duplicate_files.txt
//! paf find-dup ~/Pictures
//!
//! # Move two folders under /mnt/archive/<today>/
//! paf mv shoot-01 shoot-02 --target /mnt/archive
//!
//! # Move every folder of the current directory (target from DEFAULT_TARGET_PATH)
//! paf mv --all
//! ```

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Find duplicate files and archive folders into dated directories.
#[derive(Debug, Parser)]
#[command(name = "paf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print errors as JSON on stderr
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Read settings from this TOML file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read and copy buffer size (e.g., 64KiB, 1MiB)
    #[arg(long, global = true, value_name = "SIZE", value_parser = parse_size)]
    pub buffer_size: Option<u64>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Find duplicated files in a folder and its subfolders
    FindDup(FindDupArgs),
    /// Move folders into <target>/<YYYY-MM-DD>/ with size-verified copies
    Mv(MoveArgs),
    /// List available commands
    Menu,
}

impl Commands {
    /// Registry name of this subcommand.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Commands::FindDup(_) => "find-dup",
            Commands::Mv(_) => "mv",
            Commands::Menu => "menu",
        }
    }
}

/// Arguments for `find-dup`.
#[derive(Debug, Args)]
pub struct FindDupArgs {
    /// Directory to scan
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Report file (default: duplicate_files.txt)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Follow symbolic links during the scan
    ///
    /// Symlink cycles abort the scan.
    #[arg(long)]
    pub follow_symlinks: bool,
}

/// Arguments for `mv`.
#[derive(Debug, Args)]
pub struct MoveArgs {
    /// Folders to move
    #[arg(value_name = "SOURCE", required_unless_present = "all")]
    pub sources: Vec<PathBuf>,

    /// Move every folder found directly under --from
    #[arg(long, conflicts_with = "sources")]
    pub all: bool,

    /// Directory whose folders --all moves (default: current directory)
    #[arg(long, value_name = "DIR", requires = "all")]
    pub from: Option<PathBuf>,

    /// Base destination (default: DEFAULT_TARGET_PATH)
    #[arg(short, long, value_name = "DIR")]
    pub target: Option<PathBuf>,

    /// Follow symbolic links while walking the sources
    #[arg(long)]
    pub follow_symlinks: bool,
}

/// Parse a human-readable size string into bytes.
///
/// Supports suffixes: B, KB, KiB, MB, MiB, GB, GiB (case-insensitive).
/// Numbers without suffix are bytes.
///
/// ```
/// use paf::cli::parse_size;
///
/// assert_eq!(parse_size("4096").unwrap(), 4096);
/// assert_eq!(parse_size("64KiB").unwrap(), 65_536);
/// assert_eq!(parse_size("1MB").unwrap(), 1_000_000);
/// ```
///
/// # Errors
///
/// Returns an error for an empty string, an invalid number, or an unknown
/// suffix.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("Size cannot be empty".to_string());
    }

    let (num_str, suffix) = match s.find(|c: char| !c.is_ascii_digit() && c != '.') {
        Some(idx) => (&s[..idx], s[idx..].trim().to_uppercase()),
        None => (s, String::new()),
    };

    let num: f64 = num_str
        .parse()
        .map_err(|_| format!("Invalid number: '{num_str}'"))?;

    let multiplier: u64 = match suffix.as_str() {
        "" | "B" => 1,
        "KB" | "K" => 1_000,
        "KIB" => 1_024,
        "MB" | "M" => 1_000_000,
        "MIB" => 1_048_576,
        "GB" | "G" => 1_000_000_000,
        "GIB" => 1_073_741_824,
        _ => return Err(format!("Unknown size suffix: '{suffix}'")),
    };

    Ok((num * multiplier as f64) as u64)
}
