//! paf - filesystem housekeeping
//!
//! Finds duplicate files by content (BLAKE3) and moves folders into
//! date-partitioned archives, deleting each source file only after its copy
//! has been verified.

pub mod cli;
pub mod config;
pub mod duplicates;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;
pub mod registry;
pub mod relocate;
pub mod scanner;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{anyhow, bail, Context, Result};

use crate::cli::{Cli, Commands, FindDupArgs, MoveArgs};
use crate::config::Config;
use crate::duplicates::{DuplicateFinder, FinderConfig};
use crate::error::ExitCode;
use crate::output::ReportWriter;
use crate::progress::Progress;
use crate::registry::{ActionKind, CommandRegistry};
use crate::relocate::{Relocator, RelocatorConfig};
use crate::scanner::{list_subdirectories, WalkerConfig};

pub use crate::error::Error;

/// Everything a command handler needs, built once per run.
pub struct AppContext {
    /// Merged configuration (file, environment and CLI overrides)
    pub config: Config,
    /// Available commands
    pub registry: CommandRegistry,
    /// Shared progress reporter
    pub progress: Arc<Progress>,
    /// Suppress user-facing output
    pub quiet: bool,
}

impl AppContext {
    /// Create a context with the standard command registry.
    #[must_use]
    pub fn new(config: Config, quiet: bool) -> Self {
        Self {
            config,
            registry: CommandRegistry::standard(),
            progress: Arc::new(Progress::new(quiet)),
            quiet,
        }
    }

    fn say(&self, message: &str) {
        if !self.quiet {
            println!("{message}");
        }
    }
}

/// Run the application logic.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the selected command fails.
pub fn run_app(cli: Cli) -> Result<ExitCode> {
    logging::init_logging(cli.verbose, cli.quiet, cli.no_color);

    let mut config = match &cli.config {
        Some(path) => Config::load_from(Some(path.as_path()))
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => Config::load(),
    };
    if let Some(size) = cli.buffer_size {
        config.buffer_size = usize::try_from(size).unwrap_or(usize::MAX).max(1);
    }

    let ctx = AppContext::new(config, cli.quiet);
    let action = ctx
        .registry
        .find_action(cli.command.name())
        .ok_or_else(|| anyhow!("Command '{}' is not registered", cli.command.name()))?;

    match (action, &cli.command) {
        (ActionKind::FindDuplicates, Commands::FindDup(args)) => find_duplicates(&ctx, args),
        (ActionKind::MoveFolders, Commands::Mv(args)) => move_folders(&ctx, args),
        (ActionKind::ShowMenu, _) => {
            print!("{}", ctx.registry.render());
            Ok(ExitCode::Success)
        }
        (action, command) => bail!("Command '{}' cannot run {:?}", command.name(), action),
    }
}

/// Scan a tree and write the duplicate report.
///
/// # Errors
///
/// Returns an error if the scan aborts or the report cannot be written.
pub fn find_duplicates(ctx: &AppContext, args: &FindDupArgs) -> Result<ExitCode> {
    let walker_config = WalkerConfig::new(args.follow_symlinks || ctx.config.follow_symlinks);
    let finder = DuplicateFinder::new(
        FinderConfig::default()
            .with_walker_config(walker_config)
            .with_buffer_size(ctx.config.buffer_size)
            .with_progress_callback(ctx.progress.clone()),
    );

    let (set, summary) = finder
        .find_duplicates(&args.path)
        .with_context(|| format!("Failed to scan {}", args.path.display()))?;

    log::info!(
        "Scanned {} files ({}) in {:.2?}; {} unreadable",
        summary.total_files,
        summary.total_size_display(),
        summary.scan_duration,
        summary.skipped_files
    );

    if set.is_empty() {
        ctx.say("No duplicate files found.");
        return Ok(ExitCode::NoDuplicates);
    }

    let report = args
        .output
        .clone()
        .unwrap_or_else(|| ctx.config.report_file.clone());
    ReportWriter::new(&set).write_file(&report)?;

    ctx.say(&format!(
        "Found {} groups ({} redundant files, {} reclaimable).",
        summary.duplicate_groups,
        summary.duplicate_files,
        summary.reclaimable_display()
    ));
    ctx.say(&format!("Duplicate file list saved to {}", report.display()));
    Ok(ExitCode::Success)
}

/// Move the selected folders under `<target>/<today>/`.
///
/// # Errors
///
/// Returns an error if no target is configured, folders cannot be listed, or
/// a relocation fails.
pub fn move_folders(ctx: &AppContext, args: &MoveArgs) -> Result<ExitCode> {
    let target = args
        .target
        .clone()
        .or_else(|| ctx.config.default_target_path.clone())
        .ok_or_else(|| {
            anyhow!("No destination: pass --target or set {}", config::TARGET_PATH_VAR)
        })?;

    let sources = if args.all {
        let from = args.from.clone().unwrap_or_else(|| PathBuf::from("."));
        folders_to_move(&from, &target)?
    } else {
        args.sources.clone()
    };

    if sources.is_empty() {
        ctx.say("No folders to move.");
        return Ok(ExitCode::Success);
    }

    let walker_config = WalkerConfig::new(args.follow_symlinks || ctx.config.follow_symlinks);
    let relocator = Relocator::new(
        &target,
        RelocatorConfig::default()
            .with_walker_config(walker_config)
            .with_buffer_size(ctx.config.buffer_size)
            .with_progress_callback(ctx.progress.clone()),
    );

    let summaries = relocator
        .relocate_all(&sources)
        .context("Relocation aborted")?;

    for summary in &summaries {
        ctx.say(&format!(
            "Folder {} successfully moved to {} ({} files, {})",
            summary.source_root.display(),
            summary.destination_root.display(),
            summary.files_moved,
            summary.bytes_display()
        ));
        if summary.entries_left > 0 {
            ctx.say(&format!(
                "  {} symlinks or special files left in place",
                summary.entries_left
            ));
        }
    }
    Ok(ExitCode::Success)
}

/// Child folders of `from`, minus any that contain `target`.
fn folders_to_move(from: &Path, target: &Path) -> Result<Vec<PathBuf>> {
    let folders = list_subdirectories(from)
        .with_context(|| format!("Failed to list folders in {}", from.display()))?;
    let target = target.canonicalize().unwrap_or_else(|_| target.to_path_buf());

    Ok(folders
        .into_iter()
        .filter(|folder| {
            let holds_target = folder
                .canonicalize()
                .is_ok_and(|folder| target.starts_with(folder));
            if holds_target {
                log::info!("Skipping {} (contains the destination)", folder.display());
            }
            !holds_target
        })
        .collect())
}
