//! Verified move of a directory tree into a dated archive folder.
//!
//! # Overview
//!
//! For each source directory the [`Relocator`] runs:
//!
//! ```text
//! PLAN -> ENSURE_DEST_DIR -> WALK_SOURCE -> {COPY_FILE -> VERIFY_SIZE -> DELETE_SOURCE}* -> DONE
//! ```
//!
//! A source file is removed only after its copy exists and has the same
//! size. The first failure aborts the remaining work; files already moved stay
//! moved and nothing is rolled back. Source directories are left behind empty.
//!
//! # Example
//!
//! ```no_run
//! use paf::relocate::{Relocator, RelocatorConfig};
//! use std::path::Path;
//!
//! let relocator = Relocator::new(Path::new("/mnt/archive"), RelocatorConfig::default());
//! let summary = relocator.relocate(Path::new("./shoot-2024-03")).unwrap();
//! println!("Moved {} files to {}", summary.files_moved, summary.destination_root.display());
//! ```

use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use bytesize::ByteSize;

use super::copier::copy_file;
use super::plan::RelocationPlan;
use crate::error::Error;
use crate::progress::{ProgressCallback, PHASE_MOVING};
use crate::scanner::{total_size, EntryKind, Walker, WalkerConfig, DEFAULT_BUFFER_SIZE};

/// Configuration for the relocation engine.
#[derive(Clone)]
pub struct RelocatorConfig {
    /// Walker configuration (symlink policy).
    pub walker_config: WalkerConfig,
    /// Copy buffer size.
    pub buffer_size: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for RelocatorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelocatorConfig")
            .field("walker_config", &self.walker_config)
            .field("buffer_size", &self.buffer_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for RelocatorConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress_callback: None,
        }
    }
}

impl RelocatorConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the copy buffer size.
    #[must_use]
    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(1);
        self
    }

    /// Set the progress callback.
    #[must_use]
    pub fn with_progress_callback(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress_callback = Some(callback);
        self
    }
}

/// Sizes of one copied file, taken just before its source is deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRecord {
    /// File being moved
    pub source: PathBuf,
    /// Its copy
    pub destination: PathBuf,
    /// Length of the source
    pub source_size: u64,
    /// Length of the copy
    pub destination_size: u64,
}

impl TransferRecord {
    /// Stat both sides of a copy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Access`] or [`Error::Io`] if either side cannot be stat'ed.
    pub fn stat(source: &Path, destination: &Path) -> Result<Self, Error> {
        let source_size = fs::metadata(source)
            .map_err(|e| Error::from_io(source, e))?
            .len();
        let destination_size = fs::metadata(destination)
            .map_err(|e| Error::from_io(destination, e))?
            .len();
        Ok(Self {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_size,
            destination_size,
        })
    }

    /// Fail with [`Error::SizeMismatch`] unless both sizes agree.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] naming the source.
    pub fn verify(&self) -> Result<(), Error> {
        if self.source_size == self.destination_size {
            return Ok(());
        }
        log::error!(
            "File size mismatch for {}: source {} bytes, copy {} bytes",
            self.source.display(),
            self.source_size,
            self.destination_size
        );
        Err(Error::SizeMismatch {
            path: self.source.clone(),
            expected: self.source_size,
            actual: self.destination_size,
        })
    }
}

/// Outcome of relocating one source directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationSummary {
    /// Source directory that was moved
    pub source_root: PathBuf,
    /// Where its contents now live
    pub destination_root: PathBuf,
    /// Whether the destination root was created by this run
    pub created: bool,
    /// Files copied, verified and removed from the source
    pub files_moved: usize,
    /// Bytes moved
    pub bytes_moved: u64,
    /// Directories created beneath the destination root
    pub directories_created: usize,
    /// Symlinks and special files left in the source
    pub entries_left: usize,
}

impl RelocationSummary {
    fn new(plan: &RelocationPlan) -> Self {
        Self {
            source_root: plan.source_root.clone(),
            destination_root: plan.destination_root.clone(),
            created: plan.created,
            files_moved: 0,
            bytes_moved: 0,
            directories_created: 0,
            entries_left: 0,
        }
    }

    /// Human-readable byte count.
    #[must_use]
    pub fn bytes_display(&self) -> String {
        ByteSize::b(self.bytes_moved).to_string()
    }
}

/// Moves directory trees under `base/YYYY-MM-DD/`.
#[derive(Debug)]
pub struct Relocator {
    base: PathBuf,
    config: RelocatorConfig,
}

impl Relocator {
    /// Create a relocator targeting `base`.
    #[must_use]
    pub fn new(base: &Path, config: RelocatorConfig) -> Self {
        Self {
            base: base.to_path_buf(),
            config,
        }
    }

    /// Base destination directory.
    #[must_use]
    pub fn base(&self) -> &Path {
        &self.base
    }

    /// Compute today's plan for `source` without touching the filesystem
    /// beyond resolving paths.
    ///
    /// The destination folder takes the last component of `source` as given,
    /// so moving a symlink archives it under the link's name. The
    /// inside-source check compares fully resolved paths.
    ///
    /// # Errors
    ///
    /// - [`Error::PathNotFound`] / [`Error::NotADirectory`] for a bad source
    /// - [`Error::InvalidSource`] if the source has no folder name
    /// - [`Error::DestinationInsideSource`] if the destination is inside the source
    pub fn plan(&self, source: &Path) -> Result<RelocationPlan, Error> {
        if !source.exists() {
            return Err(Error::PathNotFound(source.to_path_buf()));
        }
        if !source.is_dir() {
            return Err(Error::NotADirectory(source.to_path_buf()));
        }
        let source_root = source.canonicalize().map_err(|e| Error::from_io(source, e))?;

        // Named after the path as given; walking and the guard use resolved paths
        let named = std::path::absolute(source)
            .map(|p| normalize_lexically(&p))
            .map_err(|e| Error::from_io(source, e))?;
        let mut plan = RelocationPlan::for_today(&self.base, &named)?;
        plan.source_root = source_root;
        plan.destination_root = resolve_path(&plan.destination_root)?;

        if plan.destination_root.starts_with(&plan.source_root) {
            return Err(Error::DestinationInsideSource {
                source_root: plan.source_root,
                destination: plan.destination_root,
            });
        }
        Ok(plan)
    }

    /// Move every file of `source` into today's destination.
    ///
    /// # Errors
    ///
    /// Planning errors from [`Relocator::plan`], plus the first failure
    /// while moving: [`Error::Walk`], [`Error::Access`], [`Error::Io`] or
    /// [`Error::SizeMismatch`].
    pub fn relocate(&self, source: &Path) -> Result<RelocationSummary, Error> {
        let plan = self.plan(source)?;
        self.execute(plan)
    }

    /// Relocate several sources in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// See [`Relocator::relocate`].
    pub fn relocate_all(&self, sources: &[PathBuf]) -> Result<Vec<RelocationSummary>, Error> {
        sources.iter().map(|s| self.relocate(s)).collect()
    }

    /// Run a previously computed plan.
    ///
    /// # Errors
    ///
    /// See [`Relocator::relocate`].
    pub fn execute(&self, mut plan: RelocationPlan) -> Result<RelocationSummary, Error> {
        plan.ensure_destination()?;
        let mut summary = RelocationSummary::new(&plan);
        let callback = self.config.progress_callback.as_deref();

        if let Some(cb) = callback {
            let total = total_size(&plan.source_root, &self.config.walker_config)?;
            cb.on_phase_start(PHASE_MOVING, total);
        }

        let result = self.move_tree(&plan, &mut summary);

        if let Some(cb) = callback {
            cb.on_phase_end(PHASE_MOVING);
        }
        result?;

        log::info!(
            "Folder {} successfully moved to {} ({} files, {})",
            plan.source_root.display(),
            plan.destination_root.display(),
            summary.files_moved,
            summary.bytes_display()
        );
        Ok(summary)
    }

    fn move_tree(&self, plan: &RelocationPlan, summary: &mut RelocationSummary) -> Result<(), Error> {
        let walker = Walker::new(&plan.source_root, self.config.walker_config.clone());

        for entry in walker.walk() {
            let entry = entry?;
            let relative = entry
                .path
                .strip_prefix(&plan.source_root)
                .map_err(|_| Error::InvalidSource(entry.path.clone()))?;
            let target = plan.destination_root.join(relative);

            match entry.kind {
                EntryKind::Directory => {
                    if entry.depth == 0 {
                        continue;
                    }
                    if !target.is_dir() {
                        fs::create_dir_all(&target).map_err(|e| Error::from_io(&target, e))?;
                        summary.directories_created += 1;
                    }
                }
                EntryKind::File => {
                    let bytes = self.move_file(&entry.path, &target)?;
                    summary.files_moved += 1;
                    summary.bytes_moved += bytes;
                    if let Some(cb) = self.config.progress_callback.as_deref() {
                        cb.on_progress(summary.files_moved as u64, &entry.path.to_string_lossy());
                    }
                }
                EntryKind::Symlink | EntryKind::Other => {
                    log::warn!("Leaving {} in place (not a regular file)", entry.path.display());
                    summary.entries_left += 1;
                }
            }
        }

        Ok(())
    }

    /// Copy, verify and delete one file. Returns the bytes moved.
    fn move_file(&self, source: &Path, destination: &Path) -> Result<u64, Error> {
        let callback = self.config.progress_callback.as_deref();

        copy_file(source, destination, self.config.buffer_size, |n| {
            if let Some(cb) = callback {
                cb.on_bytes(n);
            }
        })?;
        if let Some(cb) = callback {
            cb.on_file_copied(source, destination);
        }

        let record = TransferRecord::stat(source, destination)?;
        record.verify()?;

        fs::remove_file(source).map_err(|e| Error::from_io(source, e))?;
        log::debug!("Moved {} -> {}", source.display(), destination.display());
        Ok(record.source_size)
    }
}

/// Resolve `path` as the filesystem will once it is created.
///
/// The deepest existing ancestor is canonicalized and the missing tail is
/// appended with `.` and `..` applied lexically.
fn resolve_path(path: &Path) -> Result<PathBuf, Error> {
    let absolute = std::path::absolute(path).map_err(|e| Error::from_io(path, e))?;
    let components: Vec<Component<'_>> = absolute.components().collect();

    for split in (1..=components.len()).rev() {
        let prefix: PathBuf = components[..split].iter().collect();
        if let Ok(mut resolved) = prefix.canonicalize() {
            push_normalized(&mut resolved, &components[split..]);
            return Ok(resolved);
        }
    }
    Ok(normalize_lexically(&absolute))
}

/// Apply `.` and `..` without touching the filesystem.
fn normalize_lexically(path: &Path) -> PathBuf {
    let components: Vec<Component<'_>> = path.components().collect();
    let mut normalized = PathBuf::new();
    push_normalized(&mut normalized, &components);
    normalized
}

fn push_normalized(out: &mut PathBuf, components: &[Component<'_>]) {
    for component in components {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
}
