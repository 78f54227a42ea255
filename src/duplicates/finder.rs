//! Duplicate finder: walk, hash, group.
//!
//! # Overview
//!
//! [`DuplicateFinder`] runs the content-addressed duplicate scan:
//! 1. **Walk** - collect every regular file under the root (depth-first, sorted)
//! 2. **Hash** - compute a BLAKE3 fingerprint for each file
//! 3. **Group** - keep fingerprints shared by two or more paths
//!
//! Per-file hash failures are skipped and counted. A directory that cannot be
//! enumerated aborts the scan with [`Error::Walk`] and no groups are returned.
//!
//! # Example
//!
//! ```no_run
//! use paf::duplicates::DuplicateFinder;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (set, summary) = finder.find_duplicates(Path::new(".")).unwrap();
//! println!("{} groups, {} reclaimable", set.len(), summary.reclaimable_display());
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytesize::ByteSize;

use super::groups::{DuplicateSet, FingerprintIndex};
use crate::error::Error;
use crate::progress::{ProgressCallback, PHASE_HASHING, PHASE_WALKING};
use crate::scanner::{Hasher, Walker, WalkerConfig, DEFAULT_BUFFER_SIZE};

/// Configuration for the duplicate finder.
#[derive(Clone)]
pub struct FinderConfig {
    /// Walker configuration (symlink policy).
    pub walker_config: WalkerConfig,
    /// Read buffer size used while hashing.
    pub buffer_size: usize,
    /// Optional progress callback.
    pub progress_callback: Option<Arc<dyn ProgressCallback>>,
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("walker_config", &self.walker_config)
            .field("buffer_size", &self.buffer_size)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            walker_config: WalkerConfig::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            progress_callback: None,
        }
    }
}

impl FinderConfig {
    /// Set the walker configuration.
    #[must_use]
    pub fn with_walker_config(mut self, config: WalkerConfig) -> Self {
        self.walker_config = config;
        self
    }

    /// Set the hashing buffer size.
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

/// Statistics about one scan.
#[derive(Debug, Clone, Default)]
pub struct ScanSummary {
    /// Regular files discovered by the walk
    pub total_files: usize,
    /// Files successfully hashed
    pub hashed_files: usize,
    /// Files skipped because they could not be read
    pub skipped_files: usize,
    /// Combined size of hashed files in bytes
    pub total_size: u64,
    /// Number of duplicate groups
    pub duplicate_groups: usize,
    /// Redundant copies (files beyond the first in each group)
    pub duplicate_files: usize,
    /// Bytes that removing redundant copies would free
    pub reclaimable_space: u64,
    /// Wall-clock duration of the scan
    pub scan_duration: Duration,
}

impl ScanSummary {
    /// Human-readable reclaimable space.
    #[must_use]
    pub fn reclaimable_display(&self) -> String {
        ByteSize::b(self.reclaimable_space).to_string()
    }

    /// Human-readable total size.
    #[must_use]
    pub fn total_size_display(&self) -> String {
        ByteSize::b(self.total_size).to_string()
    }
}

/// Content-addressed duplicate finder.
pub struct DuplicateFinder {
    config: FinderConfig,
    hasher: Hasher,
}

impl DuplicateFinder {
    /// Create a new duplicate finder with the given configuration.
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        let hasher = Hasher::with_buffer_size(config.buffer_size);
        Self { config, hasher }
    }

    /// Create a new duplicate finder with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::default())
    }

    /// Find all duplicate files beneath `path`.
    ///
    /// Reported paths are absolute: the root is canonicalized first.
    ///
    /// # Errors
    ///
    /// - [`Error::PathNotFound`] / [`Error::NotADirectory`] for a bad root
    /// - [`Error::Walk`] if any directory cannot be enumerated
    pub fn find_duplicates(&self, path: &Path) -> Result<(DuplicateSet, ScanSummary), Error> {
        let start_time = Instant::now();
        let mut summary = ScanSummary::default();

        let root = validate_root(path)?;
        log::info!("Starting duplicate scan of {}", root.display());

        let callback = self.config.progress_callback.as_deref();

        // Walk: the whole tree must be enumerable before anything is reported
        if let Some(cb) = callback {
            cb.on_phase_start(PHASE_WALKING, 0);
            cb.on_message(&format!("Walking {}", root.display()));
        }
        let walker = Walker::new(&root, self.config.walker_config.clone());
        let mut files = Vec::new();
        for entry in walker.files() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    if let Some(cb) = callback {
                        cb.on_phase_end(PHASE_WALKING);
                    }
                    return Err(e);
                }
            };
            files.push(entry.path);
            if let Some(cb) = callback {
                cb.on_progress(files.len() as u64, &files[files.len() - 1].to_string_lossy());
            }
        }
        if let Some(cb) = callback {
            cb.on_phase_end(PHASE_WALKING);
        }
        summary.total_files = files.len();
        log::debug!("Walk found {} files", files.len());

        // Hash and group
        if let Some(cb) = callback {
            cb.on_phase_start(PHASE_HASHING, files.len() as u64);
        }
        let mut index = FingerprintIndex::new();
        for (i, file) in files.into_iter().enumerate() {
            if let Some(cb) = callback {
                cb.on_progress(i as u64 + 1, &file.to_string_lossy());
            }
            match self.hasher.full_hash(&file) {
                Ok(fingerprint) => {
                    let size = std::fs::metadata(&file).map(|m| m.len()).unwrap_or(0);
                    summary.hashed_files += 1;
                    summary.total_size += size;
                    index.insert(fingerprint, file, size);
                }
                Err(e) => {
                    log::debug!("Skipping unhashable file: {}", e);
                    summary.skipped_files += 1;
                }
            }
        }
        if let Some(cb) = callback {
            cb.on_phase_end(PHASE_HASHING);
        }

        let set = index.into_duplicates();
        summary.duplicate_groups = set.len();
        summary.duplicate_files = set.duplicate_files();
        summary.reclaimable_space = set.wasted_space();
        summary.scan_duration = start_time.elapsed();

        log::info!(
            "Scan complete: {} files, {} duplicate groups, {} reclaimable",
            summary.total_files,
            summary.duplicate_groups,
            summary.reclaimable_display()
        );
        if summary.skipped_files > 0 {
            log::warn!("{} file(s) could not be read and were skipped", summary.skipped_files);
        }

        Ok((set, summary))
    }
}

/// Check that `path` is an existing directory and return its canonical form.
fn validate_root(path: &Path) -> Result<std::path::PathBuf, Error> {
    if !path.exists() {
        return Err(Error::PathNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(Error::NotADirectory(path.to_path_buf()));
    }
    path.canonicalize().map_err(|e| Error::from_io(path, e))
}
