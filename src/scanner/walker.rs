//! Directory walker implementation using walkdir.
//!
//! # Overview
//!
//! This module provides the [`Walker`] struct, the single tree-walk primitive
//! used by both duplicate detection and relocation. It walks depth-first on
//! the calling thread with entries sorted by file name, so two walks of an
//! unchanged tree yield identical sequences.
//!
//! Directories are yielded before their contents. Any enumeration failure is
//! yielded as [`Error::Walk`]; callers are expected to stop at the first one.
//!
//! # Example
//!
//! ```no_run
//! use paf::scanner::{Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("/home/user/Downloads"), WalkerConfig::default());
//! let files: Vec<_> = walker.files().collect::<Result<_, _>>().unwrap();
//! println!("Found {} files", files.len());
//! ```

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::{EntryKind, WalkEntry, WalkerConfig};
use crate::error::Error;

/// Depth-first, deterministic directory walker.
#[derive(Debug, Clone)]
pub struct Walker {
    /// Root path to walk
    root: PathBuf,
    /// Walker configuration
    config: WalkerConfig,
}

impl Walker {
    /// Create a new walker for the given path.
    #[must_use]
    pub fn new(path: &Path, config: WalkerConfig) -> Self {
        Self {
            root: path.to_path_buf(),
            config,
        }
    }

    /// Root this walker starts from.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Walk the tree, yielding every entry including the root.
    pub fn walk(&self) -> impl Iterator<Item = Result<WalkEntry, Error>> + '_ {
        WalkDir::new(&self.root)
            .follow_links(self.config.follow_symlinks)
            .sort_by_file_name()
            .into_iter()
            .map(move |result| match result {
                Ok(entry) => {
                    let file_type = entry.file_type();
                    let kind = if file_type.is_dir() {
                        EntryKind::Directory
                    } else if file_type.is_file() {
                        EntryKind::File
                    } else if file_type.is_symlink() {
                        EntryKind::Symlink
                    } else {
                        EntryKind::Other
                    };
                    Ok(WalkEntry {
                        depth: entry.depth(),
                        path: entry.into_path(),
                        kind,
                    })
                }
                Err(e) => {
                    let err = Error::from_walk(&self.root, e);
                    log::warn!("{}", err);
                    Err(err)
                }
            })
    }

    /// Walk the tree, yielding only regular files (and errors).
    pub fn files(&self) -> impl Iterator<Item = Result<WalkEntry, Error>> + '_ {
        self.walk().filter(|r| match r {
            Ok(entry) => {
                if entry.kind == EntryKind::Symlink {
                    log::debug!("Skipping symlink: {}", entry.path.display());
                }
                entry.is_file()
            }
            Err(_) => true,
        })
    }
}

/// Total size in bytes of every regular file beneath `root`.
///
/// # Errors
///
/// Returns [`Error::Walk`] if the tree cannot be enumerated, or
/// [`Error::Access`]/[`Error::Io`] if a file cannot be stat'ed.
pub fn total_size(root: &Path, config: &WalkerConfig) -> Result<u64, Error> {
    let walker = Walker::new(root, config.clone());
    let mut total = 0u64;
    for entry in walker.files() {
        let entry = entry?;
        let metadata = std::fs::metadata(&entry.path).map_err(|e| Error::from_io(&entry.path, e))?;
        total += metadata.len();
    }
    Ok(total)
}

/// Immediate child directories of `dir`, sorted by name.
///
/// Symlinks to directories are not included.
///
/// # Errors
///
/// Returns [`Error::Walk`] if `dir` cannot be read.
pub fn list_subdirectories(dir: &Path) -> Result<Vec<PathBuf>, Error> {
    let mut folders = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| Error::from_walk(dir, e))?;
        if entry.file_type().is_dir() {
            folders.push(entry.into_path());
        }
    }
    Ok(folders)
}
