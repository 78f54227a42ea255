//! Scanner module for directory traversal and file hashing.
//!
//! This module provides functionality for:
//! - Deterministic depth-first directory walking using walkdir
//! - Content hashing with BLAKE3
//!
//! # Architecture
//!
//! The scanner is divided into submodules:
//! - [`walker`]: Directory traversal shared by duplicate detection and relocation
//! - [`hasher`]: BLAKE3 file hashing (streaming)
//!
//! # Example
//!
//! ```no_run
//! use paf::scanner::{EntryKind, Walker, WalkerConfig};
//! use std::path::Path;
//!
//! let walker = Walker::new(Path::new("."), WalkerConfig::default());
//! for entry in walker.walk() {
//!     match entry {
//!         Ok(e) if e.kind == EntryKind::File => println!("{}", e.path.display()),
//!         Ok(_) => {}
//!         Err(e) => eprintln!("Walk aborted: {}", e),
//!     }
//! }
//! ```

pub mod hasher;
pub mod walker;

use std::path::PathBuf;

// Re-export main types
pub use hasher::{hash_file, Fingerprint, Hasher, DEFAULT_BUFFER_SIZE};
pub use walker::{list_subdirectories, total_size, Walker};

/// What kind of filesystem object a walk entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A directory (including the walk root)
    Directory,
    /// A regular file
    File,
    /// A symbolic link that was not followed
    Symlink,
    /// Anything else (sockets, FIFOs, devices)
    Other,
}

/// One entry produced by the tree walk.
#[derive(Debug, Clone)]
pub struct WalkEntry {
    /// Path of the entry (root joined with its relative path)
    pub path: PathBuf,
    /// Depth below the walk root (root itself is 0)
    pub depth: usize,
    /// Kind of entry
    pub kind: EntryKind,
}

impl WalkEntry {
    /// Whether this entry is a regular file.
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.kind == EntryKind::File
    }

    /// Whether this entry is a directory.
    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Configuration for directory walking.
#[derive(Debug, Clone, Default)]
pub struct WalkerConfig {
    /// Follow symbolic links during traversal.
    ///
    /// When false (default) links are reported as [`EntryKind::Symlink`] and
    /// never descended into. When true, cycles surface as walk errors.
    pub follow_symlinks: bool,
}

impl WalkerConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(follow_symlinks: bool) -> Self {
        Self { follow_symlinks }
    }
}
