//! Structured error handling and exit codes.
//!
//! [`Error`] is the single taxonomy shared by scanning and relocation. Every
//! variant carries the offending path so callers can branch on the kind of
//! failure instead of matching message text.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Errors produced by the hashing, scanning and relocation core.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The path exists but could not be opened or read due to permissions.
    #[error("Permission denied: {0}")]
    Access(PathBuf),

    /// A read or write failed.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Directory enumeration failed; the whole operation is aborted.
    #[error("Failed to walk {path}: {source}")]
    Walk {
        /// Path that could not be enumerated
        path: PathBuf,
        /// The underlying walk error
        #[source]
        source: walkdir::Error,
    },

    /// A copied file does not have the same size as its source.
    #[error("File size mismatch for {path}: expected {expected} bytes, found {actual}")]
    SizeMismatch {
        /// Source file that was kept
        path: PathBuf,
        /// Size of the source file
        expected: u64,
        /// Size of the copy
        actual: u64,
    },

    /// The provided path does not exist.
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),

    /// The provided path is not a directory.
    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    /// The source path has no final component to name the destination after.
    #[error("Cannot derive a folder name from {0}")]
    InvalidSource(PathBuf),

    /// The computed destination would be inside the tree being moved.
    #[error("Destination {destination} is inside source {source_root}")]
    DestinationInsideSource {
        /// Source directory being relocated
        source_root: PathBuf,
        /// Computed destination directory
        destination: PathBuf,
    },
}

impl Error {
    /// Classify an I/O error for `path`, splitting out permission failures.
    pub(crate) fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::PermissionDenied => Self::Access(path.to_path_buf()),
            _ => Self::Io {
                path: path.to_path_buf(),
                source: error,
            },
        }
    }

    /// Convert a walkdir error, keeping the path it failed on.
    pub(crate) fn from_walk(root: &Path, error: walkdir::Error) -> Self {
        let path = error
            .path()
            .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
        Self::Walk {
            path,
            source: error,
        }
    }

    /// Get the path associated with this error.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Access(p)
            | Self::PathNotFound(p)
            | Self::NotADirectory(p)
            | Self::InvalidSource(p)
            | Self::Io { path: p, .. }
            | Self::Walk { path: p, .. }
            | Self::SizeMismatch { path: p, .. } => p,
            Self::DestinationInsideSource { source_root, .. } => source_root,
        }
    }

    /// Whether a scan may skip the affected file and keep going.
    ///
    /// Only per-file read failures qualify. Relocation never skips.
    #[must_use]
    pub fn is_recoverable_in_scan(&self) -> bool {
        matches!(self, Self::Access(_) | Self::Io { .. })
    }
}

/// Exit codes for the paf application.
///
/// - 0: Success (completed normally, duplicates found or folders moved)
/// - 1: General error (unexpected failure)
/// - 2: No duplicates found (completed normally, nothing to report)
/// - 3: Verification failed (a copy did not match its source)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Success: the command completed.
    Success = 0,
    /// General error: An unexpected error occurred.
    GeneralError = 1,
    /// No duplicates: Scan completed but no duplicates were found.
    NoDuplicates = 2,
    /// Verification failed: a relocation stopped on a size mismatch.
    VerificationFailed = 3,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "PF000",
            Self::GeneralError => "PF001",
            Self::NoDuplicates => "PF002",
            Self::VerificationFailed => "PF003",
        }
    }

    /// Pick the exit code for an error that reached the top level.
    #[must_use]
    pub fn for_error(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<Error>() {
            Some(Error::SizeMismatch { .. }) => Self::VerificationFailed,
            _ => Self::GeneralError,
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "PF001")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Offending path, when the error carries one
    pub path: Option<PathBuf>,
}

impl StructuredError {
    /// Create a new structured error from an anyhow error and an exit code.
    #[must_use]
    pub fn new(err: &anyhow::Error, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: format!("{err:#}"),
            path: err.downcast_ref::<Error>().map(|e| e.path().to_path_buf()),
        }
    }
}
