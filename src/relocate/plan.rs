//! Date-partitioned destination planning.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};

use crate::error::Error;

/// Date format used for the partition folder.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Where one source directory will be moved to.
///
/// `destination_root = base / YYYY-MM-DD / basename(source_root)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelocationPlan {
    /// Directory being moved
    pub source_root: PathBuf,
    /// Directory the source's contents are mirrored into
    pub destination_root: PathBuf,
    /// Whether [`RelocationPlan::ensure_destination`] had to create the destination
    pub created: bool,
}

impl RelocationPlan {
    /// Compute the plan for a given calendar date.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSource`] if `source_root` has no final
    /// component (for example `/` or a path ending in `..`).
    pub fn new(base: &Path, source_root: &Path, date: NaiveDate) -> Result<Self, Error> {
        let name = source_root
            .file_name()
            .ok_or_else(|| Error::InvalidSource(source_root.to_path_buf()))?;

        let destination_root = base
            .join(date.format(DATE_FORMAT).to_string())
            .join(name);

        Ok(Self {
            source_root: source_root.to_path_buf(),
            destination_root,
            created: false,
        })
    }

    /// Compute the plan for today's local date.
    ///
    /// # Errors
    ///
    /// See [`RelocationPlan::new`].
    pub fn for_today(base: &Path, source_root: &Path) -> Result<Self, Error> {
        Self::new(base, source_root, Local::now().date_naive())
    }

    /// Create the destination root if it does not exist yet.
    ///
    /// An existing destination is reused as is.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Access`] or [`Error::Io`] if the directory cannot be
    /// inspected or created.
    pub fn ensure_destination(&mut self) -> Result<(), Error> {
        let dest = &self.destination_root;
        match fs::metadata(dest) {
            Ok(meta) if meta.is_dir() => {
                log::info!("Directory already exists: {}", dest.display());
                Ok(())
            }
            Ok(_) => Err(Error::NotADirectory(dest.clone())),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                fs::create_dir_all(dest).map_err(|e| Error::from_io(dest, e))?;
                log::info!("Created directory: {}", dest.display());
                self.created = true;
                Ok(())
            }
            Err(e) => Err(Error::from_io(dest, e)),
        }
    }
}
