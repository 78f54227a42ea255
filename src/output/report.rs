//! Plain-text duplicate report.
//!
//! # Format
//!
//! One absolute path per line. Every group is followed by a single blank
//! line. No header, no fingerprints, no trailing metadata:
//!
//! ```text
//! /photos/a.jpg
//! /backup/a.jpg
//!
//! /docs/x.pdf
//! /docs/old/x.pdf
//!
//! ```
//!
//! Reports are re-parsed by splitting on blank-line-delimited blocks; see
//! [`parse_report`]. Group order carries no meaning.
//!
//! Paths that are not valid UTF-8 or that contain a newline cannot be
//! represented. They are written lossily (invalid bytes become U+FFFD and
//! newlines become `?`) with a warning, so such a line no longer names the
//! file on disk.

use std::borrow::Cow;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::duplicates::DuplicateSet;
use crate::error::Error;

/// Writes a [`DuplicateSet`] as a flat text report.
#[derive(Debug)]
pub struct ReportWriter<'a> {
    set: &'a DuplicateSet,
}

impl<'a> ReportWriter<'a> {
    /// Create a writer for the given set.
    #[must_use]
    pub fn new(set: &'a DuplicateSet) -> Self {
        Self { set }
    }

    /// Write the report to any writer.
    ///
    /// # Errors
    ///
    /// Returns the underlying I/O error if a write fails.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for group in self.set {
            for path in &group.paths {
                writeln!(writer, "{}", report_line(path))?;
            }
            writeln!(writer)?;
        }
        Ok(())
    }

    /// Render the report into a string.
    #[must_use]
    pub fn to_text(&self) -> String {
        let mut buf = Vec::new();
        // Writing into a Vec cannot fail
        let _ = self.write_to(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Create (or truncate) `path` and write the report to it.
    ///
    /// An empty set produces an empty file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Access`] or [`Error::Io`] if the file cannot be
    /// created or written.
    pub fn write_file(&self, path: &Path) -> Result<(), Error> {
        let file = File::create(path).map_err(|e| Error::from_io(path, e))?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer)
            .and_then(|()| writer.flush())
            .map_err(|e| Error::from_io(path, e))?;
        log::info!("Duplicate file list saved to {}", path.display());
        Ok(())
    }
}

fn report_line(path: &Path) -> Cow<'_, str> {
    match path.to_str() {
        Some(text) if !text.contains(['\n', '\r']) => Cow::Borrowed(text),
        _ => {
            log::warn!(
                "Path {} cannot be written to the report unchanged",
                path.display()
            );
            Cow::Owned(path.to_string_lossy().replace(['\n', '\r'], "?"))
        }
    }
}

/// Split a report back into groups of paths.
///
/// Blank-line runs separate groups; leading and trailing blank lines are
/// ignored.
#[must_use]
pub fn parse_report(text: &str) -> Vec<Vec<PathBuf>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();

    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
        } else {
            current.push(PathBuf::from(line));
        }
    }
    if !current.is_empty() {
        groups.push(current);
    }

    groups
}

/// Read and parse a report file.
///
/// # Errors
///
/// Returns [`Error::Access`] or [`Error::Io`] if the file cannot be read.
pub fn read_report(path: &Path) -> Result<Vec<Vec<PathBuf>>, Error> {
    let text = fs::read_to_string(path).map_err(|e| Error::from_io(path, e))?;
    Ok(parse_report(&text))
}
