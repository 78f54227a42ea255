//! Output formatters for duplicate scan results.
//!
//! # Example
//!
//! ```no_run
//! use paf::duplicates::DuplicateFinder;
//! use paf::output::ReportWriter;
//! use std::path::Path;
//!
//! let finder = DuplicateFinder::with_defaults();
//! let (set, _summary) = finder.find_duplicates(Path::new(".")).unwrap();
//!
//! ReportWriter::new(&set)
//!     .write_file(Path::new("duplicate_files.txt"))
//!     .unwrap();
//! ```

pub mod report;

pub use report::{parse_report, read_report, ReportWriter};
