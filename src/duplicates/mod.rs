//! Duplicate detection module.
//!
//! This module provides functionality for:
//! - Fingerprinting every regular file in a tree
//! - Grouping paths by fingerprint
//! - Discarding groups with a single member

pub mod finder;
pub mod groups;

pub use finder::{DuplicateFinder, FinderConfig, ScanSummary};
pub use groups::{DuplicateGroup, DuplicateSet, FingerprintIndex};
