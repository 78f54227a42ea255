//! Duplicate grouping by content fingerprint.
//!
//! # Overview
//!
//! [`FingerprintIndex`] is the in-memory map built during one scan: it records
//! every hashed path under its fingerprint, preserving discovery order both
//! within a group and across groups. [`FingerprintIndex::into_duplicates`]
//! drops singletons and yields the final [`DuplicateSet`].
//!
//! # Example
//!
//! ```
//! use paf::duplicates::FingerprintIndex;
//! use paf::scanner::Fingerprint;
//! use std::path::PathBuf;
//!
//! let x = Fingerprint::from_bytes([1; 32]);
//! let y = Fingerprint::from_bytes([2; 32]);
//!
//! let mut index = FingerprintIndex::new();
//! index.insert(x, PathBuf::from("/a"), 1);
//! index.insert(x, PathBuf::from("/b"), 1);
//! index.insert(y, PathBuf::from("/c"), 1);
//!
//! let set = index.into_duplicates();
//! assert_eq!(set.len(), 1);
//! assert_eq!(set.groups()[0].paths, vec![PathBuf::from("/a"), PathBuf::from("/b")]);
//! ```

use std::collections::HashMap;
use std::path::PathBuf;

use crate::scanner::Fingerprint;

/// Confirmed group of files sharing one fingerprint.
///
/// Always holds at least two paths once it is part of a [`DuplicateSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    /// Content fingerprint shared by every path
    pub fingerprint: Fingerprint,
    /// File size in bytes (shared by all files)
    pub size: u64,
    /// Absolute paths in discovery order
    pub paths: Vec<PathBuf>,
}

impl DuplicateGroup {
    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if this group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of redundant copies (all files minus one).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.paths.len().saturating_sub(1)
    }

    /// Space that removing every redundant copy would free.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// The set of duplicate groups produced by one scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateSet {
    groups: Vec<DuplicateGroup>,
}

impl DuplicateSet {
    /// Build a set from groups, discarding any with fewer than two paths.
    #[must_use]
    pub fn from_groups(groups: Vec<DuplicateGroup>) -> Self {
        Self {
            groups: groups.into_iter().filter(|g| g.len() >= 2).collect(),
        }
    }

    /// The retained groups, in first-discovery order.
    #[must_use]
    pub fn groups(&self) -> &[DuplicateGroup] {
        &self.groups
    }

    /// Number of groups.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// True when no duplicates were found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Total redundant copies across all groups.
    #[must_use]
    pub fn duplicate_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Total reclaimable bytes across all groups.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_space).sum()
    }
}

impl IntoIterator for DuplicateSet {
    type Item = DuplicateGroup;
    type IntoIter = std::vec::IntoIter<DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

impl<'a> IntoIterator for &'a DuplicateSet {
    type Item = &'a DuplicateGroup;
    type IntoIter = std::slice::Iter<'a, DuplicateGroup>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Fingerprint to paths map, owned by a single scan.
#[derive(Debug, Default)]
pub struct FingerprintIndex {
    positions: HashMap<Fingerprint, usize>,
    groups: Vec<DuplicateGroup>,
}

impl FingerprintIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `path` under `fingerprint`.
    pub fn insert(&mut self, fingerprint: Fingerprint, path: PathBuf, size: u64) {
        match self.positions.get(&fingerprint) {
            Some(&idx) => self.groups[idx].paths.push(path),
            None => {
                self.positions.insert(fingerprint, self.groups.len());
                self.groups.push(DuplicateGroup {
                    fingerprint,
                    size,
                    paths: vec![path],
                });
            }
        }
    }

    /// Number of distinct fingerprints seen.
    #[must_use]
    pub fn unique_count(&self) -> usize {
        self.groups.len()
    }

    /// Number of paths recorded.
    #[must_use]
    pub fn path_count(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::len).sum()
    }

    /// Paths recorded for a fingerprint, if any.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<&[PathBuf]> {
        self.positions
            .get(fingerprint)
            .map(|&idx| self.groups[idx].paths.as_slice())
    }

    /// Keep only fingerprints with two or more paths.
    #[must_use]
    pub fn into_duplicates(self) -> DuplicateSet {
        DuplicateSet::from_groups(self.groups)
    }
}
