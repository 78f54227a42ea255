use paf::duplicates::{DuplicateFinder, FinderConfig};
use paf::scanner::{hash_file, WalkerConfig};
use paf::Error;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn group_sets(set: &paf::duplicates::DuplicateSet) -> BTreeSet<BTreeSet<PathBuf>> {
    set.groups()
        .iter()
        .map(|g| g.paths.iter().cloned().collect())
        .collect()
}

#[test]
fn test_scan_empty_directory() {
    let dir = tempdir().unwrap();
    let finder = DuplicateFinder::with_defaults();

    let (groups, summary) = finder.find_duplicates(dir.path()).unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 0);
    assert_eq!(summary.duplicate_groups, 0);
}

#[test]
fn test_scan_two_equal_one_different() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("A"), b"x").unwrap();
    fs::write(dir.path().join("B"), b"x").unwrap();
    fs::write(dir.path().join("C"), b"y").unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let root = dir.path().canonicalize().unwrap();
    let expected: BTreeSet<BTreeSet<PathBuf>> =
        [[root.join("A"), root.join("B")].into_iter().collect()]
            .into_iter()
            .collect();
    assert_eq!(group_sets(&groups), expected);
    assert_eq!(summary.total_files, 3);
    assert_eq!(summary.duplicate_files, 1);
    assert_eq!(summary.reclaimable_space, 1);
}

#[test]
fn test_scan_nested_groups() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("2023/raw")).unwrap();
    fs::create_dir_all(dir.path().join("backup")).unwrap();

    fs::write(dir.path().join("2023/raw/img1.cr2"), vec![1u8; 4096]).unwrap();
    fs::write(dir.path().join("backup/img1.cr2"), vec![1u8; 4096]).unwrap();
    fs::write(dir.path().join("2023/notes.txt"), b"notes").unwrap();
    fs::write(dir.path().join("backup/notes.txt"), b"notes").unwrap();
    fs::write(dir.path().join("backup/notes-old.txt"), b"notes").unwrap();
    fs::write(dir.path().join("2023/unique.txt"), b"only once").unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 2);
    let mut sizes: Vec<_> = groups.groups().iter().map(|g| g.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![2, 3]);
    assert_eq!(summary.duplicate_files, 3);
    assert_eq!(summary.reclaimable_space, 4096 + 5 * 2);
}

#[test]
fn test_scan_empty_files_are_duplicates() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("e1"), b"").unwrap();
    fs::write(dir.path().join("e2"), b"").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert_eq!(groups.len(), 1);
    assert_eq!(groups.groups()[0].size, 0);
}

#[test]
fn test_group_fingerprint_matches_hash_file() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a"), b"payload").unwrap();
    fs::write(dir.path().join("b"), b"payload").unwrap();

    let (groups, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    let expected = hash_file(&dir.path().join("a")).unwrap();
    assert_eq!(groups.groups()[0].fingerprint.to_hex(), expected);
}

#[test]
fn test_scan_is_repeatable() {
    let dir = tempdir().unwrap();
    for i in 0..6 {
        fs::write(dir.path().join(format!("f{i}")), format!("{}", i % 3)).unwrap();
    }

    let finder = DuplicateFinder::new(FinderConfig::default().with_buffer_size(3));
    let (first, _) = finder.find_duplicates(dir.path()).unwrap();
    let (second, _) = finder.find_duplicates(dir.path()).unwrap();

    assert_eq!(group_sets(&first), group_sets(&second));
    assert_eq!(first.len(), 3);
}

#[test]
fn test_scan_missing_root() {
    let dir = tempdir().unwrap();
    let err = DuplicateFinder::with_defaults()
        .find_duplicates(&dir.path().join("missing"))
        .unwrap_err();
    assert!(matches!(err, Error::PathNotFound(_)));
}

#[test]
#[cfg(unix)]
fn test_scan_ignores_symlinks_by_default() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    fs::write(dir.path().join("real"), b"content").unwrap();
    symlink(dir.path().join("real"), dir.path().join("link")).unwrap();

    let (groups, summary) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();

    assert!(groups.is_empty());
    assert_eq!(summary.total_files, 1);
}

#[test]
#[cfg(unix)]
fn test_scan_symlink_cycle_aborts_when_following() {
    use std::os::unix::fs::symlink;

    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/file"), b"x").unwrap();
    symlink(dir.path(), dir.path().join("sub/loop")).unwrap();

    let finder = DuplicateFinder::new(
        FinderConfig::default().with_walker_config(WalkerConfig::new(true)),
    );
    let err = finder.find_duplicates(dir.path()).unwrap_err();
    assert!(matches!(err, Error::Walk { .. }));
}
