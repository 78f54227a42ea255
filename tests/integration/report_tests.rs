use paf::duplicates::{DuplicateFinder, DuplicateSet};
use paf::output::{parse_report, read_report, ReportWriter};
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

fn unordered(groups: Vec<Vec<PathBuf>>) -> BTreeSet<BTreeSet<PathBuf>> {
    groups.into_iter().map(|g| g.into_iter().collect()).collect()
}

#[test]
fn test_report_round_trips_scan_groups() {
    let dir = tempdir().unwrap();
    let data = dir.path().join("data");
    fs::create_dir_all(data.join("nested")).unwrap();
    fs::write(data.join("a"), b"alpha").unwrap();
    fs::write(data.join("nested/a"), b"alpha").unwrap();
    fs::write(data.join("b"), b"beta").unwrap();
    fs::write(data.join("nested/b"), b"beta").unwrap();
    fs::write(data.join("nested/b2"), b"beta").unwrap();
    fs::write(data.join("c"), b"gamma").unwrap();

    let (set, _) = DuplicateFinder::with_defaults().find_duplicates(&data).unwrap();
    let report = dir.path().join("duplicate_files.txt");
    ReportWriter::new(&set).write_file(&report).unwrap();

    let expected = unordered(set.groups().iter().map(|g| g.paths.clone()).collect());
    assert_eq!(unordered(read_report(&report).unwrap()), expected);
    assert_eq!(expected.len(), 2);
}

#[test]
fn test_report_format_has_blank_line_after_each_group() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("x1"), b"x").unwrap();
    fs::write(dir.path().join("x2"), b"x").unwrap();

    let (set, _) = DuplicateFinder::with_defaults()
        .find_duplicates(dir.path())
        .unwrap();
    let text = ReportWriter::new(&set).to_text();

    let lines: Vec<_> = text.split('\n').collect();
    // two paths, blank separator, then the empty tail after the final newline
    assert_eq!(lines.len(), 4);
    assert!(PathBuf::from(lines[0]).is_absolute());
    assert!(PathBuf::from(lines[1]).is_absolute());
    assert_eq!(lines[2], "");
    assert!(text.ends_with("\n\n"));
}

#[test]
fn test_empty_set_writes_empty_file() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("out.txt");
    fs::write(&report, b"stale content").unwrap();

    ReportWriter::new(&DuplicateSet::default())
        .write_file(&report)
        .unwrap();

    assert_eq!(fs::read(&report).unwrap(), b"");
}

#[test]
fn test_parse_tolerates_extra_blank_lines() {
    let groups = parse_report("\n/a\n/b\n\n\n/c\n/d\n/e");
    assert_eq!(
        groups,
        vec![
            vec![PathBuf::from("/a"), PathBuf::from("/b")],
            vec![PathBuf::from("/c"), PathBuf::from("/d"), PathBuf::from("/e")],
        ]
    );
}

#[test]
fn test_report_unwritable_destination() {
    let dir = tempdir().unwrap();
    let set = DuplicateSet::default();
    let err = ReportWriter::new(&set)
        .write_file(&dir.path().join("no/such/dir/report.txt"))
        .unwrap_err();
    assert!(matches!(err, paf::Error::Io { .. }));
}
