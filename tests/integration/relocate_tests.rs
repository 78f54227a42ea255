use paf::progress::ProgressCallback;
use paf::relocate::{RelocationPlan, Relocator, RelocatorConfig};
use paf::scanner::{hash_file, Walker, WalkerConfig};
use paf::Error;
use std::fs::{self, OpenOptions};
use std::path::Path;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tempfile::tempdir;

fn build_tree(root: &Path) {
    fs::create_dir_all(root.join("edits/final")).unwrap();
    fs::create_dir_all(root.join("empty-dir")).unwrap();
    fs::write(root.join("cover.jpg"), vec![0xAB; 20_000]).unwrap();
    fs::write(root.join("edits/a.psd"), b"layered").unwrap();
    fs::write(root.join("edits/final/a.png"), b"flattened").unwrap();
    fs::write(root.join("zero.txt"), b"").unwrap();
}

fn regular_files(root: &Path) -> Vec<std::path::PathBuf> {
    Walker::new(root, WalkerConfig::default())
        .files()
        .map(|r| r.unwrap().path)
        .collect()
}

#[test]
fn test_relocation_is_byte_identical_and_empties_source() {
    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let source = work.path().join("wedding");
    build_tree(&source);

    let before: Vec<_> = regular_files(&source)
        .into_iter()
        .map(|p| {
            let rel = p.strip_prefix(&source).unwrap().to_path_buf();
            let hash = hash_file(&p).unwrap();
            let len = fs::metadata(&p).unwrap().len();
            (rel, hash, len)
        })
        .collect();

    let summary = Relocator::new(archive.path(), RelocatorConfig::default())
        .relocate(&source)
        .unwrap();

    assert_eq!(summary.files_moved, before.len());
    for (rel, hash, len) in &before {
        let moved = summary.destination_root.join(rel);
        assert_eq!(fs::metadata(&moved).unwrap().len(), *len);
        assert_eq!(&hash_file(&moved).unwrap(), hash);
    }
    assert!(summary.destination_root.join("empty-dir").is_dir());
    assert!(regular_files(&source).is_empty());
    assert!(source.join("edits/final").is_dir());
}

#[test]
fn test_destination_layout_uses_today() {
    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let source = work.path().join("project-x");
    build_tree(&source);

    let summary = Relocator::new(archive.path(), RelocatorConfig::default())
        .relocate(&source)
        .unwrap();

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let expected = archive
        .path()
        .canonicalize()
        .unwrap()
        .join(today)
        .join("project-x");
    assert_eq!(summary.destination_root, expected);
}

#[test]
fn test_same_day_relocations_share_destination() {
    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let source = work.path().join("inbox");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("first.txt"), b"1").unwrap();

    let relocator = Relocator::new(archive.path(), RelocatorConfig::default());
    let first = relocator.relocate(&source).unwrap();
    assert!(first.created);

    fs::write(source.join("second.txt"), b"22").unwrap();
    let second = relocator.relocate(&source).unwrap();

    assert!(!second.created);
    assert_eq!(first.destination_root, second.destination_root);
    assert!(second.destination_root.join("first.txt").is_file());
    assert!(second.destination_root.join("second.txt").is_file());
}

#[test]
fn test_plan_is_same_for_repeated_calls() {
    let work = tempdir().unwrap();
    let source = work.path().join("src");
    fs::create_dir(&source).unwrap();

    let relocator = Relocator::new(&work.path().join("archive"), RelocatorConfig::default());
    let a: RelocationPlan = relocator.plan(&source).unwrap();
    let b = relocator.plan(&source).unwrap();
    assert_eq!(a.destination_root, b.destination_root);
    assert!(!work.path().join("archive").exists());
}

/// Truncates the copy of one named file right after it is written.
struct Truncator {
    name: &'static str,
}

impl ProgressCallback for Truncator {
    fn on_phase_start(&self, _phase: &str, _total: u64) {}
    fn on_progress(&self, _current: u64, _path: &str) {}
    fn on_phase_end(&self, _phase: &str) {}

    fn on_file_copied(&self, _source: &Path, destination: &Path) {
        if !destination.ends_with(self.name) {
            return;
        }
        let file = OpenOptions::new().write(true).open(destination).unwrap();
        let len = file.metadata().unwrap().len();
        file.set_len(len.saturating_sub(1)).unwrap();
    }
}

#[test]
fn test_truncated_copy_stops_relocation_midway() {
    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let source = work.path().join("fragile");
    fs::create_dir(&source).unwrap();
    fs::write(source.join("a.bin"), vec![1u8; 500]).unwrap();
    fs::write(source.join("b.bin"), vec![2u8; 1000]).unwrap();
    fs::write(source.join("c.bin"), vec![3u8; 700]).unwrap();

    let relocator = Relocator::new(
        archive.path(),
        RelocatorConfig::default().with_progress_callback(Arc::new(Truncator { name: "b.bin" })),
    );
    let destination = relocator.plan(&source).unwrap().destination_root;
    let err = relocator.relocate(&source).unwrap_err();

    match err {
        Error::SizeMismatch {
            path,
            expected,
            actual,
        } => {
            assert!(path.ends_with("b.bin"));
            assert_eq!(expected, 1000);
            assert_eq!(actual, 999);
        }
        other => panic!("Expected SizeMismatch, got {other:?}"),
    }

    // Already verified: moved
    assert!(!source.join("a.bin").exists());
    assert_eq!(fs::read(destination.join("a.bin")).unwrap(), vec![1u8; 500]);
    // Failed verification: source kept intact
    assert_eq!(fs::read(source.join("b.bin")).unwrap(), vec![2u8; 1000]);
    // Never reached
    assert_eq!(fs::read(source.join("c.bin")).unwrap().len(), 700);
    assert!(!destination.join("c.bin").exists());
}

#[test]
#[cfg(unix)]
fn test_unreadable_subdirectory_aborts_with_walk_error() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let source = work.path().join("partial");
    let sealed = source.join("z-sealed");
    fs::create_dir_all(&sealed).unwrap();
    fs::write(source.join("a.txt"), b"first").unwrap();
    fs::write(sealed.join("inside.txt"), b"kept").unwrap();
    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits
    if fs::read_dir(&sealed).is_ok() {
        fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
        return;
    }

    let relocator = Relocator::new(archive.path(), RelocatorConfig::default());
    let destination = relocator.plan(&source).unwrap().destination_root;
    let err = relocator.relocate(&source).unwrap_err();

    fs::set_permissions(&sealed, fs::Permissions::from_mode(0o755)).unwrap();
    assert!(matches!(err, Error::Walk { .. }), "got {err:?}");
    assert!(!source.join("a.txt").exists());
    assert_eq!(fs::read(destination.join("a.txt")).unwrap(), b"first");
    assert_eq!(fs::read(sealed.join("inside.txt")).unwrap(), b"kept");
    assert!(!destination.join("z-sealed/inside.txt").exists());
}

#[derive(Default)]
struct Recorder {
    total: AtomicU64,
    bytes: AtomicU64,
    copied: AtomicUsize,
    phases: Mutex<Vec<String>>,
}

impl ProgressCallback for Recorder {
    fn on_phase_start(&self, phase: &str, total: u64) {
        self.total.store(total, Ordering::SeqCst);
        self.phases.lock().unwrap().push(format!("start:{phase}"));
    }
    fn on_progress(&self, _current: u64, _path: &str) {}
    fn on_bytes(&self, bytes: u64) {
        self.bytes.fetch_add(bytes, Ordering::SeqCst);
    }
    fn on_file_copied(&self, _source: &Path, _destination: &Path) {
        self.copied.fetch_add(1, Ordering::SeqCst);
    }
    fn on_phase_end(&self, phase: &str) {
        self.phases.lock().unwrap().push(format!("end:{phase}"));
    }
}

#[test]
fn test_progress_reports_bytes_and_copies() {
    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let source = work.path().join("tracked");
    build_tree(&source);

    let recorder = Arc::new(Recorder::default());
    let summary = Relocator::new(
        archive.path(),
        RelocatorConfig::default()
            .with_buffer_size(4096)
            .with_progress_callback(recorder.clone()),
    )
    .relocate(&source)
    .unwrap();

    let expected_bytes = 20_000 + 7 + 9;
    assert_eq!(summary.bytes_moved, expected_bytes);
    assert_eq!(recorder.total.load(Ordering::SeqCst), expected_bytes);
    assert_eq!(recorder.bytes.load(Ordering::SeqCst), expected_bytes);
    assert_eq!(recorder.copied.load(Ordering::SeqCst), 4);
    assert_eq!(
        *recorder.phases.lock().unwrap(),
        vec!["start:moving".to_string(), "end:moving".to_string()]
    );
}

#[test]
fn test_relocate_all_moves_each_source() {
    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let sources: Vec<_> = ["one", "two"]
        .iter()
        .map(|name| {
            let dir = work.path().join(name);
            fs::create_dir(&dir).unwrap();
            fs::write(dir.join("file.txt"), name.as_bytes()).unwrap();
            dir
        })
        .collect();

    let summaries = Relocator::new(archive.path(), RelocatorConfig::default())
        .relocate_all(&sources)
        .unwrap();

    assert_eq!(summaries.len(), 2);
    assert_eq!(
        fs::read(summaries[1].destination_root.join("file.txt")).unwrap(),
        b"two"
    );
    assert_eq!(
        summaries[0].destination_root.parent(),
        summaries[1].destination_root.parent()
    );
}

#[test]
#[cfg(unix)]
fn test_unreadable_file_aborts_relocation() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempdir().unwrap();
    let archive = tempdir().unwrap();
    let source = work.path().join("locked");
    fs::create_dir(&source).unwrap();
    let secret = source.join("secret");
    fs::write(&secret, b"hidden").unwrap();
    fs::set_permissions(&secret, fs::Permissions::from_mode(0o000)).unwrap();

    // Root ignores permission bits
    if fs::read(&secret).is_ok() {
        return;
    }

    let err = Relocator::new(archive.path(), RelocatorConfig::default())
        .relocate(&source)
        .unwrap_err();

    fs::set_permissions(&secret, fs::Permissions::from_mode(0o644)).unwrap();
    assert!(matches!(err, Error::Access(_)));
    assert!(secret.exists());
}
