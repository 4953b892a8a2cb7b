use samplecmp::compare::{CompareSettings, FileComparator};
use samplecmp::reconcile::{DirectoryReconciler, ReconcileError, ReconcileVerdict};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(root: &Path, relative: &str, content: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

fn comparator() -> FileComparator {
    FileComparator::new(CompareSettings::new(4, 100))
}

#[test]
fn test_identical_trees_match() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    for root in [base.path(), cmp.path()] {
        write(root, "a.txt", b"alpha");
        write(root, "sub/b.txt", b"beta");
        write(root, "sub/deeper/c.txt", b"gamma");
    }

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(base.path(), cmp.path())
        .unwrap();

    assert!(result.is_match());
    assert_eq!(result.verdict, ReconcileVerdict::Match);
    assert_eq!(result.tally.total_source_files, 3);
    assert_eq!(result.tally.matched, 3);
}

#[test]
fn test_missing_nested_file_is_counted() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    write(base.path(), "a.txt", b"alpha");
    write(base.path(), "sub/b.txt", b"beta");
    write(cmp.path(), "a.txt", b"alpha");

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(base.path(), cmp.path())
        .unwrap();

    assert!(!result.is_match());
    assert_eq!(result.tally.missing, 1);
    assert_eq!(result.tally.matched, 1);
    assert_eq!(result.verdict, ReconcileVerdict::MissingFiles);
}

#[test]
fn test_nested_file_must_be_in_same_subdirectory() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    write(base.path(), "sub/b.txt", b"beta");
    // Same name, wrong place.
    write(cmp.path(), "b.txt", b"beta");

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(base.path(), cmp.path())
        .unwrap();

    assert_eq!(result.tally.missing, 1);
}

#[test]
fn test_mismatched_file() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    write(base.path(), "a.txt", b"alpha");
    write(base.path(), "b.txt", b"beta");
    write(cmp.path(), "a.txt", b"alpha");
    write(cmp.path(), "b.txt", b"BETA");

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(base.path(), cmp.path())
        .unwrap();

    assert_eq!(result.verdict, ReconcileVerdict::Mismatched);
    assert_eq!(result.tally.mismatched, 1);
    assert_eq!(result.tally.matched, 1);
    assert_eq!(
        result.summary(),
        "Directories do not match; Mis-matched file count: 1; Matched file count: 1"
    );
}

#[test]
fn test_missing_reported_before_mismatch() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    write(base.path(), "a.txt", b"alpha");
    write(base.path(), "b.txt", b"beta");
    write(cmp.path(), "a.txt", b"ALPHA");

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(base.path(), cmp.path())
        .unwrap();

    assert_eq!(result.verdict, ReconcileVerdict::MissingFiles);
    assert!(result.summary().starts_with("Comparison directory is missing 1 file(s)"));
}

#[test]
fn test_empty_base_directory_matches() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    write(cmp.path(), "extra.txt", b"ignored");

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(base.path(), cmp.path())
        .unwrap();

    assert!(result.is_match());
    assert_eq!(result.verdict, ReconcileVerdict::NothingToCompare);
    assert_eq!(result.tally.total_source_files, 0);
}

#[test]
fn test_extra_comparison_files_are_ignored() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    write(base.path(), "a.txt", b"alpha");
    write(cmp.path(), "a.txt", b"alpha");
    write(cmp.path(), "extra.txt", b"extra");

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(base.path(), cmp.path())
        .unwrap();

    assert!(result.is_match());
}

#[test]
fn test_trailing_separator_on_roots() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    write(base.path(), "sub/b.txt", b"beta");
    write(cmp.path(), "sub/b.txt", b"beta");

    let base_arg = format!("{}/", base.path().display());
    let cmp_arg = format!("{}/", cmp.path().display());

    let comparator = comparator();
    let result = DirectoryReconciler::new(&comparator)
        .reconcile(Path::new(&base_arg), Path::new(&cmp_arg))
        .unwrap();

    assert!(result.is_match());
    assert_eq!(result.base, base.path());
}

#[test]
fn test_missing_roots_are_distinct_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing");
    let comparator = comparator();
    let reconciler = DirectoryReconciler::new(&comparator);

    assert_eq!(
        reconciler.reconcile(&missing, dir.path()),
        Err(ReconcileError::BaseNotFound(missing.clone()))
    );
    assert_eq!(
        reconciler.reconcile(dir.path(), &missing),
        Err(ReconcileError::ComparisonNotFound(missing))
    );
}

#[test]
fn test_explicit_sample_parameters() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    let data: Vec<u8> = (0..1000u32).map(|i| (i % 256) as u8).collect();
    let mut other = data.clone();
    other[500] ^= 0xFF;
    write(base.path(), "big.bin", &data);
    write(cmp.path(), "big.bin", &other);

    let comparator = comparator();
    let reconciler = DirectoryReconciler::new(&comparator);

    // Four 100-byte windows skip offset 500.
    assert!(reconciler
        .reconcile_with(base.path(), cmp.path(), 4, 100)
        .unwrap()
        .is_match());
    // Ten 100-byte windows cover the whole file, forcing a full comparison.
    assert!(!reconciler
        .reconcile_with(base.path(), cmp.path(), 10, 100)
        .unwrap()
        .is_match());
}
