use samplecmp::compare::{CompareSettings, FileComparator};
use samplecmp::reconcile::ReconcileVerdict;
use samplecmp::wildcard::{compare_matching, PatternError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_only_matching_files_are_compared() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    fs::write(base.path().join("one.raw"), b"one").unwrap();
    fs::write(base.path().join("two.raw"), b"two").unwrap();
    fs::write(base.path().join("notes.txt"), b"not compared").unwrap();
    fs::write(cmp.path().join("one.raw"), b"one").unwrap();
    fs::write(cmp.path().join("two.raw"), b"two").unwrap();

    let comparator = FileComparator::new(CompareSettings::default());
    let pattern = format!("{}/*.raw", base.path().display());
    let result = compare_matching(&comparator, &pattern, cmp.path()).unwrap();

    assert!(result.is_match());
    assert_eq!(result.tally.total_source_files, 2);
    assert_eq!(result.verdict, ReconcileVerdict::Match);
}

#[test]
fn test_mismatch_verdict() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    fs::write(base.path().join("one.raw"), b"one").unwrap();
    fs::write(cmp.path().join("one.raw"), b"One").unwrap();

    let comparator = FileComparator::new(CompareSettings::default());
    let pattern = format!("{}/one.ra?", base.path().display());
    let result = compare_matching(&comparator, &pattern, cmp.path()).unwrap();

    assert_eq!(result.verdict, ReconcileVerdict::Mismatched);
    assert_eq!(result.tally.mismatched, 1);
}

#[test]
fn test_no_matches_is_an_error() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();

    let comparator = FileComparator::new(CompareSettings::default());
    let pattern = format!("{}/*.raw", base.path().display());
    let err = compare_matching(&comparator, &pattern, cmp.path()).unwrap_err();

    assert!(matches!(err, PatternError::NoMatches(_)));
    assert!(err.to_string().starts_with("No files match pattern"));
}
