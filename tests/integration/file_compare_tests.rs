use samplecmp::compare::{CompareSettings, FileComparator, Outcome};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::tempdir;

fn patterned(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

fn write_pair(dir: &Path, base: &[u8], other: &[u8]) -> (PathBuf, PathBuf) {
    let a = dir.join("base.bin");
    let b = dir.join("other.bin");
    fs::write(&a, base).unwrap();
    fs::write(&b, other).unwrap();
    (a, b)
}

fn comparator() -> FileComparator {
    FileComparator::new(CompareSettings::new(4, 100))
}

#[test]
fn test_sampled_match_reports_percent_examined() {
    let dir = tempdir().unwrap();
    let data = patterned(1000);
    let (a, b) = write_pair(dir.path(), &data, &data);

    let result = comparator().compare_files(&a, &b);

    assert!(result.is_match());
    assert_eq!(result.detail, "Files match (examined 40.00% of the file)");
}

#[test]
fn test_end_mismatch_short_circuits() {
    let dir = tempdir().unwrap();
    let data = patterned(1000);
    let mut other = data.clone();
    other[950] ^= 0xFF;
    // Also differs inside the first interior window; must not be reported.
    other[300] ^= 0xFF;
    let (a, b) = write_pair(dir.path(), &data, &other);

    let result = comparator().compare_files(&a, &b);

    assert_eq!(result.outcome, Outcome::MismatchAtEnd);
    assert_eq!(
        result.detail,
        "Files match at the beginning but not at the end; Mismatch at offset 950"
    );
}

#[test]
fn test_interior_mismatch() {
    let dir = tempdir().unwrap();
    let data = patterned(1000);
    let mut other = data.clone();
    other[650] ^= 0xFF;
    let (a, b) = write_pair(dir.path(), &data, &other);

    let result = comparator().compare_files(&a, &b);

    assert_eq!(result.outcome, Outcome::MismatchInMiddle);
    assert_eq!(
        result.detail,
        "Files match at the beginning and end, but not in the middle; Mismatch at offset 650"
    );
}

#[test]
fn test_difference_between_windows_goes_unnoticed() {
    let dir = tempdir().unwrap();
    let data = patterned(1000);
    let mut other = data.clone();
    other[500] ^= 0xFF;
    let (a, b) = write_pair(dir.path(), &data, &other);

    assert!(comparator().compare_files(&a, &b).is_match());
}

#[test]
fn test_explicit_parameters_are_clamped() {
    let dir = tempdir().unwrap();
    let data = patterned(1000);
    let (a, b) = write_pair(dir.path(), &data, &data);

    // Count 0 becomes 2 and size 1 becomes 64: two windows of 64 bytes.
    let result = comparator().compare(&a, &b, 0, 1, true);

    assert!(result.is_match());
    assert_eq!(result.detail, "Files match (examined 12.80% of the file)");
}

#[test]
fn test_small_chunks_find_same_offset() {
    let dir = tempdir().unwrap();
    let data = patterned(5000);
    let mut other = data.clone();
    other[4321] ^= 0xFF;
    let (a, b) = write_pair(dir.path(), &data, &other);

    let result = FileComparator::new(CompareSettings::new(100, 64))
        .with_chunk_size(7)
        .compare_files(&a, &b);

    assert_eq!(result.detail, "Mismatch at offset 4321");
}
