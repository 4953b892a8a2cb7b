use rusqlite::Connection;
use samplecmp::compare::{CompareSettings, FileComparator};
use samplecmp::error::ExitCode;
use samplecmp::resolver::{DatasetPathResolver, ResolveError, SqliteDatasetResolver};
use samplecmp::runner::SampledRunner;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn create_db(path: &Path, rows: &[(&str, &str, &str)]) {
    let conn = Connection::open(path).unwrap();
    conn.execute_batch(
        "CREATE TABLE dataset_folder_paths (
             dataset TEXT PRIMARY KEY,
             dataset_folder_path TEXT,
             archive_folder_path TEXT
         );",
    )
    .unwrap();
    for (dataset, storage, archive) in rows {
        conn.execute(
            "INSERT INTO dataset_folder_paths VALUES (?1, ?2, ?3)",
            [dataset, storage, archive],
        )
        .unwrap();
    }
}

#[test]
fn test_resolve_from_file_database() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("datasets.sqlite");
    create_db(&db, &[("QC_Shew_01", "/storage/QC_Shew_01", "/archive/QC_Shew_01")]);

    let resolver = SqliteDatasetResolver::open(&db).unwrap();
    let paths = resolver.resolve("QC_Shew_01").unwrap();

    assert_eq!(paths.storage_path, Path::new("/storage/QC_Shew_01"));
    assert_eq!(paths.archive_path, Path::new("/archive/QC_Shew_01"));
    assert!(matches!(
        resolver.resolve("QC_Shew_02"),
        Err(ResolveError::NotFound { .. })
    ));
}

#[test]
fn test_dataset_run_reconciles_directories() {
    let dir = tempdir().unwrap();
    let storage = dir.path().join("storage");
    let archive = dir.path().join("archive");
    fs::create_dir_all(storage.join("sub")).unwrap();
    fs::create_dir_all(archive.join("sub")).unwrap();
    fs::write(storage.join("sub/run.raw"), b"spectra").unwrap();
    fs::write(archive.join("sub/run.raw"), b"spectra").unwrap();

    let db = dir.path().join("datasets.sqlite");
    create_db(
        &db,
        &[(
            "QC_Shew_01",
            storage.to_str().unwrap(),
            archive.to_str().unwrap(),
        )],
    );

    let resolver = SqliteDatasetResolver::open(&db).unwrap();
    let mut runner = SampledRunner::new(FileComparator::new(CompareSettings::default()));
    let outcome = runner.run_dataset(&resolver, "QC_Shew_01");

    assert!(outcome.matched);
    assert_eq!(outcome.code, ExitCode::Success);
    assert_eq!(outcome.report.tally.map(|t| t.matched), Some(1));
}

#[test]
fn test_empty_archive_path_stops_before_comparing() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("datasets.sqlite");
    create_db(&db, &[("QC_Shew_01", "/storage/QC_Shew_01", "  ")]);

    let resolver = SqliteDatasetResolver::open(&db).unwrap();
    let mut runner = SampledRunner::new(FileComparator::new(CompareSettings::default()));
    let outcome = runner.run_dataset(&resolver, "QC_Shew_01");

    assert_eq!(outcome.code, ExitCode::LookupFailed);
    assert!(outcome.report.tally.is_none());
    assert!(outcome.report.detail.contains("empty archive folder path"));
}
