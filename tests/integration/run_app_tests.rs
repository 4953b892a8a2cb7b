use clap::Parser;
use samplecmp::cli::Cli;
use samplecmp::error::ExitCode;
use samplecmp::run_app;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// Parse arguments with an isolated (nonexistent) config file.
fn cli(config_dir: &Path, args: &[&str]) -> Cli {
    let config = config_dir.join("no-config.toml");
    let mut argv = vec![
        "samplecmp".to_string(),
        "--quiet".to_string(),
        "--no-color".to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    argv.extend(args.iter().map(|a| a.to_string()));
    Cli::try_parse_from(argv).unwrap()
}

#[test]
fn test_matching_files_exit_success() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    fs::write(&a, b"payload").unwrap();
    fs::write(&b, b"payload").unwrap();

    let code = run_app(cli(
        dir.path(),
        &[a.to_str().unwrap(), b.to_str().unwrap()],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_mismatching_files_exit_mismatch() {
    let dir = tempdir().unwrap();
    let a = dir.path().join("a.bin");
    let b = dir.path().join("b.bin");
    fs::write(&a, b"payload").unwrap();
    fs::write(&b, b"PAYLOAD").unwrap();

    let code = run_app(cli(
        dir.path(),
        &["--output", "json", a.to_str().unwrap(), b.to_str().unwrap()],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::Mismatch);
}

#[test]
fn test_missing_base_exit_invalid_input() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("missing.bin");

    let code = run_app(cli(
        dir.path(),
        &[missing.to_str().unwrap(), dir.path().to_str().unwrap()],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::InvalidInput);
}

#[test]
fn test_directory_run_with_size_flags() {
    let base = tempdir().unwrap();
    let cmp = tempdir().unwrap();
    fs::write(base.path().join("a.bin"), vec![7u8; 4096]).unwrap();
    fs::write(cmp.path().join("a.bin"), vec![7u8; 4096]).unwrap();

    let code = run_app(cli(
        base.path(),
        &[
            "-n",
            "3",
            "--bytes",
            "256",
            base.path().to_str().unwrap(),
            cmp.path().to_str().unwrap(),
        ],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::Success);
}

#[test]
fn test_dataset_without_database_exit_lookup_failed() {
    let dir = tempdir().unwrap();
    let db = dir.path().join("absent.sqlite");

    let code = run_app(cli(
        dir.path(),
        &["--dataset-db", db.to_str().unwrap(), "DMS", "QC_Shew_01"],
    ))
    .unwrap();

    assert_eq!(code, ExitCode::LookupFailed);
}
