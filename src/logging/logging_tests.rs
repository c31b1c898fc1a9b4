//! Tests for log file setup.

use super::*;
use serial_test::serial;

#[test]
fn split_log_path_separates_directory_and_file() {
    let (dir, file) = split_log_path(Path::new("/var/log/safecalc/app.log")).unwrap();
    assert_eq!(dir, PathBuf::from("/var/log/safecalc"));
    assert_eq!(file, "app.log");
}

#[test]
fn split_log_path_bare_file_uses_current_directory() {
    let (dir, file) = split_log_path(Path::new("safecalc.log")).unwrap();
    assert_eq!(dir, PathBuf::from("."));
    assert_eq!(file, "safecalc.log");
}

#[test]
fn split_log_path_rejects_path_without_file_name() {
    let result = split_log_path(Path::new("/"));
    assert!(
        matches!(result, Err(LoggingError::InvalidPath(_))),
        "Root has no file name component, got {:?}",
        result
    );
}

#[test]
#[serial(tracing_init)]
fn init_creates_log_directory_if_missing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log_dir = temp.path().join("nested").join("logs");
    let log_file = log_dir.join("test.log");

    // The subscriber may already be set by another test; the directory is
    // created before that check either way.
    let _ = init(&log_file);

    assert!(
        log_dir.exists(),
        "Log directory should be created: {:?}",
        log_dir
    );
}

#[test]
#[serial(tracing_init)]
fn init_reports_directory_creation_failure() {
    let temp = tempfile::tempdir().expect("tempdir");
    let blocker = temp.path().join("not-a-dir");
    std::fs::write(&blocker, "file in the way").expect("write");

    let result = init(&blocker.join("app.log"));

    assert!(
        matches!(result, Err(LoggingError::DirectoryCreation { .. })),
        "A file where the directory should be must fail, got {:?}",
        result
    );
}

#[test]
#[serial(tracing_init)]
fn second_init_reports_subscriber_already_set() {
    let temp = tempfile::tempdir().expect("tempdir");
    let _ = init(&temp.path().join("first.log"));

    let second = init(&temp.path().join("second.log"));

    assert!(matches!(second, Err(LoggingError::SubscriberAlreadySet)));
}
