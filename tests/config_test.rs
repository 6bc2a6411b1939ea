//! Configuration file loading.

use std::io::Write;
use unbeatable::AppConfig;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "[server]\nhost = \"0.0.0.0\"\nport = 8081\n\n[log]\nfilter = \"unbeatable=debug\""
    )
    .unwrap();

    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.server().host(), "0.0.0.0");
    assert_eq!(*config.server().port(), 8081);
    assert_eq!(config.log().filter(), "unbeatable=debug");
}

#[test]
fn test_empty_file_uses_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let config = AppConfig::from_file(file.path()).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = AppConfig::load(Some(dir.path().join("missing.toml").as_path())).unwrap_err();
    assert!(err.message.contains("Failed to read config file"));
}

#[test]
fn test_malformed_file_is_an_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[server]\nport = \"not a number\"").unwrap();
    let err = AppConfig::from_file(file.path()).unwrap_err();
    assert!(err.message.contains("Failed to parse config"));
}
