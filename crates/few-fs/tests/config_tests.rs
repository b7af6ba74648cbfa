use few_fs::{ConfigStore, Error, NormalizedPath};
use serde::Deserialize;
use std::fs;
use tempfile::TempDir;

#[derive(Debug, Deserialize, PartialEq)]
struct TestConfig {
    default_owner: String,
    host: String,
}

fn sample() -> TestConfig {
    TestConfig {
        default_owner: "someone".into(),
        host: "git.example.com".into(),
    }
}

fn load(path: impl AsRef<std::path::Path>) -> few_fs::Result<Option<TestConfig>> {
    ConfigStore::new().load_optional(&NormalizedPath::new(path))
}

#[test]
fn test_load_toml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.toml");
    fs::write(&file_path, "default_owner = \"someone\"\nhost = \"git.example.com\"\n").unwrap();

    assert_eq!(load(&file_path).unwrap(), Some(sample()));
}

#[test]
fn test_load_yaml() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.yaml");
    fs::write(&file_path, "default_owner: someone\nhost: git.example.com\n").unwrap();

    assert_eq!(load(&file_path).unwrap(), Some(sample()));
}

#[test]
fn test_load_json() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.json");
    fs::write(
        &file_path,
        r#"{"default_owner": "someone", "host": "git.example.com"}"#,
    )
    .unwrap();

    assert_eq!(load(&file_path).unwrap(), Some(sample()));
}

#[test]
fn test_load_optional_missing_file() {
    let temp = TempDir::new().unwrap();
    assert_eq!(load(temp.path().join("config.toml")).unwrap(), None);
}

#[test]
fn test_load_invalid_toml_reports_parse_error() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.toml");
    fs::write(&file_path, "default_owner = [unclosed").unwrap();

    let result = load(&file_path);
    assert!(matches!(result, Err(Error::ConfigParse { ref format, .. }) if format == "TOML"));
}

#[test]
fn test_unsupported_extension() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("config.ini");
    fs::write(&file_path, "x=1").unwrap();

    assert!(matches!(load(&file_path), Err(Error::UnsupportedFormat { .. })));
}
