//! Integration tests for Settings config loading with layered merge semantics.
//!
//! Note: These tests run without a global config (temp directories only),
//! so they effectively test local config merging with defaults.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use bolsig2ctml::application::ApplicationError;
use bolsig2ctml::config::{local_config_path, Settings};

#[test]
fn given_no_local_config_when_load_then_uses_defaults() {
    // Arrange
    let dir = TempDir::new().unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.root_tag, "ctml");
    assert_eq!(settings.output, PathBuf::from("lxcat.xml"));
    assert_eq!(settings.input, PathBuf::from("Cross section.txt"));
}

#[test]
fn given_local_config_when_load_then_overrides_specified_fields_only() {
    // Arrange
    let dir = TempDir::new().unwrap();
    let local = r#"
root_tag = "lxcat"
output = "converted/argon.xml"
"#;
    fs::write(local_config_path(dir.path()), local).unwrap();

    // Act
    let settings = Settings::load(Some(dir.path())).expect("load settings");

    // Assert
    assert_eq!(settings.root_tag, "lxcat");
    assert_eq!(settings.output, PathBuf::from("converted/argon.xml"));
    assert_eq!(settings.input, PathBuf::from("Cross section.txt"));
}

#[test]
fn given_tilde_in_output_when_load_then_expands_home() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "output = \"~/lxcat.xml\"\n").unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert!(!settings.output.to_string_lossy().starts_with('~'));
    assert!(settings.output.ends_with("lxcat.xml"));
}

#[test]
fn given_invalid_local_config_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "root_tag = [not toml").unwrap();

    let result = Settings::load(Some(dir.path()));

    assert!(matches!(result, Err(ApplicationError::Config { .. })));
}

#[test]
fn given_env_var_when_load_then_env_overrides_file() {
    // Arrange
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "process_tag = \"from_file\"\n",
    )
    .unwrap();
    std::env::set_var("BOLSIG2CTML_PROCESS_TAG", "from_env");

    // Act
    let settings = Settings::load(Some(dir.path()));
    std::env::remove_var("BOLSIG2CTML_PROCESS_TAG");

    // Assert
    assert_eq!(settings.expect("load settings").process_tag, "from_env");
}
