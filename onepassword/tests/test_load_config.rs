use onepassword::load_config::{load_config, CliConfig, Overrides, OP_BIN_ENV, VAULT_ENV};
use serial_test::serial;
use std::env;
use std::fs::write;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(VAULT_ENV);
    env::remove_var(OP_BIN_ENV);
}

fn config_file(contents: &str) -> NamedTempFile {
    let file = NamedTempFile::new().expect("temp file");
    write(file.path(), contents).unwrap();
    file
}

#[test]
#[serial]
fn defaults_without_file_env_or_flags() {
    clear_env();
    let config = load_config(None, Overrides::default()).expect("defaults should resolve");
    assert_eq!(config, CliConfig::default());
    assert_eq!(config.vault, "Private");
    assert_eq!(config.op_bin, "op");
}

#[test]
#[serial]
fn file_values_are_used() {
    clear_env();
    let file = config_file("vault: Work\nop_bin: /opt/1password/op\n");
    let config = load_config(Some(file.path()), Overrides::default()).unwrap();
    assert_eq!(config.vault, "Work");
    assert_eq!(config.op_bin, "/opt/1password/op");
}

#[test]
#[serial]
fn env_beats_file_and_flags_beat_env() {
    clear_env();
    let file = config_file("vault: FromFile\nop_bin: file-op\n");

    env::set_var(VAULT_ENV, "FromEnv");
    let config = load_config(Some(file.path()), Overrides::default()).unwrap();
    assert_eq!(config.vault, "FromEnv");
    assert_eq!(config.op_bin, "file-op");

    let config = load_config(
        Some(file.path()),
        Overrides {
            vault: Some("FromFlag".into()),
            op_bin: None,
        },
    )
    .unwrap();
    assert_eq!(config.vault, "FromFlag");
    clear_env();
}

#[test]
#[serial]
fn blank_env_values_are_ignored() {
    clear_env();
    env::set_var(VAULT_ENV, "  ");
    let config = load_config(None, Overrides::default()).unwrap();
    assert_eq!(config.vault, "Private");
    clear_env();
}

#[test]
#[serial]
fn empty_file_is_an_empty_config() {
    clear_env();
    let file = config_file("");
    let config = load_config(Some(file.path()), Overrides::default()).unwrap();
    assert_eq!(config, CliConfig::default());
}

#[test]
#[serial]
fn invalid_yaml_is_reported() {
    clear_env();
    let file = config_file("not-yaml: [:::");
    let err = load_config(Some(file.path()), Overrides::default()).unwrap_err();
    let msg = format!("{err:#}");
    assert!(
        msg.contains("parse") || msg.contains("YAML"),
        "Parse error expected, got: {msg}"
    );
}

#[test]
#[serial]
fn unknown_keys_are_rejected() {
    clear_env();
    let file = config_file("vault: Work\npassword: nope\n");
    assert!(load_config(Some(file.path()), Overrides::default()).is_err());
}

#[test]
#[serial]
fn missing_file_is_reported() {
    clear_env();
    let err = load_config(
        Some(std::path::Path::new("does/not/exist.yaml")),
        Overrides::default(),
    )
    .unwrap_err();
    assert!(format!("{err:#}").contains("Failed to read config file"));
}

#[test]
#[serial]
fn empty_vault_flag_is_rejected() {
    clear_env();
    let err = load_config(
        None,
        Overrides {
            vault: Some(String::new()),
            op_bin: None,
        },
    )
    .unwrap_err();
    assert!(err.to_string().contains("vault name must not be empty"));
}
