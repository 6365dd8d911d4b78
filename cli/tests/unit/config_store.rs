//! `YamlConfigStore` path resolution and loading.

#![allow(clippy::expect_used, clippy::unwrap_used, unsafe_code)]

use std::path::PathBuf;

use serial_test::serial;
use tempfile::TempDir;

use bluegreen_cli::application::ports::ConfigStore;
use bluegreen_cli::domain::{ControlStep, SwitchConfig};
use bluegreen_cli::infra::config::{CONFIG_ENV, YamlConfigStore};

#[test]
#[serial]
fn missing_file_yields_defaults() {
    let dir = TempDir::new().unwrap();
    let store = YamlConfigStore::new(Some(dir.path().join("absent.yaml")));
    assert_eq!(store.load().unwrap(), SwitchConfig::default());
}

#[test]
#[serial]
fn partial_file_overrides_only_named_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(
        &path,
        "artifact_dir: /srv/apps\nserving_port: 8080\nstrict_control_steps: [reload, start]\n",
    )
    .unwrap();

    let config = YamlConfigStore::new(Some(path)).load().unwrap();

    assert_eq!(config.artifact_dir, PathBuf::from("/srv/apps"));
    assert_eq!(config.serving_port, 8080);
    assert_eq!(
        config.strict_control_steps,
        [ControlStep::Reload, ControlStep::Start]
    );
    assert_eq!(config.unit_dir, SwitchConfig::default().unit_dir);
}

#[test]
#[serial]
fn invalid_values_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "serving_port: 0\n").unwrap();

    let err = YamlConfigStore::new(Some(path)).load().unwrap_err();

    assert!(format!("{err:#}").contains("serving_port"), "{err:#}");
}

#[test]
#[serial]
fn unknown_keys_are_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.yaml");
    std::fs::write(&path, "artifact_directory: /srv\n").unwrap();

    assert!(YamlConfigStore::new(Some(path)).load().is_err());
}

#[test]
#[serial]
fn env_var_overrides_default_location() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("from-env.yaml");
    std::fs::write(&path, "service_user: azureuser\n").unwrap();

    // SAFETY: serialized by #[serial]; no other thread reads the environment.
    unsafe { std::env::set_var(CONFIG_ENV, &path) };
    let store = YamlConfigStore::default();
    let resolved = store.path().unwrap();
    let config = store.load().unwrap();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert_eq!(resolved, path);
    assert_eq!(config.service_user, "azureuser");
}

#[test]
#[serial]
fn explicit_path_wins_over_env_var() {
    let dir = TempDir::new().unwrap();
    let explicit = dir.path().join("explicit.yaml");

    // SAFETY: serialized by #[serial]; no other thread reads the environment.
    unsafe { std::env::set_var(CONFIG_ENV, dir.path().join("env.yaml")) };
    let resolved = YamlConfigStore::new(Some(explicit.clone())).path().unwrap();
    unsafe { std::env::remove_var(CONFIG_ENV) };

    assert_eq!(resolved, explicit);
}
