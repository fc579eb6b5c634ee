//! Configuration resolution tests
//!
//! Covers file loading, graceful degradation on a missing file, and the
//! CLI → ENV → TOML → default priority order.
//!
//! Note: Uses serial_test to prevent ENV variable race conditions.
//! Tests that touch REPOMIG_* variables are marked with #[serial].

use repomig_common::config::{
    load_toml_config, resolve_config_path, ConfigOverrides, TomlConfig, ENV_CONFIG_PATH,
    ENV_NAMESPACE, ENV_SOURCE_PASSWORD, ENV_TARGET_PASSWORD,
};
use repomig_common::Error;
use serial_test::serial;
use std::env;
use std::io::Write;
use tempfile::NamedTempFile;

fn clear_env() {
    env::remove_var(ENV_CONFIG_PATH);
    env::remove_var(ENV_SOURCE_PASSWORD);
    env::remove_var(ENV_TARGET_PASSWORD);
    env::remove_var(ENV_NAMESPACE);
    env::remove_var("REPOMIG_BIND");
}

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Should create temp file");
    file.write_all(content.as_bytes()).expect("Should write config");
    file
}

#[test]
fn test_missing_file_uses_defaults() {
    let config = load_toml_config(std::path::Path::new("/nonexistent/repomig/config.toml"))
        .expect("Missing config must not be fatal");

    assert_eq!(config.migration.namespace, "coccc");
    assert_eq!(config.source.base_url, "http://localhost:8080/fedora");
}

#[test]
fn test_malformed_file_is_config_error() {
    let file = write_config("[source\nbase_url = ");
    let result = load_toml_config(file.path());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_full_file_round_trips_all_sections() {
    let file = write_config(
        r#"
        [source]
        base_url = "http://fedora34.example.edu:8080/fedora"
        username = "migrator"
        password = "old"

        [target]
        base_url = "https://islandora.example.edu/fedora"
        username = "islandora"

        [migration]
        namespace = "oral"
        request_timeout_secs = 120

        [server]
        bind = "0.0.0.0:9000"

        [logging]
        level = "debug"
        "#,
    );

    let config = load_toml_config(file.path()).expect("Should parse config");
    assert_eq!(config.source.username, "migrator");
    assert_eq!(config.target.base_url, "https://islandora.example.edu/fedora");
    assert!(config.target.password.is_none());
    assert_eq!(config.migration.namespace, "oral");
    assert_eq!(config.migration.request_timeout_secs, Some(120));
    assert_eq!(config.server.bind, "0.0.0.0:9000");
    assert_eq!(config.logging.level, "debug");
}

#[test]
#[serial]
fn test_cli_path_beats_env_path() {
    clear_env();
    env::set_var(ENV_CONFIG_PATH, "/tmp/from-env.toml");

    let cli = std::path::PathBuf::from("/tmp/from-cli.toml");
    assert_eq!(resolve_config_path(Some(cli.as_path())), Some(cli.clone()));
    assert_eq!(
        resolve_config_path(None),
        Some(std::path::PathBuf::from("/tmp/from-env.toml"))
    );

    clear_env();
}

#[test]
#[serial]
fn test_env_overrides_toml_and_cli_overrides_env() {
    clear_env();
    let file = write_config(
        r#"
        [source]
        password = "from-toml"

        [migration]
        namespace = "tomlns"
        "#,
    );

    env::set_var(ENV_SOURCE_PASSWORD, "from-env");
    env::set_var(ENV_TARGET_PASSWORD, "target-env");
    env::set_var(ENV_NAMESPACE, "envns");

    let overrides = ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        bind: Some("127.0.0.1:6000".to_string()),
        namespace: Some("clins".to_string()),
    };
    let config = TomlConfig::resolve(&overrides).expect("Should resolve config");

    assert_eq!(config.source.password.as_deref(), Some("from-env"));
    assert_eq!(config.target.password.as_deref(), Some("target-env"));
    assert_eq!(config.migration.namespace, "clins");
    assert_eq!(config.server.bind, "127.0.0.1:6000");

    clear_env();
}

#[test]
#[serial]
fn test_resolve_rejects_invalid_namespace() {
    clear_env();
    let file = write_config("[migration]\nnamespace = \"bad:ns\"\n");

    let overrides = ConfigOverrides {
        config_path: Some(file.path().to_path_buf()),
        ..Default::default()
    };
    assert!(matches!(TomlConfig::resolve(&overrides), Err(Error::Config(_))));
}
