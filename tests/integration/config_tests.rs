use dupfold::config::{Config, ConfigError};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_load_missing_file_gives_defaults() {
    let dir = tempdir().unwrap();
    let config = Config::load_from_path(dir.path().join("absent.toml"));

    assert_eq!(config, Config::default());
}

#[test]
fn test_load_overrides_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "extensions = [\"bin\", \"img\"]\n").unwrap();

    let config = Config::load_from_path(&path);

    assert_eq!(config.extensions, vec!["bin".to_string(), "img".to_string()]);
    assert!(config.extension_filter().contains("img"));
}

#[test]
fn test_destination_in_file_is_ignored() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        "extensions = [\"iso\"]\ndestination = \"/tmp/elsewhere\"\n",
    )
    .unwrap();

    let config = Config::load_from_path(&path);

    assert_eq!(
        config,
        Config {
            extensions: vec!["iso".to_string()],
        }
    );
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "extensions = not toml at all [[").unwrap();

    let config = Config::load_from_path(&path);

    assert_eq!(config, Config::default());
}

#[test]
fn test_invalid_values_fall_back_to_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "extensions = [\"tar.gz\"]\n").unwrap();

    let config = Config::load_from_path(&path);

    assert_eq!(config, Config::default());
}

#[test]
fn test_validate_reports_bad_separator() {
    let config = Config {
        extensions: vec!["bin".into(), "a/b".into()],
    };

    assert_eq!(
        config.validate(),
        Err(ConfigError::InvalidExtension("a/b".into()))
    );
}
