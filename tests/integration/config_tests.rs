use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use rmlint_manager::actions::DeleteMethod;
use rmlint_manager::config::{Config, ENV_PREFIX};
use rmlint_manager::fingerprint::FingerprintAlgorithm;
use std::fs;
use std::path::PathBuf;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // figment without Env, so other tests' variables cannot leak in
    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .extract()
        .unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("RMLINT_MANAGER_TOP_N", "42");
    std::env::set_var("RMLINT_MANAGER_DELETE__METHOD", "trash");
    std::env::set_var("RMLINT_MANAGER_FINGERPRINT__ALGORITHM", "blake3");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .unwrap();

    assert_eq!(config.top_n, 42);
    assert_eq!(config.delete.method, DeleteMethod::Trash);
    assert_eq!(config.fingerprint.algorithm, FingerprintAlgorithm::Blake3);

    std::env::remove_var("RMLINT_MANAGER_TOP_N");
    std::env::remove_var("RMLINT_MANAGER_DELETE__METHOD");
    std::env::remove_var("RMLINT_MANAGER_FINGERPRINT__ALGORITHM");
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
top_n = 5

[fingerprint]
algorithm = "command"
command = "sha1sum"
args = ["--binary"]

[delete]
cleanup_empty_dirs = false
protected_dirs = ["/srv/media"]

[scan]
program = "/usr/local/bin/rmlint"
output_dir = "/var/tmp/reports"
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(config.top_n, 5);
    assert_eq!(config.fingerprint.algorithm, FingerprintAlgorithm::Command);
    assert_eq!(config.fingerprint.command, "sha1sum");
    assert_eq!(config.fingerprint.args, vec!["--binary".to_string()]);
    assert!(!config.delete.cleanup_empty_dirs);
    assert!(config.delete.restore_timestamps);
    assert_eq!(config.delete.protected_dirs, vec![PathBuf::from("/srv/media")]);
    assert_eq!(config.scan.program, "/usr/local/bin/rmlint");
    assert_eq!(config.scan.output_dir, Some(PathBuf::from("/var/tmp/reports")));
}

#[test]
fn test_invalid_toml_fails_extract() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "invalid = toml").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();
    assert!(result.is_err());
}

#[test]
fn test_unknown_algorithm_fails_extract() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "[fingerprint]\nalgorithm = \"md5\"\n").unwrap();

    let result: Result<Config, _> = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract();
    assert!(result.is_err());
}

#[test]
fn test_serialized_config_round_trips_through_toml() {
    let mut config = Config::default();
    config.top_n = 3;
    config.delete.method = DeleteMethod::Trash;
    config.scan.output_dir = Some(PathBuf::from("/reports"));

    let text = toml::to_string(&config).unwrap();
    let parsed: Config = toml::from_str(&text).unwrap();
    assert_eq!(parsed, config);
}
