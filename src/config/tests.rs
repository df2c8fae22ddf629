use super::*;
use serial_test::serial;
use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use tempfile::TempDir;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_wordweave_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    unsafe {
        env::remove_var("WORDWEAVE_PORT");
        env::remove_var("WORDWEAVE_BIND_ADDR");
        env::remove_var("WORDWEAVE_DATA_DIR");
        env::remove_var("WORDWEAVE_VOCABULARY_PATH");
        env::remove_var("WORDWEAVE_VECTOR_MODEL_PATH");
        env::remove_var("WORDWEAVE_NEIGHBOR_COUNT");
        env::remove_var("WORDWEAVE_NEIGHBOR_CACHE_CAPACITY");
        env::remove_var("WORDWEAVE_LEARNING_FLUSH_EVERY");
        env::remove_var("WORDWEAVE_IDLE_TIMEOUT_SECS");
        env::remove_var("WORDWEAVE_FINISHED_TTL_SECS");
        env::remove_var("WORDWEAVE_REAP_INTERVAL_SECS");
    }
}

fn data_dir_with_vocabulary() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("word_database.json"), "{}").unwrap();
    dir
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.port, 8000);
    assert_eq!(
        config.bind_addr,
        IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1))
    );
    assert_eq!(config.data_dir, PathBuf::from("./data"));
    assert!(config.vector_model_path.is_none());
    assert_eq!(config.neighbor_count, 1000);
    assert_eq!(config.learning_flush_every, 10);
    assert_eq!(config.idle_timeout, Duration::from_secs(1800));
}

#[test]
fn test_derived_paths() {
    let config = Config {
        data_dir: PathBuf::from("/srv/wordweave"),
        ..Default::default()
    };
    assert_eq!(
        config.vocabulary_path(),
        PathBuf::from("/srv/wordweave/word_database.json")
    );
    assert_eq!(
        config.learning_path(),
        PathBuf::from("/srv/wordweave/learning.json")
    );

    let config = Config {
        vocabulary_path: Some(PathBuf::from("/dict/words.json")),
        ..config
    };
    assert_eq!(config.vocabulary_path(), PathBuf::from("/dict/words.json"));
}

#[test]
fn test_socket_addr() {
    let config = Config::default();
    assert_eq!(config.socket_addr(), "127.0.0.1:8000");

    let config = Config {
        port: 3000,
        bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(0, 0, 0, 0)),
        ..Default::default()
    };
    assert_eq!(config.socket_addr(), "0.0.0.0:3000");
}

#[test]
fn test_component_configs() {
    let config = Config {
        neighbor_count: 500,
        neighbor_cache_capacity: 32,
        learning_flush_every: 3,
        finished_ttl: Duration::from_secs(7),
        ..Default::default()
    };

    assert_eq!(config.ranking_config().neighbor_count, 500);
    assert_eq!(config.vector_index_config().neighbor_cache_capacity, 32);
    assert_eq!(config.learning_config().flush_every, 3);
    assert_eq!(
        config.coordinator_config().finished_ttl,
        Duration::from_secs(7)
    );
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_wordweave_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.port, 8000);
    assert_eq!(config.neighbor_count, 1000);
    assert!(config.vocabulary_path.is_none());
}

#[test]
#[serial]
fn test_from_env_full() {
    clear_wordweave_env();

    with_env_vars(
        &[
            ("WORDWEAVE_PORT", "9000"),
            ("WORDWEAVE_BIND_ADDR", "0.0.0.0"),
            ("WORDWEAVE_DATA_DIR", "/var/lib/wordweave"),
            ("WORDWEAVE_VOCABULARY_PATH", "/dict/words.json"),
            ("WORDWEAVE_VECTOR_MODEL_PATH", "/models/ruscorpora.bin"),
            ("WORDWEAVE_NEIGHBOR_COUNT", "2000"),
            ("WORDWEAVE_NEIGHBOR_CACHE_CAPACITY", "64"),
            ("WORDWEAVE_LEARNING_FLUSH_EVERY", "5"),
            ("WORDWEAVE_IDLE_TIMEOUT_SECS", "60"),
            ("WORDWEAVE_FINISHED_TTL_SECS", "10"),
            ("WORDWEAVE_REAP_INTERVAL_SECS", "2"),
        ],
        || {
            let config = Config::from_env().expect("should parse full config");

            assert_eq!(config.socket_addr(), "0.0.0.0:9000");
            assert_eq!(config.data_dir, PathBuf::from("/var/lib/wordweave"));
            assert_eq!(config.vocabulary_path(), PathBuf::from("/dict/words.json"));
            assert_eq!(
                config.vector_model_path,
                Some(PathBuf::from("/models/ruscorpora.bin"))
            );
            assert_eq!(config.neighbor_count, 2000);
            assert_eq!(config.neighbor_cache_capacity, 64);
            assert_eq!(config.learning_flush_every, 5);
            assert_eq!(config.idle_timeout, Duration::from_secs(60));
            assert_eq!(config.finished_ttl, Duration::from_secs(10));
            assert_eq!(config.reap_interval, Duration::from_secs(2));
        },
    );
}

#[test]
#[serial]
fn test_blank_model_path_is_unset() {
    clear_wordweave_env();

    with_env_vars(&[("WORDWEAVE_VECTOR_MODEL_PATH", "   ")], || {
        let config = Config::from_env().expect("should parse");
        assert!(config.vector_model_path.is_none());
    });
}

#[test]
#[serial]
fn test_invalid_number_uses_default() {
    clear_wordweave_env();

    with_env_vars(&[("WORDWEAVE_NEIGHBOR_COUNT", "lots")], || {
        let config = Config::from_env().expect("should parse with fallback");
        assert_eq!(config.neighbor_count, 1000);
    });
}

#[test]
#[serial]
fn test_invalid_port_zero() {
    clear_wordweave_env();

    with_env_vars(&[("WORDWEAVE_PORT", "0")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidPort { .. }));
        assert!(err.to_string().contains("invalid port"));
    });
}

#[test]
#[serial]
fn test_invalid_port_not_number() {
    clear_wordweave_env();

    with_env_vars(&[("WORDWEAVE_PORT", "not_a_port")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::PortParseError { .. }));
    });
}

#[test]
#[serial]
fn test_invalid_bind_addr() {
    clear_wordweave_env();

    with_env_vars(&[("WORDWEAVE_BIND_ADDR", "not.an.ip.address")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidBindAddr { .. }));
        assert!(err.to_string().contains("failed to parse bind address"));
    });
}

#[test]
fn test_validate_success() {
    let dir = data_dir_with_vocabulary();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        vector_model_path: Some(dir.path().join("missing-model.bin")),
        ..Default::default()
    };

    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_missing_vocabulary() {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::PathNotFound { .. })
    ));
}

#[test]
fn test_validate_data_dir_is_file() {
    let config = Config {
        data_dir: PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml"),
        ..Default::default()
    };

    assert!(matches!(
        config.validate(),
        Err(ConfigError::NotADirectory { .. })
    ));
}

#[test]
fn test_validate_model_path_is_directory() {
    let dir = data_dir_with_vocabulary();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        vector_model_path: Some(dir.path().to_path_buf()),
        ..Default::default()
    };

    assert!(matches!(config.validate(), Err(ConfigError::NotAFile { .. })));
}

#[test]
fn test_validate_zero_neighbor_count() {
    let dir = data_dir_with_vocabulary();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        neighbor_count: 0,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::ZeroValue { .. }));
    assert!(err.to_string().contains("WORDWEAVE_NEIGHBOR_COUNT"));
}

#[test]
fn test_validate_zero_idle_timeout() {
    let dir = data_dir_with_vocabulary();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        idle_timeout: Duration::ZERO,
        ..Default::default()
    };

    let err = config.validate().unwrap_err();
    assert!(matches!(err, ConfigError::ZeroValue { .. }));
    assert!(err.to_string().contains("WORDWEAVE_IDLE_TIMEOUT_SECS"));
}
