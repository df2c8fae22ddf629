//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `WORDWEAVE_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::constants::{
    DEFAULT_FINISHED_TTL_SECS, DEFAULT_FLUSH_EVERY_GAMES, DEFAULT_IDLE_TIMEOUT_SECS,
    DEFAULT_NEIGHBOR_CACHE_CAPACITY, DEFAULT_NEIGHBOR_COUNT, DEFAULT_REAP_INTERVAL_SECS,
    LEARNING_FILENAME, VOCABULARY_FILENAME,
};
use crate::coordinator::CoordinatorConfig;
use crate::learning::LearningConfig;
use crate::scoring::RankingConfig;
use crate::vectors::VectorIndexConfig;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `WORDWEAVE_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8000`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Directory holding the vocabulary and learning files. Default: `./data`.
    pub data_dir: PathBuf,

    /// Vocabulary file. Default: `{data_dir}/word_database.json`.
    pub vocabulary_path: Option<PathBuf>,

    /// word2vec model (`.bin` binary, anything else text). Unset runs in fallback mode.
    pub vector_model_path: Option<PathBuf>,

    /// Neighbor list length used for direct ranks. Default: `1000`.
    pub neighbor_count: usize,

    /// Per-target neighbor lists kept in memory. Default: `256`.
    pub neighbor_cache_capacity: u64,

    /// Completed games between learning snapshots. Default: `10`.
    pub learning_flush_every: u64,

    /// Idle time after which an unfinished game is dropped. Default: 30 minutes.
    pub idle_timeout: Duration,

    /// Time a won game stays readable. Default: 5 minutes.
    pub finished_ttl: Duration,

    /// Reaper tick. Default: 30 seconds.
    pub reap_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8000,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            data_dir: PathBuf::from("./data"),
            vocabulary_path: None,
            vector_model_path: None,
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            neighbor_cache_capacity: DEFAULT_NEIGHBOR_CACHE_CAPACITY,
            learning_flush_every: DEFAULT_FLUSH_EVERY_GAMES,
            idle_timeout: Duration::from_secs(DEFAULT_IDLE_TIMEOUT_SECS),
            finished_ttl: Duration::from_secs(DEFAULT_FINISHED_TTL_SECS),
            reap_interval: Duration::from_secs(DEFAULT_REAP_INTERVAL_SECS),
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "WORDWEAVE_PORT";
    const ENV_BIND_ADDR: &'static str = "WORDWEAVE_BIND_ADDR";
    const ENV_DATA_DIR: &'static str = "WORDWEAVE_DATA_DIR";
    const ENV_VOCABULARY_PATH: &'static str = "WORDWEAVE_VOCABULARY_PATH";
    const ENV_VECTOR_MODEL_PATH: &'static str = "WORDWEAVE_VECTOR_MODEL_PATH";
    const ENV_NEIGHBOR_COUNT: &'static str = "WORDWEAVE_NEIGHBOR_COUNT";
    const ENV_NEIGHBOR_CACHE_CAPACITY: &'static str = "WORDWEAVE_NEIGHBOR_CACHE_CAPACITY";
    const ENV_LEARNING_FLUSH_EVERY: &'static str = "WORDWEAVE_LEARNING_FLUSH_EVERY";
    const ENV_IDLE_TIMEOUT_SECS: &'static str = "WORDWEAVE_IDLE_TIMEOUT_SECS";
    const ENV_FINISHED_TTL_SECS: &'static str = "WORDWEAVE_FINISHED_TTL_SECS";
    const ENV_REAP_INTERVAL_SECS: &'static str = "WORDWEAVE_REAP_INTERVAL_SECS";

    /// Loads configuration from environment variables (falling back to defaults).
    ///
    /// Unparsable numeric values fall back to their defaults; a bad port or
    /// bind address is an error.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let data_dir = Self::parse_path_from_env(Self::ENV_DATA_DIR, defaults.data_dir);
        let vocabulary_path = Self::parse_optional_path_from_env(Self::ENV_VOCABULARY_PATH);
        let vector_model_path = Self::parse_optional_path_from_env(Self::ENV_VECTOR_MODEL_PATH);
        let neighbor_count = Self::parse_u64_from_env(
            Self::ENV_NEIGHBOR_COUNT,
            defaults.neighbor_count as u64,
        ) as usize;
        let neighbor_cache_capacity = Self::parse_u64_from_env(
            Self::ENV_NEIGHBOR_CACHE_CAPACITY,
            defaults.neighbor_cache_capacity,
        );
        let learning_flush_every =
            Self::parse_u64_from_env(Self::ENV_LEARNING_FLUSH_EVERY, defaults.learning_flush_every);
        let idle_timeout =
            Self::parse_secs_from_env(Self::ENV_IDLE_TIMEOUT_SECS, defaults.idle_timeout);
        let finished_ttl =
            Self::parse_secs_from_env(Self::ENV_FINISHED_TTL_SECS, defaults.finished_ttl);
        let reap_interval =
            Self::parse_secs_from_env(Self::ENV_REAP_INTERVAL_SECS, defaults.reap_interval);

        Ok(Self {
            port,
            bind_addr,
            data_dir,
            vocabulary_path,
            vector_model_path,
            neighbor_count,
            neighbor_cache_capacity,
            learning_flush_every,
            idle_timeout,
            finished_ttl,
            reap_interval,
        })
    }

    /// Validates paths and basic invariants (does not create directories).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.data_dir.exists() && !self.data_dir.is_dir() {
            return Err(ConfigError::NotADirectory {
                path: self.data_dir.clone(),
            });
        }

        let vocabulary_path = self.vocabulary_path();
        if !vocabulary_path.exists() {
            return Err(ConfigError::PathNotFound {
                path: vocabulary_path,
            });
        }
        if !vocabulary_path.is_file() {
            return Err(ConfigError::NotAFile {
                path: vocabulary_path,
            });
        }

        if let Some(ref path) = self.vector_model_path
            && path.exists()
            && !path.is_file()
        {
            return Err(ConfigError::NotAFile { path: path.clone() });
        }

        if self.neighbor_count == 0 {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_NEIGHBOR_COUNT,
            });
        }
        if self.idle_timeout.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_IDLE_TIMEOUT_SECS,
            });
        }
        if self.reap_interval.is_zero() {
            return Err(ConfigError::ZeroValue {
                name: Self::ENV_REAP_INTERVAL_SECS,
            });
        }

        Ok(())
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    /// Vocabulary file, defaulting to a file inside the data directory.
    pub fn vocabulary_path(&self) -> PathBuf {
        self.vocabulary_path
            .clone()
            .unwrap_or_else(|| self.data_dir.join(VOCABULARY_FILENAME))
    }

    /// Learning file inside the data directory.
    pub fn learning_path(&self) -> PathBuf {
        self.data_dir.join(LEARNING_FILENAME)
    }

    pub fn ranking_config(&self) -> RankingConfig {
        RankingConfig::with_neighbor_count(self.neighbor_count)
    }

    pub fn vector_index_config(&self) -> VectorIndexConfig {
        VectorIndexConfig::default().with_neighbor_cache_capacity(self.neighbor_cache_capacity)
    }

    pub fn learning_config(&self) -> LearningConfig {
        LearningConfig::default().with_flush_every(self.learning_flush_every)
    }

    pub fn coordinator_config(&self) -> CoordinatorConfig {
        CoordinatorConfig {
            idle_timeout: self.idle_timeout,
            finished_ttl: self.finished_ttl,
            reap_interval: self.reap_interval,
        }
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_optional_path_from_env(var_name: &str) -> Option<PathBuf> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }

    fn parse_u64_from_env(var_name: &str, default: u64) -> u64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn parse_secs_from_env(var_name: &str, default: Duration) -> Duration {
        Duration::from_secs(Self::parse_u64_from_env(var_name, default.as_secs()))
    }
}
