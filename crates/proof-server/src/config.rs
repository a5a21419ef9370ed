//! Server configuration.
//!
//! Loaded from the TOML file named by `MEMBERSHIP_CONFIG`; every field has a
//! default, so the file may be partial or absent.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use membership_circuits::{MerkleError, TreeConfig, DEFAULT_DEPTH};

/// Environment variable naming the config file.
pub const CONFIG_ENV: &str = "MEMBERSHIP_CONFIG";

const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_MAX_CACHED_TREES: usize = 64;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid config: {0}")]
    Invalid(#[from] MerkleError),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Depth of every tree served, and of the circuit keys
    #[serde(default = "default_depth")]
    pub depth: usize,

    #[serde(default = "default_keys_dir")]
    pub keys_dir: PathBuf,

    /// Trees retained for proof generation by root
    #[serde(default = "default_max_cached_trees")]
    pub max_cached_trees: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            depth: DEFAULT_DEPTH,
            keys_dir: default_keys_dir(),
            max_cached_trees: DEFAULT_MAX_CACHED_TREES,
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 3001))
}

fn default_depth() -> usize {
    DEFAULT_DEPTH
}

fn default_keys_dir() -> PathBuf {
    PathBuf::from("keys")
}

fn default_max_cached_trees() -> usize {
    DEFAULT_MAX_CACHED_TREES
}

impl ServerConfig {
    /// Load from `MEMBERSHIP_CONFIG`, or defaults when it is unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load_from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: ServerConfig = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        TreeConfig::new(self.depth)?;
        Ok(())
    }

    pub fn tree_config(&self) -> TreeConfig {
        TreeConfig { depth: self.depth }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.depth, DEFAULT_DEPTH);
        assert_eq!(config.listen_addr.to_string(), DEFAULT_LISTEN_ADDR);
        assert_eq!(config.keys_dir, PathBuf::from("keys"));
    }

    #[test]
    fn test_partial_config() {
        let config: ServerConfig = toml::from_str("depth = 12").unwrap();
        assert_eq!(config.depth, 12);
        assert_eq!(config.max_cached_trees, DEFAULT_MAX_CACHED_TREES);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            r#"
                listen_addr = "127.0.0.1:8080"
                depth = 16
                keys_dir = "/var/lib/membership/keys"
            "#,
        )
        .unwrap();

        let config = ServerConfig::load_from_file(&path).unwrap();
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.depth, 16);
        assert_eq!(config.keys_dir, PathBuf::from("/var/lib/membership/keys"));
    }

    #[test]
    fn test_invalid_depth() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "depth = 0").unwrap();

        assert!(matches!(
            ServerConfig::load_from_file(&path),
            Err(ConfigError::Invalid(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            ServerConfig::load_from_file(Path::new("/nonexistent/server.toml")),
            Err(ConfigError::Read { .. })
        ));
    }
}
