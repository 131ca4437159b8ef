//! Server and client configuration
//!
//! Both configurations deserialize from TOML; every field is optional and
//! falls back to the defaults below.
//!
//! ```toml
//! addr = "0.0.0.0:1099"
//! service_name = "CalculatorService"
//! log_filter = "calcstack=debug,info"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::registry::DEFAULT_SERVICE_NAME;

pub const DEFAULT_ADDR: &str = "127.0.0.1:1099";

#[derive(Error, Debug)]
pub enum ConfigError {
  #[error("failed to read config file {path:?}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("failed to parse TOML config: {0}")]
  Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
  /// Address the server listens on.
  pub addr: String,
  /// Name the server's stack is published under.
  pub service_name: String,
  /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset.
  pub log_filter: String,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      addr: DEFAULT_ADDR.to_string(),
      service_name: DEFAULT_SERVICE_NAME.to_string(),
      log_filter: "info".to_string(),
    }
  }
}

impl ServerConfig {
  pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(s)?)
  }

  pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
    let text = fs::read_to_string(path).map_err(|e| ConfigError::Io {
      path: path.to_path_buf(),
      source: e,
    })?;
    Self::from_toml_str(&text)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClientConfig {
  pub addr: String,
  pub service_name: String,
}

impl Default for ClientConfig {
  fn default() -> Self {
    Self {
      addr: DEFAULT_ADDR.to_string(),
      service_name: DEFAULT_SERVICE_NAME.to_string(),
    }
  }
}
