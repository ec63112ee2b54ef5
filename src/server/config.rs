//! Serving configuration, loaded from an optional YAML file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{datasets::spam_or_ham, pipelines::text_classification};

/// Configuration for the prediction server
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Interface to bind
    pub host: String,

    /// Port to bind
    pub port: u16,

    /// Labeled CSV file to train on at startup
    pub data_path: PathBuf,

    /// A saved pipeline to load instead of training at startup
    pub artifact_dir: Option<PathBuf>,

    /// Training settings used when training at startup
    #[serde(default = "default_training")]
    pub training: text_classification::Config,
}

fn default_training() -> text_classification::Config {
    text_classification::Config::new()
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            data_path: PathBuf::from(spam_or_ham::DEFAULT_PATH),
            artifact_dir: None,
            training: default_training(),
        }
    }
}

impl ServeConfig {
    /// The `host:port` address to listen on
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Config Error
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// The file could not be read
    #[error("unable to read config file {path}: {source}")]
    Io {
        /// The config file path
        path: PathBuf,
        /// The underlying error
        source: std::io::Error,
    },

    /// The file is not valid YAML for a [`ServeConfig`]
    #[error("unable to parse config file {path}: {source}")]
    Yaml {
        /// The config file path
        path: PathBuf,
        /// The underlying error
        source: serde_yaml::Error,
    },
}

/// Load a [`ServeConfig`] from a YAML file. Missing keys take their default values.
pub fn load_config(path: &Path) -> Result<ServeConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Yaml {
        path: path.to_path_buf(),
        source,
    })
}
