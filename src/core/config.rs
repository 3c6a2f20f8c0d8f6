//! Seeder configuration
//!
//! TOML-backed configuration for the reconciliation daemon. Every field has
//! a serde default except the two retention-policy knobs the deployment must
//! decide for itself: the retention window (collection is disabled until one
//! is configured) and whether record removal waits on a successful stop
//! request to the engine.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration for the seeding reconciliation daemon
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeederConfig {
    /// Directory scanned for descriptor files
    #[serde(default = "default_watch_dir")]
    pub watch_dir: PathBuf,

    /// Filename suffix identifying descriptor files
    #[serde(default = "default_descriptor_suffix")]
    pub descriptor_suffix: String,

    /// Authority lookup command: program followed by its arguments
    #[serde(default)]
    pub authority_command: Vec<String>,

    /// Seconds between reconciliation cycles
    #[serde(default = "default_poll_interval")]
    pub poll_interval: u64,

    /// Inclusive listen port range handed to the engine
    #[serde(default = "default_port_min")]
    pub listen_port_min: u16,
    #[serde(default = "default_port_max")]
    pub listen_port_max: u16,

    /// Address the engine binds its listening socket to
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Agent name the engine identity token is derived from
    #[serde(default = "default_agent_name")]
    pub agent_name: String,

    /// Engine transfer options
    #[serde(default = "default_true")]
    pub nat_traversal: bool,
    #[serde(default = "default_true")]
    pub local_discovery: bool,
    #[serde(default = "default_true")]
    pub port_mapping: bool,

    /// Seconds a record may stay unregistered before it is collected.
    /// Unset disables garbage collection entirely.
    #[serde(default)]
    pub retention_window: Option<u64>,

    /// When set, a record is only removed after the engine accepted the
    /// stop-seeding request; a failed stop keeps the record for retry.
    #[serde(default)]
    pub stop_ack_required: bool,
}

fn default_watch_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_descriptor_suffix() -> String {
    ".torrent".to_string()
}

fn default_poll_interval() -> u64 {
    30
}

fn default_port_min() -> u16 {
    6881
}

fn default_port_max() -> u16 {
    6891
}

fn default_listen_address() -> String {
    "0.0.0.0".to_string()
}

fn default_agent_name() -> String {
    "seedkeeper".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SeederConfig {
    fn default() -> Self {
        Self {
            watch_dir: default_watch_dir(),
            descriptor_suffix: default_descriptor_suffix(),
            authority_command: Vec::new(),
            poll_interval: default_poll_interval(),
            listen_port_min: default_port_min(),
            listen_port_max: default_port_max(),
            listen_address: default_listen_address(),
            agent_name: default_agent_name(),
            nat_traversal: true,
            local_discovery: true,
            port_mapping: true,
            retention_window: None,
            stop_ack_required: false,
        }
    }
}

impl SeederConfig {
    /// Load and validate a configuration from a TOML file
    pub fn from_toml_path(path: &Path) -> ConfigResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field combinations that serde cannot express
    pub fn validate(&self) -> ConfigResult<()> {
        if self.authority_command.is_empty() {
            return Err(ConfigError::Invalid {
                message: "authority_command must name a program to run".to_string(),
            });
        }
        if self.descriptor_suffix.is_empty() {
            return Err(ConfigError::Invalid {
                message: "descriptor_suffix must not be empty".to_string(),
            });
        }
        if self.listen_port_min > self.listen_port_max {
            return Err(ConfigError::Invalid {
                message: format!(
                    "listen_port_min {} exceeds listen_port_max {}",
                    self.listen_port_min, self.listen_port_max
                ),
            });
        }
        Ok(())
    }

    /// Interval between scheduled reconciliation cycles
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval)
    }

    /// Retention window for garbage collection, if configured
    pub fn retention_window(&self) -> Option<Duration> {
        self.retention_window.map(Duration::from_secs)
    }
}
