//! Provider connection configuration.
//!
//! [`GcpConfig`] scopes every provider call to a project and zone. It can be
//! loaded from a YAML file, from the environment, or arrive pre-parsed inside
//! node properties (see [`crate::context::NodeProperties`]).
//!
//! Environment variables:
//! - `GCP_PROJECT`: provider project id. Required when loading from env.
//! - `GCP_ZONE`: zone the disks live in. Required when loading from env.
//! - `GCP_AUTH_FILE`: path to the externally rotated credential file.
//! - `GCP_NETWORK`: network name, consumed by instance-facing modules.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::GcpError;

/// Connection scope for provider calls.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GcpConfig {
    /// Provider project id.
    pub project: String,
    /// Zone the managed disks live in, e.g. `us-east1-b`.
    pub zone: String,
    /// Path to the credential file consumed by the token provider.
    #[serde(default)]
    pub auth: Option<PathBuf>,
    /// Network name. Not used by disk operations; carried for modules that
    /// attach instances to networks.
    #[serde(default)]
    pub network: Option<String>,
}

impl GcpConfig {
    /// Parse a YAML configuration file.
    pub fn from_yaml_file(path: &Path) -> Result<Self, GcpError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| GcpError::Config(format!("read {}: {e}", path.display())))?;
        serde_yaml::from_str(&raw)
            .map_err(|e| GcpError::Config(format!("parse {}: {e}", path.display())))
    }

    /// Build a configuration from process environment variables.
    pub fn from_env() -> Result<Self, GcpError> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// `from_env` delegates here; tests supply a map-backed lookup instead of
    /// mutating the process environment.
    pub fn from_env_with(get: impl Fn(&str) -> Option<String>) -> Result<Self, GcpError> {
        let require = |key: &str| {
            get(key).ok_or_else(|| GcpError::Config(format!("environment variable {key} not set")))
        };
        Ok(Self {
            project: require("GCP_PROJECT")?,
            zone: require("GCP_ZONE")?,
            auth: get("GCP_AUTH_FILE").map(PathBuf::from),
            network: get("GCP_NETWORK"),
        })
    }

    /// Load from a YAML file when a path is given, from the environment
    /// otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, GcpError> {
        match path {
            Some(p) => Self::from_yaml_file(p),
            None => Self::from_env(),
        }
    }
}
