//! Engine-owned operation context.
//!
//! The orchestration engine invokes lifecycle operations with a node
//! instance context: the instance id, the node's declared properties, and a
//! mutable string-keyed property bag ([`RuntimeProperties`]) that outlives
//! the call. Everything here is serde-friendly so the engine can hydrate
//! contexts from blueprint YAML and persist the bag in its instance store.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::GcpConfig;
use crate::error::GcpError;

/// Keys under which disk state is persisted into runtime properties.
pub mod keys {
    /// Name of the provisioned disk.
    pub const NAME: &str = "gcp_name";
    /// Attachment parameters for wiring the disk into an instance.
    pub const DISK: &str = "gcp_disk";
}

// ---------------------------------------------------------------------------
// Runtime properties
// ---------------------------------------------------------------------------

/// Mutable string-keyed property bag owned by the engine's instance store.
///
/// Values are arbitrary JSON; typed access goes through [`get`](Self::get)
/// and [`set`](Self::set).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RuntimeProperties(serde_json::Map<String, Value>);

impl RuntimeProperties {
    /// An empty bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Deserialize the value stored under `key`. Returns `None` when the key
    /// is absent or the stored value does not match `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.0.get(key)?;
        serde_json::from_value(value.clone()).ok()
    }

    /// Serialize `value` and store it under `key`, replacing any previous
    /// entry.
    pub fn set<T: Serialize>(&mut self, key: &str, value: &T) -> Result<(), GcpError> {
        let value = serde_json::to_value(value).map_err(GcpError::internal)?;
        self.0.insert(key.to_owned(), value);
        Ok(())
    }

    /// Remove and return the value stored under `key`.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Whether the bag holds no entries.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Node context
// ---------------------------------------------------------------------------

/// Declared (blueprint-side) properties of a disk node.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct NodeProperties {
    /// When `true`, the disk pre-exists and the plugin neither creates nor
    /// deletes it.
    #[serde(default)]
    pub use_external_resource: bool,
    /// Name of the pre-existing disk. Required when
    /// `use_external_resource` is set.
    #[serde(default)]
    pub resource_id: Option<String>,
    /// Provider connection scope declared on the node.
    #[serde(default)]
    pub gcp_config: Option<GcpConfig>,
}

/// Execution context for one node instance.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NodeContext {
    /// Engine-assigned instance id, e.g. `boot_disk_k3sy7t`.
    pub instance_id: String,
    /// Declared node properties.
    #[serde(default)]
    pub properties: NodeProperties,
    /// Mutable instance state, persisted by the engine between operations.
    #[serde(default)]
    pub runtime: RuntimeProperties,
}

impl NodeContext {
    /// Context for `instance_id` with default properties and an empty bag.
    pub fn new(instance_id: impl Into<String>) -> Self {
        Self {
            instance_id: instance_id.into(),
            properties: NodeProperties::default(),
            runtime: RuntimeProperties::new(),
        }
    }

    /// Resolve the provider configuration for this node: the one declared in
    /// node properties when present, the process environment otherwise.
    pub fn gcp_config(&self) -> Result<GcpConfig, GcpError> {
        match &self.properties.gcp_config {
            Some(config) => Ok(config.clone()),
            None => GcpConfig::from_env(),
        }
    }
}

/// Execution context for a relationship operation between two node
/// instances. For boot-disk attachment the source is the instance node and
/// the target is the disk node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RelationshipContext {
    /// The node the relationship originates from.
    pub source: NodeContext,
    /// The node the relationship points at.
    pub target: NodeContext,
}
