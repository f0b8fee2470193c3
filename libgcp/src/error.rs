//! Plugin error types.
//!
//! All errors in the `libgcp` crate are represented by the [`GcpError`] enum,
//! which derives [`thiserror::Error`] for ergonomic error handling and also
//! implements [`Serialize`]/[`Deserialize`] so errors can be recorded into
//! the engine's instance state or shipped across process boundaries.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unified error type for disk lifecycle operations.
#[derive(Debug, Error, Serialize, Deserialize, Clone)]
pub enum GcpError {
    /// The requested disk does not exist in the configured project+zone.
    #[error("disk {0} not found")]
    DiskNotFound(String),

    /// The provider rejected a request. Carries the HTTP status code and the
    /// message extracted from the provider's error body.
    #[error("provider API error {code}: {message}")]
    Api {
        /// HTTP status code returned by the provider.
        code: u16,
        /// Message from the provider's error body, or the status text.
        message: String,
    },

    /// A connection-level or protocol-level failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// Credentials could not be obtained.
    #[error("authentication error: {0}")]
    Auth(String),

    /// Configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),

    /// A required property is absent from node properties or the runtime
    /// property bag.
    #[error("missing property {0}")]
    MissingProperty(String),

    /// A provider-side operation completed with an error status.
    #[error("operation {name} failed: {message}")]
    OperationFailed {
        /// Name of the zonal operation.
        name: String,
        /// Aggregated error messages reported by the operation.
        message: String,
    },

    /// An unclassified internal error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GcpError {
    /// Create a [`GcpError::Transport`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn transport<E: std::fmt::Display>(e: E) -> Self {
        Self::Transport(e.to_string())
    }

    /// Create a [`GcpError::Config`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn config<E: std::fmt::Display>(e: E) -> Self {
        Self::Config(e.to_string())
    }

    /// Create a [`GcpError::Internal`] from anything that implements
    /// [`std::fmt::Display`].
    pub fn internal<E: std::fmt::Display>(e: E) -> Self {
        Self::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = GcpError::DiskNotFound("disk-123".into());
        assert_eq!(err.to_string(), "disk disk-123 not found");

        let err = GcpError::Api {
            code: 403,
            message: "quota exceeded".into(),
        };
        assert_eq!(err.to_string(), "provider API error 403: quota exceeded");
    }

    #[test]
    fn error_serde_roundtrip() {
        let err = GcpError::OperationFailed {
            name: "operation-17".into(),
            message: "RESOURCE_NOT_FOUND".into(),
        };
        let json = serde_json::to_string(&err).expect("serialize");
        let de: GcpError = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(err.to_string(), de.to_string());
    }
}
