//! Core data model: disk descriptors, provider wire bodies, and zonal
//! operations.
//!
//! Wire types are [`Serialize`]/[`Deserialize`] with camelCase field names so
//! they map one-to-one onto the Compute Engine v1 JSON representation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Description stamped on every disk this plugin provisions, so provider-side
/// tooling can tell plugin-managed disks from hand-made ones.
pub const DISK_DESCRIPTION: &str = "libgcp generated disk";

// ---------------------------------------------------------------------------
// Disk identity
// ---------------------------------------------------------------------------

/// Name of a persistent disk, unique within a provider project+zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct DiskName(pub String);

impl DiskName {
    /// Borrow the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DiskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DiskName {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DiskName {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

/// Body of a disk insert request.
///
/// `source_image` and `size_gb` are omitted from the serialized body when
/// unset, so a minimal descriptor produces a body containing only
/// `description` and `name`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiskInsertBody {
    /// Free-form description recorded on the provider resource.
    pub description: String,
    /// Disk name, unique within the project+zone.
    pub name: String,
    /// Image to initialize the disk from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_image: Option<String>,
    /// Requested size in gigabytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size_gb: Option<u64>,
}

/// Access mode of a disk attached to an instance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DiskMode {
    /// Exclusive read-write attachment.
    #[serde(rename = "READ_WRITE")]
    ReadWrite,
    /// Shared read-only attachment.
    #[serde(rename = "READ_ONLY")]
    ReadOnly,
}

/// Attachment parameters for wiring a disk into an instance's `disks` list
/// at creation time. This is the shape persisted into runtime properties
/// under [`crate::context::keys::DISK`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AttachedDisk {
    /// Device name the disk is exposed under inside the instance.
    pub device_name: String,
    /// Whether the instance boots from this disk.
    pub boot: bool,
    /// Attachment access mode.
    pub mode: DiskMode,
    /// Whether the disk is deleted together with the instance.
    pub auto_delete: bool,
    /// Full self-link URL of the disk resource.
    pub source: String,
}

// ---------------------------------------------------------------------------
// Provider representations
// ---------------------------------------------------------------------------

/// Provider representation of a disk, as returned by a get request.
///
/// Only the fields the plugin consumes are modeled; everything else in the
/// provider's JSON is ignored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DiskInfo {
    /// Disk name.
    pub name: String,
    /// Full self-link URL of the disk resource.
    pub self_link: String,
    /// Lifecycle status (`CREATING`, `READY`, `DELETING`, ...).
    #[serde(default)]
    pub status: Option<String>,
    /// Size in gigabytes. The wire format is a decimal string.
    #[serde(default)]
    pub size_gb: Option<String>,
}

/// Status of a zonal operation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum OperationStatus {
    /// Queued, not yet started.
    Pending,
    /// In progress.
    Running,
    /// Finished, possibly with errors.
    Done,
}

/// One error entry inside a failed operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationErrorDetail {
    /// Provider error code, e.g. `RESOURCE_NOT_FOUND`.
    #[serde(default)]
    pub code: Option<String>,
    /// Human-readable message.
    #[serde(default)]
    pub message: Option<String>,
}

/// Error block of a failed operation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OperationError {
    /// Individual error entries.
    #[serde(default)]
    pub errors: Vec<OperationErrorDetail>,
}

/// A zonal operation resource, returned by insert and delete requests.
///
/// The plugin never waits on these during lifecycle calls; completion
/// tracking is left to the provider. Callers that do need completion can
/// poll via [`crate::compute::wait_for_zone_operation`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Operation name, used for status polling.
    pub name: String,
    /// Current status.
    pub status: OperationStatus,
    /// Error block, present only when the operation failed.
    #[serde(default)]
    pub error: Option<OperationError>,
    /// Self-link of the resource the operation acts on.
    #[serde(default)]
    pub target_link: Option<String>,
}

impl Operation {
    /// Collapse the operation's error entries into a single message, or
    /// `None` when the operation carries no error block.
    pub fn error_message(&self) -> Option<String> {
        let error = self.error.as_ref()?;
        let joined = error
            .errors
            .iter()
            .map(|e| {
                let code = e.code.as_deref().unwrap_or("UNKNOWN");
                match &e.message {
                    Some(msg) => format!("{code}: {msg}"),
                    None => code.to_owned(),
                }
            })
            .collect::<Vec<_>>()
            .join("; ");
        Some(joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disk_name_display() {
        let name = DiskName("disk-abc".into());
        assert_eq!(name.to_string(), "disk-abc");
        assert_eq!(name.as_str(), "disk-abc");
    }

    #[test]
    fn minimal_insert_body_has_only_description_and_name() {
        let body = DiskInsertBody {
            description: DISK_DESCRIPTION.to_owned(),
            name: "disk-1".into(),
            source_image: None,
            size_gb: None,
        };
        let value = serde_json::to_value(&body).expect("serialize");
        let obj = value.as_object().expect("object");
        assert_eq!(obj.len(), 2);
        assert!(obj.contains_key("description"));
        assert_eq!(obj["name"], "disk-1");
    }

    #[test]
    fn full_insert_body_carries_optional_fields() {
        let body = DiskInsertBody {
            description: DISK_DESCRIPTION.to_owned(),
            name: "disk-1".into(),
            source_image: Some("projects/debian-cloud/global/images/family/debian-12".into()),
            size_gb: Some(100),
        };
        let value = serde_json::to_value(&body).expect("serialize");
        assert_eq!(
            value["sourceImage"],
            "projects/debian-cloud/global/images/family/debian-12"
        );
        assert_eq!(value["sizeGb"], 100);
    }

    #[test]
    fn attached_disk_wire_format() {
        let attached = AttachedDisk {
            device_name: "data".into(),
            boot: false,
            mode: DiskMode::ReadWrite,
            auto_delete: false,
            source: "https://example/selfLink".into(),
        };
        let value = serde_json::to_value(&attached).expect("serialize");
        assert_eq!(value["deviceName"], "data");
        assert_eq!(value["mode"], "READ_WRITE");
        assert_eq!(value["boot"], false);
        assert_eq!(value["autoDelete"], false);
    }

    #[test]
    fn disk_info_ignores_unknown_fields() {
        let json = r#"{
            "name": "disk-1",
            "selfLink": "https://example/disk-1",
            "status": "READY",
            "sizeGb": "100",
            "kind": "compute#disk",
            "zone": "us-east1-b"
        }"#;
        let info: DiskInfo = serde_json::from_str(json).expect("deserialize");
        assert_eq!(info.self_link, "https://example/disk-1");
        assert_eq!(info.size_gb.as_deref(), Some("100"));
    }

    #[test]
    fn operation_error_message_joins_entries() {
        let json = r#"{
            "name": "operation-17",
            "status": "DONE",
            "error": {
                "errors": [
                    {"code": "RESOURCE_NOT_FOUND", "message": "disk gone"},
                    {"code": "QUOTA_EXCEEDED"}
                ]
            }
        }"#;
        let op: Operation = serde_json::from_str(json).expect("deserialize");
        assert_eq!(op.status, OperationStatus::Done);
        assert_eq!(
            op.error_message().as_deref(),
            Some("RESOURCE_NOT_FOUND: disk gone; QUOTA_EXCEEDED")
        );
    }

    #[test]
    fn operation_without_error_block() {
        let json = r#"{"name": "operation-18", "status": "RUNNING"}"#;
        let op: Operation = serde_json::from_str(json).expect("deserialize");
        assert_eq!(op.status, OperationStatus::Running);
        assert!(op.error_message().is_none());
    }
}
