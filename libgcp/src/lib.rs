//! # libgcp — Compute Engine persistent-disk lifecycle plugin
//!
//! `libgcp` implements the disk lifecycle operations an orchestration engine
//! invokes on the nodes of a deployment: provisioning a persistent disk,
//! deprovisioning it, and promoting it to an instance's boot disk. It
//! translates those lifecycle events into REST calls against the Compute
//! Engine v1 API and persists the resulting identifiers into the engine's
//! instance state. It follows the usual conventions of its surroundings
//! (Tokio async runtime, `tracing` for observability, `thiserror` for
//! structured errors).
//!
//! ## Module overview
//!
//! | Module | Purpose |
//! |---|---|
//! | [`types`] | Core data model: `Disk` bodies, `AttachedDisk`, operations. |
//! | [`error`] | [`GcpError`] enum covering all failure modes. |
//! | [`config`] | [`GcpConfig`] project+zone scope and its loaders. |
//! | [`auth`] | [`TokenProvider`] credential seam. |
//! | [`compute`] | [`ComputeService`] trait — the provider's disk endpoints. |
//! | [`backend`] | REST implementation of the service trait. |
//! | [`disk`] | [`Disk`] resource: body building, get/create/delete, attachment. |
//! | [`context`] | Engine-owned contexts and the runtime property bag. |
//! | [`lifecycle`] | Lifecycle entry points: create, delete, add_boot_disk. |
//! | [`retry`] | Generic fixed-delay retry helper. |
//! | [`naming`] | Instance-id to resource-name sanitizer. |

pub mod auth;
pub mod backend;
pub mod compute;
pub mod config;
pub mod context;
pub mod disk;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod retry;
pub mod types;

// Re-export the most commonly used items at crate root for convenience.
pub use auth::TokenProvider;
pub use backend::rest::RestCompute;
pub use compute::ComputeService;
pub use config::GcpConfig;
pub use context::{NodeContext, RelationshipContext, RuntimeProperties};
pub use disk::Disk;
pub use error::GcpError;
pub use types::*;
