//! Orchestrator-facing lifecycle operations.
//!
//! These are the entry points the engine invokes at defined lifecycle
//! points of a disk node:
//!
//! 1. **create** — provision the disk and record its name and attachment
//!    parameters in runtime properties.
//! 2. **delete** — deprovision and clear the recorded state.
//! 3. **add_boot_disk** — relationship operation that promotes the recorded
//!    attachment to a boot disk on the instance side.
//!
//! Every operation runs to completion within a single engine invocation;
//! the only durable state is what is written into the context's runtime
//! property bag.

use std::time::Duration;

use tracing::{debug, info, instrument};

use crate::compute::ComputeService;
use crate::context::{NodeContext, RelationshipContext, keys};
use crate::disk::Disk;
use crate::error::GcpError;
use crate::naming::gcp_resource_name;
use crate::retry::retry_on_failure;
use crate::types::{AttachedDisk, DiskName};

/// Attempts made when the provider delete call fails.
const DELETE_RETRY_ATTEMPTS: u32 = 3;
/// Pause between delete attempts.
const DELETE_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Parameters the engine passes to the create operation.
#[derive(Debug, Clone, Default)]
pub struct CreateDiskParams {
    /// Requested disk name. Falls back to a name derived from the instance
    /// id when empty.
    pub name: Option<String>,
    /// Image to initialize the disk from.
    pub image: Option<String>,
    /// Requested size in gigabytes.
    pub size_gb: Option<u64>,
}

/// Create the disk for this node instance and record its name and
/// attachment parameters under [`keys::NAME`] and [`keys::DISK`].
///
/// When the node declares `use_external_resource`, no insert is issued; the
/// named disk is fetched instead, so a missing external disk fails the
/// operation here rather than at attach time.
#[instrument(skip(compute, ctx, params), fields(instance_id = %ctx.instance_id))]
pub async fn create<C: ComputeService + ?Sized>(
    compute: &C,
    ctx: &mut NodeContext,
    params: CreateDiskParams,
) -> Result<(), GcpError> {
    let name = resolve_disk_name(ctx, params.name.as_deref())?;

    let mut disk = Disk::new(name.clone());
    if let Some(image) = params.image {
        disk = disk.with_image(image);
    }
    if let Some(size_gb) = params.size_gb {
        disk = disk.with_size_gb(size_gb);
    }

    if ctx.properties.use_external_resource {
        debug!(%name, "using externally managed disk");
        disk.get(compute).await?;
    } else {
        disk.create(compute).await?;
        info!(%name, "disk create requested");
    }

    let attachment = disk.attachment_body(compute, name.as_str()).await?;
    ctx.runtime.set(keys::NAME, &name)?;
    ctx.runtime.set(keys::DISK, &attachment)?;
    Ok(())
}

/// Resolve which disk name this node instance uses.
///
/// Externally managed nodes must declare `resource_id`; otherwise the
/// engine-supplied name wins, and an absent name falls back to a sanitized
/// form of the instance id.
fn resolve_disk_name(ctx: &NodeContext, requested: Option<&str>) -> Result<DiskName, GcpError> {
    if ctx.properties.use_external_resource {
        return ctx
            .properties
            .resource_id
            .as_deref()
            .map(DiskName::from)
            .ok_or_else(|| GcpError::MissingProperty("resource_id".into()));
    }
    match requested {
        Some(name) if !name.is_empty() => Ok(DiskName::from(name)),
        _ => Ok(DiskName(gcp_resource_name(&ctx.instance_id))),
    }
}

/// Delete the disk recorded for this node instance and clear
/// [`keys::NAME`] and [`keys::DISK`] from runtime properties.
///
/// Idempotent: when no disk name is recorded there is nothing to do.
/// Externally managed disks are never deleted; their recorded state is
/// still cleared. The provider call is retried on failure.
#[instrument(skip(compute, ctx), fields(instance_id = %ctx.instance_id))]
pub async fn delete<C: ComputeService + ?Sized>(
    compute: &C,
    ctx: &mut NodeContext,
) -> Result<(), GcpError> {
    let Some(name) = ctx.runtime.get::<String>(keys::NAME) else {
        debug!("no disk recorded, nothing to delete");
        return Ok(());
    };

    if ctx.properties.use_external_resource {
        debug!(%name, "externally managed disk, skipping provider delete");
    } else {
        let disk = Disk::new(DiskName::from(name.as_str()));
        retry_on_failure(
            "deleting disk",
            DELETE_RETRY_ATTEMPTS,
            DELETE_RETRY_DELAY,
            || disk.delete(compute),
        )
        .await?;
        info!(%name, "disk delete requested");
    }

    ctx.runtime.remove(keys::DISK);
    ctx.runtime.remove(keys::NAME);
    Ok(())
}

/// Promote the disk recorded on the relationship target to the boot disk of
/// the relationship source.
///
/// Copies the attachment parameters out of the target's property bag, flips
/// `boot` to `true`, and stores the copy under [`keys::DISK`] in the
/// source's bag, where the instance-creation operation picks it up. No
/// provider call is made.
#[instrument(skip(rel), fields(source = %rel.source.instance_id, target = %rel.target.instance_id))]
pub fn add_boot_disk(rel: &mut RelationshipContext) -> Result<(), GcpError> {
    let mut attachment: AttachedDisk = rel
        .target
        .runtime
        .get(keys::DISK)
        .ok_or_else(|| GcpError::MissingProperty(keys::DISK.into()))?;
    attachment.boot = true;
    rel.source.runtime.set(keys::DISK, &attachment)?;
    info!(device = %attachment.device_name, "boot disk recorded on instance node");
    Ok(())
}
