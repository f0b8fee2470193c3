//! The persistent-disk resource.
//!
//! [`Disk`] is the local-side view of a remote disk: a name plus the optional
//! source image and size used when provisioning. It is constructed at the
//! start of each lifecycle call and discarded at the end; the only durable
//! state is what the lifecycle operations write into runtime properties.

use tracing::{debug, instrument};

use crate::compute::ComputeService;
use crate::error::GcpError;
use crate::types::{
    AttachedDisk, DISK_DESCRIPTION, DiskInfo, DiskInsertBody, DiskMode, DiskName, Operation,
};

/// Local descriptor of a remote persistent disk.
#[derive(Debug, Clone, PartialEq)]
pub struct Disk {
    name: DiskName,
    image: Option<String>,
    size_gb: Option<u64>,
}

impl Disk {
    /// Descriptor for the disk called `name`, with no image or size.
    pub fn new(name: DiskName) -> Self {
        Self {
            name,
            image: None,
            size_gb: None,
        }
    }

    /// Set the image the disk is initialized from.
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Set the requested size in gigabytes.
    pub fn with_size_gb(mut self, size_gb: u64) -> Self {
        self.size_gb = Some(size_gb);
        self
    }

    /// The disk's name.
    pub fn name(&self) -> &DiskName {
        &self.name
    }

    /// Build the insert request body. Optional fields are included only when
    /// set on the descriptor.
    pub fn insert_body(&self) -> DiskInsertBody {
        DiskInsertBody {
            description: DISK_DESCRIPTION.to_owned(),
            name: self.name.to_string(),
            source_image: self.image.clone(),
            size_gb: self.size_gb,
        }
    }

    /// Fetch the provider representation of this disk.
    pub async fn get<C: ComputeService + ?Sized>(&self, compute: &C) -> Result<DiskInfo, GcpError> {
        compute.get_disk(&self.name).await
    }

    /// Issue the insert request. Does not wait for the provisioning to
    /// finish.
    #[instrument(skip(self, compute), fields(name = %self.name))]
    pub async fn create<C: ComputeService + ?Sized>(
        &self,
        compute: &C,
    ) -> Result<Operation, GcpError> {
        debug!(image = ?self.image, size_gb = ?self.size_gb, "creating disk");
        compute.insert_disk(&self.insert_body()).await
    }

    /// Issue the delete request. Does not wait for completion.
    #[instrument(skip(self, compute), fields(name = %self.name))]
    pub async fn delete<C: ComputeService + ?Sized>(
        &self,
        compute: &C,
    ) -> Result<Operation, GcpError> {
        compute.delete_disk(&self.name).await
    }

    /// Build the attachment parameters for wiring this disk into an
    /// instance's `disks` list: fetches the disk and copies its self-link
    /// into `source`. The result always has `boot: false` and
    /// `autoDelete: false`; boot promotion happens later, when the
    /// relationship operation copies the parameters to the instance side.
    pub async fn attachment_body<C: ComputeService + ?Sized>(
        &self,
        compute: &C,
        device_name: &str,
    ) -> Result<AttachedDisk, GcpError> {
        let info = self.get(compute).await?;
        Ok(AttachedDisk {
            device_name: device_name.to_owned(),
            boot: false,
            mode: DiskMode::ReadWrite,
            auto_delete: false,
            source: info.self_link,
        })
    }
}
