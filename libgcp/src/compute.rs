//! Provider service trait.
//!
//! [`ComputeService`] is the seam between the lifecycle operations and the
//! provider's disk endpoints. The shipped implementation is the REST backend
//! in [`crate::backend::rest`]; tests substitute in-memory fakes.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::GcpError;
use crate::types::{DiskInfo, DiskInsertBody, DiskName, Operation, OperationStatus};

/// Disk endpoints of the provider's resource-management API, scoped to one
/// project+zone.
#[async_trait]
pub trait ComputeService: Send + Sync {
    /// Fetch the provider representation of a disk.
    async fn get_disk(&self, name: &DiskName) -> Result<DiskInfo, GcpError>;

    /// Issue an insert request. Returns the zonal operation tracking the
    /// provisioning; the call does not wait for completion.
    async fn insert_disk(&self, body: &DiskInsertBody) -> Result<Operation, GcpError>;

    /// Issue a delete request by name. Returns the zonal operation; the call
    /// does not wait for completion.
    async fn delete_disk(&self, name: &DiskName) -> Result<Operation, GcpError>;

    /// Fetch the current state of a zonal operation.
    async fn get_zone_operation(&self, name: &str) -> Result<Operation, GcpError>;
}

/// Poll a zonal operation until it reaches `DONE`.
///
/// Lifecycle operations never call this — completion tracking is delegated
/// to the provider. It exists for callers that need a disk to be usable
/// before proceeding (e.g. attaching it to an instance they are about to
/// boot).
///
/// A `DONE` operation that carries an error block is surfaced as
/// [`GcpError::OperationFailed`].
pub async fn wait_for_zone_operation<C: ComputeService + ?Sized>(
    compute: &C,
    name: &str,
    poll_interval: Duration,
) -> Result<Operation, GcpError> {
    debug!(operation = name, "waiting for zone operation");
    loop {
        let op = compute.get_zone_operation(name).await?;
        if op.status == OperationStatus::Done {
            if let Some(message) = op.error_message() {
                return Err(GcpError::OperationFailed {
                    name: op.name,
                    message,
                });
            }
            info!(operation = name, "zone operation finished");
            return Ok(op);
        }
        tokio::time::sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::types::{OperationError, OperationErrorDetail};

    /// Fake that serves a scripted sequence of operation states.
    struct ScriptedOperations {
        states: Mutex<Vec<Operation>>,
    }

    impl ScriptedOperations {
        fn new(mut states: Vec<Operation>) -> Self {
            states.reverse();
            Self {
                states: Mutex::new(states),
            }
        }
    }

    #[async_trait]
    impl ComputeService for ScriptedOperations {
        async fn get_disk(&self, name: &DiskName) -> Result<DiskInfo, GcpError> {
            Err(GcpError::DiskNotFound(name.to_string()))
        }

        async fn insert_disk(&self, _body: &DiskInsertBody) -> Result<Operation, GcpError> {
            unimplemented!("not used by these tests")
        }

        async fn delete_disk(&self, _name: &DiskName) -> Result<Operation, GcpError> {
            unimplemented!("not used by these tests")
        }

        async fn get_zone_operation(&self, _name: &str) -> Result<Operation, GcpError> {
            Ok(self.states.lock().unwrap().pop().expect("state available"))
        }
    }

    fn op(status: OperationStatus, error: Option<OperationError>) -> Operation {
        Operation {
            name: "operation-1".into(),
            status,
            error,
            target_link: None,
        }
    }

    #[tokio::test]
    async fn waits_until_done() {
        let compute = ScriptedOperations::new(vec![
            op(OperationStatus::Pending, None),
            op(OperationStatus::Running, None),
            op(OperationStatus::Done, None),
        ]);

        let done = wait_for_zone_operation(&compute, "operation-1", Duration::from_millis(1))
            .await
            .unwrap();
        assert_eq!(done.status, OperationStatus::Done);
    }

    #[tokio::test]
    async fn done_with_error_fails() {
        let compute = ScriptedOperations::new(vec![op(
            OperationStatus::Done,
            Some(OperationError {
                errors: vec![OperationErrorDetail {
                    code: Some("QUOTA_EXCEEDED".into()),
                    message: Some("out of SSD quota".into()),
                }],
            }),
        )]);

        let result =
            wait_for_zone_operation(&compute, "operation-1", Duration::from_millis(1)).await;
        match result {
            Err(GcpError::OperationFailed { message, .. }) => {
                assert!(message.contains("QUOTA_EXCEEDED"));
            }
            other => panic!("expected OperationFailed, got {other:?}"),
        }
    }
}
