//! REST implementation of the provider's disk endpoints.
//!
//! [`RestCompute`] issues plain HTTPS calls against the Compute Engine v1
//! API, scoped by the project and zone from [`GcpConfig`]. Authentication is
//! delegated to a [`TokenProvider`]; retries and completion tracking are the
//! caller's concern.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::auth::TokenProvider;
use crate::compute::ComputeService;
use crate::config::GcpConfig;
use crate::error::GcpError;
use crate::types::{DiskInfo, DiskInsertBody, DiskName, Operation};

/// Public endpoint of the Compute Engine v1 API.
pub const COMPUTE_V1: &str = "https://compute.googleapis.com/compute/v1";

/// Error body shape returned by the provider on failed requests.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: Option<String>,
}

/// REST-backed [`ComputeService`].
pub struct RestCompute {
    http: reqwest::Client,
    base_url: String,
    project: String,
    zone: String,
    token: Arc<dyn TokenProvider>,
}

impl RestCompute {
    /// Build a client scoped to the project+zone in `config`.
    pub fn new(config: &GcpConfig, token: Arc<dyn TokenProvider>) -> Result<Self, GcpError> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(60))
            .build()
            .map_err(GcpError::transport)?;
        Ok(Self {
            http,
            base_url: COMPUTE_V1.to_owned(),
            project: config.project.clone(),
            zone: config.zone.clone(),
            token,
        })
    }

    /// Override the API base URL. Tests point this at a local fake.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn disks_url(&self) -> String {
        format!(
            "{}/projects/{}/zones/{}/disks",
            self.base_url, self.project, self.zone
        )
    }

    fn disk_url(&self, name: &DiskName) -> String {
        format!("{}/{}", self.disks_url(), name)
    }

    fn operation_url(&self, name: &str) -> String {
        format!(
            "{}/projects/{}/zones/{}/operations/{}",
            self.base_url, self.project, self.zone, name
        )
    }

    async fn bearer(&self) -> Result<String, GcpError> {
        self.token.access_token().await
    }

    /// Deserialize a successful response, or translate the provider's error
    /// body into a [`GcpError::Api`].
    async fn check_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GcpError> {
        let status = response.status();
        if status.is_success() {
            return response.json::<T>().await.map_err(GcpError::transport);
        }

        // Failed requests carry `{"error": {"code": ..., "message": ...}}`.
        // Fall back to the raw body when that shape is absent.
        let raw = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&raw)
            .ok()
            .and_then(|body| body.error.message)
            .unwrap_or_else(|| {
                if raw.is_empty() {
                    status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_owned()
                } else {
                    raw
                }
            });
        Err(GcpError::Api {
            code: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl ComputeService for RestCompute {
    #[instrument(skip(self), fields(project = %self.project, zone = %self.zone))]
    async fn get_disk(&self, name: &DiskName) -> Result<DiskInfo, GcpError> {
        let response = self
            .http
            .get(self.disk_url(name))
            .bearer_auth(self.bearer().await?)
            .send()
            .await
            .map_err(GcpError::transport)?;

        match Self::check_response(response).await {
            Err(GcpError::Api { code: 404, .. }) => Err(GcpError::DiskNotFound(name.to_string())),
            other => other,
        }
    }

    #[instrument(skip(self, body), fields(name = %body.name, project = %self.project, zone = %self.zone))]
    async fn insert_disk(&self, body: &DiskInsertBody) -> Result<Operation, GcpError> {
        debug!("inserting disk");
        let response = self
            .http
            .post(self.disks_url())
            .query(&[("requestId", uuid::Uuid::new_v4().to_string())])
            .bearer_auth(self.bearer().await?)
            .json(body)
            .send()
            .await
            .map_err(GcpError::transport)?;
        Self::check_response(response).await
    }

    #[instrument(skip(self), fields(project = %self.project, zone = %self.zone))]
    async fn delete_disk(&self, name: &DiskName) -> Result<Operation, GcpError> {
        debug!("deleting disk");
        let response = self
            .http
            .delete(self.disk_url(name))
            .query(&[("requestId", uuid::Uuid::new_v4().to_string())])
            .bearer_auth(self.bearer().await?)
            .send()
            .await
            .map_err(GcpError::transport)?;
        Self::check_response(response).await
    }

    #[instrument(skip(self), fields(project = %self.project, zone = %self.zone))]
    async fn get_zone_operation(&self, name: &str) -> Result<Operation, GcpError> {
        let response = self
            .http
            .get(self.operation_url(name))
            .bearer_auth(self.bearer().await?)
            .send()
            .await
            .map_err(GcpError::transport)?;
        Self::check_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::StaticTokenProvider;

    fn client() -> RestCompute {
        let config = GcpConfig {
            project: "my-project".into(),
            zone: "us-east1-b".into(),
            auth: None,
            network: None,
        };
        RestCompute::new(&config, Arc::new(StaticTokenProvider::new("tok"))).unwrap()
    }

    #[test]
    fn url_layout() {
        let compute = client();
        assert_eq!(
            compute.disks_url(),
            "https://compute.googleapis.com/compute/v1/projects/my-project/zones/us-east1-b/disks"
        );
        assert_eq!(
            compute.disk_url(&DiskName::from("disk-1")),
            "https://compute.googleapis.com/compute/v1/projects/my-project/zones/us-east1-b/disks/disk-1"
        );
        assert_eq!(
            compute.operation_url("operation-9"),
            "https://compute.googleapis.com/compute/v1/projects/my-project/zones/us-east1-b/operations/operation-9"
        );
    }

    #[test]
    fn base_url_override() {
        let compute = client().with_base_url("http://127.0.0.1:9999");
        assert!(compute.disks_url().starts_with("http://127.0.0.1:9999/"));
    }
}
