//! Credential seam.
//!
//! Token minting and refresh are owned by the deployment's credential helper,
//! not by this crate. [`TokenProvider`] is the boundary: every provider call
//! asks it for a bearer token and sends whatever comes back. The two
//! implementations here cover the common deployment shapes — a fixed token
//! handed in at startup, and a token file rotated in place by an external
//! refresher.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::error::GcpError;

/// Source of bearer tokens for provider calls.
#[async_trait]
pub trait TokenProvider: Send + Sync {
    /// Return a currently valid access token.
    async fn access_token(&self) -> Result<String, GcpError>;
}

/// A fixed token, useful for tests and short-lived invocations.
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// Wrap an already obtained token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String, GcpError> {
        Ok(self.token.clone())
    }
}

/// Reads the token from a file on every call.
///
/// The file is expected to be rewritten by an external refresher before the
/// previous token expires; re-reading per call picks up rotations without
/// any coordination.
pub struct FileTokenProvider {
    path: PathBuf,
}

impl FileTokenProvider {
    /// Use the token stored at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl TokenProvider for FileTokenProvider {
    async fn access_token(&self) -> Result<String, GcpError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| GcpError::Auth(format!("read {}: {e}", self.path.display())))?;
        let token = raw.trim();
        if token.is_empty() {
            return Err(GcpError::Auth(format!(
                "credential file {} is empty",
                self.path.display()
            )));
        }
        Ok(token.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[tokio::test]
    async fn static_token() {
        let provider = StaticTokenProvider::new("ya29.token");
        assert_eq!(provider.access_token().await.unwrap(), "ya29.token");
    }

    #[tokio::test]
    async fn file_token_trims_whitespace() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "ya29.rotated").unwrap();

        let provider = FileTokenProvider::new(file.path());
        assert_eq!(provider.access_token().await.unwrap(), "ya29.rotated");
    }

    #[tokio::test]
    async fn file_token_rereads_on_each_call() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "first").unwrap();
        file.flush().unwrap();

        let provider = FileTokenProvider::new(file.path());
        assert_eq!(provider.access_token().await.unwrap(), "first");

        // Rotate in place.
        std::fs::write(file.path(), "second").unwrap();
        assert_eq!(provider.access_token().await.unwrap(), "second");
    }

    #[tokio::test]
    async fn empty_file_is_auth_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let provider = FileTokenProvider::new(file.path());
        assert!(matches!(
            provider.access_token().await,
            Err(GcpError::Auth(_))
        ));
    }

    #[tokio::test]
    async fn missing_file_is_auth_error() {
        let provider = FileTokenProvider::new("/nonexistent/token");
        assert!(matches!(
            provider.access_token().await,
            Err(GcpError::Auth(_))
        ));
    }
}
