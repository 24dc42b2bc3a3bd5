// ABOUTME: Registry operations trait: list image versions, delete tags and versions.
// ABOUTME: Version deletion returns a long-running operation handle to wait on.

use super::sealed::Sealed;
use crate::types::{ImageRecord, RepositoryPath, TagTarget, VersionTarget};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Lazy, finite sequence of image records. An `Err` item ends the listing.
pub type InventoryStream<'a> = BoxStream<'a, Result<ImageRecord, RegistryError>>;

/// Operations the sweep needs from a registry.
#[async_trait]
pub trait RegistryOps: Sealed + Send + Sync {
    /// List every image version in the repository, newest first.
    fn list_images<'a>(&'a self, repository: &'a RepositoryPath) -> InventoryStream<'a>;

    /// Confirm the client can issue authenticated calls.
    async fn check_ready(&self) -> Result<(), RegistryError>;

    /// Delete a tag. Completes synchronously.
    async fn delete_tag(&self, target: &TagTarget) -> Result<(), RegistryError>;

    /// Submit a version deletion, returning the long-running operation.
    async fn delete_version(&self, target: &VersionTarget) -> Result<Operation, RegistryError>;

    /// Wait until a long-running operation reaches a terminal state.
    async fn wait_operation(&self, operation: &Operation) -> Result<(), RegistryError>;
}

/// Handle to a long-running registry operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operation {
    /// Operation resource name, e.g. `projects/p/locations/l/operations/123`.
    pub name: String,
    /// Whether the registry already reported the operation as finished.
    pub done: bool,
    /// Failure message when the operation finished unsuccessfully.
    pub error: Option<String>,
}

impl Operation {
    pub fn pending(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            done: false,
            error: None,
        }
    }
}

/// Errors from registry calls.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("registry returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to obtain access token: {0}")]
    Auth(String),

    #[error("unexpected registry response: {0}")]
    InvalidResponse(String),

    #[error("operation {name} failed: {message}")]
    OperationFailed { name: String, message: String },

    #[error("operation {name} did not complete within {seconds} seconds")]
    OperationTimeout { name: String, seconds: u64 },

    #[error("registry unavailable: {0}")]
    Unavailable(String),
}
