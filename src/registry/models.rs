// ABOUTME: Wire types for the Artifact Registry v1 REST API.
// ABOUTME: Docker image listings, long-running operations, and error envelopes.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::ops::Operation;
use crate::types::ImageRecord;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListDockerImagesResponse {
    #[serde(default)]
    pub docker_images: Vec<DockerImage>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DockerImage {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub upload_time: DateTime<Utc>,
}

impl From<DockerImage> for ImageRecord {
    fn from(image: DockerImage) -> Self {
        ImageRecord::new(image.name, image.tags, image.upload_time)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct OperationResource {
    pub name: String,
    #[serde(default)]
    pub done: bool,
    #[serde(default)]
    pub error: Option<Status>,
}

impl From<OperationResource> for Operation {
    fn from(op: OperationResource) -> Self {
        Operation {
            name: op.name,
            done: op.done,
            error: op.error.map(|status| status.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Status {
    #[serde(default)]
    pub code: i32,
    #[serde(default)]
    pub message: String,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorEnvelope {
    pub error: Status,
}

#[derive(Debug, Deserialize)]
pub(crate) struct MetadataToken {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: u64,
}
