// ABOUTME: Artifact Registry client over the v1 REST API.
// ABOUTME: Pages docker image listings lazily and polls long-running delete operations.

use async_trait::async_trait;
use futures::{StreamExt, TryStreamExt, stream};
use std::time::Duration;
use tracing::{debug, trace};

use super::auth::AccessToken;
use super::models::{ErrorEnvelope, ListDockerImagesResponse, OperationResource};
use super::ops::{InventoryStream, Operation, RegistryError, RegistryOps};
use super::sealed::Sealed;
use crate::types::{ImageRecord, RepositoryPath, TagTarget, VersionTarget};

pub const DEFAULT_ENDPOINT: &str = "https://artifactregistry.googleapis.com";

/// Listing order requested from the registry. Consumption order only affects logs.
const LIST_ORDER: &str = "build_time desc";

/// Tunables for the REST client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub page_size: u32,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub operation_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        ClientSettings {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            page_size: 500,
            request_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_secs(2),
            operation_timeout: Duration::from_secs(300),
        }
    }
}

/// Artifact Registry client authenticated with a bearer token.
#[derive(Debug)]
pub struct ArtifactRegistryClient {
    http: reqwest::Client,
    token: AccessToken,
    settings: ClientSettings,
}

impl Sealed for ArtifactRegistryClient {}

impl ArtifactRegistryClient {
    pub fn new(token: AccessToken, settings: ClientSettings) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .user_agent(concat!("arsweep/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            token,
            settings,
        })
    }

    fn url(&self, resource: &str) -> String {
        format!(
            "{}/v1/{}",
            self.settings.endpoint.trim_end_matches('/'),
            resource
        )
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, RegistryError> {
        let token = self.token.bearer(&self.http).await?;
        let response = request.bearer_auth(token).send().await?;
        check_status(response).await
    }

    async fn fetch_page(
        &self,
        repository: &RepositoryPath,
        page_token: Option<&str>,
    ) -> Result<ListDockerImagesResponse, RegistryError> {
        let mut url = format!(
            "{}/dockerImages?orderBy={}&pageSize={}",
            self.url(&repository.parent()),
            urlencoding::encode(LIST_ORDER),
            self.settings.page_size
        );
        if let Some(token) = page_token {
            url.push_str("&pageToken=");
            url.push_str(&urlencoding::encode(token));
        }

        trace!("GET {}", url);
        let response = self.send(self.http.get(&url)).await?;
        response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(format!("docker image page: {}", e)))
    }

    async fn get_operation(&self, name: &str) -> Result<Operation, RegistryError> {
        let response = self.send(self.http.get(self.url(name))).await?;
        let op: OperationResource = response
            .json()
            .await
            .map_err(|e| RegistryError::InvalidResponse(format!("operation {}: {}", name, e)))?;
        Ok(op.into())
    }
}

#[async_trait]
impl RegistryOps for ArtifactRegistryClient {
    fn list_images<'a>(&'a self, repository: &'a RepositoryPath) -> InventoryStream<'a> {
        enum Cursor {
            Start,
            Next(String),
            Exhausted,
        }

        stream::try_unfold(Cursor::Start, move |cursor| async move {
            let page_token = match cursor {
                Cursor::Exhausted => return Ok(None),
                Cursor::Start => None,
                Cursor::Next(token) => Some(token),
            };

            let page = self.fetch_page(repository, page_token.as_deref()).await?;
            debug!(
                "fetched {} docker images from {}",
                page.docker_images.len(),
                repository
            );

            let next = match page.next_page_token {
                Some(token) if !token.is_empty() => Cursor::Next(token),
                _ => Cursor::Exhausted,
            };
            Ok::<_, RegistryError>(Some((page.docker_images, next)))
        })
        .map_ok(|images| {
            stream::iter(
                images
                    .into_iter()
                    .map(|image| Ok::<_, RegistryError>(ImageRecord::from(image))),
            )
        })
        .try_flatten()
        .boxed()
    }

    async fn check_ready(&self) -> Result<(), RegistryError> {
        self.token.bearer(&self.http).await.map(|_| ())
    }

    async fn delete_tag(&self, target: &TagTarget) -> Result<(), RegistryError> {
        self.send(self.http.delete(self.url(target.as_str())))
            .await
            .map(|_| ())
    }

    async fn delete_version(&self, target: &VersionTarget) -> Result<Operation, RegistryError> {
        let response = self
            .send(self.http.delete(self.url(target.as_str())))
            .await?;
        let op: OperationResource = response.json().await.map_err(|e| {
            RegistryError::InvalidResponse(format!("delete operation for {}: {}", target, e))
        })?;
        Ok(op.into())
    }

    async fn wait_operation(&self, operation: &Operation) -> Result<(), RegistryError> {
        let poll = async {
            let mut current = operation.clone();
            loop {
                if current.done {
                    return match current.error {
                        Some(message) => Err(RegistryError::OperationFailed {
                            name: current.name,
                            message,
                        }),
                        None => Ok(()),
                    };
                }
                tokio::time::sleep(self.settings.poll_interval).await;
                current = self.get_operation(&current.name).await?;
            }
        };

        tokio::time::timeout(self.settings.operation_timeout, poll)
            .await
            .map_err(|_| RegistryError::OperationTimeout {
                name: operation.name.clone(),
                seconds: self.settings.operation_timeout.as_secs(),
            })?
    }
}

/// Map non-2xx responses to `RegistryError::Api`, preferring the Google error message.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, RegistryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(api_error(status.as_u16(), &body))
}

fn api_error(status: u16, body: &str) -> RegistryError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    RegistryError::Api { status, message }
}
