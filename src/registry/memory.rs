// ABOUTME: In-memory registry for exercising sweeps without network access.
// ABOUTME: Records every call in issue order and injects failures on chosen targets.

use async_trait::async_trait;
use futures::{StreamExt, stream};
use parking_lot::Mutex;
use std::collections::HashSet;
use std::time::Duration;

use super::ops::{InventoryStream, Operation, RegistryError, RegistryOps};
use super::sealed::Sealed;
use crate::types::{ImageRecord, RepositoryPath, TagTarget, VersionTarget};

/// A call received by a `MemoryRegistry`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    DeleteTag(String),
    DeleteVersion(String),
    WaitOperation(String),
}

impl RegistryCall {
    pub fn target(&self) -> &str {
        match self {
            RegistryCall::DeleteTag(t)
            | RegistryCall::DeleteVersion(t)
            | RegistryCall::WaitOperation(t) => t,
        }
    }
}

/// Registry backed by a fixed list of image records.
///
/// Deleting does not remove records from the listing; every sweep sees the
/// same inventory.
#[derive(Debug, Default)]
pub struct MemoryRegistry {
    images: Vec<ImageRecord>,
    fail_listing_after: Option<usize>,
    unavailable: bool,
    latency: Option<Duration>,
    failing_tags: HashSet<String>,
    failing_submits: HashSet<String>,
    failing_waits: HashSet<String>,
    calls: Mutex<Vec<RegistryCall>>,
}

impl Sealed for MemoryRegistry {}

impl MemoryRegistry {
    pub fn new(images: Vec<ImageRecord>) -> Self {
        Self {
            images,
            ..Default::default()
        }
    }

    /// Yield `count` records, then fail the listing.
    pub fn fail_listing_after(mut self, count: usize) -> Self {
        self.fail_listing_after = Some(count);
        self
    }

    /// Make `check_ready` fail.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    /// Sleep this long inside every delete and wait call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub fn fail_tag(mut self, target: impl Into<String>) -> Self {
        self.failing_tags.insert(target.into());
        self
    }

    pub fn fail_version_submit(mut self, target: impl Into<String>) -> Self {
        self.failing_submits.insert(target.into());
        self
    }

    pub fn fail_version_wait(mut self, target: impl Into<String>) -> Self {
        self.failing_waits.insert(target.into());
        self
    }

    /// All calls received so far, in the order they were issued.
    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().clone()
    }

    pub fn deleted_tags(&self) -> Vec<String> {
        self.calls_matching(|c| matches!(c, RegistryCall::DeleteTag(_)))
    }

    pub fn deleted_versions(&self) -> Vec<String> {
        self.calls_matching(|c| matches!(c, RegistryCall::DeleteVersion(_)))
    }

    fn calls_matching(&self, f: impl Fn(&RegistryCall) -> bool) -> Vec<String> {
        self.calls
            .lock()
            .iter()
            .filter(|c| f(c))
            .map(|c| c.target().to_string())
            .collect()
    }

    fn record(&self, call: RegistryCall) {
        self.calls.lock().push(call);
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

/// Operation names embed the version target so waits can be matched back to it.
const OPERATION_PREFIX: &str = "operations/delete:";

#[async_trait]
impl RegistryOps for MemoryRegistry {
    fn list_images<'a>(&'a self, _repository: &'a RepositoryPath) -> InventoryStream<'a> {
        let limit = self.fail_listing_after.unwrap_or(usize::MAX);
        let records = self.images.iter().take(limit).cloned().map(Ok);

        match self.fail_listing_after {
            Some(count) => {
                let failure = RegistryError::Unavailable(format!(
                    "listing interrupted after {} images",
                    count
                ));
                stream::iter(records.chain(std::iter::once(Err(failure)))).boxed()
            }
            None => stream::iter(records).boxed(),
        }
    }

    async fn check_ready(&self) -> Result<(), RegistryError> {
        if self.unavailable {
            return Err(RegistryError::Unavailable("memory registry offline".to_string()));
        }
        Ok(())
    }

    async fn delete_tag(&self, target: &TagTarget) -> Result<(), RegistryError> {
        self.record(RegistryCall::DeleteTag(target.to_string()));
        self.simulate_latency().await;

        if self.failing_tags.contains(target.as_str()) {
            return Err(RegistryError::Api {
                status: 500,
                message: format!("injected failure deleting {}", target),
            });
        }
        Ok(())
    }

    async fn delete_version(&self, target: &VersionTarget) -> Result<Operation, RegistryError> {
        self.record(RegistryCall::DeleteVersion(target.to_string()));
        self.simulate_latency().await;

        if self.failing_submits.contains(target.as_str()) {
            return Err(RegistryError::Api {
                status: 409,
                message: format!("injected failure submitting {}", target),
            });
        }
        Ok(Operation::pending(format!("{}{}", OPERATION_PREFIX, target)))
    }

    async fn wait_operation(&self, operation: &Operation) -> Result<(), RegistryError> {
        let target = operation
            .name
            .strip_prefix(OPERATION_PREFIX)
            .unwrap_or(&operation.name)
            .to_string();
        self.record(RegistryCall::WaitOperation(target.clone()));
        self.simulate_latency().await;

        if self.failing_waits.contains(&target) {
            return Err(RegistryError::OperationFailed {
                name: operation.name.clone(),
                message: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}
