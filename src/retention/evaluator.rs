// ABOUTME: Decides whether an image version is kept or deleted.
// ABOUTME: Untagged versions go, recent versions stay, protected tags exempt stale versions.

use tracing::{debug, trace};

use super::policy::RetentionPolicy;
use crate::types::{ImageName, ImageRecord, ParseImageNameError, RepositoryPath, TagTarget, VersionTarget};

/// Outcome of evaluating one image version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    Keep(KeepReason),
    Delete(DeletionTargets),
}

impl Decision {
    pub fn is_delete(&self) -> bool {
        matches!(self, Decision::Delete(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeepReason {
    /// Uploaded at or after the cutoff.
    Recent,
    /// Stale, but `tag` contains `marker`.
    Protected { tag: String, marker: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteReason {
    /// No tags: unreachable by normal pulls, deleted regardless of age.
    Untagged,
    /// Older than the cutoff with no protected tag.
    Stale,
}

/// Everything to remove for one deleted version.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionTargets {
    pub reason: DeleteReason,
    pub version: VersionTarget,
    /// One target per tag, in the record's tag order.
    pub tags: Vec<TagTarget>,
}

/// Applies a retention policy to image records of one repository.
#[derive(Debug, Clone)]
pub struct Evaluator {
    repository: RepositoryPath,
    policy: RetentionPolicy,
}

impl Evaluator {
    pub fn new(repository: RepositoryPath, policy: RetentionPolicy) -> Self {
        Self { repository, policy }
    }

    pub fn policy(&self) -> &RetentionPolicy {
        &self.policy
    }

    /// Evaluate one record.
    ///
    /// Rules apply in order and stop at the first decision:
    /// 1. no tags: delete
    /// 2. uploaded at or after the cutoff: keep
    /// 3. any tag contains a protected marker: keep
    /// 4. otherwise delete the version and every tag on it
    ///
    /// # Errors
    ///
    /// Returns `ParseImageNameError` when a version to delete has an identifier
    /// that does not split into package and version.
    pub fn evaluate(&self, record: &ImageRecord) -> Result<Decision, ParseImageNameError> {
        if record.is_untagged() {
            debug!("{} has no tags, deleting", record.identifier);
            return self.delete(record, DeleteReason::Untagged);
        }

        if !self.policy.is_stale(record.upload_time) {
            debug!(
                "{} uploaded {} is after cutoff, keeping",
                record.identifier, record.upload_time
            );
            return Ok(Decision::Keep(KeepReason::Recent));
        }

        for tag in &record.tags {
            trace!("{} inspecting tag {}", record.identifier, tag);
            if let Some(marker) = self.policy.protecting_marker(tag) {
                debug!("{} protected by tag {}", record.identifier, tag);
                return Ok(Decision::Keep(KeepReason::Protected {
                    tag: tag.clone(),
                    marker: marker.to_string(),
                }));
            }
        }

        debug!(
            "{} uploaded {} is stale, deleting with tags {:?}",
            record.identifier, record.upload_time, record.tags
        );
        self.delete(record, DeleteReason::Stale)
    }

    fn delete(
        &self,
        record: &ImageRecord,
        reason: DeleteReason,
    ) -> Result<Decision, ParseImageNameError> {
        let image = record.image_name()?;
        Ok(Decision::Delete(self.targets_for(&image, &record.tags, reason)))
    }

    fn targets_for(&self, image: &ImageName, tags: &[String], reason: DeleteReason) -> DeletionTargets {
        DeletionTargets {
            reason,
            version: self.repository.version_target(image),
            tags: tags
                .iter()
                .map(|tag| self.repository.tag_target(image, tag))
                .collect(),
        }
    }
}
