// ABOUTME: Diagnostics accumulator for non-fatal per-item deletion failures.
// ABOUTME: Failures are logged as they happen and kept for the sweep report.

use serde::Serialize;

/// Collects deletion failures that must not stop the sweep.
#[derive(Debug, Default)]
pub struct Diagnostics {
    failures: Vec<DeletionFailure>,
}

impl Diagnostics {
    /// Record a failure, auto-logging it via tracing.
    pub fn fail(&mut self, failure: DeletionFailure) {
        tracing::warn!(
            kind = failure.kind.as_str(),
            target = %failure.target,
            "{}",
            failure.message
        );
        self.failures.push(failure);
    }

    /// Take over failures collected elsewhere, without logging them again.
    pub fn absorb(&mut self, other: Diagnostics) {
        self.failures.extend(other.failures);
    }

    pub fn failures(&self) -> &[DeletionFailure] {
        &self.failures
    }

    pub fn into_failures(self) -> Vec<DeletionFailure> {
        self.failures
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// One target that could not be deleted. Carries enough identity to retry by hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionFailure {
    pub kind: FailureKind,
    pub target: String,
    pub message: String,
}

impl DeletionFailure {
    pub fn tag_delete(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::TagDelete,
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn version_submit(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::VersionSubmit,
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn version_wait(target: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: FailureKind::VersionWait,
            target: target.into(),
            message: message.into(),
        }
    }
}

/// Where in the deletion a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// The tag delete call returned an error.
    TagDelete,
    /// The version delete request was rejected.
    VersionSubmit,
    /// The version delete operation failed or never completed.
    VersionWait,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::TagDelete => "tag-delete",
            FailureKind::VersionSubmit => "version-submit",
            FailureKind::VersionWait => "version-wait",
        }
    }
}
