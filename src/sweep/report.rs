// ABOUTME: Structured results of a sweep: evaluation counts and per-phase deletion outcomes.
// ABOUTME: Lets callers decide exit-code policy without parsing logs.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::diagnostics::DeletionFailure;
use crate::retention::{Decision, DeleteReason, DeletionPlan, KeepReason};

/// Kind of target a deletion phase works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Tag,
    Version,
}

impl std::fmt::Display for TargetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TargetKind::Tag => write!(f, "tag"),
            TargetKind::Version => write!(f, "version"),
        }
    }
}

/// How the listed versions were decided.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationSummary {
    pub listed: usize,
    pub kept_recent: usize,
    pub kept_protected: usize,
    pub deleted_untagged: usize,
    pub deleted_stale: usize,
}

impl EvaluationSummary {
    pub fn count(&mut self, decision: &Decision) {
        self.listed += 1;
        match decision {
            Decision::Keep(KeepReason::Recent) => self.kept_recent += 1,
            Decision::Keep(KeepReason::Protected { .. }) => self.kept_protected += 1,
            Decision::Delete(targets) => match targets.reason {
                DeleteReason::Untagged => self.deleted_untagged += 1,
                DeleteReason::Stale => self.deleted_stale += 1,
            },
        }
    }

    pub fn kept(&self) -> usize {
        self.kept_recent + self.kept_protected
    }

    pub fn deleted(&self) -> usize {
        self.deleted_untagged + self.deleted_stale
    }
}

/// Outcome of one deletion phase across all of its partitions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseReport {
    pub kind: TargetKind,
    /// Targets handed to the phase.
    pub total: usize,
    /// Partitions (workers) the targets were split into.
    pub workers: usize,
    /// Targets for which a delete call was issued.
    pub attempted: usize,
    /// Targets never issued because the sweep was cancelled.
    pub skipped: usize,
    /// Version deletions submitted but not waited on because of cancellation.
    pub abandoned: usize,
    pub failures: Vec<DeletionFailure>,
}

impl PhaseReport {
    pub fn new(kind: TargetKind, total: usize, workers: usize) -> Self {
        Self {
            kind,
            total,
            workers,
            attempted: 0,
            skipped: 0,
            abandoned: 0,
            failures: Vec::new(),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn succeeded(&self) -> usize {
        self.attempted
            .saturating_sub(self.failed())
            .saturating_sub(self.abandoned)
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Whether cancellation left any target of this phase unfinished.
    pub fn interrupted(&self) -> bool {
        self.skipped + self.abandoned > 0
    }

    pub fn failed_targets(&self) -> impl Iterator<Item = &str> {
        self.failures.iter().map(|f| f.target.as_str())
    }
}

/// Final result of a sweep.
#[derive(Debug, Clone, Serialize)]
pub struct SweepReport {
    pub repository: String,
    pub cutoff: DateTime<Utc>,
    pub dry_run: bool,
    pub summary: EvaluationSummary,
    pub tag_targets: usize,
    pub version_targets: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<PhaseReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub versions: Option<PhaseReport>,
    /// Whether cancellation left deletion work undone.
    pub cancelled: bool,
    #[serde(skip)]
    pub plan: DeletionPlan,
}

impl SweepReport {
    fn phases(&self) -> impl Iterator<Item = &PhaseReport> {
        self.tags.iter().chain(self.versions.iter())
    }

    /// Total per-item deletion failures across both phases.
    pub fn failed(&self) -> usize {
        self.phases().map(PhaseReport::failed).sum()
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &DeletionFailure> {
        self.phases().flat_map(|phase| phase.failures.iter())
    }
}
