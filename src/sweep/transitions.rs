// ABOUTME: State transition methods for the sweep.
// ABOUTME: Each method consumes self and returns the next state; tags always finish before versions.

use futures::StreamExt;
use snafu::ResultExt;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::error::{CancelledSnafu, ClientSnafu, DecisionSnafu, InventorySnafu, SweepError};
use super::executor::{delete_tags, delete_versions};
use super::machine::Sweep;
use super::report::{EvaluationSummary, SweepReport};
use super::state::{Completed, Pending, Planned, TagsDeleted};
use crate::registry::RegistryOps;
use crate::retention::DeletionPlan;

// =============================================================================
// Pending -> Planned
// =============================================================================

impl Sweep<Pending> {
    /// List the repository and evaluate every record into a deletion plan.
    ///
    /// Evaluation runs on the calling task, entirely before any deletion.
    ///
    /// # Errors
    ///
    /// - `SweepError::Inventory` if the listing fails part way; the partial plan is discarded.
    /// - `SweepError::Decision` if a version to delete has a malformed identifier.
    /// - `SweepError::Cancelled` if `cancel` fires while listing.
    #[must_use = "sweep state must be used"]
    pub async fn evaluate<R: RegistryOps + ?Sized>(
        self,
        registry: &R,
        cancel: &CancellationToken,
    ) -> Result<Sweep<Planned>, SweepError> {
        let repository = self.options.repository.clone();
        let evaluator = self.options.evaluator();
        info!(
            "listing {} (deleting untagged versions and versions uploaded before {})",
            repository,
            evaluator.policy().cutoff()
        );

        let mut plan = DeletionPlan::new();
        let mut summary = EvaluationSummary::default();
        let mut images = registry.list_images(&repository);

        loop {
            let next = tokio::select! {
                biased;
                _ = cancel.cancelled() => return CancelledSnafu { stage: "listing" }.fail(),
                next = images.next() => next,
            };
            let Some(record) = next else {
                break;
            };

            let record = record.context(InventorySnafu {
                repository: repository.to_string(),
            })?;
            let decision = evaluator.evaluate(&record).context(DecisionSnafu {
                identifier: record.identifier.clone(),
            })?;

            summary.count(&decision);
            plan.record(decision);
        }

        info!(
            "evaluated {} versions: {} kept, {} to delete ({} tags)",
            summary.listed,
            summary.kept(),
            plan.version_targets().len(),
            plan.tag_targets().len()
        );

        Ok(Sweep {
            options: self.options,
            state: Planned { plan, summary },
        })
    }
}

// =============================================================================
// Planned -> Completed (dry run) | TagsDeleted
// =============================================================================

impl Sweep<Planned> {
    /// Finish without deleting anything; the report carries the full plan.
    #[must_use = "sweep state must be used"]
    pub fn report_dry_run(self) -> Sweep<Completed> {
        info!(
            "dry run: would delete {} tags and {} versions",
            self.state.plan.tag_targets().len(),
            self.state.plan.version_targets().len()
        );

        let report = SweepReport {
            repository: self.options.repository.to_string(),
            cutoff: self.options.policy.cutoff(),
            dry_run: true,
            summary: self.state.summary,
            tag_targets: self.state.plan.tag_targets().len(),
            version_targets: self.state.plan.version_targets().len(),
            tags: None,
            versions: None,
            cancelled: false,
            plan: self.state.plan,
        };

        Sweep {
            options: self.options,
            state: Completed { report },
        }
    }

    /// Delete every planned tag. Returns after all tag workers have finished.
    ///
    /// # Errors
    ///
    /// Returns `SweepError::Client` if the registry cannot issue calls at all.
    /// Individual tag failures are recorded in the phase report.
    #[must_use = "sweep state must be used"]
    pub async fn delete_tags<R: RegistryOps + ?Sized>(
        self,
        registry: &R,
        cancel: &CancellationToken,
    ) -> Result<Sweep<TagsDeleted>, SweepError> {
        registry.check_ready().await.context(ClientSnafu)?;

        let tags = delete_tags(
            registry,
            self.state.plan.tag_targets(),
            self.options.concurrency,
            cancel,
        )
        .await;

        Ok(Sweep {
            options: self.options,
            state: TagsDeleted {
                plan: self.state.plan,
                summary: self.state.summary,
                tags,
            },
        })
    }
}

// =============================================================================
// TagsDeleted -> Completed
// =============================================================================

impl Sweep<TagsDeleted> {
    /// Delete every planned version, waiting on each deletion operation.
    #[must_use = "sweep state must be used"]
    pub async fn delete_versions<R: RegistryOps + ?Sized>(
        self,
        registry: &R,
        cancel: &CancellationToken,
    ) -> Sweep<Completed> {
        let versions = delete_versions(
            registry,
            self.state.plan.version_targets(),
            self.options.concurrency,
            cancel,
        )
        .await;

        let cancelled = self.state.tags.interrupted() || versions.interrupted();
        let report = SweepReport {
            repository: self.options.repository.to_string(),
            cutoff: self.options.policy.cutoff(),
            dry_run: false,
            summary: self.state.summary,
            tag_targets: self.state.plan.tag_targets().len(),
            version_targets: self.state.plan.version_targets().len(),
            tags: Some(self.state.tags),
            versions: Some(versions),
            cancelled,
            plan: self.state.plan,
        };

        Sweep {
            options: self.options,
            state: Completed { report },
        }
    }
}
