// ABOUTME: Concurrent deletion of tag and version targets, one worker per partition.
// ABOUTME: Per-item failures are recorded and skipped; they never stop a partition.

use futures::future::join_all;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::partition::partition;
use super::report::{PhaseReport, TargetKind};
use crate::diagnostics::{DeletionFailure, Diagnostics};
use crate::registry::RegistryOps;
use crate::types::{TagTarget, VersionTarget};

/// What one worker did with its partition.
#[derive(Debug, Default)]
struct PartitionOutcome {
    attempted: usize,
    skipped: usize,
    abandoned: usize,
    diagnostics: Diagnostics,
}

impl PartitionOutcome {
    /// Whether to stop before `position`, counting the rest as skipped.
    fn stop_if_cancelled(&mut self, cancel: &CancellationToken, position: usize, len: usize) -> bool {
        if cancel.is_cancelled() {
            self.skipped += len - position;
            return true;
        }
        false
    }
}

/// Delete tags concurrently: at most `concurrency` workers, each working through
/// one contiguous partition in order. Returns once every worker has finished.
pub async fn delete_tags<R: RegistryOps + ?Sized>(
    registry: &R,
    targets: &[TagTarget],
    concurrency: usize,
    cancel: &CancellationToken,
) -> PhaseReport {
    let partitions = partition(targets, concurrency);
    info!(
        "deleting {} tags with {} workers",
        targets.len(),
        partitions.len()
    );

    let outcomes = join_all(
        partitions
            .iter()
            .enumerate()
            .map(|(worker, chunk)| delete_tag_partition(registry, worker, chunk, cancel)),
    )
    .await;

    collect(TargetKind::Tag, targets.len(), outcomes)
}

/// Delete versions concurrently, waiting for each deletion operation to finish
/// before the worker moves on to its next version.
pub async fn delete_versions<R: RegistryOps + ?Sized>(
    registry: &R,
    targets: &[VersionTarget],
    concurrency: usize,
    cancel: &CancellationToken,
) -> PhaseReport {
    let partitions = partition(targets, concurrency);
    info!(
        "deleting {} versions with {} workers",
        targets.len(),
        partitions.len()
    );

    let outcomes = join_all(
        partitions
            .iter()
            .enumerate()
            .map(|(worker, chunk)| delete_version_partition(registry, worker, chunk, cancel)),
    )
    .await;

    collect(TargetKind::Version, targets.len(), outcomes)
}

async fn delete_tag_partition<R: RegistryOps + ?Sized>(
    registry: &R,
    worker: usize,
    targets: &[TagTarget],
    cancel: &CancellationToken,
) -> PartitionOutcome {
    let mut outcome = PartitionOutcome::default();

    for (position, target) in targets.iter().enumerate() {
        if outcome.stop_if_cancelled(cancel, position, targets.len()) {
            break;
        }

        debug!(worker, "deleting tag {}", target);
        outcome.attempted += 1;
        if let Err(e) = registry.delete_tag(target).await {
            outcome
                .diagnostics
                .fail(DeletionFailure::tag_delete(target.as_str(), e.to_string()));
        }
    }

    debug!(worker, "tag partition finished ({} targets)", targets.len());
    outcome
}

async fn delete_version_partition<R: RegistryOps + ?Sized>(
    registry: &R,
    worker: usize,
    targets: &[VersionTarget],
    cancel: &CancellationToken,
) -> PartitionOutcome {
    let mut outcome = PartitionOutcome::default();

    for (position, target) in targets.iter().enumerate() {
        if outcome.stop_if_cancelled(cancel, position, targets.len()) {
            break;
        }

        debug!(worker, "deleting version {}", target);
        outcome.attempted += 1;
        let operation = match registry.delete_version(target).await {
            Ok(operation) => operation,
            Err(e) => {
                outcome
                    .diagnostics
                    .fail(DeletionFailure::version_submit(target.as_str(), e.to_string()));
                continue;
            }
        };

        tokio::select! {
            result = registry.wait_operation(&operation) => {
                if let Err(e) = result {
                    outcome
                        .diagnostics
                        .fail(DeletionFailure::version_wait(target.as_str(), e.to_string()));
                }
            }
            _ = cancel.cancelled() => {
                warn!(worker, "abandoning wait for {} ({})", target, operation.name);
                outcome.abandoned += 1;
            }
        }
    }

    info!(worker, "version partition finished ({} targets)", targets.len());
    outcome
}

fn collect(kind: TargetKind, total: usize, outcomes: Vec<PartitionOutcome>) -> PhaseReport {
    let mut report = PhaseReport::new(kind, total, outcomes.len());
    let mut diagnostics = Diagnostics::default();

    for outcome in outcomes {
        report.attempted += outcome.attempted;
        report.skipped += outcome.skipped;
        report.abandoned += outcome.abandoned;
        diagnostics.absorb(outcome.diagnostics);
    }

    report.failures = diagnostics.into_failures();
    report
}
