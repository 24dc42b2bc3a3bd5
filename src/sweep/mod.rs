// ABOUTME: Sweep orchestration using the type state pattern.
// ABOUTME: list -> evaluate -> (dry report | delete tags -> delete versions) -> done.

mod error;
mod executor;
mod machine;
mod partition;
mod report;
mod state;
mod transitions;

pub use error::{SweepError, SweepErrorKind};
pub use executor::{delete_tags, delete_versions};
pub use machine::{DEFAULT_CONCURRENCY, Sweep, SweepOptions};
pub use partition::partition;
pub use report::{EvaluationSummary, PhaseReport, SweepReport, TargetKind};
pub use state::{Completed, Pending, Planned, TagsDeleted};

use crate::registry::RegistryOps;
use tokio_util::sync::CancellationToken;

/// Run a whole sweep: evaluate the inventory, then either report (dry run)
/// or delete all planned tags followed by all planned versions.
///
/// This is the library entry point. The `arsweep` binary walks the same
/// transitions one by one so it can print each phase as it finishes.
///
/// # Errors
///
/// Returns `SweepError` for listing failures, malformed records, an
/// unavailable client, or cancellation before deletion starts. Individual
/// deletion failures are reported in the returned `SweepReport` instead.
pub async fn run<R: RegistryOps + ?Sized>(
    registry: &R,
    options: SweepOptions,
    cancel: &CancellationToken,
) -> Result<SweepReport, SweepError> {
    let planned = Sweep::new(options).evaluate(registry, cancel).await?;

    let completed = if planned.options().dry_run {
        planned.report_dry_run()
    } else {
        planned
            .delete_tags(registry, cancel)
            .await?
            .delete_versions(registry, cancel)
            .await
    };

    Ok(completed.into_report())
}
