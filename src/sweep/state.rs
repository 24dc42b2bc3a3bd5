// ABOUTME: Sweep state types for the type state pattern.
// ABOUTME: Each state carries the data produced so far, so phases cannot run out of order.

use super::report::{EvaluationSummary, PhaseReport, SweepReport};
use crate::retention::DeletionPlan;

/// Nothing listed yet.
/// Available actions: `evaluate()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Pending;

/// Inventory listed and evaluated into a deletion plan.
/// Available actions: `report_dry_run()`, `delete_tags()`
#[derive(Debug, Clone)]
pub struct Planned {
    pub(crate) plan: DeletionPlan,
    pub(crate) summary: EvaluationSummary,
}

/// Every tag partition has finished.
/// Available actions: `delete_versions()`
#[derive(Debug, Clone)]
pub struct TagsDeleted {
    pub(crate) plan: DeletionPlan,
    pub(crate) summary: EvaluationSummary,
    pub(crate) tags: PhaseReport,
}

/// Sweep finished, either as a dry run or after both deletion phases.
/// Available actions: `report()`, `into_report()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) report: SweepReport,
}
