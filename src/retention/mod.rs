// ABOUTME: Retention decisions for image versions.
// ABOUTME: Exports the policy, the evaluator, and the deletion plan accumulator.

mod evaluator;
mod plan;
mod policy;

pub use evaluator::{Decision, DeleteReason, DeletionTargets, Evaluator, KeepReason};
pub use plan::DeletionPlan;
pub use policy::{DEFAULT_PROTECTED_MARKER, RetentionPolicy};
