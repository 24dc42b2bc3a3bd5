// ABOUTME: Accumulates deletion decisions into ordered tag and version work lists.
// ABOUTME: Preserves inventory order; performs no deduplication.

use serde::Serialize;

use super::evaluator::{Decision, DeletionTargets};
use crate::types::{TagTarget, VersionTarget};

/// Tag and version references to delete, in the order records were listed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionPlan {
    tag_targets: Vec<TagTarget>,
    version_targets: Vec<VersionTarget>,
}

impl DeletionPlan {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the targets of a decision. `Keep` decisions add nothing.
    pub fn record(&mut self, decision: Decision) {
        if let Decision::Delete(targets) = decision {
            self.push(targets);
        }
    }

    pub fn push(&mut self, targets: DeletionTargets) {
        self.tag_targets.extend(targets.tags);
        self.version_targets.push(targets.version);
    }

    pub fn tag_targets(&self) -> &[TagTarget] {
        &self.tag_targets
    }

    pub fn version_targets(&self) -> &[VersionTarget] {
        &self.version_targets
    }

    pub fn is_empty(&self) -> bool {
        self.tag_targets.is_empty() && self.version_targets.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::retention::{DeleteReason, KeepReason};

    fn targets(version: &str, tags: &[&str]) -> DeletionTargets {
        DeletionTargets {
            reason: DeleteReason::Stale,
            version: VersionTarget::new(version.to_string()),
            tags: tags.iter().map(|t| TagTarget::new(t.to_string())).collect(),
        }
    }

    #[test]
    fn appends_in_consumption_order() {
        let mut plan = DeletionPlan::new();
        plan.record(Decision::Delete(targets("v1", &["t1", "t2"])));
        plan.record(Decision::Keep(KeepReason::Recent));
        plan.record(Decision::Delete(targets("v2", &["t3"])));

        let tags: Vec<_> = plan.tag_targets().iter().map(|t| t.as_str()).collect();
        let versions: Vec<_> = plan.version_targets().iter().map(|v| v.as_str()).collect();
        assert_eq!(tags, vec!["t1", "t2", "t3"]);
        assert_eq!(versions, vec!["v1", "v2"]);
    }

    #[test]
    fn duplicates_are_not_removed() {
        let mut plan = DeletionPlan::new();
        plan.push(targets("v1", &[]));
        plan.push(targets("v1", &[]));
        assert_eq!(plan.version_targets().len(), 2);
    }

    #[test]
    fn keep_only_plan_is_empty() {
        let mut plan = DeletionPlan::new();
        plan.record(Decision::Keep(KeepReason::Recent));
        assert!(plan.is_empty());
    }
}
