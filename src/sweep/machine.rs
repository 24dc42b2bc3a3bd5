// ABOUTME: Generic sweep struct parameterized by state marker.
// ABOUTME: Holds the explicit sweep options every phase reads from.

use crate::retention::{DeletionPlan, Evaluator, RetentionPolicy};
use crate::types::RepositoryPath;

use super::report::{EvaluationSummary, PhaseReport, SweepReport};
use super::state::{Completed, Pending, Planned, TagsDeleted};

/// Workers per deletion phase when not configured.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Everything a sweep needs to know, fixed for its whole run.
#[derive(Debug, Clone)]
pub struct SweepOptions {
    pub repository: RepositoryPath,
    pub policy: RetentionPolicy,
    /// Maximum concurrent workers per deletion phase.
    pub concurrency: usize,
    /// Report what would be deleted without deleting anything.
    pub dry_run: bool,
}

impl SweepOptions {
    pub fn new(repository: RepositoryPath, policy: RetentionPolicy) -> Self {
        Self {
            repository,
            policy,
            concurrency: DEFAULT_CONCURRENCY,
            dry_run: false,
        }
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub(crate) fn evaluator(&self) -> Evaluator {
        Evaluator::new(self.repository.clone(), self.policy.clone())
    }
}

/// A sweep in progress, parameterized by its current state.
#[derive(Debug)]
pub struct Sweep<S> {
    pub(crate) options: SweepOptions,
    pub(crate) state: S,
}

impl Sweep<Pending> {
    pub fn new(options: SweepOptions) -> Self {
        Sweep {
            options,
            state: Pending,
        }
    }
}

impl<S> Sweep<S> {
    pub fn options(&self) -> &SweepOptions {
        &self.options
    }

    pub fn repository(&self) -> &RepositoryPath {
        &self.options.repository
    }
}

impl Sweep<Planned> {
    pub fn plan(&self) -> &DeletionPlan {
        &self.state.plan
    }

    pub fn summary(&self) -> &EvaluationSummary {
        &self.state.summary
    }
}

impl Sweep<TagsDeleted> {
    pub fn plan(&self) -> &DeletionPlan {
        &self.state.plan
    }

    pub fn tag_report(&self) -> &PhaseReport {
        &self.state.tags
    }
}

impl Sweep<Completed> {
    pub fn report(&self) -> &SweepReport {
        &self.state.report
    }

    pub fn into_report(self) -> SweepReport {
        self.state.report
    }
}
