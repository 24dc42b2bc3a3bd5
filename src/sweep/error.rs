// ABOUTME: Fatal sweep errors with SNAFU pattern.
// ABOUTME: Listing, decision, and client failures abort the sweep; per-item failures never do.

use snafu::Snafu;

use crate::registry::RegistryError;
use crate::types::ParseImageNameError;

/// Errors that terminate a sweep.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SweepError {
    #[snafu(display("failed to list images in {repository}: {source}"))]
    Inventory {
        repository: String,
        source: RegistryError,
    },

    #[snafu(display("malformed image record {identifier}: {source}"))]
    Decision {
        identifier: String,
        source: ParseImageNameError,
    },

    #[snafu(display("registry client unavailable: {source}"))]
    Client { source: RegistryError },

    #[snafu(display("sweep cancelled during {stage}"))]
    Cancelled { stage: &'static str },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepErrorKind {
    /// The inventory listing failed part way.
    Inventory,
    /// A record to delete had a malformed identifier.
    Decision,
    /// The registry client could not issue calls.
    Client,
    /// Cancelled before the deletion phases.
    Cancelled,
}

impl SweepError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> SweepErrorKind {
        match self {
            SweepError::Inventory { .. } => SweepErrorKind::Inventory,
            SweepError::Decision { .. } => SweepErrorKind::Decision,
            SweepError::Client { .. } => SweepErrorKind::Client,
            SweepError::Cancelled { .. } => SweepErrorKind::Cancelled,
        }
    }
}
