// ABOUTME: Application-wide error types for arsweep.
// ABOUTME: Uses thiserror for ergonomic error handling and maps errors to exit codes.

use std::path::PathBuf;
use thiserror::Error;

use crate::registry::RegistryError;
use crate::sweep::{SweepError, SweepErrorKind};

#[derive(Debug, Error)]
pub enum Error {
    #[error("file already exists: {0}")]
    AlreadyExists(PathBuf),

    #[error("configuration file not found in {0}")]
    ConfigNotFound(PathBuf),

    #[error("{0} has no value")]
    MissingSetting(&'static str),

    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("error creating artifact registry client: {0}")]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Sweep(#[from] SweepError),

    #[error("{0} deletion(s) failed")]
    DeletionFailures(usize),

    #[error("sweep cancelled")]
    Cancelled,
}

impl Error {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::DeletionFailures(_) => 2,
            Error::Cancelled => 130,
            Error::Sweep(e) if e.kind() == SweepErrorKind::Cancelled => 130,
            _ => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
