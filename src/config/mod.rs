// ABOUTME: Configuration types and parsing for arsweep.yml.
// ABOUTME: Handles YAML parsing, CLI overrides, validation, and conversion to sweep options.

mod deserialize;
mod env_value;
mod failure_policy;
mod init;
mod operation;
mod retention;

pub use env_value::EnvValue;
pub use failure_policy::FailurePolicy;
pub use init::init_config;
pub use operation::OperationConfig;
pub use retention::RetentionConfig;

use crate::error::{Error, Result};
use crate::registry::{AccessToken, ClientSettings, DEFAULT_ENDPOINT};
use crate::sweep::{DEFAULT_CONCURRENCY, SweepOptions};
use crate::types::RepositoryPath;
use chrono::{DateTime, Utc};
use nonempty::NonEmpty;
use serde::Deserialize;
use std::path::Path;

pub const CONFIG_FILENAME: &str = "arsweep.yml";
pub const CONFIG_FILENAME_ALT: &str = "arsweep.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".arsweep/config.yml";

pub const DEFAULT_LOCATION: &str = "europe-west4";

/// Longest retention window accepted, in days (one hundred years).
pub const MAX_DAYS_TO_KEEP: u32 = 36_500;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub project: Option<String>,

    #[serde(default = "default_location")]
    pub location: String,

    #[serde(default)]
    pub repository: Option<String>,

    #[serde(default)]
    pub retention: RetentionConfig,

    #[serde(default = "default_concurrency")]
    pub concurrency: usize,

    #[serde(default)]
    pub dry_run: bool,

    #[serde(default)]
    pub on_failure: FailurePolicy,

    #[serde(default)]
    pub operation: OperationConfig,

    #[serde(default)]
    pub access_token: Option<EnvValue>,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_location() -> String {
    DEFAULT_LOCATION.to_string()
}

fn default_concurrency() -> usize {
    DEFAULT_CONCURRENCY
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Config {
            project: None,
            location: default_location(),
            repository: None,
            retention: RetentionConfig::default(),
            concurrency: default_concurrency(),
            dry_run: false,
            on_failure: FailurePolicy::default(),
            operation: OperationConfig::default(),
            access_token: None,
            endpoint: default_endpoint(),
        }
    }
}

/// Values given on the command line. `None` keeps the file (or default) value.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub project: Option<String>,
    pub location: Option<String>,
    pub repository: Option<String>,
    pub days_to_keep: Option<u32>,
    pub protected_markers: Vec<String>,
    pub concurrency: Option<usize>,
    /// `true` forces a dry run; `false` leaves the file value alone.
    pub dry_run: bool,
    pub on_failure: Option<FailurePolicy>,
}

impl Config {
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Error::from)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    /// Load an explicit file, or discover one in `dir`, or fall back to defaults.
    pub fn resolve(explicit: Option<&Path>, dir: &Path) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => match Self::discover(dir) {
                Ok(config) => Ok(config),
                Err(Error::ConfigNotFound(_)) => Ok(Config::default()),
                Err(e) => Err(e),
            },
        }
    }

    /// Apply command-line values on top of this configuration.
    pub fn with_overrides(&self, overrides: &Overrides) -> Config {
        let mut merged = self.clone();

        if let Some(ref project) = overrides.project {
            merged.project = Some(project.clone());
        }
        if let Some(ref location) = overrides.location {
            merged.location = location.clone();
        }
        if let Some(ref repository) = overrides.repository {
            merged.repository = Some(repository.clone());
        }
        if let Some(days) = overrides.days_to_keep {
            merged.retention.days_to_keep = days;
        }
        if let Some(markers) = NonEmpty::from_vec(overrides.protected_markers.clone()) {
            merged.retention.protected_markers = markers;
        }
        if let Some(concurrency) = overrides.concurrency {
            merged.concurrency = concurrency;
        }
        if overrides.dry_run {
            merged.dry_run = true;
        }
        if let Some(policy) = overrides.on_failure {
            merged.on_failure = policy;
        }

        merged
    }

    /// Check everything needed before touching the network.
    pub fn validate(&self) -> Result<()> {
        self.repository_path()?;

        if self.retention.days_to_keep > MAX_DAYS_TO_KEEP {
            return Err(Error::InvalidConfig(format!(
                "retention.days_to_keep must be at most {}, got {}",
                MAX_DAYS_TO_KEEP, self.retention.days_to_keep
            )));
        }

        if self.concurrency == 0 {
            return Err(Error::InvalidConfig(
                "concurrency must be at least 1".to_string(),
            ));
        }

        if let Some(marker) = self
            .retention
            .protected_markers
            .iter()
            .find(|m| m.trim().is_empty())
        {
            return Err(Error::InvalidConfig(format!(
                "protected marker cannot be blank: {:?}",
                marker
            )));
        }

        if self.operation.poll_interval.is_zero() {
            return Err(Error::InvalidConfig(
                "operation.poll_interval must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    pub fn repository_path(&self) -> Result<RepositoryPath> {
        let project = required("project", self.project.as_deref())?;
        let repository = required("repository", self.repository.as_deref())?;
        RepositoryPath::new(project, &self.location, repository)
            .map_err(|e| Error::InvalidConfig(e.to_string()))
    }

    /// Options for one sweep, with the cutoff computed from `now`.
    pub fn sweep_options(&self, now: DateTime<Utc>) -> Result<SweepOptions> {
        self.validate()?;
        let policy = self.retention.policy(now);
        Ok(SweepOptions::new(self.repository_path()?, policy)
            .concurrency(self.concurrency)
            .dry_run(self.dry_run))
    }

    pub fn client_settings(&self) -> ClientSettings {
        ClientSettings {
            endpoint: self.endpoint.clone(),
            poll_interval: self.operation.poll_interval,
            operation_timeout: self.operation.timeout,
            ..ClientSettings::default()
        }
    }

    /// Token source for registry calls. A configured token must resolve.
    pub fn access_token(&self) -> Result<AccessToken> {
        if self.access_token.as_ref().is_some_and(EnvValue::is_literal) {
            tracing::warn!("access_token is stored in the config file; prefer `env:`");
        }
        let explicit = self
            .access_token
            .as_ref()
            .map(EnvValue::resolve)
            .transpose()?;
        Ok(AccessToken::discover(explicit))
    }

    pub fn template() -> Self {
        Config {
            project: Some("my-project".to_string()),
            repository: Some("my-repository".to_string()),
            ..Config::default()
        }
    }
}

fn required<'a>(name: &'static str, value: Option<&'a str>) -> Result<&'a str> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::MissingSetting(name)),
    }
}
