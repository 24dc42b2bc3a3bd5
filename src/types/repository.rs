// ABOUTME: Artifact Registry repository coordinates.
// ABOUTME: Builds the fully-qualified tag and version references used for deletion.

use super::image_record::ImageName;
use super::target::{TagTarget, VersionTarget};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RepositoryPathError {
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    #[error("{field} cannot contain '/': {value}")]
    ContainsSlash { field: &'static str, value: String },
}

/// Project, location and repository naming one Artifact Registry repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryPath {
    project: String,
    location: String,
    repository: String,
}

impl RepositoryPath {
    pub fn new(
        project: &str,
        location: &str,
        repository: &str,
    ) -> Result<Self, RepositoryPathError> {
        Ok(Self {
            project: validate_segment("project", project)?,
            location: validate_segment("location", location)?,
            repository: validate_segment("repository", repository)?,
        })
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// `projects/{project}/locations/{location}/repositories/{repository}`
    pub fn parent(&self) -> String {
        format!(
            "projects/{}/locations/{}/repositories/{}",
            self.project, self.location, self.repository
        )
    }

    /// `{parent}/packages/{package}/versions/{version}`
    pub fn version_target(&self, image: &ImageName) -> VersionTarget {
        VersionTarget::new(format!(
            "{}/packages/{}/versions/{}",
            self.parent(),
            image.package(),
            image.version()
        ))
    }

    /// `{parent}/packages/{package}/tags/{tag}`
    pub fn tag_target(&self, image: &ImageName, tag: &str) -> TagTarget {
        TagTarget::new(format!(
            "{}/packages/{}/tags/{}",
            self.parent(),
            image.package(),
            tag
        ))
    }
}

impl fmt::Display for RepositoryPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.parent())
    }
}

fn validate_segment(field: &'static str, value: &str) -> Result<String, RepositoryPathError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(RepositoryPathError::Empty(field));
    }
    if value.contains('/') {
        return Err(RepositoryPathError::ContainsSlash {
            field,
            value: value.to_string(),
        });
    }
    Ok(value.to_string())
}
