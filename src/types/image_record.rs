// ABOUTME: Snapshot of one image version as listed by the registry.
// ABOUTME: Decomposes digest-qualified identifiers into package name and version.

use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

/// Separator between the package name and the digest in an image identifier.
const DIGEST_SEPARATOR: char = '@';

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseImageNameError {
    #[error("image identifier cannot be empty")]
    Empty,

    #[error("image identifier is not digest-qualified: {0}")]
    MissingDigest(String),

    #[error("image identifier has more than one digest separator: {0}")]
    AmbiguousDigest(String),

    #[error("image identifier has an empty package or version: {0}")]
    EmptyComponent(String),
}

/// One image version in the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRecord {
    /// Registry path naming this version, e.g.
    /// `projects/p/locations/l/repositories/r/dockerImages/app@sha256:...`.
    pub identifier: String,
    /// Tags currently pointing at this version, in registry order.
    pub tags: Vec<String>,
    pub upload_time: DateTime<Utc>,
}

impl ImageRecord {
    pub fn new(
        identifier: impl Into<String>,
        tags: Vec<String>,
        upload_time: DateTime<Utc>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            tags,
            upload_time,
        }
    }

    pub fn is_untagged(&self) -> bool {
        self.tags.is_empty()
    }

    /// Split the identifier into package name and version.
    pub fn image_name(&self) -> Result<ImageName, ParseImageNameError> {
        ImageName::parse(&self.identifier)
    }
}

/// The package and version components of an image identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    package: String,
    version: String,
}

impl ImageName {
    /// Parse the last path segment of `identifier` as `package@version`.
    ///
    /// Anything other than exactly two non-empty components is rejected.
    pub fn parse(identifier: &str) -> Result<Self, ParseImageNameError> {
        let identifier = identifier.trim();
        if identifier.is_empty() {
            return Err(ParseImageNameError::Empty);
        }

        let last_segment = identifier.rsplit('/').next().unwrap_or(identifier);
        let parts: Vec<&str> = last_segment.split(DIGEST_SEPARATOR).collect();

        match parts.as_slice() {
            [package, version] if !package.is_empty() && !version.is_empty() => Ok(Self {
                package: (*package).to_string(),
                version: (*version).to_string(),
            }),
            [_, _] => Err(ParseImageNameError::EmptyComponent(identifier.to_string())),
            [_] => Err(ParseImageNameError::MissingDigest(identifier.to_string())),
            _ => Err(ParseImageNameError::AmbiguousDigest(identifier.to_string())),
        }
    }

    pub fn package(&self) -> &str {
        &self.package
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.package, DIGEST_SEPARATOR, self.version)
    }
}
