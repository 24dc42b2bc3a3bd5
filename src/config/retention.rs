// ABOUTME: Retention window and protected tag markers.
// ABOUTME: Converts to a RetentionPolicy anchored at the sweep start time.

use chrono::{DateTime, Utc};
use nonempty::NonEmpty;
use serde::Deserialize;

use super::deserialize::deserialize_markers;
use crate::retention::{DEFAULT_PROTECTED_MARKER, RetentionPolicy};

#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_days_to_keep")]
    pub days_to_keep: u32,

    #[serde(
        default = "default_protected_markers",
        deserialize_with = "deserialize_markers"
    )]
    pub protected_markers: NonEmpty<String>,
}

fn default_days_to_keep() -> u32 {
    30
}

fn default_protected_markers() -> NonEmpty<String> {
    NonEmpty::new(DEFAULT_PROTECTED_MARKER.to_string())
}

impl Default for RetentionConfig {
    fn default() -> Self {
        RetentionConfig {
            days_to_keep: default_days_to_keep(),
            protected_markers: default_protected_markers(),
        }
    }
}

impl RetentionConfig {
    pub fn policy(&self, now: DateTime<Utc>) -> RetentionPolicy {
        RetentionPolicy::keep_days(self.days_to_keep, now)
            .with_markers(self.protected_markers.clone())
    }
}
