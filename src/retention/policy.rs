// ABOUTME: Retention policy: age cutoff plus protected tag markers.
// ABOUTME: A tag containing any marker as a substring exempts its version.

use chrono::{DateTime, Duration, Utc};
use nonempty::NonEmpty;

/// Marker protecting a version when any of its tags contains it.
pub const DEFAULT_PROTECTED_MARKER: &str = "latest";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPolicy {
    cutoff: DateTime<Utc>,
    protected_markers: NonEmpty<String>,
}

impl RetentionPolicy {
    /// Policy with an explicit cutoff and the default `latest` marker.
    pub fn new(cutoff: DateTime<Utc>) -> Self {
        Self {
            cutoff,
            protected_markers: NonEmpty::new(DEFAULT_PROTECTED_MARKER.to_string()),
        }
    }

    /// Keep versions uploaded within the last `days` days of `now`.
    ///
    /// A window reaching past the earliest representable time keeps everything.
    pub fn keep_days(days: u32, now: DateTime<Utc>) -> Self {
        let cutoff = now
            .checked_sub_signed(Duration::days(i64::from(days)))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        Self::new(cutoff)
    }

    pub fn with_markers(mut self, markers: NonEmpty<String>) -> Self {
        self.protected_markers = markers;
        self
    }

    pub fn cutoff(&self) -> DateTime<Utc> {
        self.cutoff
    }

    pub fn protected_markers(&self) -> &NonEmpty<String> {
        &self.protected_markers
    }

    /// Whether a version uploaded at `upload_time` is older than the cutoff.
    pub fn is_stale(&self, upload_time: DateTime<Utc>) -> bool {
        upload_time < self.cutoff
    }

    /// The first marker contained in `tag`, if any. Substring match, not equality.
    pub fn protecting_marker(&self, tag: &str) -> Option<&str> {
        self.protected_markers
            .iter()
            .find(|marker| tag.contains(marker.as_str()))
            .map(String::as_str)
    }
}
