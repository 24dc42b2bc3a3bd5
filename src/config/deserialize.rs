// ABOUTME: Custom serde deserializers for config types.
// ABOUTME: Rejects empty protected marker lists.

use nonempty::NonEmpty;
use serde::Deserialize;

pub fn deserialize_markers<'de, D>(deserializer: D) -> Result<NonEmpty<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let markers: Vec<String> = Vec::deserialize(deserializer)?;
    NonEmpty::from_vec(markers)
        .ok_or_else(|| serde::de::Error::custom("at least one protected marker is required"))
}
