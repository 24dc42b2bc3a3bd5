// ABOUTME: Exit policy for sweeps with per-item deletion failures.
// ABOUTME: Supports ignore (exit 0) and fail (non-zero exit).

use serde::de::{self, Deserialize, Deserializer};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Log failed deletions and still exit successfully.
    #[default]
    Ignore,
    /// Exit non-zero when any deletion failed.
    Fail,
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ignore" => Ok(FailurePolicy::Ignore),
            "fail" => Ok(FailurePolicy::Fail),
            _ => Err(format!("unknown failure policy: {} (expected ignore or fail)", s)),
        }
    }
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Ignore => write!(f, "ignore"),
            FailurePolicy::Fail => write!(f, "fail"),
        }
    }
}

impl<'de> Deserialize<'de> for FailurePolicy {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}
