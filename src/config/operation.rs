// ABOUTME: Long-running delete operation polling configuration.
// ABOUTME: Poll interval and the maximum wait per version deletion.

use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct OperationConfig {
    #[serde(default = "default_poll_interval", with = "humantime_serde")]
    pub poll_interval: Duration,

    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,
}

fn default_poll_interval() -> Duration {
    Duration::from_secs(2)
}

fn default_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Default for OperationConfig {
    fn default() -> Self {
        OperationConfig {
            poll_interval: default_poll_interval(),
            timeout: default_timeout(),
        }
    }
}
