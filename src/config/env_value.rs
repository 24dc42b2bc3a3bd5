// ABOUTME: Config values that are either literal or read from an environment variable.
// ABOUTME: Keeps secrets such as access tokens out of config files.

use crate::error::{Error, Result};
use serde::Deserialize;

/// `access_token: ya29...` or `access_token: { env: VAR, default: ... }`.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum EnvValue {
    Literal(String),
    FromEnv {
        #[serde(rename = "env")]
        var: String,
        #[serde(default)]
        default: Option<String>,
    },
}

impl EnvValue {
    /// Whether the value is written into the config file itself.
    pub fn is_literal(&self) -> bool {
        matches!(self, EnvValue::Literal(_))
    }

    /// The value, with an unset or blank variable falling back to `default`.
    pub fn resolve(&self) -> Result<String> {
        match self {
            EnvValue::Literal(value) => Ok(value.clone()),
            EnvValue::FromEnv { var, default } => std::env::var(var)
                .ok()
                .filter(|value| !value.trim().is_empty())
                .or_else(|| default.clone())
                .ok_or_else(|| Error::MissingEnvVar(var.clone())),
        }
    }
}

impl std::fmt::Debug for EnvValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnvValue::Literal(_) => f.write_str("Literal(<redacted>)"),
            EnvValue::FromEnv { var, .. } => {
                f.debug_struct("FromEnv").field("var", var).finish_non_exhaustive()
            }
        }
    }
}
