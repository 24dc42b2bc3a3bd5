// ABOUTME: Config scaffolding for new sweeps.
// ABOUTME: Creates arsweep.yml template files.

use std::path::Path;

use crate::error::{Error, Result};

use super::{CONFIG_FILENAME, Config};

pub fn init_config(
    dir: &Path,
    project: Option<&str>,
    repository: Option<&str>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = Config::template();
    if let Some(p) = project {
        config.project = Some(p.to_string());
    }
    if let Some(r) = repository {
        config.repository = Some(r.to_string());
    }
    config.repository_path()?;

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &Config) -> String {
    format!(
        r#"project: {}
location: {}
repository: {}

retention:
  days_to_keep: {}
  # Versions with a tag containing any of these are never deleted.
  protected_markers:
    - {}

# Workers per deletion phase.
concurrency: {}

# ignore: exit 0 even if some deletions failed; fail: exit 2.
on_failure: {}

operation:
  poll_interval: 2s
  timeout: 5m

# Defaults to $GOOGLE_OAUTH_ACCESS_TOKEN, then the GCE metadata server.
# access_token:
#   env: ARSWEEP_TOKEN
"#,
        config.project.as_deref().unwrap_or_default(),
        config.location,
        config.repository.as_deref().unwrap_or_default(),
        config.retention.days_to_keep,
        config.retention.protected_markers.first(),
        config.concurrency,
        config.on_failure,
    )
}
