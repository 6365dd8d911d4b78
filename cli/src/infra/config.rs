//! Infrastructure implementation of the `ConfigStore` port.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::domain::config::{SwitchConfig, validate_config};

/// Environment variable overriding the config file location.
pub const CONFIG_ENV: &str = "BLUEGREEN_CONFIG";
/// System-wide config location, checked before the per-user one.
pub const SYSTEM_CONFIG: &str = "/etc/bluegreen/config.yaml";

/// Production implementation of `ConfigStore` that reads a YAML file on disk.
///
/// Lookup order: explicit path, `BLUEGREEN_CONFIG`, `/etc/bluegreen/config.yaml`
/// when present, then `<config dir>/bluegreen/config.yaml`.
#[derive(Debug, Default)]
pub struct YamlConfigStore {
    explicit: Option<PathBuf>,
}

impl YamlConfigStore {
    #[must_use]
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl ConfigStore for YamlConfigStore {
    fn load(&self) -> Result<SwitchConfig> {
        let path = self.path()?;
        let config = load_from(&path)?;
        validate_config(&config).with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    fn path(&self) -> Result<PathBuf> {
        if let Some(path) = &self.explicit {
            return Ok(path.clone());
        }
        if let Ok(val) = std::env::var(CONFIG_ENV)
            && !val.is_empty()
        {
            return Ok(PathBuf::from(val));
        }
        let system = PathBuf::from(SYSTEM_CONFIG);
        if system.exists() {
            return Ok(system);
        }
        let base =
            dirs::config_dir().ok_or_else(|| anyhow::anyhow!("cannot determine config directory"))?;
        Ok(base.join("bluegreen").join("config.yaml"))
    }
}

/// Missing file means defaults; anything else must parse.
fn load_from(path: &Path) -> Result<SwitchConfig> {
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(SwitchConfig::default());
    }
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    if content.trim().is_empty() {
        return Ok(SwitchConfig::default());
    }
    serde_yaml::from_str(&content).with_context(|| format!("cannot parse {}", path.display()))
}
