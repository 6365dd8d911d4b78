//! Domain types and validators for switcher configuration.
//!
//! Pure functions only — no I/O, no async, no filesystem access.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::control::{ControlPolicy, ControlStep};
use crate::domain::error::ConfigError;

// ── Defaults ─────────────────────────────────────────────────────────────────

/// Azure Instance Metadata Service query for the first NIC's public address.
pub const AZURE_PUBLIC_IP_URL: &str = "http://169.254.169.254/metadata/instance/network/interface/0/ipv4/ipAddress/0/publicIpAddress?api-version=2021-02-01";

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration, usually `/etc/bluegreen/config.yaml`.
///
/// Every field has a default, so an absent file or an empty document yields
/// the layout of a freshly provisioned VM.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SwitchConfig {
    /// Directory holding `app_<n>_v*.py` artifacts; also the service's working directory.
    pub artifact_dir: PathBuf,
    /// Directory the unit file is written into.
    pub unit_dir: PathBuf,
    /// Interpreter that runs the artifact.
    pub interpreter: PathBuf,
    /// `User=` of the managed service.
    pub service_user: String,
    /// Port the application listens on.
    pub serving_port: u16,
    /// Port probed on the public address.
    pub public_port: u16,
    pub grace_period_secs: u64,
    pub local_probe_timeout_secs: u64,
    pub public_probe_timeout_secs: u64,
    pub metadata_timeout_secs: u64,
    /// Upper bound for every supervisor command.
    pub command_timeout_secs: u64,
    pub metadata_url: String,
    /// Prefix supervisor commands with `sudo`.
    pub use_sudo: bool,
    /// Fail the run (exit 6) when a local probe does not succeed.
    pub verification_gates_exit: bool,
    /// Control steps whose failure halts the sequence.
    pub strict_control_steps: Vec<ControlStep>,
}

impl Default for SwitchConfig {
    fn default() -> Self {
        Self {
            artifact_dir: PathBuf::from("/home/azureuser"),
            unit_dir: PathBuf::from("/etc/systemd/system"),
            interpreter: PathBuf::from("/usr/bin/python3"),
            service_user: "root".to_string(),
            serving_port: 80,
            public_port: 80,
            grace_period_secs: 5,
            local_probe_timeout_secs: 3,
            public_probe_timeout_secs: 5,
            metadata_timeout_secs: 3,
            command_timeout_secs: 30,
            metadata_url: AZURE_PUBLIC_IP_URL.to_string(),
            use_sudo: false,
            verification_gates_exit: false,
            strict_control_steps: Vec::new(),
        }
    }
}

impl SwitchConfig {
    #[must_use]
    pub fn grace_period(&self) -> Duration {
        Duration::from_secs(self.grace_period_secs)
    }

    #[must_use]
    pub fn local_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.local_probe_timeout_secs)
    }

    #[must_use]
    pub fn public_probe_timeout(&self) -> Duration {
        Duration::from_secs(self.public_probe_timeout_secs)
    }

    #[must_use]
    pub fn metadata_timeout(&self) -> Duration {
        Duration::from_secs(self.metadata_timeout_secs)
    }

    #[must_use]
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    #[must_use]
    pub fn control_policy(&self) -> ControlPolicy {
        ControlPolicy::strict_on(&self.strict_control_steps)
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a loaded configuration.
///
/// # Errors
///
/// Returns an error naming the first invalid field.
pub fn validate_config(config: &SwitchConfig) -> Result<()> {
    for (key, path) in [
        ("artifact_dir", &config.artifact_dir),
        ("unit_dir", &config.unit_dir),
        ("interpreter", &config.interpreter),
    ] {
        if path.as_os_str().is_empty() {
            return Err(invalid(key, "", "a non-empty path"));
        }
        if !path.is_absolute() {
            return Err(invalid(key, &path.display().to_string(), "an absolute path"));
        }
    }
    if config.service_user.trim().is_empty() {
        return Err(invalid("service_user", &config.service_user, "a user name"));
    }
    for (key, port) in [
        ("serving_port", config.serving_port),
        ("public_port", config.public_port),
    ] {
        if port == 0 {
            return Err(invalid(key, "0", "a port between 1 and 65535"));
        }
    }
    for (key, secs) in [
        ("local_probe_timeout_secs", config.local_probe_timeout_secs),
        ("public_probe_timeout_secs", config.public_probe_timeout_secs),
        ("metadata_timeout_secs", config.metadata_timeout_secs),
        ("command_timeout_secs", config.command_timeout_secs),
    ] {
        if secs == 0 {
            return Err(invalid(key, "0", "at least 1 second"));
        }
    }
    if !(config.metadata_url.starts_with("http://") || config.metadata_url.starts_with("https://"))
    {
        return Err(invalid("metadata_url", &config.metadata_url, "an http(s) URL"));
    }
    Ok(())
}

fn invalid(key: &str, value: &str, expected: &str) -> anyhow::Error {
    ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
        expected: expected.to_string(),
    }
    .into()
}
