//! Application identity: identifier normalization and the names derived from it.

use std::fmt;

use serde::Serialize;

use crate::domain::error::SwitchError;

/// Identifier used when none is given on the command line.
pub const DEFAULT_IDENTIFIER: &str = "default";

/// App number that `default` stands for.
const DEFAULT_APP_NUMBER: &str = "1";

/// Canonical app number, e.g. `2` for `app2`.
///
/// Every artifact name, unit name and URL slug is derived from this value, so
/// it is restricted to ASCII alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct AppNumber(String);

impl AppNumber {
    /// Normalize a raw app identifier.
    ///
    /// `default` maps to `1`; a leading `app_` or `app` prefix is stripped.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchError::InvalidAppIdentifier`] if nothing usable remains.
    pub fn parse(identifier: &str) -> Result<Self, SwitchError> {
        let trimmed = identifier.trim();
        if trimmed == DEFAULT_IDENTIFIER {
            return Ok(Self(DEFAULT_APP_NUMBER.to_string()));
        }
        let number = trimmed
            .strip_prefix("app_")
            .or_else(|| trimmed.strip_prefix("app"))
            .unwrap_or(trimmed);
        if number.is_empty() || !number.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(SwitchError::InvalidAppIdentifier {
                identifier: identifier.to_string(),
            });
        }
        Ok(Self(number.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `app_<n>` — the label used in unit descriptions and by the apps themselves.
    #[must_use]
    pub fn label(&self) -> String {
        format!("app_{}", self.0)
    }

    /// `flask-app-app_<n>` — the supervised service name.
    #[must_use]
    pub fn service_name(&self) -> String {
        format!("flask-app-{}", self.label())
    }

    /// `app_<n>_v` — file-name prefix shared by every versioned artifact.
    #[must_use]
    pub fn versioned_prefix(&self) -> String {
        format!("app_{}_v", self.0)
    }

    /// `app_<n>.py` — the non-versioned default artifact.
    #[must_use]
    pub fn default_artifact(&self) -> String {
        format!("app_{}.py", self.0)
    }

    /// `app_app_<n>.py` — the artifact laid down at initial provisioning.
    #[must_use]
    pub fn initial_artifact(&self) -> String {
        format!("app_app_{}.py", self.0)
    }
}

impl fmt::Display for AppNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which artifact a run activates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Activate the newest version.
    #[default]
    Switch,
    /// Activate the version before the newest.
    Rollback,
}

impl Mode {
    /// Only an exact `rollback` selects rollback; anything else switches.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        if raw == "rollback" {
            Self::Rollback
        } else {
            Self::Switch
        }
    }

    /// Capitalized label used in unit descriptions.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Switch => "Switch",
            Self::Rollback => "Rollback",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Switch => f.write_str("switch"),
            Self::Rollback => f.write_str("rollback"),
        }
    }
}

/// A normalized request to activate one app in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolutionRequest {
    /// Identifier exactly as the operator typed it.
    pub identifier: String,
    pub app: AppNumber,
    pub mode: Mode,
}

impl ResolutionRequest {
    /// Build a request from raw CLI arguments.
    ///
    /// # Errors
    ///
    /// Returns [`SwitchError::InvalidAppIdentifier`] for unusable identifiers.
    pub fn from_args(identifier: &str, mode: &str) -> Result<Self, SwitchError> {
        Ok(Self {
            identifier: identifier.to_string(),
            app: AppNumber::parse(identifier)?,
            mode: Mode::parse_lenient(mode),
        })
    }
}
