//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator; the command layer recovers them with `downcast_ref`
//! to pick an exit code.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::domain::control::ControlStep;

// ── Switch errors ─────────────────────────────────────────────────────────────

/// Fatal conditions that stop a run.
///
/// Every variant except `ControlHalted` is raised before the running service
/// is touched.
#[derive(Debug, Error)]
pub enum SwitchError {
    #[error("Invalid app identifier '{identifier}': expected 'default', 'app<N>' or '<N>'.")]
    InvalidAppIdentifier { identifier: String },

    #[error(
        "No rollback targets found for app {app}: no versioned or initial files available in {}.",
        .dir.display()
    )]
    NoRollbackTarget { app: String, dir: PathBuf },

    #[error("Permission denied writing {}. Run with sudo.", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("Cannot write service definition {}: {source}", .path.display())]
    DefinitionWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Service control halted at '{step}': {reason}")]
    ControlHalted { step: ControlStep, reason: String },
}

impl SwitchError {
    /// Process exit code for this failure.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidAppIdentifier { .. } => 1,
            Self::NoRollbackTarget { .. } => 3,
            Self::PermissionDenied { .. } | Self::DefinitionWrite { .. } => 4,
            Self::ControlHalted { .. } => 5,
        }
    }

    /// Stable machine-readable code used in JSON error objects.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidAppIdentifier { .. } => "invalid_app_identifier",
            Self::NoRollbackTarget { .. } => "resolution_exhausted",
            Self::PermissionDenied { .. } => "permission_denied",
            Self::DefinitionWrite { .. } => "definition_write_failed",
            Self::ControlHalted { .. } => "control_halted",
        }
    }
}

// ── Probe errors ──────────────────────────────────────────────────────────────

/// Why a reachability probe or address lookup did not succeed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProbeError {
    #[error("timed out after {}s", .0.as_secs_f32())]
    Timeout(Duration),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("unexpected response: {0}")]
    Response(String),

    #[error("unparseable response: {0}")]
    Parse(String),
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: '{value}'\n\nExpected {expected}.")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
