//! systemd unit description for the active artifact.

use std::fmt::Write as _;
use std::path::PathBuf;

use serde::Serialize;

use crate::domain::app::{Mode, ResolutionRequest};
use crate::domain::artifact::ArtifactReference;
use crate::domain::config::SwitchConfig;

/// `Restart=` policy of every managed service.
pub const RESTART_POLICY: &str = "always";

/// Boot target the service orders itself after.
pub const AFTER_TARGET: &str = "network.target";

/// Install target the service is enabled into.
pub const WANTED_BY: &str = "multi-user.target";

/// Everything needed to render a unit file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceDescriptor {
    pub service_name: String,
    /// `app_<n>`; used only for documentation in `Description=`.
    pub app_label: String,
    pub mode: Mode,
    pub user: String,
    pub working_dir: PathBuf,
    pub interpreter: PathBuf,
    pub artifact: PathBuf,
}

impl ServiceDescriptor {
    #[must_use]
    pub fn new(
        request: &ResolutionRequest,
        artifact: &ArtifactReference,
        config: &SwitchConfig,
    ) -> Self {
        Self {
            service_name: request.app.service_name(),
            app_label: request.app.label(),
            mode: request.mode,
            user: config.service_user.clone(),
            working_dir: config.artifact_dir.clone(),
            interpreter: config.interpreter.clone(),
            artifact: artifact.path.clone(),
        }
    }

    /// `<service>.service`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}.service", self.service_name)
    }

    #[must_use]
    pub fn exec_start(&self) -> String {
        format!("{} {}", self.interpreter.display(), self.artifact.display())
    }

    /// Render the unit file. Identical descriptors render identical bytes.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "[Unit]");
        let _ = writeln!(
            out,
            "Description=Flask App for {} ({} Mode)",
            self.app_label,
            self.mode.label()
        );
        let _ = writeln!(out, "After={AFTER_TARGET}");
        let _ = writeln!(out);
        let _ = writeln!(out, "[Service]");
        let _ = writeln!(out, "User={}", self.user);
        let _ = writeln!(out, "WorkingDirectory={}", self.working_dir.display());
        let _ = writeln!(out, "ExecStart={}", self.exec_start());
        let _ = writeln!(out, "Restart={RESTART_POLICY}");
        let _ = writeln!(out);
        let _ = writeln!(out, "[Install]");
        let _ = writeln!(out, "WantedBy={WANTED_BY}");
        out
    }
}

/// What writing the unit file did to the file on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitWrite {
    Created,
    Updated,
    /// Previous content was byte-identical; the file was still rewritten.
    Unchanged,
}

impl UnitWrite {
    /// Classify a write from the previous file content, if any.
    #[must_use]
    pub fn classify(previous: Option<&str>, rendered: &str) -> Self {
        match previous {
            None => Self::Created,
            Some(p) if p == rendered => Self::Unchanged,
            Some(_) => Self::Updated,
        }
    }
}

impl std::fmt::Display for UnitWrite {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Unchanged => "unchanged",
        })
    }
}
