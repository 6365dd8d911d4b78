//! Run report accumulated across the switch pipeline.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::app::ResolutionRequest;
use crate::domain::artifact::ArtifactReference;
use crate::domain::control::ControlReport;
use crate::domain::error::SwitchError;
use crate::domain::health::VerificationResult;
use crate::domain::unit::UnitWrite;

/// Where the unit file went and what the write did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnitReport {
    pub path: PathBuf,
    pub service_name: String,
    pub write: UnitWrite,
}

/// Everything one invocation did, in pipeline order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub request: ResolutionRequest,
    pub artifact: ArtifactReference,
    pub unit: UnitReport,
    pub control: ControlReport,
    pub verification: VerificationResult,
    /// Live supervisor status captured at the end of the run, halted or not.
    pub status_snapshot: String,
    /// `Some(passed)` when verification gates the exit code.
    pub gate: Option<bool>,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// `true` unless an enabled verification gate failed.
    #[must_use]
    pub fn gate_passed(&self) -> bool {
        self.gate.unwrap_or(true)
    }

    /// Number of control steps that failed (non-fatal warnings).
    #[must_use]
    pub fn control_warnings(&self) -> usize {
        self.control.failures().count()
    }

    /// The halt as an error, when a strict control step stopped the run.
    #[must_use]
    pub fn halt_error(&self) -> Option<SwitchError> {
        let step = self.control.halted_at?;
        let reason = self
            .control
            .steps
            .iter()
            .rev()
            .find(|s| s.step == step)
            .map_or_else(String::new, |s| s.detail.clone());
        Some(SwitchError::ControlHalted { step, reason })
    }
}
