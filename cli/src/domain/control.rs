//! Service control sequence: steps, tolerance policy, and outcome classification.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

/// One supervisor operation in the switch sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlStep {
    Stop,
    Disable,
    /// Kill whatever still holds the serving port.
    FreePort,
    /// `systemctl daemon-reload`
    Reload,
    Enable,
    Start,
}

impl ControlStep {
    /// Execution order of the switch sequence.
    pub const SEQUENCE: [Self; 6] = [
        Self::Stop,
        Self::Disable,
        Self::FreePort,
        Self::Reload,
        Self::Enable,
        Self::Start,
    ];

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Stop => "stop",
            Self::Disable => "disable",
            Self::FreePort => "free-port",
            Self::Reload => "reload",
            Self::Enable => "enable",
            Self::Start => "start",
        }
    }
}

impl fmt::Display for ControlStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which steps may fail without stopping the sequence.
///
/// The default tolerates every step: the new version is always brought up,
/// and health problems surface in verification instead.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ControlPolicy {
    strict: HashSet<ControlStep>,
}

impl ControlPolicy {
    /// Policy where the given steps halt the sequence on failure.
    #[must_use]
    pub fn strict_on(steps: &[ControlStep]) -> Self {
        Self {
            strict: steps.iter().copied().collect(),
        }
    }

    #[must_use]
    pub fn continue_on_error(&self, step: ControlStep) -> bool {
        !self.strict.contains(&step)
    }
}

/// Result of one step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    Ok,
    /// Non-zero exit that means "nothing to do" (unit not loaded, port free).
    Tolerated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepOutcome {
    pub step: ControlStep,
    pub status: StepStatus,
    /// Exit code, when the command ran to completion.
    pub exit_code: Option<i32>,
    pub detail: String,
}

/// Outcome of the whole control sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ControlReport {
    pub steps: Vec<StepOutcome>,
    /// Strict step that stopped the sequence, if any.
    pub halted_at: Option<ControlStep>,
}

impl ControlReport {
    /// Steps that failed outright.
    pub fn failures(&self) -> impl Iterator<Item = &StepOutcome> {
        self.steps.iter().filter(|s| s.status == StepStatus::Failed)
    }
}

/// systemctl exit code for "unit not loaded / not installed".
const SYSTEMCTL_NOT_LOADED: i32 = 5;

/// fuser exit code when no process matched.
const FUSER_NO_MATCH: i32 = 1;

/// Classify a completed command.
#[must_use]
pub fn classify(step: ControlStep, exit_code: Option<i32>, stderr: &str) -> StepStatus {
    match (step, exit_code) {
        (_, Some(0)) => StepStatus::Ok,
        (ControlStep::Stop | ControlStep::Disable, Some(SYSTEMCTL_NOT_LOADED)) => {
            StepStatus::Tolerated
        }
        (ControlStep::Stop | ControlStep::Disable, Some(_)) if unit_missing(stderr) => {
            StepStatus::Tolerated
        }
        (ControlStep::FreePort, Some(FUSER_NO_MATCH)) if stderr.trim().is_empty() => {
            StepStatus::Tolerated
        }
        _ => StepStatus::Failed,
    }
}

fn unit_missing(stderr: &str) -> bool {
    let lower = stderr.to_ascii_lowercase();
    lower.contains("not loaded") || lower.contains("does not exist")
}
