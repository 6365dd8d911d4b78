//! Application service — take the old instance down and bring the new one up.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::process::Output;

use anyhow::Result;

use crate::application::ports::{ProgressReporter, ServiceSupervisor};
use crate::domain::control::{
    self, ControlPolicy, ControlReport, ControlStep, StepOutcome, StepStatus,
};

/// Run the control sequence for `service`.
///
/// Every step runs even if earlier ones failed, unless the policy marks the
/// failing step strict. A strict failure stops the sequence and is recorded
/// in `halted_at`; the steps run so far stay in the report.
pub async fn switch_to(
    supervisor: &impl ServiceSupervisor,
    service: &str,
    port: u16,
    policy: &ControlPolicy,
    reporter: &impl ProgressReporter,
) -> ControlReport {
    let mut report = ControlReport::default();
    reporter.step(&format!("stopping existing service: {service}"));

    for step in ControlStep::SEQUENCE {
        if step == ControlStep::Reload {
            reporter.step(&format!("starting updated service: {service}"));
        }
        let result = run_step(supervisor, step, service, port).await;
        let outcome = outcome_for(step, result);
        tracing::debug!(
            step = %step,
            status = ?outcome.status,
            exit_code = ?outcome.exit_code,
            "control step finished"
        );

        if outcome.status == StepStatus::Failed {
            reporter.warn(&format!("{step} failed: {}", outcome.detail));
            if !policy.continue_on_error(step) {
                report.steps.push(outcome);
                report.halted_at = Some(step);
                return report;
            }
        }
        report.steps.push(outcome);
    }

    if report.failures().next().is_none() {
        reporter.success(&format!("service {service} enabled and started"));
    }
    report
}

async fn run_step(
    supervisor: &impl ServiceSupervisor,
    step: ControlStep,
    service: &str,
    port: u16,
) -> Result<Output> {
    match step {
        ControlStep::Stop => supervisor.stop(service).await,
        ControlStep::Disable => supervisor.disable(service).await,
        ControlStep::FreePort => supervisor.kill_port(port).await,
        ControlStep::Reload => supervisor.reload().await,
        ControlStep::Enable => supervisor.enable(service).await,
        ControlStep::Start => supervisor.start(service).await,
    }
}

fn outcome_for(step: ControlStep, result: Result<Output>) -> StepOutcome {
    match result {
        Ok(output) => {
            let exit_code = output.status.code();
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let status = control::classify(step, exit_code, &stderr);
            let detail = match (status, exit_code) {
                (StepStatus::Ok, _) => "ok".to_string(),
                (StepStatus::Tolerated, _) if stderr.is_empty() => "nothing to do".to_string(),
                (_, _) if !stderr.is_empty() => stderr,
                (_, Some(code)) => format!("exit code {code}"),
                (_, None) => "terminated by signal".to_string(),
            };
            StepOutcome {
                step,
                status,
                exit_code,
                detail,
            }
        }
        Err(e) => StepOutcome {
            step,
            status: StepStatus::Failed,
            exit_code: None,
            detail: format!("{e:#}"),
        },
    }
}
