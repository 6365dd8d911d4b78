//! Application service — the full blue-green switch use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use anyhow::Result;
use chrono::Utc;

use crate::application::ports::{
    AddressLookup, ArtifactStore, GracePeriod, NetworkProbe, ProgressReporter, ServiceSupervisor,
    UnitWriter,
};
use crate::application::services::artifact_resolve::resolve_artifact;
use crate::application::services::reachability::{self, ProbeSettings};
use crate::application::services::service_switch::switch_to;
use crate::application::services::unit_write::write_definition;
use crate::domain::health::VerificationResult;
use crate::domain::report::RunReport;
use crate::domain::{ResolutionRequest, ServiceDescriptor, SwitchConfig};

/// Inputs of one switch run.
pub struct SwitchOptions<'a, R: ProgressReporter + GracePeriod> {
    pub reporter: &'a R,
    pub request: &'a ResolutionRequest,
    pub config: &'a SwitchConfig,
    /// Overrides `config.verification_gates_exit` when `true`.
    pub strict_health: bool,
}

/// Resolve, write the definition, restart, verify, and snapshot status.
///
/// Fatal failures stop the pipeline at the stage that raised them; resolution
/// and definition-write failures happen before the supervisor is called.
/// A strict control step that fails skips verification but still returns a
/// report, with `control.halted_at` set and the status snapshot captured.
///
/// # Errors
///
/// Returns a wrapped [`crate::domain::SwitchError`] for resolution and
/// definition-write failures, or an error if the artifact directory cannot
/// be scanned.
pub async fn run_switch(
    artifacts: &impl ArtifactStore,
    units: &impl UnitWriter,
    supervisor: &impl ServiceSupervisor,
    network: &impl NetworkProbe,
    lookup: &impl AddressLookup,
    opts: SwitchOptions<'_, impl ProgressReporter + GracePeriod>,
) -> Result<RunReport> {
    let SwitchOptions {
        reporter,
        request,
        config,
        strict_health,
    } = opts;
    let started_at = Utc::now();
    tracing::info!(
        identifier = %request.identifier,
        app = %request.app,
        mode = %request.mode,
        "switch run started"
    );

    // Step 1: Resolve artifact.
    let artifact = resolve_artifact(artifacts, request, reporter)?;

    // Step 2: Write the definition before touching the running service.
    let descriptor = ServiceDescriptor::new(request, &artifact, config);
    let unit = write_definition(units, &descriptor, reporter)?;

    // Step 3: Stop old, start new.
    let control = switch_to(
        supervisor,
        &descriptor.service_name,
        config.serving_port,
        &config.control_policy(),
        reporter,
    )
    .await;

    // Step 4: Verify reachability; nothing to probe after a halt.
    let verification = if control.halted_at.is_some() {
        VerificationResult::skipped("control sequence halted")
    } else {
        reachability::verify(
            network,
            lookup,
            reporter,
            &ProbeSettings::from(config),
            reporter,
        )
        .await
    };

    // Step 5: Capture live status.
    let status_snapshot = status_snapshot(supervisor, &descriptor.service_name).await;

    let gate = (control.halted_at.is_none() && (strict_health || config.verification_gates_exit))
        .then(|| verification.local_ok());
    if gate == Some(false) {
        reporter.warn("verification gate failed: local probes did not succeed");
    }

    Ok(RunReport {
        request: request.clone(),
        artifact,
        unit,
        control,
        verification,
        status_snapshot,
        gate,
        started_at,
        finished_at: Utc::now(),
    })
}

async fn status_snapshot(supervisor: &impl ServiceSupervisor, service: &str) -> String {
    match supervisor.status(service).await {
        Ok(output) => {
            let stdout = String::from_utf8_lossy(&output.stdout).trim_end().to_string();
            if stdout.is_empty() {
                String::from_utf8_lossy(&output.stderr).trim_end().to_string()
            } else {
                stdout
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "status snapshot failed");
            format!("status unavailable: {e:#}")
        }
    }
}
