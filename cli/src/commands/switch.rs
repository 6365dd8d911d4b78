//! Switch command — wires production adapters into the switch use-case.

use std::process::ExitCode;

use anyhow::Result;

use crate::app::AppContext;
use crate::application::services::deploy_switch::{SwitchOptions, run_switch};
use crate::domain::{ResolutionRequest, RunReport, SwitchError};
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::{FsUnitWriter, LocalArtifactStore};
use crate::infra::metadata::ImdsAddressLookup;
use crate::infra::network::HttpNetworkProbe;
use crate::infra::supervisor::SystemdSupervisor;
use crate::output::human::HumanRenderer;
use crate::output::json;
use crate::output::reporter::TerminalReporter;

/// Exit code when the verification gate is enabled and fails.
pub const GATE_FAILED_EXIT: u8 = 6;

/// Positional arguments and per-run switches.
pub struct SwitchArgs {
    pub app: String,
    pub mode: String,
    pub strict_health: bool,
}

/// Run one switch or rollback and map the outcome to an exit code.
///
/// # Errors
///
/// Returns an error only if the JSON document cannot be serialized.
pub async fn run(app: &AppContext, args: &SwitchArgs) -> Result<ExitCode> {
    match execute(app, args).await {
        Ok(report) => {
            if app.is_json() {
                println!("{}", json::format_report(&report)?);
            } else {
                HumanRenderer::new(&app.output).render_report(&report);
            }
            if let Some(halt) = report.halt_error() {
                tracing::debug!(code = halt.code(), error = %halt, "switch halted");
                if !app.is_json() {
                    app.output.error(&halt.to_string());
                }
                return Ok(ExitCode::from(halt.exit_code()));
            }
            if report.gate_passed() {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::from(GATE_FAILED_EXIT))
            }
        }
        Err(e) => report_failure(app, &e),
    }
}

async fn execute(app: &AppContext, args: &SwitchArgs) -> Result<RunReport> {
    let request = ResolutionRequest::from_args(&args.app, &args.mode)?;
    let config = &app.config;

    let artifacts = LocalArtifactStore::new(&config.artifact_dir);
    let units = FsUnitWriter::new(&config.unit_dir);
    let supervisor = SystemdSupervisor::new(
        TokioCommandRunner::new(config.command_timeout()),
        config.use_sudo,
    );
    let network = HttpNetworkProbe::new()?;
    let lookup = ImdsAddressLookup::new(config.metadata_url.clone(), config.metadata_timeout())?;
    let reporter = TerminalReporter::new(&app.output);

    run_switch(
        &artifacts,
        &units,
        &supervisor,
        &network,
        &lookup,
        SwitchOptions {
            reporter: &reporter,
            request: &request,
            config,
            strict_health: args.strict_health,
        },
    )
    .await
}

fn report_failure(app: &AppContext, err: &anyhow::Error) -> Result<ExitCode> {
    let (code, exit) = match err.downcast_ref::<SwitchError>() {
        Some(switch_err) => (switch_err.code(), switch_err.exit_code()),
        None => ("error", 1),
    };
    tracing::debug!(code, exit, error = %format!("{err:#}"), "switch failed");
    if app.is_json() {
        println!("{}", json::format_error(&format!("{err:#}"), code, exit)?);
    } else {
        app.output.error(&format!("{err:#}"));
    }
    Ok(ExitCode::from(exit))
}
