//! CLI argument parsing with clap derive

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use crate::app::{AppContext, AppFlags, OutputFlags};
use crate::commands;
use crate::output::{OutputContext, json};

/// Blue-green switcher for a single-VM web application service
#[derive(Parser)]
#[command(name = "bluegreen", version)]
pub struct Cli {
    /// Application identifier: `default`, `1`, `app1` or `app_1`
    #[arg(default_value = "default")]
    pub app: String,

    /// `rollback` to activate the previous version; anything else switches
    #[arg(default_value = "switch")]
    pub mode: String,

    /// Configuration file
    #[arg(long, env = "BLUEGREEN_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, env = "NO_COLOR")]
    pub no_color: bool,

    /// Enable debug logging on stderr
    #[arg(short, long)]
    pub verbose: bool,

    /// Exit non-zero when the new service is not reachable locally
    #[arg(long)]
    pub strict_health: bool,
}

impl Cli {
    /// Execute the switch.
    ///
    /// # Errors
    ///
    /// Returns an error only if output itself cannot be produced; run
    /// failures are reported and mapped to an exit code.
    pub async fn run(self) -> Result<ExitCode> {
        let flags = AppFlags {
            output: OutputFlags {
                no_color: self.no_color,
                quiet: self.quiet,
                json: self.json,
            },
            config: self.config.clone(),
        };
        let app = match AppContext::new(&flags) {
            Ok(app) => app,
            Err(e) => {
                tracing::debug!(error = %format!("{e:#}"), "configuration failed");
                if self.json {
                    println!("{}", json::format_error(&format!("{e:#}"), "config_error", 1)?);
                } else {
                    OutputContext::new(self.no_color, self.quiet).error(&format!("{e:#}"));
                }
                return Ok(ExitCode::FAILURE);
            }
        };
        let args = commands::switch::SwitchArgs {
            app: self.app,
            mode: self.mode,
            strict_health: self.strict_health,
        };
        commands::switch::run(&app, &args).await
    }
}
