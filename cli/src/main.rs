//! bluegreen - switch a single-VM web service between artifact versions

use std::process::ExitCode;

use bluegreen_cli::cli::Cli;
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.no_color || std::env::var_os("NO_COLOR").is_some());

    match cli.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout is reserved for human or JSON output.
fn init_tracing(verbose: bool, no_color: bool) {
    let default = if verbose { "bluegreen_cli=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_ansi(!no_color)
        .init();
}
