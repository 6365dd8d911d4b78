//! Application context — unified state passed to the command handler.
//!
//! `AppContext` bundles the output context, the output mode, and the loaded
//! configuration so the command handler takes a single `&AppContext`.

use std::path::PathBuf;

use anyhow::Result;

use crate::application::ports::ConfigStore;
use crate::domain::SwitchConfig;
use crate::infra::config::YamlConfigStore;
use crate::output::OutputContext;

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Explicit config file (`--config` / `BLUEGREEN_CONFIG`).
    pub config: Option<PathBuf>,
}

/// Unified application context passed to the command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    ///
    /// Always quiet in JSON mode so stdout carries a single document.
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Loaded and validated configuration.
    pub config: SwitchConfig,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read, parsed,
    /// or validated.
    pub fn new(flags: &AppFlags) -> Result<Self> {
        let store = YamlConfigStore::new(flags.config.clone());
        let config_path = store.path()?;
        let config = store.load()?;
        tracing::debug!(path = %config_path.display(), ?config, "configuration loaded");
        Ok(Self::with_config(flags, config))
    }

    fn with_config(flags: &AppFlags, config: SwitchConfig) -> Self {
        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };
        let quiet = flags.output.quiet || flags.output.json;
        Self {
            output: OutputContext::new(flags.output.no_color, quiet),
            mode,
            config,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }
}
