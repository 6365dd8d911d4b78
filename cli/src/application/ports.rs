//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain` — never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::Output;
use std::time::Duration;

use anyhow::Result;

use crate::domain::{AppNumber, Candidate, ProbeError, SwitchConfig, UnitWrite};

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
}

// ── Config Store Port ─────────────────────────────────────────────────────────

/// Loads the switcher configuration.
pub trait ConfigStore {
    /// Load the configuration, returning defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    fn load(&self) -> Result<SwitchConfig>;
    /// Path the configuration is read from.
    ///
    /// # Errors
    ///
    /// Returns an error if no candidate location can be determined.
    fn path(&self) -> Result<PathBuf>;
}

// ── Service Supervisor Port ───────────────────────────────────────────────────

/// Lifecycle operations of the host's service supervisor, keyed by service name.
///
/// Every call returns the captured process output; interpreting exit codes is
/// the caller's job.
#[allow(async_fn_in_trait)]
pub trait ServiceSupervisor {
    async fn stop(&self, service: &str) -> Result<Output>;
    async fn disable(&self, service: &str) -> Result<Output>;
    /// Kill any process still bound to `port`/tcp.
    async fn kill_port(&self, port: u16) -> Result<Output>;
    /// Re-read unit definitions.
    async fn reload(&self) -> Result<Output>;
    async fn enable(&self, service: &str) -> Result<Output>;
    async fn start(&self, service: &str) -> Result<Output>;
    /// Human-readable live status.
    async fn status(&self, service: &str) -> Result<Output>;
}

// ── Artifact and Unit Filesystem Ports ────────────────────────────────────────

/// Read-only view of the versioned-artifact directory.
pub trait ArtifactStore {
    /// Directory the artifacts live in.
    fn root(&self) -> &Path;
    /// Scan for `app_<n>_v*.py` right now. Never cached between calls.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory exists but cannot be read.
    fn versioned_candidates(&self, app: &AppNumber) -> Result<Vec<Candidate>>;
    fn exists(&self, path: &Path) -> bool;
}

/// Writes unit files into the supervisor's definition directory.
pub trait UnitWriter {
    /// Full path a unit file with this name is written to.
    fn unit_path(&self, file_name: &str) -> PathBuf;
    /// Open-or-truncate the unit file and write `content` in full.
    ///
    /// # Errors
    ///
    /// Returns the raw I/O error so callers can tell permission problems apart.
    fn write_unit(&self, file_name: &str, content: &str) -> std::io::Result<UnitWrite>;
}

// ── Network Probe Port ────────────────────────────────────────────────────────

/// Status and body of an HTTP response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

/// Abstracts network connectivity checks so application services can be tested
/// without real network access.
#[allow(async_fn_in_trait)]
pub trait NetworkProbe {
    /// `GET url`, bounded by `timeout`. Any status code is an `Ok` reply.
    async fn http_get(&self, url: &str, timeout: Duration) -> Result<HttpReply, ProbeError>;
    /// Open (and immediately close) a TCP connection.
    async fn tcp_connect(&self, host: &str, port: u16, timeout: Duration)
    -> Result<(), ProbeError>;
}

/// Discovers the host's externally routable address.
#[allow(async_fn_in_trait)]
pub trait AddressLookup {
    async fn public_address(&self) -> Result<String, ProbeError>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait — no async needed.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
    /// Emit a low-severity note (expected failures, hints).
    fn note(&self, message: &str);
}

/// Waits out the startup grace period, optionally with visible progress.
#[allow(async_fn_in_trait)]
pub trait GracePeriod {
    async fn wait(&self, duration: Duration, message: &str);
}
