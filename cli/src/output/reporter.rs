//! `TerminalReporter` — Presentation-layer implementation of `ProgressReporter`
//! and `GracePeriod`.
//!
//! Wraps `&OutputContext` so application services can emit progress events
//! without depending on any presentation type directly.

use std::time::Duration;

use crate::application::ports::{GracePeriod, ProgressReporter};
use crate::output::{OutputContext, progress};

/// Terminal progress reporter that wraps an `OutputContext`.
///
/// - `step()` prints `"  → {message}"`
/// - `success()` prints `"  ✓ {message}"`
/// - `warn()` prints `"  ⚠ {message}"`
/// - `note()` prints `"  · {message}"`
///
/// All four are suppressed when `ctx.quiet`. Every event is also logged via
/// `tracing` so `-v` runs keep a record even in quiet mode.
pub struct TerminalReporter<'a> {
    ctx: &'a OutputContext,
}

impl<'a> TerminalReporter<'a> {
    /// Create a new `TerminalReporter` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }
}

impl ProgressReporter for TerminalReporter<'_> {
    fn step(&self, message: &str) {
        tracing::debug!(target: "bluegreen_cli::progress", "{message}");
        self.ctx.step(message);
    }

    fn success(&self, message: &str) {
        tracing::debug!(target: "bluegreen_cli::progress", "{message}");
        self.ctx.success(message);
    }

    fn warn(&self, message: &str) {
        tracing::debug!(target: "bluegreen_cli::progress", "{message}");
        self.ctx.warn(message);
    }

    fn note(&self, message: &str) {
        tracing::debug!(target: "bluegreen_cli::progress", "{message}");
        self.ctx.note(message);
    }
}

impl GracePeriod for TerminalReporter<'_> {
    async fn wait(&self, duration: Duration, message: &str) {
        if duration.is_zero() {
            return;
        }
        if self.ctx.show_progress() {
            let pb = progress::spinner(message);
            tokio::time::sleep(duration).await;
            progress::finish_ok(&pb, &format!("waited {}s", duration.as_secs()));
        } else {
            self.ctx.step(message);
            tokio::time::sleep(duration).await;
        }
    }
}
