//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::domain::health::{collect_issues, probe_label};
use crate::domain::{ProbeStatus, RunReport, Selection, Severity, StepStatus};
use crate::output::OutputContext;

/// Renders a finished run as a terminal summary using `OutputContext`.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Render the run summary followed by the live service status.
    ///
    /// The status snapshot is printed even in quiet mode.
    pub fn render_report(&self, report: &RunReport) {
        if !self.ctx.quiet {
            println!();
            self.ctx.header(&format!(
                "{} {} ({})",
                report.request.mode.label(),
                report.request.app.label(),
                report.unit.service_name
            ));
            self.ctx.kv("Artifact:", &artifact_line(report));
            self.ctx.kv(
                "Definition:",
                &format!("{} ({})", report.unit.path.display(), report.unit.write),
            );
            self.ctx.kv("Control:", &self.control_line(report));
            self.ctx.kv(
                "Public address:",
                report.verification.public_address_display(),
            );
            if let Some(identity) = &report.verification.identity {
                self.ctx.kv(
                    "Serving:",
                    &format!(
                        "{} ({} on {})",
                        identity.app, identity.deployment, identity.hostname
                    ),
                );
            }
            self.render_probes(report);
        }

        println!();
        println!("{}", report.status_snapshot);
    }

    fn render_probes(&self, report: &RunReport) {
        for outcome in report.verification.outcomes() {
            let label = probe_label(outcome.probe);
            match (outcome.status, outcome.severity) {
                (ProbeStatus::Success, _) => {
                    self.ctx.success(&format!("{label}: {}", outcome.detail));
                }
                (ProbeStatus::Skipped, _) | (_, Severity::Notice | Severity::Ok) => {
                    self.ctx.note(&format!("{label}: {}", outcome.detail));
                }
                (_, Severity::Warning) => self.ctx.warn(&format!("{label}: {}", outcome.detail)),
            }
        }

        let issues = collect_issues(&report.verification);
        match report.gate {
            Some(false) => self.ctx.error(&format!(
                "verification gate failed ({} issue(s))",
                issues.len()
            )),
            Some(true) => self.ctx.success("verification gate passed"),
            None if !issues.is_empty() => self.ctx.info(&format!(
                "{} verification issue(s); run completed anyway",
                issues.len()
            )),
            None => {}
        }
    }

    fn control_line(&self, report: &RunReport) -> String {
        let ok = report
            .control
            .steps
            .iter()
            .filter(|s| s.status != StepStatus::Failed)
            .count();
        let failed = report.control_warnings();
        let mut summary = format!("{ok}/{} steps ok", report.control.steps.len());
        if let Some(step) = report.control.halted_at {
            summary.push_str(&format!(", halted at {step}"));
        }
        if failed == 0 {
            summary
        } else {
            format!(
                "{summary}, {}",
                format!("{failed} failed").style(self.ctx.styles.warning)
            )
        }
    }
}

fn artifact_line(report: &RunReport) -> String {
    let artifact = &report.artifact;
    let how = match artifact.selection {
        Selection::Newest => "newest version",
        Selection::Previous => "previous version",
        Selection::OnlyVersion => "only version available",
        Selection::DefaultFallback => "default fallback",
        Selection::InitialFallback => "initial fallback",
    };
    match artifact.modified {
        Some(modified) => format!(
            "{} ({how}, modified {})",
            artifact.path.display(),
            modified.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => format!("{} ({how})", artifact.path.display()),
    }
}
