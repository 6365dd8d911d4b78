//! Reachability verification types and pure diagnostic functions.
//!
//! This module is intentionally free of I/O, async, and external layer imports.

use serde::Serialize;

use crate::domain::error::ProbeError;

// ── Types ─────────────────────────────────────────────────────────────────────

/// The four post-start checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Probe {
    LocalHttp,
    LocalSocket,
    AddressLookup,
    PublicHttp,
}

impl Probe {
    /// Severity a failure of this probe is reported at.
    ///
    /// Public-side failures are expected behind restrictive network
    /// policies and rank below local failures.
    #[must_use]
    pub fn failure_severity(self) -> Severity {
        match self {
            Self::LocalHttp | Self::LocalSocket => Severity::Warning,
            Self::AddressLookup | Self::PublicHttp => Severity::Notice,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeStatus {
    Success,
    Failure,
    Timeout,
    Skipped,
}

/// Ordered lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Ok,
    Notice,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub probe: Probe,
    pub status: ProbeStatus,
    pub severity: Severity,
    pub detail: String,
}

impl ProbeOutcome {
    #[must_use]
    pub fn success(probe: Probe, detail: impl Into<String>) -> Self {
        Self {
            probe,
            status: ProbeStatus::Success,
            severity: Severity::Ok,
            detail: detail.into(),
        }
    }

    /// A probe that ran but did not get the answer it wanted.
    #[must_use]
    pub fn failure(probe: Probe, detail: impl Into<String>) -> Self {
        Self {
            probe,
            status: ProbeStatus::Failure,
            severity: probe.failure_severity(),
            detail: detail.into(),
        }
    }

    /// Map a probe error; timeouts keep their own status.
    #[must_use]
    pub fn from_error(probe: Probe, err: &ProbeError) -> Self {
        let status = match err {
            ProbeError::Timeout(_) => ProbeStatus::Timeout,
            _ => ProbeStatus::Failure,
        };
        Self {
            probe,
            status,
            severity: probe.failure_severity(),
            detail: err.to_string(),
        }
    }

    #[must_use]
    pub fn skipped(probe: Probe, reason: impl Into<String>) -> Self {
        Self {
            probe,
            status: ProbeStatus::Skipped,
            severity: Severity::Notice,
            detail: reason.into(),
        }
    }

    #[must_use]
    pub fn succeeded(&self) -> bool {
        self.status == ProbeStatus::Success
    }
}

/// Which build answered the local probe, when its root body was readable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppIdentity {
    pub app: String,
    pub deployment: String,
    pub hostname: String,
}

/// Outcome of all four probes. Advisory: nothing here fails a run by itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VerificationResult {
    pub local_http: ProbeOutcome,
    pub local_socket: ProbeOutcome,
    pub address_lookup: ProbeOutcome,
    pub public_http: ProbeOutcome,
    /// Public address, or `None` when the lookup failed ("unknown").
    pub public_address: Option<String>,
    pub identity: Option<AppIdentity>,
}

impl VerificationResult {
    /// Every probe skipped for the same reason; nothing was started to probe.
    #[must_use]
    pub fn skipped(reason: &str) -> Self {
        Self {
            local_http: ProbeOutcome::skipped(Probe::LocalHttp, reason),
            local_socket: ProbeOutcome::skipped(Probe::LocalSocket, reason),
            address_lookup: ProbeOutcome::skipped(Probe::AddressLookup, reason),
            public_http: ProbeOutcome::skipped(Probe::PublicHttp, reason),
            public_address: None,
            identity: None,
        }
    }

    #[must_use]
    pub fn outcomes(&self) -> [&ProbeOutcome; 4] {
        [
            &self.local_http,
            &self.local_socket,
            &self.address_lookup,
            &self.public_http,
        ]
    }

    /// Highest severity across all probes.
    #[must_use]
    pub fn worst_severity(&self) -> Severity {
        self.outcomes()
            .iter()
            .map(|o| o.severity)
            .max()
            .unwrap_or(Severity::Ok)
    }

    /// `true` when both local probes succeeded.
    #[must_use]
    pub fn local_ok(&self) -> bool {
        self.local_http.succeeded() && self.local_socket.succeeded()
    }

    /// Address as shown to operators.
    #[must_use]
    pub fn public_address_display(&self) -> &str {
        self.public_address.as_deref().unwrap_or("unknown")
    }
}

// ── Pure functions ────────────────────────────────────────────────────────────

/// Collect human-readable issues for every probe that did not succeed.
#[must_use]
pub fn collect_issues(result: &VerificationResult) -> Vec<String> {
    result
        .outcomes()
        .iter()
        .filter(|o| !o.succeeded() && o.status != ProbeStatus::Skipped)
        .map(|o| format!("{}: {}", probe_label(o.probe), o.detail))
        .collect()
}

/// Short label used in reports.
#[must_use]
pub fn probe_label(probe: Probe) -> &'static str {
    match probe {
        Probe::LocalHttp => "local HTTP",
        Probe::LocalSocket => "local socket",
        Probe::AddressLookup => "public address lookup",
        Probe::PublicHttp => "public HTTP",
    }
}

// ── Unit tests ────────────────────────────────────────────────────────────────
