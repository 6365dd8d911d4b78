//! Shared test helpers: hand-written port implementations and output constructors.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};

use bluegreen_cli::application::ports::{
    AddressLookup, ArtifactStore, GracePeriod, HttpReply, NetworkProbe, ProgressReporter,
    ServiceSupervisor, UnitWriter,
};
use bluegreen_cli::domain::{AppNumber, Candidate, ProbeError, UnitWrite};

// ── Cross-platform ExitStatus construction ───────────────────────────────────

/// Build an `ExitStatus` from a logical exit code (0 = success, non-zero = failure).
///
/// On Unix the raw wait-status encodes the exit code in bits 8–15, so we shift.
#[cfg(unix)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::unix::process::ExitStatusExt;
    ExitStatus::from_raw(code << 8)
}

#[cfg(windows)]
pub fn exit_status(code: i32) -> ExitStatus {
    use std::os::windows::process::ExitStatusExt;
    #[allow(clippy::cast_sign_loss)]
    ExitStatus::from_raw(code as u32)
}

// ── Output constructors ──────────────────────────────────────────────────────

pub fn ok_output(stdout: &[u8]) -> Output {
    Output {
        status: exit_status(0),
        stdout: stdout.to_vec(),
        stderr: Vec::new(),
    }
}

pub fn err_output(code: i32, stderr: &[u8]) -> Output {
    Output {
        status: exit_status(code),
        stdout: Vec::new(),
        stderr: stderr.to_vec(),
    }
}

/// Fixed instant `secs` seconds into 2024.
pub fn at(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200 + secs, 0)
        .single()
        .unwrap_or_default()
}

// ── Reporter ─────────────────────────────────────────────────────────────────

/// Records every progress event; the grace period returns immediately.
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<(&'static str, String)>>,
    pub waited: RefCell<Vec<Duration>>,
}

impl RecordingReporter {
    pub fn messages(&self, kind: &str) -> Vec<String> {
        self.events
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .map(|(_, m)| m.clone())
            .collect()
    }
}

impl ProgressReporter for RecordingReporter {
    fn step(&self, message: &str) {
        self.events.borrow_mut().push(("step", message.to_string()));
    }
    fn success(&self, message: &str) {
        self.events.borrow_mut().push(("success", message.to_string()));
    }
    fn warn(&self, message: &str) {
        self.events.borrow_mut().push(("warn", message.to_string()));
    }
    fn note(&self, message: &str) {
        self.events.borrow_mut().push(("note", message.to_string()));
    }
}

impl GracePeriod for RecordingReporter {
    async fn wait(&self, duration: Duration, _: &str) {
        self.waited.borrow_mut().push(duration);
    }
}

// ── Supervisor ───────────────────────────────────────────────────────────────

/// Records calls as `"<op> <arg>"`; every call succeeds unless overridden.
#[derive(Default)]
pub struct RecordingSupervisor {
    pub calls: RefCell<Vec<String>>,
    pub overrides: HashMap<&'static str, Output>,
    pub status_text: String,
}

impl RecordingSupervisor {
    pub fn failing(op: &'static str, output: Output) -> Self {
        let mut sup = Self::default();
        sup.overrides.insert(op, output);
        sup
    }

    pub fn ops(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .map(|c| c.split_whitespace().next().unwrap_or_default().to_string())
            .collect()
    }

    fn record(&self, op: &'static str, arg: &str) -> Output {
        self.calls.borrow_mut().push(format!("{op} {arg}"));
        match self.overrides.get(op) {
            Some(out) => out.clone(),
            None if op == "status" => ok_output(self.status_text.as_bytes()),
            None => ok_output(b""),
        }
    }
}

impl ServiceSupervisor for RecordingSupervisor {
    async fn stop(&self, service: &str) -> Result<Output> {
        Ok(self.record("stop", service))
    }
    async fn disable(&self, service: &str) -> Result<Output> {
        Ok(self.record("disable", service))
    }
    async fn kill_port(&self, port: u16) -> Result<Output> {
        Ok(self.record("kill_port", &port.to_string()))
    }
    async fn reload(&self) -> Result<Output> {
        Ok(self.record("reload", ""))
    }
    async fn enable(&self, service: &str) -> Result<Output> {
        Ok(self.record("enable", service))
    }
    async fn start(&self, service: &str) -> Result<Output> {
        Ok(self.record("start", service))
    }
    async fn status(&self, service: &str) -> Result<Output> {
        Ok(self.record("status", service))
    }
}

// ── Artifact store ───────────────────────────────────────────────────────────

/// In-memory artifact directory.
pub struct MemoryArtifacts {
    pub root: PathBuf,
    pub files: Vec<(String, DateTime<Utc>)>,
    /// Non-versioned files that exist (fallback names).
    pub plain: Vec<String>,
}

impl MemoryArtifacts {
    pub fn new(root: &str) -> Self {
        Self {
            root: PathBuf::from(root),
            files: Vec::new(),
            plain: Vec::new(),
        }
    }

    #[must_use]
    pub fn with(mut self, name: &str, modified: DateTime<Utc>) -> Self {
        self.files.push((name.to_string(), modified));
        self
    }

    #[must_use]
    pub fn with_plain(mut self, name: &str) -> Self {
        self.plain.push(name.to_string());
        self
    }
}

impl ArtifactStore for MemoryArtifacts {
    fn root(&self) -> &Path {
        &self.root
    }

    fn versioned_candidates(&self, app: &AppNumber) -> Result<Vec<Candidate>> {
        let prefix = app.versioned_prefix();
        Ok(self
            .files
            .iter()
            .filter(|(name, _)| name.starts_with(&prefix) && name.ends_with(".py"))
            .map(|(name, modified)| Candidate {
                path: self.root.join(name),
                modified: *modified,
            })
            .collect())
    }

    fn exists(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        self.plain.iter().any(|p| p == name) || self.files.iter().any(|(f, _)| f == name)
    }
}

// ── Unit writer ──────────────────────────────────────────────────────────────

/// In-memory unit directory; `deny` makes every write fail with `PermissionDenied`.
#[derive(Default)]
pub struct MemoryUnits {
    pub files: RefCell<HashMap<String, String>>,
    pub deny: bool,
}

impl MemoryUnits {
    pub fn denied() -> Self {
        Self {
            deny: true,
            ..Self::default()
        }
    }

    pub fn content(&self, file_name: &str) -> Option<String> {
        self.files.borrow().get(file_name).cloned()
    }
}

impl UnitWriter for MemoryUnits {
    fn unit_path(&self, file_name: &str) -> PathBuf {
        PathBuf::from("/etc/systemd/system").join(file_name)
    }

    fn write_unit(&self, file_name: &str, content: &str) -> io::Result<UnitWrite> {
        if self.deny {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"));
        }
        let previous = self
            .files
            .borrow_mut()
            .insert(file_name.to_string(), content.to_string());
        Ok(UnitWrite::classify(previous.as_deref(), content))
    }
}

// ── Network ──────────────────────────────────────────────────────────────────

/// Canned probe answers; local and public HTTP are told apart by host.
pub struct StubNetwork {
    pub local_http: Result<HttpReply, ProbeError>,
    pub public_http: Result<HttpReply, ProbeError>,
    pub tcp: Result<(), ProbeError>,
    pub urls: RefCell<Vec<String>>,
}

pub const ROOT_BODY: &str = r#"{"message":"Hello from app_2!","app":"app_2","status":"running","deployment":"green","hostname":"vm-1","platform":"Azure VM"}"#;

impl StubNetwork {
    pub fn healthy() -> Self {
        Self {
            local_http: Ok(HttpReply {
                status: 200,
                body: ROOT_BODY.to_string(),
            }),
            public_http: Ok(HttpReply {
                status: 200,
                body: ROOT_BODY.to_string(),
            }),
            tcp: Ok(()),
            urls: RefCell::new(Vec::new()),
        }
    }
}

impl NetworkProbe for StubNetwork {
    async fn http_get(&self, url: &str, _: Duration) -> Result<HttpReply, ProbeError> {
        self.urls.borrow_mut().push(url.to_string());
        if url.contains("127.0.0.1") {
            self.local_http.clone()
        } else {
            self.public_http.clone()
        }
    }

    async fn tcp_connect(&self, _: &str, _: u16, _: Duration) -> Result<(), ProbeError> {
        self.tcp.clone()
    }
}

pub struct StubLookup(pub Result<String, ProbeError>);

impl AddressLookup for StubLookup {
    async fn public_address(&self) -> Result<String, ProbeError> {
        self.0.clone()
    }
}
