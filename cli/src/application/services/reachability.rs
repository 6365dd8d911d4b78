//! Application service — confirm the new instance answers after start.
//!
//! Verification is observational: every probe outcome is recorded, none of
//! them aborts the run.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use bluegreen_common::RootResponse;

use crate::application::ports::{AddressLookup, GracePeriod, NetworkProbe, ProgressReporter};
use crate::domain::health::{AppIdentity, Probe, ProbeOutcome, VerificationResult};
use crate::domain::SwitchConfig;

/// Loopback address every local probe targets.
pub const LOOPBACK: &str = "127.0.0.1";

/// Ports, timeouts and grace period for one verification pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub port: u16,
    pub public_port: u16,
    pub grace_period: Duration,
    pub local_timeout: Duration,
    pub public_timeout: Duration,
}

impl From<&SwitchConfig> for ProbeSettings {
    fn from(config: &SwitchConfig) -> Self {
        Self {
            port: config.serving_port,
            public_port: config.public_port,
            grace_period: config.grace_period(),
            local_timeout: config.local_probe_timeout(),
            public_timeout: config.public_probe_timeout(),
        }
    }
}

/// Wait for the grace period, then run all four probes in order.
pub async fn verify(
    network: &impl NetworkProbe,
    lookup: &impl AddressLookup,
    waiter: &impl GracePeriod,
    settings: &ProbeSettings,
    reporter: &impl ProgressReporter,
) -> VerificationResult {
    waiter
        .wait(
            settings.grace_period,
            &format!("waiting for app to start on port {}...", settings.port),
        )
        .await;

    let (local_http, identity) = probe_local_http(network, settings, reporter).await;
    let local_socket = probe_local_socket(network, settings, reporter).await;

    let (address_lookup, public_address) = match lookup.public_address().await {
        Ok(addr) => {
            reporter.step(&format!(
                "app should be accessible at: {}",
                public_url(&addr, settings.public_port)
            ));
            (ProbeOutcome::success(Probe::AddressLookup, addr.clone()), Some(addr))
        }
        Err(e) => {
            reporter.note(&format!("could not retrieve public address: {e}"));
            (ProbeOutcome::from_error(Probe::AddressLookup, &e), None)
        }
    };

    let public_http = match &public_address {
        Some(addr) => probe_public_http(network, addr, settings, reporter).await,
        None => ProbeOutcome::skipped(Probe::PublicHttp, "public address unknown"),
    };

    let result = VerificationResult {
        local_http,
        local_socket,
        address_lookup,
        public_http,
        public_address,
        identity,
    };
    tracing::info!(
        local_ok = result.local_ok(),
        worst = ?result.worst_severity(),
        public_address = result.public_address_display(),
        "verification finished"
    );
    result
}

async fn probe_local_http(
    network: &impl NetworkProbe,
    settings: &ProbeSettings,
    reporter: &impl ProgressReporter,
) -> (ProbeOutcome, Option<AppIdentity>) {
    let url = format!("http://{LOOPBACK}:{}/", settings.port);
    match network.http_get(&url, settings.local_timeout).await {
        Ok(reply) if reply.status == 200 => {
            reporter.success("app responded successfully on localhost");
            let identity = identity_from_body(&reply.body);
            (ProbeOutcome::success(Probe::LocalHttp, "HTTP 200"), identity)
        }
        Ok(reply) => {
            let detail = format!("responded with status {}", reply.status);
            reporter.warn(&format!("app {detail}"));
            (ProbeOutcome::failure(Probe::LocalHttp, detail), None)
        }
        Err(e) => {
            reporter.warn(&format!("health check failed on localhost: {e}"));
            (ProbeOutcome::from_error(Probe::LocalHttp, &e), None)
        }
    }
}

async fn probe_local_socket(
    network: &impl NetworkProbe,
    settings: &ProbeSettings,
    reporter: &impl ProgressReporter,
) -> ProbeOutcome {
    let port = settings.port;
    match network
        .tcp_connect(LOOPBACK, port, settings.local_timeout)
        .await
    {
        Ok(()) => {
            reporter.success(&format!("port {port} is accessible via socket"));
            ProbeOutcome::success(Probe::LocalSocket, format!("port {port} accepting"))
        }
        Err(e) => {
            reporter.warn(&format!("port {port} is not accessible via socket: {e}"));
            ProbeOutcome::from_error(Probe::LocalSocket, &e)
        }
    }
}

async fn probe_public_http(
    network: &impl NetworkProbe,
    addr: &str,
    settings: &ProbeSettings,
    reporter: &impl ProgressReporter,
) -> ProbeOutcome {
    let url = public_url(addr, settings.public_port);
    match network.http_get(&url, settings.public_timeout).await {
        Ok(reply) if reply.status == 200 => {
            reporter.success("app is accessible via public address");
            ProbeOutcome::success(Probe::PublicHttp, "HTTP 200")
        }
        Ok(reply) => {
            let detail = format!("public address responded with status {}", reply.status);
            reporter.note(&detail);
            ProbeOutcome::failure(Probe::PublicHttp, detail)
        }
        Err(e) => {
            reporter.note(&format!(
                "public address test failed (this may be normal due to network security rules): {e}"
            ));
            ProbeOutcome::from_error(Probe::PublicHttp, &e)
        }
    }
}

/// `http://<addr>:<port>/`, bracketing IPv6 literals.
#[must_use]
pub fn public_url(addr: &str, port: u16) -> String {
    match addr.parse::<IpAddr>() {
        Ok(ip) if port == 80 => match ip {
            IpAddr::V4(v4) => format!("http://{v4}/"),
            IpAddr::V6(v6) => format!("http://[{v6}]/"),
        },
        Ok(ip) => format!("http://{}/", SocketAddr::new(ip, port)),
        Err(_) if port == 80 => format!("http://{addr}/"),
        Err(_) => format!("http://{addr}:{port}/"),
    }
}

fn identity_from_body(body: &str) -> Option<AppIdentity> {
    let root: RootResponse = serde_json::from_str(body).ok()?;
    Some(AppIdentity {
        app: root.app,
        deployment: root.deployment,
        hostname: root.hostname,
    })
}
