//! Network adapters against a local mock HTTP server.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::time::Duration;

use httpmock::prelude::*;

use bluegreen_cli::application::ports::{AddressLookup, NetworkProbe};
use bluegreen_cli::domain::ProbeError;
use bluegreen_cli::infra::metadata::ImdsAddressLookup;
use bluegreen_cli::infra::network::HttpNetworkProbe;

const TIMEOUT: Duration = Duration::from_secs(2);

#[tokio::test]
async fn http_get_returns_status_and_body() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).body(r#"{"status":"running"}"#);
        })
        .await;

    let probe = HttpNetworkProbe::new().unwrap();
    let reply = probe.http_get(&server.url("/"), TIMEOUT).await.unwrap();

    mock.assert_async().await;
    assert_eq!(reply.status, 200);
    assert!(reply.body.contains("running"));
}

#[tokio::test]
async fn non_success_status_is_still_a_reply() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(503).body("starting");
        })
        .await;

    let probe = HttpNetworkProbe::new().unwrap();
    let reply = probe.http_get(&server.url("/"), TIMEOUT).await.unwrap();

    assert_eq!(reply.status, 503);
}

#[tokio::test]
async fn slow_response_times_out() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/");
            then.status(200).delay(Duration::from_millis(1500));
        })
        .await;

    let probe = HttpNetworkProbe::new().unwrap();
    let err = probe
        .http_get(&server.url("/"), Duration::from_millis(200))
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::Timeout(_)), "{err:?}");
}

#[tokio::test]
async fn tcp_connect_succeeds_against_listener_and_fails_when_closed() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let probe = HttpNetworkProbe::new().unwrap();

    probe.tcp_connect("127.0.0.1", port, TIMEOUT).await.unwrap();

    drop(listener);
    let err = probe
        .tcp_connect("127.0.0.1", port, TIMEOUT)
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Connect(_)), "{err:?}");
}

#[tokio::test]
async fn metadata_lookup_sends_header_and_parses_address() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/metadata/instance/network/interface/0/ipv4/ipAddress/0/publicIpAddress")
                .header("Metadata", "true");
            then.status(200).body("20.51.7.9\n");
        })
        .await;
    let url = server.url(
        "/metadata/instance/network/interface/0/ipv4/ipAddress/0/publicIpAddress?api-version=2021-02-01",
    );

    let lookup = ImdsAddressLookup::new(url, TIMEOUT).unwrap();
    let addr = lookup.public_address().await.unwrap();

    mock.assert_async().await;
    assert_eq!(addr, "20.51.7.9");
}

#[tokio::test]
async fn metadata_body_that_is_not_an_address_is_a_parse_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ip");
            then.status(200).body("<html>captive portal</html>");
        })
        .await;

    let lookup = ImdsAddressLookup::new(server.url("/ip"), TIMEOUT).unwrap();
    let err = lookup.public_address().await.unwrap_err();

    assert!(matches!(err, ProbeError::Parse(_)), "{err:?}");
}

#[tokio::test]
async fn metadata_error_status_is_a_response_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/ip");
            then.status(404);
        })
        .await;

    let lookup = ImdsAddressLookup::new(server.url("/ip"), TIMEOUT).unwrap();
    let err = lookup.public_address().await.unwrap_err();

    assert!(matches!(err, ProbeError::Response(_)), "{err:?}");
}
