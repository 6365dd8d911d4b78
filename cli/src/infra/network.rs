//! Network infrastructure — implements `NetworkProbe` with reqwest and tokio sockets.

use std::time::Duration;

use tokio::net::TcpStream;

use crate::application::ports::{HttpReply, NetworkProbe};
use crate::domain::ProbeError;

/// Production probe performing real HTTP requests and TCP connects.
pub struct HttpNetworkProbe {
    client: reqwest::Client,
}

impl HttpNetworkProbe {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new() -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("bluegreen/", env!("CARGO_PKG_VERSION")))
            .no_proxy()
            .build()?;
        Ok(Self { client })
    }
}

impl NetworkProbe for HttpNetworkProbe {
    async fn http_get(&self, url: &str, timeout: Duration) -> Result<HttpReply, ProbeError> {
        let response = self
            .client
            .get(url)
            .timeout(timeout)
            .send()
            .await
            .map_err(|e| request_error(&e, timeout))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| request_error(&e, timeout))?;
        Ok(HttpReply { status, body })
    }

    async fn tcp_connect(
        &self,
        host: &str,
        port: u16,
        timeout: Duration,
    ) -> Result<(), ProbeError> {
        match tokio::time::timeout(timeout, TcpStream::connect((host, port))).await {
            Ok(Ok(stream)) => {
                drop(stream);
                Ok(())
            }
            Ok(Err(e)) => Err(ProbeError::Connect(e.to_string())),
            Err(_) => Err(ProbeError::Timeout(timeout)),
        }
    }
}

/// Map a reqwest failure onto the probe taxonomy.
pub(crate) fn request_error(err: &reqwest::Error, timeout: Duration) -> ProbeError {
    if err.is_timeout() {
        ProbeError::Timeout(timeout)
    } else if err.is_connect() {
        ProbeError::Connect(err.to_string())
    } else {
        ProbeError::Response(err.to_string())
    }
}
