//! Cloud instance-metadata implementation of `AddressLookup`.

use std::net::IpAddr;
use std::time::Duration;

use crate::application::ports::AddressLookup;
use crate::domain::ProbeError;
use crate::infra::network::request_error;

/// Asks the instance-metadata service for the VM's public address.
pub struct ImdsAddressLookup {
    client: reqwest::Client,
    url: String,
    timeout: Duration,
}

impl ImdsAddressLookup {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        // The metadata endpoint is link-local; a proxy would never reach it.
        let client = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self {
            client,
            url: url.into(),
            timeout,
        })
    }
}

impl AddressLookup for ImdsAddressLookup {
    async fn public_address(&self) -> Result<String, ProbeError> {
        let response = self
            .client
            .get(&self.url)
            .header("Metadata", "true")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| request_error(&e, self.timeout))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ProbeError::Response(format!(
                "metadata service returned {status}"
            )));
        }
        let body = response
            .text()
            .await
            .map_err(|e| request_error(&e, self.timeout))?;
        let text = body.trim();
        text.parse::<IpAddr>()
            .map(|ip| ip.to_string())
            .map_err(|_| ProbeError::Parse(format!("not an IP address: {text:?}")))
    }
}
