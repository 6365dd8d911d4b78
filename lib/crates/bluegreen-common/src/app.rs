//! Response bodies served by every deployed application.
//!
//! A blue-green artifact is opaque to the switcher, but it must keep serving
//! this shape so that verification can tell which colour and which app
//! answered.

use serde::{Deserialize, Serialize};

/// Deployment colour reported when `DEPLOYMENT_TYPE` is unset on the host.
pub const DEFAULT_DEPLOYMENT: &str = "blue";

/// `GET /` — application root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RootResponse {
    pub message: String,
    /// App id, e.g. `app_2`.
    pub app: String,
    pub status: String,
    #[serde(default = "default_deployment")]
    pub deployment: String,
    pub hostname: String,
    pub platform: String,
}

fn default_deployment() -> String {
    DEFAULT_DEPLOYMENT.to_string()
}
