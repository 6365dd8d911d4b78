//! Application services — use-case orchestration.
//!
//! Each service module implements a single stage of the switch by composing
//! domain logic with port trait calls. Services import only from
//! `crate::domain` and `crate::application::ports` — never from
//! `crate::infra`, `crate::commands`, or `crate::output`.

pub mod artifact_resolve;
pub mod deploy_switch;
pub mod reachability;
pub mod service_switch;
pub mod unit_write;
