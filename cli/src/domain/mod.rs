//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod app;
pub mod artifact;
pub mod config;
pub mod control;
pub mod error;
pub mod health;
pub mod report;
pub mod unit;

pub use app::{AppNumber, Mode, ResolutionRequest};
pub use artifact::{ArtifactReference, Candidate, Selection};
pub use config::SwitchConfig;
pub use control::{ControlPolicy, ControlReport, ControlStep, StepOutcome, StepStatus};
pub use error::{ConfigError, ProbeError, SwitchError};
pub use health::{Probe, ProbeOutcome, ProbeStatus, Severity, VerificationResult};
pub use report::RunReport;
pub use unit::{ServiceDescriptor, UnitWrite};
