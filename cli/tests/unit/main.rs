//! Unit tests for the bluegreen CLI
//!
//! These tests use hand-written port implementations and run fast without
//! touching systemd or the network beyond localhost.

mod architecture;
mod config_store;
mod helpers;
mod http_adapters;
