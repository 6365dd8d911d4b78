//! Integration tests for the bluegreen CLI
//!
//! These tests spawn the actual binary and test end-to-end behavior.
//! They only exercise paths that fail before any supervisor command runs.
