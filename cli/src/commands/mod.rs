//! Command implementations

pub mod switch;
