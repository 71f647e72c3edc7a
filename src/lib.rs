//! ODDS APEX — golf win-probability model and lay staking
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod model;
pub mod strategy;
pub mod parser;
pub mod report;
