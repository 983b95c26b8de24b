//! CLI command handlers

pub mod commands;

pub use commands::{extract, inspect, run, si};
