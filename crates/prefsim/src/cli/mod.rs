//! Subcommand implementations.

pub mod config;
pub mod dataset;
pub mod instances;
pub mod simulate;
pub mod types;
