//! Command-line interface for movie-minder.
//!
//! This module provides CLI commands for running the ETL pipeline, looking
//! up single titles, and inspecting title normalization and configuration.

mod commands;

pub use commands::{Cli, Commands, run_command};
