//! Movie Minder - enriches a MovieLens-style catalog with OMDb metadata.
//!
//! Reads movies, ratings and IMDb links from CSV, matches each title against
//! OMDb through a chain of progressively weaker strategies, and loads the
//! merged result into SQLite. Titles that can't be matched are written to a
//! missing-movies report.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod db;
pub mod enrichment;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod source;
#[cfg(test)]
pub mod test_utils;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

fn main() -> anyhow::Result<()> {
    let args = cli::Cli::parse();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(EnvFilter::from_default_env().add_directive("movie_minder=info".parse()?))
        .init();

    cli::run_command(&args)
}
