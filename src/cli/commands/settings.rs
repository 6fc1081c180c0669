//! Configuration inspection command.

use std::path::Path;

use crate::config::{self, Config};
use crate::error::Error;

/// Print the effective configuration, optionally writing defaults first
pub fn cmd_config(explicit: Option<&Path>, init: bool) -> anyhow::Result<()> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => config::config_path()
            .ok_or_else(|| Error::config("could not determine config directory"))?,
    };

    if init {
        if path.exists() {
            println!("Config already exists at {}", path.display());
        } else {
            match explicit {
                Some(path) => config::save_to(&Config::default(), path)?,
                None => config::save(&Config::default())?,
            }
            println!("Wrote default config to {}", path.display());
        }
    }

    let config = config::load_from(&path);

    println!("Config file: {}", path.display());
    if !path.exists() {
        println!("  (not found, using defaults)");
    }
    println!();
    println!("{}", describe(&config));

    Ok(())
}

fn describe(config: &Config) -> String {
    let credential = if config.credentials.omdb_api_key.is_some() {
        "configured"
    } else if std::env::var_os("OMDB_API_KEY").is_some() {
        "from OMDB_API_KEY"
    } else {
        "missing"
    };
    let limit = match config.api.request_limit {
        0 => "all".to_string(),
        n => n.to_string(),
    };

    [
        format!("OMDb API key:  {}", credential),
        format!("API endpoint:  {}", config.api.base_url),
        format!("Movies CSV:    {}", config.sources.movies_csv.display()),
        format!("Ratings CSV:   {}", config.sources.ratings_csv.display()),
        format!("Links CSV:     {}", config.sources.links_csv.display()),
        format!("Database:      {}", config.database.path.display()),
        format!("Missing log:   {}", config.report.missing_movies_csv.display()),
        format!(
            "Rate limits:   {} ms per record, {} ms per fallback",
            config.api.call_delay_ms, config.api.retry_delay_ms
        ),
        format!("Request limit: {}", limit),
    ]
    .join("\n")
}
