//! Single-title lookup and normalization commands.

use tokio::runtime::Runtime;

use crate::catalog;
use crate::config::Config;
use crate::enrichment::{
    EnrichmentService, IdentifierMapping, IdentifierResolver, MatchAttempt, MatchOutcome,
};
use crate::source;

use super::build_client;

/// Run the strategy chain for one title and print the outcome
pub fn cmd_lookup(
    rt: &Runtime,
    config: &Config,
    title: &str,
    year: Option<i32>,
    movie_id: Option<i64>,
    api_key: Option<&str>,
) -> anyhow::Result<()> {
    let client = build_client(config, api_key)?;
    let service = EnrichmentService::new(client, config.api.enrichment_config());

    let resolver = match movie_id {
        Some(_) => IdentifierResolver::new(load_mapping(config)),
        None => IdentifierResolver::default(),
    };
    if movie_id.is_some() && !resolver.is_available() {
        tracing::warn!("No IMDb ID mappings loaded; only title strategies will run");
    }
    let raw_title = with_year(title, year)?;

    println!("Looking up: {}", raw_title);
    println!();

    let attempt = rt.block_on(service.lookup_title(&raw_title, movie_id, &resolver));
    print_attempt(&attempt);

    Ok(())
}

/// Show how a raw title is split and normalized, without any lookups
pub fn cmd_normalize(title: &str) -> anyhow::Result<()> {
    let (year, clean_title) = catalog::extract_year(title);

    println!("Raw title:   {}", title);
    println!("Clean title: {}", clean_title);
    match year {
        Some(year) => println!("Year:        {}", year),
        None => println!("Year:        (none)"),
    }
    println!("Normalized:  {}", catalog::normalize(&clean_title));

    Ok(())
}

fn load_mapping(config: &Config) -> IdentifierMapping {
    match source::read_links(&config.sources.links_csv) {
        Ok(mapping) => mapping,
        Err(e) => {
            tracing::warn!("IMDb ID fallback unavailable: {}", e);
            IdentifierMapping::default()
        }
    }
}

/// Append `(year)` unless the title already carries one.
///
/// A `--year` that disagrees with the title's own year is rejected.
fn with_year(title: &str, year: Option<i32>) -> anyhow::Result<String> {
    let Some(year) = year else {
        return Ok(title.to_string());
    };
    match catalog::extract_year(title).0 {
        None => Ok(format!("{} ({})", title.trim_end(), year)),
        Some(embedded) if embedded == year => Ok(title.to_string()),
        Some(embedded) => anyhow::bail!(
            "--year {} conflicts with year {} in title \"{}\"",
            year,
            embedded,
            title
        ),
    }
}

fn print_attempt(attempt: &MatchAttempt) {
    println!("  Query title: {}", attempt.normalized_title);
    println!("  Attempted:   {}", attempt.attempted_labels());

    match &attempt.outcome {
        MatchOutcome::Matched { strategy, details } => {
            println!("✓ Match found via {}", strategy.label());
            println!();
            let fields = [
                ("IMDb ID", &details.imdb_id),
                ("Director", &details.director),
                ("Plot", &details.plot),
                ("Box office", &details.box_office),
                ("Rating", &details.imdb_rating),
                ("Runtime", &details.runtime),
            ];
            for (label, value) in fields {
                if let Some(value) = value {
                    println!("  {:<11} {}", format!("{}:", label), value);
                }
            }
        }
        MatchOutcome::Exhausted => {
            println!("✗ No match found ({})", attempt.outcome_label());
        }
        MatchOutcome::ApiError(reason) => {
            eprintln!("✗ API error: {}", reason);
        }
    }
}
