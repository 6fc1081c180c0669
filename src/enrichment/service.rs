//! Enrichment service - runs the strategy chain over the catalog
//!
//! Records are processed strictly one at a time, in source order:
//! 1. Run the strategy chain for the record
//! 2. On a match, copy the details into the record's enrichment fields
//! 3. Otherwise append a [`MissingRecordEntry`] to the run's reporter
//! 4. Sleep for the inter-call delay before the next record
//!
//! Calls are never overlapped: OMDb enforces a request budget, and each
//! fallback depends on the previous strategy's result.

use std::time::Duration;

use chrono::Local;

use super::chain::StrategyChain;
use super::domain::{API_ERROR_LABEL, MatchAttempt, MatchOutcome, MatchStrategy};
use super::report::{EnrichmentReporter, MissingRecordEntry, MissingSummary};
use super::resolver::IdentifierResolver;
use super::traits::MovieMetadataApi;
use crate::model::{CatalogRecord, Enrichment};

/// Reason recorded when every strategy came back negative
pub const NOT_FOUND_REASON: &str = "Not found in OMDb API";

/// Configuration for the enrichment service
#[derive(Debug, Clone)]
pub struct EnrichmentConfig {
    /// Delay after each record's chain
    pub call_delay: Duration,
    /// Delay before each fallback strategy for the same record
    pub retry_delay: Duration,
    /// Only the first N records go through the chain (None = all)
    pub request_limit: Option<usize>,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            call_delay: Duration::from_millis(200),
            retry_delay: Duration::from_millis(100),
            request_limit: Some(400),
        }
    }
}

/// State scoped to one run, passed explicitly to each phase.
///
/// Created after extract, filled during enrichment, and drained when the
/// reporter is flushed.
#[derive(Debug, Default)]
pub struct RunContext {
    pub resolver: IdentifierResolver,
    pub reporter: EnrichmentReporter,
}

impl RunContext {
    pub fn new(resolver: IdentifierResolver) -> Self {
        Self {
            resolver,
            reporter: EnrichmentReporter::new(),
        }
    }
}

/// Counts for one enrichment pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentStats {
    /// Records that went through the chain
    pub processed: usize,
    pub enriched: usize,
    pub missing: usize,
    /// Misses caused by transport failures
    pub api_errors: usize,
    /// Matches found only through the IMDb ID fallback
    pub imdb_fallback_hits: usize,
}

impl EnrichmentStats {
    /// Enriched share of processed records, in percent.
    pub fn success_rate(&self) -> f64 {
        if self.processed == 0 {
            0.0
        } else {
            self.enriched as f64 / self.processed as f64 * 100.0
        }
    }

    fn record(&mut self, attempt: &MatchAttempt) {
        self.processed += 1;
        match &attempt.outcome {
            MatchOutcome::Matched { strategy, .. } => {
                self.enriched += 1;
                if *strategy == MatchStrategy::ImdbId {
                    self.imdb_fallback_hits += 1;
                }
            }
            MatchOutcome::Exhausted => self.missing += 1,
            MatchOutcome::ApiError(_) => {
                self.missing += 1;
                self.api_errors += 1;
            }
        }
    }
}

/// Service for enriching catalog records from the external source
pub struct EnrichmentService<A> {
    config: EnrichmentConfig,
    api: A,
}

impl<A: MovieMetadataApi> EnrichmentService<A> {
    pub fn new(api: A, config: EnrichmentConfig) -> Self {
        Self { config, api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Enrich records in place, recording misses in `ctx.reporter`.
    ///
    /// Records past the request limit are left untouched and are not
    /// counted as processed.
    pub async fn enrich_catalog(
        &self,
        records: &mut [CatalogRecord],
        ctx: &mut RunContext,
    ) -> EnrichmentStats {
        let limit = self
            .config
            .request_limit
            .map_or(records.len(), |l| l.min(records.len()));
        tracing::info!("Fetching data from OMDb API for first {} movies...", limit);

        let chain = StrategyChain::new(&self.api, &ctx.resolver, self.config.retry_delay);
        let mut stats = EnrichmentStats::default();

        for (i, record) in records.iter_mut().take(limit).enumerate() {
            let attempt = chain
                .resolve_enrichment(&record.clean_title, record.release_year, Some(record.movie_id))
                .await;
            stats.record(&attempt);
            let strategies = attempt.attempted_labels();

            match attempt.outcome {
                MatchOutcome::Matched { details, .. } => {
                    record.enrichment = Enrichment::from(details);
                }
                MatchOutcome::Exhausted => {
                    ctx.reporter.record_miss(missing_entry(
                        record,
                        &ctx.resolver,
                        attempt.normalized_title,
                        strategies,
                        NOT_FOUND_REASON,
                    ));
                }
                MatchOutcome::ApiError(message) => {
                    tracing::warn!(
                        "Movie {} ({}) skipped after API error: {}",
                        record.movie_id,
                        record.clean_title,
                        message
                    );
                    ctx.reporter.record_miss(missing_entry(
                        record,
                        &ctx.resolver,
                        attempt.normalized_title,
                        strategies,
                        API_ERROR_LABEL,
                    ));
                }
            }

            if !self.config.call_delay.is_zero() {
                tokio::time::sleep(self.config.call_delay).await;
            }

            if (i + 1) % 10 == 0 {
                tracing::info!(
                    "Processed {}/{} movies... ({} successful, {} missing)",
                    i + 1,
                    limit,
                    stats.enriched,
                    ctx.reporter.len()
                );
            }
        }

        tracing::info!(
            "Transformation complete. Successfully enriched {} out of {} movies ({:.1}% success rate)",
            stats.enriched,
            stats.processed,
            stats.success_rate()
        );
        if stats.imdb_fallback_hits > 0 {
            tracing::info!(
                "IMDb ID fallback helped find {} additional movies",
                stats.imdb_fallback_hits
            );
        }

        stats
    }

    /// Run the chain for a single title outside of a catalog pass.
    pub async fn lookup_title(
        &self,
        raw_title: &str,
        movie_id: Option<i64>,
        resolver: &IdentifierResolver,
    ) -> MatchAttempt {
        let (year, clean_title) = crate::catalog::extract_year(raw_title);
        StrategyChain::new(&self.api, resolver, self.config.retry_delay)
            .resolve_enrichment(&clean_title, year, movie_id)
            .await
    }
}

/// Enrich the catalog and flush the run's missing report.
///
/// Returns the pass counts and the flushed report summary; the two always
/// agree on the number of misses.
pub async fn enrich_and_report<A: MovieMetadataApi>(
    service: &EnrichmentService<A>,
    records: &mut [CatalogRecord],
    ctx: &mut RunContext,
    report_path: &std::path::Path,
) -> (EnrichmentStats, MissingSummary) {
    let stats = service.enrich_catalog(records, ctx).await;
    let summary = ctx.reporter.flush(report_path);
    (stats, summary)
}

fn missing_entry(
    record: &CatalogRecord,
    resolver: &IdentifierResolver,
    normalized_title: String,
    strategies_attempted: String,
    reason: &str,
) -> MissingRecordEntry {
    MissingRecordEntry {
        movie_id: record.movie_id,
        original_title: record.raw_title.clone(),
        normalized_title,
        release_year: record.release_year,
        genres: record.genres.clone(),
        imdb_id: resolver.resolve(record.movie_id),
        strategies_attempted,
        error_reason: reason.to_string(),
        timestamp: Local::now(),
    }
}
