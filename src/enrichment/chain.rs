//! Match strategy chain
//!
//! Maps a catalog title to an external record through progressively weaker
//! lookups, stopping at the first positive match:
//! 1. `Title+Year` - normalized title, with the year when one is known
//! 2. `Title Only` - same title without the year (only when a year was sent)
//! 3. `IMDb ID` - direct lookup through the links table
//!
//! A transport failure on any call stops the chain for that record.

use std::time::Duration;

use super::domain::{
    EnrichmentError, MatchAttempt, MatchOutcome, MatchStrategy, MovieDetails, MovieQuery,
};
use super::resolver::IdentifierResolver;
use super::traits::MovieMetadataApi;
use crate::catalog::title;

/// Runs the ordered strategies for one record at a time.
pub struct StrategyChain<'a, A: MovieMetadataApi + ?Sized> {
    api: &'a A,
    resolver: &'a IdentifierResolver,
    /// Pause before each fallback strategy
    retry_delay: Duration,
}

impl<'a, A: MovieMetadataApi + ?Sized> StrategyChain<'a, A> {
    pub fn new(api: &'a A, resolver: &'a IdentifierResolver, retry_delay: Duration) -> Self {
        Self {
            api,
            resolver,
            retry_delay,
        }
    }

    /// Resolve enrichment for a title.
    ///
    /// `title` may still carry parentheticals and trailing articles; it is
    /// normalized before any query is sent. `movie_id` enables the IMDb ID
    /// fallback when the links table has a row for it.
    pub async fn resolve_enrichment(
        &self,
        title: &str,
        year: Option<i32>,
        movie_id: Option<i64>,
    ) -> MatchAttempt {
        let normalized_title = title::normalize(title);
        let mut attempted = Vec::new();

        let outcome = match self
            .run_strategies(&normalized_title, year, movie_id, &mut attempted)
            .await
        {
            Ok(Some((strategy, details))) => {
                tracing::debug!("✓ Found via {}: {}", strategy, normalized_title);
                MatchOutcome::Matched { strategy, details }
            }
            Ok(None) => {
                tracing::debug!(
                    "✗ Not found: {} ({})",
                    normalized_title,
                    year.map_or_else(|| "no year".to_string(), |y| y.to_string())
                );
                MatchOutcome::Exhausted
            }
            Err(e) => {
                tracing::error!("API request failed for {}: {}", normalized_title, e);
                MatchOutcome::ApiError(e.to_string())
            }
        };

        MatchAttempt {
            movie_id,
            normalized_title,
            attempted,
            outcome,
        }
    }

    async fn run_strategies(
        &self,
        normalized_title: &str,
        year: Option<i32>,
        movie_id: Option<i64>,
        attempted: &mut Vec<MatchStrategy>,
    ) -> Result<Option<(MatchStrategy, MovieDetails)>, EnrichmentError> {
        // Strategy 1 always runs; without a year it is a plain title lookup
        let query = MovieQuery::title(normalized_title, year);
        if let Some(details) = self.try_strategy(MatchStrategy::TitleYear, &query, attempted).await? {
            return Ok(Some((MatchStrategy::TitleYear, details)));
        }

        // Strategy 2 only makes sense if strategy 1 was year-constrained
        if year.is_some() {
            self.pause().await;
            let query = MovieQuery::title(normalized_title, None);
            if let Some(details) = self.try_strategy(MatchStrategy::TitleOnly, &query, attempted).await? {
                return Ok(Some((MatchStrategy::TitleOnly, details)));
            }
        }

        if let Some(imdb_id) = movie_id.and_then(|id| self.resolver.resolve(id)) {
            tracing::debug!("Trying IMDb ID fallback: {} for movie {:?}", imdb_id, movie_id);
            self.pause().await;
            let query = MovieQuery::imdb_id(imdb_id);
            if let Some(details) = self.try_strategy(MatchStrategy::ImdbId, &query, attempted).await? {
                return Ok(Some((MatchStrategy::ImdbId, details)));
            }
        }

        Ok(None)
    }

    async fn try_strategy(
        &self,
        strategy: MatchStrategy,
        query: &MovieQuery,
        attempted: &mut Vec<MatchStrategy>,
    ) -> Result<Option<MovieDetails>, EnrichmentError> {
        attempted.push(strategy);
        tracing::trace!("{} lookup: {}", strategy, query);
        self.api.lookup(query).await
    }

    async fn pause(&self) {
        if !self.retry_delay.is_zero() {
            tokio::time::sleep(self.retry_delay).await;
        }
    }
}
