//! Trait definitions for the external metadata source.
//!
//! The strategy chain only talks to [`MovieMetadataApi`], so tests can
//! substitute scripted responses for the real OMDb client.
//!
//! # Example
//!
//! ```ignore
//! use movie_minder::enrichment::traits::MovieMetadataApi;
//!
//! async fn find<T: MovieMetadataApi + ?Sized>(api: &T) -> Option<MovieDetails> {
//!     api.lookup(&MovieQuery::title("Heat", Some(1995))).await.ok().flatten()
//! }
//! ```

use async_trait::async_trait;

use super::domain::{EnrichmentError, MovieDetails, MovieQuery};

/// Trait for movie metadata lookup.
///
/// `Ok(None)` is a negative match. `Err` is a transport-level failure.
#[async_trait]
pub trait MovieMetadataApi: Send + Sync {
    async fn lookup(&self, query: &MovieQuery) -> Result<Option<MovieDetails>, EnrichmentError>;
}

#[async_trait]
impl MovieMetadataApi for super::omdb::OmdbClient {
    async fn lookup(&self, query: &MovieQuery) -> Result<Option<MovieDetails>, EnrichmentError> {
        self.lookup(query).await
    }
}

/// Mock metadata source for testing.
///
/// Returns configurable responses per query and records every call.
#[cfg(test)]
pub mod mocks {
    use std::collections::HashMap;
    use std::sync::Mutex;

    use super::*;

    /// Scripted metadata source. Unscripted queries are negative matches.
    #[derive(Default)]
    pub struct MockMetadataApi {
        responses: HashMap<MovieQuery, Result<Option<MovieDetails>, EnrichmentError>>,
        calls: Mutex<Vec<MovieQuery>>,
    }

    impl MockMetadataApi {
        /// A source that never matches anything.
        pub fn no_matches() -> Self {
            Self::default()
        }

        /// Answer `query` with a positive match for `imdb_id`.
        pub fn with_match(mut self, query: MovieQuery, imdb_id: &str) -> Self {
            self.responses
                .insert(query, Ok(Some(mock_details(imdb_id))));
            self
        }

        /// Answer `query` with a transport failure.
        pub fn with_error(mut self, query: MovieQuery, error: EnrichmentError) -> Self {
            self.responses.insert(query, Err(error));
            self
        }

        /// Queries received so far, in order.
        pub fn calls(&self) -> Vec<MovieQuery> {
            self.calls.lock().unwrap().clone()
        }
    }

    /// Details as OMDb would return them for a match.
    pub fn mock_details(imdb_id: &str) -> MovieDetails {
        MovieDetails {
            imdb_id: Some(imdb_id.to_string()),
            director: Some("Test Director".to_string()),
            plot: Some("A test plot.".to_string()),
            box_office: Some("$1,000,000".to_string()),
            imdb_rating: Some("7.5".to_string()),
            runtime: Some("100 min".to_string()),
        }
    }

    #[async_trait]
    impl MovieMetadataApi for MockMetadataApi {
        async fn lookup(
            &self,
            query: &MovieQuery,
        ) -> Result<Option<MovieDetails>, EnrichmentError> {
            self.calls.lock().unwrap().push(query.clone());
            self.responses.get(query).cloned().unwrap_or(Ok(None))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_mock_no_matches() {
            let mock = MockMetadataApi::no_matches();
            let result = mock.lookup(&MovieQuery::title("Heat", None)).await.unwrap();
            assert!(result.is_none());
            assert_eq!(mock.calls().len(), 1);
        }

        #[tokio::test]
        async fn test_mock_scripted_match() {
            let query = MovieQuery::title("Heat", Some(1995));
            let mock = MockMetadataApi::no_matches().with_match(query.clone(), "tt0113277");
            let details = mock.lookup(&query).await.unwrap().unwrap();
            assert_eq!(details.imdb_id.as_deref(), Some("tt0113277"));
        }

        #[tokio::test]
        async fn test_mock_error() {
            let query = MovieQuery::imdb_id("tt0113277");
            let mock = MockMetadataApi::no_matches()
                .with_error(query.clone(), EnrichmentError::Network("timeout".to_string()));
            let result = mock.lookup(&query).await;
            assert!(matches!(result, Err(EnrichmentError::Network(_))));
        }
    }
}
