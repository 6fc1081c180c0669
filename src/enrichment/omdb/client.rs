//! OMDb HTTP client
//!
//! Handles communication with the OMDb web service.
//! See: https://www.omdbapi.com/
//!
//! ## API Notes
//!
//! - Every request carries the `apikey` parameter; an invalid or exhausted
//!   key comes back as HTTP 401 with a JSON error body.
//! - A negative match is HTTP 200 with `"Response": "False"`. That is a
//!   normal outcome, not an error.
//! - `type=movie` keeps series and episodes out of title matches.

use std::time::Duration;

use super::{adapter, dto};
use crate::enrichment::domain::{EnrichmentError, MovieDetails, MovieQuery};

/// Default OMDb endpoint
pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

/// OMDb API client
pub struct OmdbClient {
    api_key: String,
    http_client: reqwest::Client,
    base_url: String,
}

impl OmdbClient {
    /// Create a new client with the given API key and per-call timeout
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self, EnrichmentError> {
        Self::with_base_url(api_key, DEFAULT_BASE_URL, timeout)
    }

    /// Create a client against a custom endpoint
    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, EnrichmentError> {
        let http_client = reqwest::Client::builder()
            .gzip(true)
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .map_err(|e| EnrichmentError::Client(e.to_string()))?;

        Ok(Self {
            api_key: api_key.into(),
            http_client,
            base_url: base_url.into(),
        })
    }

    /// Run a query; `Ok(None)` means OMDb reported no match.
    pub async fn lookup(&self, query: &MovieQuery) -> Result<Option<MovieDetails>, EnrichmentError> {
        let response = self.send_request(query).await?;
        if let Some(reason) = response.error.as_deref().filter(|_| !response.is_match()) {
            tracing::debug!("✗ Not found: {} ({})", query, reason);
        }
        Ok(adapter::to_details(response))
    }

    /// Build the request URL for a query
    fn request_url(&self, query: &MovieQuery) -> String {
        let selector = match query {
            MovieQuery::Title {
                title,
                year: Some(year),
            } => format!("t={}&y={}", urlencoding::encode(title), year),
            MovieQuery::Title { title, year: None } => format!("t={}", urlencoding::encode(title)),
            MovieQuery::ImdbId(id) => format!("i={}", urlencoding::encode(id)),
        };

        format!(
            "{}?apikey={}&{}&type=movie",
            self.base_url,
            urlencoding::encode(&self.api_key),
            selector
        )
    }

    /// Send the HTTP request and parse the response
    async fn send_request(&self, query: &MovieQuery) -> Result<dto::MovieResponse, EnrichmentError> {
        let url = self.request_url(query);

        let response = self
            .http_client
            .get(&url)
            .send()
            .await
            .map_err(|e| EnrichmentError::Network(e.to_string()))?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(EnrichmentError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EnrichmentError::Http(format!(
                "HTTP {}: {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown"),
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<dto::MovieResponse>()
            .await
            .map_err(|e| EnrichmentError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> OmdbClient {
        OmdbClient::new("test-key", Duration::from_secs(10)).unwrap()
    }

    #[test]
    fn test_client_creation() {
        let client = client();
        assert_eq!(client.api_key, "test-key");
        assert_eq!(client.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_client_with_custom_url() {
        let client =
            OmdbClient::with_base_url("key", "http://localhost:8080/", Duration::from_secs(1))
                .unwrap();
        assert_eq!(client.base_url, "http://localhost:8080/");
    }

    #[test]
    fn test_title_year_url() {
        let url = client().request_url(&MovieQuery::title("The Usual Suspects", Some(1995)));
        assert_eq!(
            url,
            "http://www.omdbapi.com/?apikey=test-key&t=The%20Usual%20Suspects&y=1995&type=movie"
        );
    }

    #[test]
    fn test_title_only_url_has_no_year() {
        let url = client().request_url(&MovieQuery::title("Heat", None));
        assert!(url.contains("t=Heat"));
        assert!(!url.contains("&y="));
    }

    #[test]
    fn test_imdb_id_url() {
        let url = client().request_url(&MovieQuery::imdb_id("tt0114709"));
        assert!(url.contains("i=tt0114709"));
        assert!(!url.contains("&t="));
    }

    #[test]
    fn test_title_is_url_encoded() {
        let url = client().request_url(&MovieQuery::title("Amélie & Co", None));
        assert!(url.contains("t=Am%C3%A9lie%20%26%20Co"));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_network_error() {
        let client =
            OmdbClient::with_base_url("key", "http://127.0.0.1:9/", Duration::from_millis(500))
                .unwrap();
        let result = client.lookup(&MovieQuery::title("Heat", None)).await;
        assert!(matches!(result, Err(EnrichmentError::Network(_))));
    }
}
