//! Movie enrichment module - matches catalog titles against OMDb.
//!
//! # Architecture
//!
//! This module follows a clean separation between:
//! - **Domain models** (`domain.rs`) - Queries, details, strategies and outcomes
//! - **API DTOs** (`omdb/dto.rs`) - Exact API response shapes
//! - **Adapter** (`omdb/adapter.rs`) - Converts DTOs to domain models
//! - **Client** (`omdb/client.rs`) - HTTP client for OMDb
//! - **Resolver** - movieId → IMDb id from the links table
//! - **Chain** - Ordered title/year, title-only and IMDb id lookups
//! - **Report** - Missing-movie bookkeeping and CSV report
//! - **Service** - Sequential, rate-limited pass over the catalog
//!
//! # Usage
//!
//! ```ignore
//! use enrichment::{EnrichmentConfig, EnrichmentService, OmdbClient, RunContext};
//!
//! let client = OmdbClient::new("your-api-key", Duration::from_secs(10))?;
//! let service = EnrichmentService::new(client, EnrichmentConfig::default());
//! let mut ctx = RunContext::new(IdentifierResolver::new(mapping));
//!
//! let stats = service.enrich_catalog(&mut records, &mut ctx).await;
//! let summary = ctx.reporter.flush(Path::new("logs/missing_movies.csv"));
//! ```

pub mod chain;
pub mod domain;
pub mod omdb;
pub mod report;
pub mod resolver;
pub mod service;
pub mod traits;

pub use chain::StrategyChain;
pub use domain::{EnrichmentError, MatchAttempt, MatchOutcome, MatchStrategy, MovieDetails, MovieQuery};
pub use omdb::OmdbClient;
pub use report::{EnrichmentReporter, MissingRecordEntry, MissingSummary};
pub use resolver::{IdentifierMapping, IdentifierResolver};
pub use service::{EnrichmentConfig, EnrichmentService, EnrichmentStats, RunContext, enrich_and_report};
pub use traits::MovieMetadataApi;
