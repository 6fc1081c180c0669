//! Adapter layer: Convert OMDb DTOs to domain models
//!
//! This is the ONLY place where OMDb DTO types are converted to domain types.

use super::dto;
use crate::enrichment::domain::MovieDetails;

/// Convert an OMDb response into details, or `None` for a negative match.
pub fn to_details(response: dto::MovieResponse) -> Option<MovieDetails> {
    if !response.is_match() {
        return None;
    }

    Some(MovieDetails {
        imdb_id: response.imdb_id,
        director: response.director,
        plot: response.plot,
        box_office: response.box_office,
        imdb_rating: response.imdb_rating,
        runtime: response.runtime,
    })
}
