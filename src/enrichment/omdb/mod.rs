//! OMDb API integration
//!
//! Looks movies up by title (optionally with a year) or by IMDb id and
//! returns the fields used to enrich catalog records.
//!
//! API docs: https://www.omdbapi.com/

pub mod dto;
mod adapter;
mod client;

pub use adapter::to_details;
pub use client::{DEFAULT_BASE_URL, OmdbClient};
