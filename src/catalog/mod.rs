//! Catalog title handling.
//!
//! MovieLens titles carry their release year and alternate-language names
//! inline (`"City of Lost Children, The (Cité des enfants perdus, La) (1995)"`).
//! The [`title`] module splits the year out and rewrites the rest into a
//! form the external search endpoint can match.

pub mod title;

pub use title::{extract_year, normalize};
