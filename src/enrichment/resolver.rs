//! IMDb identifier lookup from the links side table.

use std::collections::HashMap;

/// Prefix of IMDb title identifiers.
const IMDB_PREFIX: &str = "tt";

/// movieId → numeric IMDb id, as read from `links.csv`.
///
/// A row may exist with a null id; that is kept distinct from a missing row
/// only for counting, both resolve to `None`.
#[derive(Debug, Clone, Default)]
pub struct IdentifierMapping {
    rows: HashMap<i64, Option<i64>>,
}

impl IdentifierMapping {
    pub fn insert(&mut self, movie_id: i64, imdb_id: Option<i64>) {
        self.rows.insert(movie_id, imdb_id);
    }

    /// The stored numeric id, if the row exists and is non-null.
    pub fn get(&self, movie_id: i64) -> Option<i64> {
        self.rows.get(&movie_id).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<(i64, Option<i64>)> for IdentifierMapping {
    fn from_iter<I: IntoIterator<Item = (i64, Option<i64>)>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// Resolves internal movie ids to formatted IMDb identifiers.
#[derive(Debug, Clone, Default)]
pub struct IdentifierResolver {
    mapping: IdentifierMapping,
}

impl IdentifierResolver {
    pub fn new(mapping: IdentifierMapping) -> Self {
        Self { mapping }
    }

    /// Formatted IMDb id (`tt` + 7 zero-padded digits) for a movie.
    ///
    /// A missing row or null id is a normal outcome and yields `None`.
    pub fn resolve(&self, movie_id: i64) -> Option<String> {
        self.mapping.get(movie_id).map(format_imdb_id)
    }

    /// Whether the IMDb ID fallback can ever fire this run.
    pub fn is_available(&self) -> bool {
        !self.mapping.is_empty()
    }
}

/// Format a numeric IMDb id, e.g. `114709` → `"tt0114709"`.
pub fn format_imdb_id(numeric: i64) -> String {
    format!("{}{:07}", IMDB_PREFIX, numeric)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> IdentifierResolver {
        IdentifierResolver::new(
            [(1, Some(114709)), (2, None), (3, Some(12345678))]
                .into_iter()
                .collect(),
        )
    }

    #[test]
    fn test_format_pads_to_seven_digits() {
        assert_eq!(format_imdb_id(114709), "tt0114709");
        assert_eq!(format_imdb_id(1), "tt0000001");
    }

    #[test]
    fn test_format_keeps_longer_ids() {
        assert_eq!(format_imdb_id(12345678), "tt12345678");
    }

    #[test]
    fn test_resolve_present_row() {
        assert_eq!(resolver().resolve(1).as_deref(), Some("tt0114709"));
    }

    #[test]
    fn test_resolve_null_row_is_none() {
        assert_eq!(resolver().resolve(2), None);
    }

    #[test]
    fn test_resolve_missing_row_is_none() {
        assert_eq!(resolver().resolve(999), None);
    }

    #[test]
    fn test_empty_resolver_is_unavailable() {
        assert!(!IdentifierResolver::default().is_available());
        assert!(resolver().is_available());
    }
}
