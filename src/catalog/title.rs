//! Year extraction and title normalization.
//!
//! Both functions are pure. [`extract_year`] only targets a trailing
//! `(YYYY)` marker so that other parenthesized spans (foreign titles,
//! alternate names) survive for [`normalize`] to strip.

use std::sync::LazyLock;

use regex::Regex;

/// Trailing `(YYYY)` marker, optionally followed by whitespace.
static TRAILING_YEAR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s*\(([0-9]{4})\)\s*$").expect("trailing year pattern is valid")
});

/// Any parenthesized span, with the whitespace before it.
static PARENTHESIZED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").expect("parenthesized pattern is valid"));

/// Trailing articles moved to the front, checked in this order.
const TRAILING_ARTICLES: [&str; 6] = ["The", "A", "An", "Le", "La", "Les"];

/// Split a trailing `(YYYY)` release year out of a raw title.
///
/// Returns the year and the title with the marker removed and trimmed, or
/// `(None, raw_title)` unchanged when the title has no trailing year.
///
/// ```ignore
/// assert_eq!(extract_year("Toy Story (1995)"), (Some(1995), "Toy Story".to_string()));
/// ```
pub fn extract_year(raw_title: &str) -> (Option<i32>, String) {
    let Some(caps) = TRAILING_YEAR.captures(raw_title) else {
        return (None, raw_title.to_string());
    };

    // Four ASCII digits always fit in an i32
    let year = caps[1].parse::<i32>().ok();
    let marker_start = caps.get(0).map_or(raw_title.len(), |m| m.start());

    (year, raw_title[..marker_start].trim().to_string())
}

/// Canonicalize a display title into a search-ready form.
///
/// Applied in order:
/// 1. Trim surrounding whitespace
/// 2. Drop every parenthesized span
/// 3. Move a trailing `, The` / `, A` / `, An` / `, Le` / `, La` / `, Les` to the front
/// 4. Collapse whitespace runs
/// 5. Strip leading/trailing commas and spaces
pub fn normalize(raw_title: &str) -> String {
    let without_parens = PARENTHESIZED.replace_all(raw_title.trim(), "");
    let mut title = without_parens.trim().to_string();

    if let Some(moved) = move_trailing_article(&title) {
        title = moved;
    }

    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c == ',' || c == ' ')
        .to_string()
}

/// Rewrite `"Movie, The"` as `"The Movie"`. Case-sensitive exact suffix.
fn move_trailing_article(title: &str) -> Option<String> {
    TRAILING_ARTICLES.iter().find_map(|article| {
        let suffix = format!(", {article}");
        title
            .strip_suffix(suffix.as_str())
            .map(|rest| format!("{} {}", article, rest.trim()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_year_simple() {
        assert_eq!(
            extract_year("Toy Story (1995)"),
            (Some(1995), "Toy Story".to_string())
        );
    }

    #[test]
    fn test_extract_year_ignores_non_year_parenthetical() {
        let raw = "Shanghai Triad (Yao a yao yao dao waipo qiao)";
        assert_eq!(extract_year(raw), (None, raw.to_string()));
    }

    #[test]
    fn test_extract_year_keeps_foreign_title() {
        let (year, title) = extract_year("City of Lost Children, The (Cité des enfants perdus, La) (1995)");
        assert_eq!(year, Some(1995));
        assert_eq!(title, "City of Lost Children, The (Cité des enfants perdus, La)");
    }

    #[test]
    fn test_extract_year_allows_trailing_whitespace() {
        assert_eq!(
            extract_year("Heat (1995)   "),
            (Some(1995), "Heat".to_string())
        );
    }

    #[test]
    fn test_extract_year_requires_marker_at_end() {
        let raw = "Babe (1995) (Pig in the City)";
        assert_eq!(extract_year(raw), (None, raw.to_string()));
    }

    #[test]
    fn test_extract_year_rejects_short_numbers() {
        let raw = "Apollo (13)";
        assert_eq!(extract_year(raw), (None, raw.to_string()));
    }

    #[test]
    fn test_normalize_moves_the() {
        assert_eq!(normalize("Usual Suspects, The"), "The Usual Suspects");
    }

    #[test]
    fn test_normalize_strips_foreign_title_before_article() {
        assert_eq!(
            normalize("City of Lost Children, The (Cité des enfants perdus, La)"),
            "The City of Lost Children"
        );
    }

    #[test]
    fn test_normalize_keeps_internal_commas() {
        assert_eq!(
            normalize("Adventures of Priscilla, Queen of the Desert, The"),
            "The Adventures of Priscilla, Queen of the Desert"
        );
    }

    #[test]
    fn test_normalize_removes_parentheticals() {
        assert_eq!(
            normalize("Shanghai Triad (Yao a yao yao dao waipo qiao)"),
            "Shanghai Triad"
        );
    }

    #[test]
    fn test_normalize_french_articles() {
        assert_eq!(normalize("Misérables, Les"), "Les Misérables");
        assert_eq!(normalize("Haine, La"), "La Haine");
        assert_eq!(normalize("Samouraï, Le"), "Le Samouraï");
    }

    #[test]
    fn test_normalize_short_articles() {
        assert_eq!(normalize("Man Apart, A"), "A Man Apart");
        assert_eq!(normalize("American in Paris, An"), "An American in Paris");
    }

    #[test]
    fn test_normalize_article_match_is_case_sensitive() {
        assert_eq!(normalize("Movie, the"), "Movie, the");
    }

    #[test]
    fn test_normalize_collapses_whitespace_and_commas() {
        assert_eq!(normalize("  Heat   (1995)  "), "Heat");
        assert_eq!(normalize(", Seven  Samurai ,"), "Seven Samurai");
    }

    #[test]
    fn test_normalize_plain_title_unchanged() {
        assert_eq!(normalize("Jumanji"), "Jumanji");
    }
}
