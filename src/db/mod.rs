//! Database module for movie, genre and rating persistence.
//!
//! Uses SQLx with SQLite for lightweight, embedded database storage.
//! Every load is clear-and-reinsert inside one transaction per entity kind,
//! so repeated runs over unchanged sources leave identical tables.
//!
//! Row-level insert failures (e.g. a constraint violation) are logged,
//! counted and skipped; only connection/transaction failures propagate.
//!
//! # Example
//!
//! ```ignore
//! use movie_minder::db::{init_db, replace_movies};
//!
//! let pool = init_db("sqlite:movie_minder.db").await?;
//! let stats = replace_movies(&pool, &records).await?;
//! ```

use std::collections::{BTreeSet, HashMap};

use sqlx::migrate::MigrateDatabase;
use sqlx::sqlite::{Sqlite, SqlitePool, SqlitePoolOptions};
use sqlx::QueryBuilder;

use crate::error::Result;
use crate::model::{CatalogRecord, Genre, MovieRow, RatingEvent};

/// Default database filename.
pub const DEFAULT_DB_NAME: &str = "movie_minder.db";

/// Ratings inserted per statement.
pub const RATING_BATCH_SIZE: usize = 1000;

/// Build a SQLite database URL from an optional path.
///
/// If no path is provided, uses [`DEFAULT_DB_NAME`] in the current directory.
pub fn db_url(path: Option<&std::path::Path>) -> String {
    match path {
        Some(p) => format!("sqlite:{}", p.display()),
        None => format!("sqlite:{}", DEFAULT_DB_NAME),
    }
}

/// Initialize the database connection pool and run migrations.
///
/// Creates the database file if it doesn't exist.
///
/// # Errors
///
/// Returns an error if:
/// - Database creation fails
/// - Connection cannot be established
/// - Migration fails
pub async fn init_db(db_url: &str) -> Result<SqlitePool> {
    if !Sqlite::database_exists(db_url).await.unwrap_or(false) {
        Sqlite::create_database(db_url).await?;
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(db_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Outcome of one load step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadStats {
    pub inserted: usize,
    pub errors: usize,
}

/// Outcome of the genre load step.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenreLoadStats {
    pub genres: usize,
    pub memberships: usize,
    pub errors: usize,
}

/// Replace the `movies` table with the given catalog.
///
/// Genre memberships are cleared too since they reference movies.
pub async fn replace_movies(pool: &SqlitePool, records: &[CatalogRecord]) -> Result<LoadStats> {
    tracing::info!("Loading movies into database...");
    let mut tx = pool.begin().await?;

    tracing::info!("Clearing existing movie data...");
    sqlx::query("DELETE FROM movie_genres").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM movies").execute(&mut *tx).await?;

    let mut stats = LoadStats::default();
    for record in records {
        let e = &record.enrichment;
        let result = sqlx::query(
            r#"
            INSERT INTO movies (movie_id, title, release_year, imdb_id,
                                director, plot, box_office, imdb_rating, runtime)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.movie_id)
        .bind(&record.clean_title)
        .bind(record.release_year)
        .bind(&e.imdb_id)
        .bind(&e.director)
        .bind(&e.plot)
        .bind(&e.box_office)
        .bind(e.imdb_rating)
        .bind(&e.runtime)
        .execute(&mut *tx)
        .await;

        match result {
            Ok(_) => {
                stats.inserted += 1;
                if stats.inserted % 100 == 0 {
                    tracing::info!("Inserted {} movies...", stats.inserted);
                }
            }
            Err(err) => {
                tracing::error!(
                    "Error inserting movie {} ({}): {}",
                    record.movie_id,
                    record.clean_title,
                    err
                );
                stats.errors += 1;
            }
        }
    }

    tx.commit().await?;
    tracing::info!(
        "Loaded {} movies successfully ({} errors)",
        stats.inserted,
        stats.errors
    );
    Ok(stats)
}

/// Replace the genre vocabulary and movie memberships.
///
/// Genres are inserted in sorted order, so ids are stable across runs.
pub async fn replace_genres(pool: &SqlitePool, records: &[CatalogRecord]) -> Result<GenreLoadStats> {
    tracing::info!("Loading genres into database...");
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM movie_genres").execute(&mut *tx).await?;
    sqlx::query("DELETE FROM genres").execute(&mut *tx).await?;

    let vocabulary: BTreeSet<&str> = records
        .iter()
        .flat_map(|r| r.genres.iter().map(String::as_str))
        .collect();

    let mut stats = GenreLoadStats::default();
    let mut genre_ids: HashMap<&str, i64> = HashMap::with_capacity(vocabulary.len());

    for genre in vocabulary {
        match sqlx::query("INSERT INTO genres (genre_name) VALUES (?)")
            .bind(genre)
            .execute(&mut *tx)
            .await
        {
            Ok(result) => {
                genre_ids.insert(genre, result.last_insert_rowid());
                stats.genres += 1;
            }
            Err(err) => {
                tracing::error!("Error inserting genre {}: {}", genre, err);
                stats.errors += 1;
            }
        }
    }

    for record in records {
        for genre in &record.genres {
            let Some(&genre_id) = genre_ids.get(genre.as_str()) else {
                continue;
            };
            let result = sqlx::query("INSERT INTO movie_genres (movie_id, genre_id) VALUES (?, ?)")
                .bind(record.movie_id)
                .bind(genre_id)
                .execute(&mut *tx)
                .await;

            match result {
                Ok(_) => stats.memberships += 1,
                Err(err) => {
                    tracing::error!(
                        "Error inserting movie-genre relationship {} / {}: {}",
                        record.movie_id,
                        genre,
                        err
                    );
                    stats.errors += 1;
                }
            }
        }
    }

    tx.commit().await?;
    tracing::info!(
        "Loaded {} genres and {} movie-genre relationships",
        stats.genres,
        stats.memberships
    );
    Ok(stats)
}

/// Replace the `ratings` table, inserting in batches of [`RATING_BATCH_SIZE`].
///
/// A failing batch is logged with its offset and skipped.
pub async fn replace_ratings(pool: &SqlitePool, ratings: &[RatingEvent]) -> Result<LoadStats> {
    tracing::info!("Loading ratings into database...");
    let mut tx = pool.begin().await?;

    tracing::info!("Clearing existing ratings...");
    sqlx::query("DELETE FROM ratings").execute(&mut *tx).await?;

    let mut stats = LoadStats::default();
    for (batch_index, batch) in ratings.chunks(RATING_BATCH_SIZE).enumerate() {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new("INSERT INTO ratings (movie_id, user_id, rating, timestamp) ");
        builder.push_values(batch, |mut row, rating| {
            row.push_bind(rating.movie_id)
                .push_bind(rating.user_id)
                .push_bind(rating.rating)
                .push_bind(rating.timestamp);
        });

        match builder.build().execute(&mut *tx).await {
            Ok(_) => {
                let before = stats.inserted;
                stats.inserted += batch.len();
                if stats.inserted / 10_000 > before / 10_000 {
                    tracing::info!("Loaded {} ratings...", stats.inserted);
                }
            }
            Err(err) => {
                tracing::error!(
                    "Error inserting rating batch at position {}: {}",
                    batch_index * RATING_BATCH_SIZE,
                    err
                );
                stats.errors += batch.len();
            }
        }
    }

    tx.commit().await?;
    tracing::info!("Loaded {} ratings successfully", stats.inserted);
    Ok(stats)
}

/// Get all movies ordered by id.
pub async fn get_all_movies(pool: &SqlitePool) -> sqlx::Result<Vec<MovieRow>> {
    sqlx::query_as::<_, MovieRow>(
        r#"
        SELECT movie_id, title, release_year, imdb_id, director,
               plot, box_office, imdb_rating, runtime
        FROM movies
        ORDER BY movie_id
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Get the genre vocabulary ordered by id.
pub async fn get_all_genres(pool: &SqlitePool) -> sqlx::Result<Vec<Genre>> {
    sqlx::query_as::<_, Genre>("SELECT genre_id, genre_name FROM genres ORDER BY genre_id")
        .fetch_all(pool)
        .await
}

/// Genre names for one movie, alphabetically.
pub async fn get_movie_genres(pool: &SqlitePool, movie_id: i64) -> sqlx::Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        r#"
        SELECT g.genre_name
        FROM movie_genres mg
        JOIN genres g ON g.genre_id = mg.genre_id
        WHERE mg.movie_id = ?
        ORDER BY g.genre_name
        "#,
    )
    .bind(movie_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Get all ratings in insertion order.
pub async fn get_all_ratings(pool: &SqlitePool) -> sqlx::Result<Vec<RatingEvent>> {
    sqlx::query_as::<_, RatingEvent>(
        "SELECT user_id, movie_id, rating, timestamp FROM ratings ORDER BY rating_id",
    )
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{mock_catalog, mock_ratings, temp_db};

    #[tokio::test]
    async fn test_init_db_creates_database() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db_path = temp_dir.path().join("test.db");
        let db_url = db_url(Some(&db_path));

        let pool = init_db(&db_url).await.expect("Failed to init db");
        assert!(db_path.exists());

        let movies = get_all_movies(&pool).await.expect("Failed to query movies");
        assert!(movies.is_empty());
    }

    #[test]
    fn test_default_db_url() {
        assert_eq!(db_url(None), "sqlite:movie_minder.db");
    }

    #[tokio::test]
    async fn test_replace_movies_persists_clean_title_and_enrichment() {
        let (pool, _dir) = temp_db().await;
        let mut records = mock_catalog();
        records[1].enrichment.imdb_id = Some("tt0113497".to_string());
        records[1].enrichment.imdb_rating = Some(7.1);

        let stats = replace_movies(&pool, &records).await.unwrap();

        assert_eq!(stats, LoadStats { inserted: 3, errors: 0 });
        let movies = get_all_movies(&pool).await.unwrap();
        assert_eq!(movies[0].title, "Toy Story");
        assert_eq!(movies[0].release_year, Some(1995));
        assert_eq!(movies[1].imdb_id.as_deref(), Some("tt0113497"));
        assert_eq!(movies[1].imdb_rating, Some(7.1));
        assert_eq!(movies[2].release_year, None);
    }

    #[tokio::test]
    async fn test_replace_movies_skips_failing_rows() {
        let (pool, _dir) = temp_db().await;
        let mut records = mock_catalog();
        // Duplicate primary key fails only that row
        records.push(records[0].clone());

        let stats = replace_movies(&pool, &records).await.unwrap();

        assert_eq!(stats, LoadStats { inserted: 3, errors: 1 });
        assert_eq!(get_all_movies(&pool).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_replace_genres_builds_sorted_vocabulary() {
        let (pool, _dir) = temp_db().await;
        let records = mock_catalog();
        replace_movies(&pool, &records).await.unwrap();

        let stats = replace_genres(&pool, &records).await.unwrap();

        let genres = get_all_genres(&pool).await.unwrap();
        let names: Vec<&str> = genres.iter().map(|g| g.genre_name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(stats.genres, genres.len());
        assert_eq!(stats.errors, 0);
        assert_eq!(
            get_movie_genres(&pool, 2).await.unwrap(),
            vec!["Adventure", "Children", "Fantasy"]
        );
    }

    #[tokio::test]
    async fn test_replace_ratings_batches() {
        let (pool, _dir) = temp_db().await;
        let ratings: Vec<RatingEvent> = (0..2500)
            .map(|i| RatingEvent {
                user_id: i % 7,
                movie_id: i % 3 + 1,
                rating: 3.5,
                timestamp: Some(964982703 + i),
            })
            .collect();

        let stats = replace_ratings(&pool, &ratings).await.unwrap();

        assert_eq!(stats, LoadStats { inserted: 2500, errors: 0 });
        assert_eq!(get_all_ratings(&pool).await.unwrap(), ratings);
    }

    #[tokio::test]
    async fn test_reload_is_idempotent() {
        let (pool, _dir) = temp_db().await;
        let records = mock_catalog();
        let ratings = mock_ratings();

        for _ in 0..2 {
            replace_movies(&pool, &records).await.unwrap();
            replace_genres(&pool, &records).await.unwrap();
            replace_ratings(&pool, &ratings).await.unwrap();
        }
        let movies_first = get_all_movies(&pool).await.unwrap();
        let genres_first = get_all_genres(&pool).await.unwrap();

        replace_movies(&pool, &records).await.unwrap();
        replace_genres(&pool, &records).await.unwrap();
        replace_ratings(&pool, &ratings).await.unwrap();

        assert_eq!(get_all_movies(&pool).await.unwrap(), movies_first);
        assert_eq!(get_all_genres(&pool).await.unwrap(), genres_first);
        assert_eq!(get_all_ratings(&pool).await.unwrap(), ratings);
    }
}
