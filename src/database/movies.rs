use sqlx::{QueryBuilder, Sqlite};

use crate::database::manager::{Database, DatabaseError};
use crate::database::models::{Movie, MovieChanges, MovieFilters, MovieWithRatings, RatingAggregate};
use crate::database::ratings;

const SELECT_MOVIE: &str = "SELECT m.id, m.title, m.description, m.director, m.release_year, m.genre, \
     m.rating, m.user_id, u.name AS owner_name, m.created_at, m.updated_at \
     FROM movies m LEFT JOIN users u ON u.id = m.user_id";

pub async fn create(db: &Database, movie: &MovieChanges, owner_id: i64) -> Result<i64, DatabaseError> {
    let result = sqlx::query(
        "INSERT INTO movies (title, description, director, release_year, genre, user_id) VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&movie.title)
    .bind(&movie.description)
    .bind(&movie.director)
    .bind(movie.release_year)
    .bind(&movie.genre)
    .bind(owner_id)
    .execute(db.pool())
    .await?;

    Ok(result.last_insert_rowid())
}

/// Movie with its owner's name joined in.
pub async fn get_by_id(db: &Database, id: i64) -> Result<Option<Movie>, DatabaseError> {
    let movie = sqlx::query_as::<_, Movie>(&format!("{SELECT_MOVIE} WHERE m.id = ?"))
        .bind(id)
        .fetch_optional(db.pool())
        .await?;

    Ok(movie)
}

/// Newest first. Filters are AND-combined; the director filter is a
/// case-sensitive substring match.
pub async fn list(db: &Database, filters: &MovieFilters) -> Result<Vec<Movie>, DatabaseError> {
    let mut query: QueryBuilder<Sqlite> = QueryBuilder::new(SELECT_MOVIE);
    query.push(" WHERE 1 = 1");

    if let Some(genre) = &filters.genre {
        query.push(" AND m.genre = ").push_bind(genre.clone());
    }
    if let Some(director) = &filters.director {
        // instr() is case-sensitive, unlike LIKE in SQLite
        query.push(" AND instr(m.director, ").push_bind(director.clone()).push(") > 0");
    }
    if let Some(owner_id) = filters.owner_id {
        query.push(" AND m.user_id = ").push_bind(owner_id);
    }

    query.push(" ORDER BY m.created_at DESC, m.id DESC");

    let movies = query.build_query_as::<Movie>().fetch_all(db.pool()).await?;
    Ok(movies)
}

/// Full overwrite of the five mutable fields. Returns false when no row matched.
pub async fn update(db: &Database, id: i64, changes: &MovieChanges) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "UPDATE movies SET title = ?, description = ?, director = ?, release_year = ?, genre = ?, \
         updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = ?",
    )
    .bind(&changes.title)
    .bind(&changes.description)
    .bind(&changes.director)
    .bind(changes.release_year)
    .bind(&changes.genre)
    .bind(id)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Hard delete; the movie's ratings cascade.
pub async fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM movies WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Recompute the cached mean score from the movie's ratings (0 when there
/// are none), store it on the movie and return the aggregate it was taken from.
///
/// Runs after the rating write has committed and is not part of the same
/// transaction: a crash in between leaves the cached value stale until the
/// next rating event on this movie.
pub async fn recompute_rating(db: &Database, movie_id: i64) -> Result<RatingAggregate, DatabaseError> {
    let aggregate = ratings::movie_aggregate(db, movie_id).await?;

    sqlx::query("UPDATE movies SET rating = ? WHERE id = ?")
        .bind(aggregate.mean)
        .bind(movie_id)
        .execute(db.pool())
        .await?;

    tracing::debug!(movie_id, mean = aggregate.mean, count = aggregate.count, "recomputed movie rating");
    Ok(aggregate)
}

/// Movie plus every rating on it, newest rating first.
pub async fn get_with_ratings(db: &Database, id: i64) -> Result<Option<MovieWithRatings>, DatabaseError> {
    let Some(movie) = get_by_id(db, id).await? else {
        return Ok(None);
    };

    let ratings = ratings::list_by_movie(db, id).await?;
    Ok(Some(MovieWithRatings { movie, ratings }))
}
