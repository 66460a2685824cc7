use crate::database::manager::{Database, DatabaseError};
use crate::database::models::{Rating, RatingAggregate};

const SELECT_RATING: &str = "SELECT r.id, r.movie_id, r.user_id, r.score, r.comment, \
     u.name AS rater_name, r.created_at, r.updated_at \
     FROM ratings r LEFT JOIN users u ON u.id = r.user_id";

/// Plain insert. The (movie, user) unique index rejects a second rating from
/// the same user; use [`upsert`] for the rate-a-movie flow.
pub async fn create(
    db: &Database,
    movie_id: i64,
    user_id: i64,
    score: f64,
    comment: &str,
) -> Result<i64, DatabaseError> {
    let result = sqlx::query("INSERT INTO ratings (movie_id, user_id, score, comment) VALUES (?, ?, ?, ?)")
        .bind(movie_id)
        .bind(user_id)
        .bind(score)
        .bind(comment)
        .execute(db.pool())
        .await?;

    Ok(result.last_insert_rowid())
}

/// Create the (movie, user) rating or overwrite the existing one in place.
///
/// A single statement, so two concurrent submissions for the same pair can
/// never both insert. The row keeps its id on update.
pub async fn upsert(
    db: &Database,
    movie_id: i64,
    user_id: i64,
    score: f64,
    comment: &str,
) -> Result<i64, DatabaseError> {
    let id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO ratings (movie_id, user_id, score, comment) VALUES (?, ?, ?, ?) \
         ON CONFLICT (movie_id, user_id) DO UPDATE SET \
         score = excluded.score, comment = excluded.comment, \
         updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') \
         RETURNING id",
    )
    .bind(movie_id)
    .bind(user_id)
    .bind(score)
    .bind(comment)
    .fetch_one(db.pool())
    .await?;

    Ok(id)
}

/// Rating with the rater's name joined in.
pub async fn get_by_id(db: &Database, id: i64) -> Result<Option<Rating>, DatabaseError> {
    let rating = sqlx::query_as::<_, Rating>(&format!("{SELECT_RATING} WHERE r.id = ?"))
        .bind(id)
        .fetch_optional(db.pool())
        .await?;

    Ok(rating)
}

pub async fn get_by_movie_and_user(
    db: &Database,
    movie_id: i64,
    user_id: i64,
) -> Result<Option<Rating>, DatabaseError> {
    let rating = sqlx::query_as::<_, Rating>(&format!(
        "{SELECT_RATING} WHERE r.movie_id = ? AND r.user_id = ?"
    ))
    .bind(movie_id)
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    Ok(rating)
}

/// Newest first.
pub async fn list_by_movie(db: &Database, movie_id: i64) -> Result<Vec<Rating>, DatabaseError> {
    let ratings = sqlx::query_as::<_, Rating>(&format!(
        "{SELECT_RATING} WHERE r.movie_id = ? ORDER BY r.created_at DESC, r.id DESC"
    ))
    .bind(movie_id)
    .fetch_all(db.pool())
    .await?;

    Ok(ratings)
}

pub async fn update(db: &Database, id: i64, score: f64, comment: &str) -> Result<bool, DatabaseError> {
    let result = sqlx::query(
        "UPDATE ratings SET score = ?, comment = ?, updated_at = strftime('%Y-%m-%d %H:%M:%f', 'now') WHERE id = ?",
    )
    .bind(score)
    .bind(comment)
    .bind(id)
    .execute(db.pool())
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete(db: &Database, id: i64) -> Result<bool, DatabaseError> {
    let result = sqlx::query("DELETE FROM ratings WHERE id = ?")
        .bind(id)
        .execute(db.pool())
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Mean score and rating count for a movie; mean is 0 without ratings.
pub async fn movie_aggregate(db: &Database, movie_id: i64) -> Result<RatingAggregate, DatabaseError> {
    let aggregate = sqlx::query_as::<_, RatingAggregate>(
        "SELECT COALESCE(AVG(score), 0.0) AS mean, COUNT(*) AS count FROM ratings WHERE movie_id = ?",
    )
    .bind(movie_id)
    .fetch_one(db.pool())
    .await?;

    Ok(aggregate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::movies;
    use crate::testing::{movie_changes, seed_user, test_db};

    struct Fixture {
        db: Database,
        joao: i64,
        maria: i64,
        movie: i64,
    }

    async fn fixture() -> Fixture {
        let db = test_db().await;
        let joao = seed_user(&db, "João", "joao@email.com").await;
        let maria = seed_user(&db, "Maria", "maria@email.com").await;
        let movie = movies::create(&db, &movie_changes("Homem-Aranha", "Jon Watts", Some("Ação")), joao)
            .await
            .unwrap();
        Fixture { db, joao, maria, movie }
    }

    #[tokio::test]
    async fn creates_and_reads_rating() {
        let f = fixture().await;
        let id = create(&f.db, f.movie, f.joao, 8.0, "Muito bom!").await.unwrap();

        let rating = get_by_id(&f.db, id).await.unwrap().unwrap();
        assert_eq!(rating.id, id);
        assert_eq!(rating.score, 8.0);
        assert_eq!(rating.comment.as_deref(), Some("Muito bom!"));
        assert_eq!(rating.rater_name.as_deref(), Some("João"));
    }

    #[tokio::test]
    async fn finds_by_movie_and_user() {
        let f = fixture().await;
        let id = create(&f.db, f.movie, f.joao, 8.0, "").await.unwrap();

        let found = get_by_movie_and_user(&f.db, f.movie, f.joao).await.unwrap().unwrap();
        assert_eq!(found.id, id);
        assert!(get_by_movie_and_user(&f.db, f.movie, f.maria).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_plain_insert_for_same_pair_is_rejected() {
        let f = fixture().await;
        create(&f.db, f.movie, f.joao, 8.0, "").await.unwrap();

        let err = create(&f.db, f.movie, f.joao, 9.0, "").await.unwrap_err();
        assert!(matches!(err, DatabaseError::UniqueViolation(_)));
    }

    #[tokio::test]
    async fn updates_and_deletes_rating() {
        let f = fixture().await;
        let id = create(&f.db, f.movie, f.joao, 8.0, "Muito bom!").await.unwrap();

        assert!(update(&f.db, id, 6.5, "Revisto").await.unwrap());
        let rating = get_by_id(&f.db, id).await.unwrap().unwrap();
        assert_eq!(rating.score, 6.5);
        assert_eq!(rating.comment.as_deref(), Some("Revisto"));

        assert!(delete(&f.db, id).await.unwrap());
        assert!(get_by_id(&f.db, id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn repeated_upserts_keep_one_row_with_last_value() {
        let f = fixture().await;

        let first = upsert(&f.db, f.movie, f.joao, 3.0, "meh").await.unwrap();
        let second = upsert(&f.db, f.movie, f.joao, 7.0, "melhor").await.unwrap();
        let third = upsert(&f.db, f.movie, f.joao, 9.5, "ótimo").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(second, third);

        let all = list_by_movie(&f.db, f.movie).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].score, 9.5);
        assert_eq!(all[0].comment.as_deref(), Some("ótimo"));
    }

    #[tokio::test]
    async fn concurrent_upserts_for_same_pair_keep_one_row() {
        let f = fixture().await;

        let (a, b) = tokio::join!(
            upsert(&f.db, f.movie, f.joao, 4.0, ""),
            upsert(&f.db, f.movie, f.joao, 6.0, ""),
        );
        assert_eq!(a.unwrap(), b.unwrap());

        let aggregate = movie_aggregate(&f.db, f.movie).await.unwrap();
        assert_eq!(aggregate.count, 1);
    }

    #[tokio::test]
    async fn aggregate_of_unrated_movie_is_zero() {
        let f = fixture().await;
        let aggregate = movie_aggregate(&f.db, f.movie).await.unwrap();
        assert_eq!(aggregate, RatingAggregate { mean: 0.0, count: 0 });
    }

    #[tokio::test]
    async fn aggregate_is_arithmetic_mean() {
        let f = fixture().await;
        create(&f.db, f.movie, f.joao, 8.0, "").await.unwrap();
        create(&f.db, f.movie, f.maria, 10.0, "").await.unwrap();

        let aggregate = movie_aggregate(&f.db, f.movie).await.unwrap();
        assert_eq!(aggregate, RatingAggregate { mean: 9.0, count: 2 });
    }

    #[tokio::test]
    async fn deleting_rater_removes_their_ratings() {
        let f = fixture().await;
        let id = create(&f.db, f.movie, f.maria, 5.0, "").await.unwrap();

        crate::database::users::delete(&f.db, f.maria).await.unwrap();
        assert!(get_by_id(&f.db, id).await.unwrap().is_none());
    }
}
