use np_srs::RecallState;
use sqlx::{Executor, Sqlite, types::Json};
use uuid::Uuid;

use crate::models::{Flashcard, FlashcardFilter, sql_limit};

pub async fn get_flashcard<'e, E>(executor: E, id: Uuid) -> Result<Option<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT f.id, f.set_id, f.term, f.definition, f.pronunciation, f.word_type,
                f.category, f.examples, f.difficulty, f.created_at,
                p.easiness_factor, p.interval_days, p.repetitions, p.last_reviewed,
                p.next_review, p.review_count, p.success_rate, p.average_response_time
            FROM flashcards f
            LEFT JOIN flashcard_progress p ON p.flashcard_id = f.id
            WHERE f.id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Flashcards matching `filter`, in creation order, with their recall state.
pub async fn find_flashcards<'e, E>(
    executor: E,
    filter: &FlashcardFilter,
) -> Result<Vec<Flashcard>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT f.id, f.set_id, f.term, f.definition, f.pronunciation, f.word_type,
                f.category, f.examples, f.difficulty, f.created_at,
                p.easiness_factor, p.interval_days, p.repetitions, p.last_reviewed,
                p.next_review, p.review_count, p.success_rate, p.average_response_time
            FROM flashcards f
            LEFT JOIN flashcard_progress p ON p.flashcard_id = f.id
            WHERE (?1 IS NULL OR f.set_id = ?1)
            ORDER BY f.rowid
            LIMIT ?2
        "#,
    )
    .bind(filter.set_id)
    .bind(sql_limit(filter.limit))
    .fetch_all(executor)
    .await
}

/// Insert a new card. Recall state is stored separately by [`upsert_progress`].
pub async fn insert_flashcard<'e, E>(executor: E, card: &Flashcard) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO flashcards (id, set_id, term, definition, pronunciation, word_type,
                category, examples, difficulty, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(card.id)
    .bind(card.set_id)
    .bind(&card.term)
    .bind(&card.definition)
    .bind(card.pronunciation.as_deref())
    .bind(card.word_type.as_deref())
    .bind(card.category.as_deref())
    .bind(Json(&card.examples))
    .bind(card.difficulty.as_str())
    .bind(card.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Store a card's recall state, replacing any previous one.
pub async fn upsert_progress<'e, E>(
    executor: E,
    flashcard_id: Uuid,
    recall: &RecallState,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO flashcard_progress (flashcard_id, easiness_factor, interval_days,
                repetitions, last_reviewed, next_review, review_count, success_rate,
                average_response_time)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT (flashcard_id) DO UPDATE SET
                easiness_factor = excluded.easiness_factor,
                interval_days = excluded.interval_days,
                repetitions = excluded.repetitions,
                last_reviewed = excluded.last_reviewed,
                next_review = excluded.next_review,
                review_count = excluded.review_count,
                success_rate = excluded.success_rate,
                average_response_time = excluded.average_response_time
        "#,
    )
    .bind(flashcard_id)
    .bind(recall.easiness_factor)
    .bind(i64::from(recall.interval))
    .bind(i64::from(recall.repetitions))
    .bind(recall.last_reviewed)
    .bind(recall.next_review)
    .bind(i64::from(recall.review_count))
    .bind(recall.success_rate)
    .bind(recall.average_response_time)
    .execute(executor)
    .await?;
    Ok(())
}
