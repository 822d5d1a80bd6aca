use sqlx::{Executor, Sqlite, types::Json};
use uuid::Uuid;

use crate::models::{AttemptFilter, QuizAttempt, sql_limit};

pub async fn get_attempt<'e, E>(executor: E, id: Uuid) -> Result<Option<QuizAttempt>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, area_id, category, questions, answers, score, total_questions,
                competency, started_at, completed_at
            FROM quiz_attempts
            WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_attempt<'e, E>(executor: E, attempt: &QuizAttempt) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO quiz_attempts (id, area_id, category, questions, answers, score,
                total_questions, competency, started_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(attempt.id)
    .bind(attempt.area_id)
    .bind(attempt.category.as_deref())
    .bind(Json(&attempt.questions))
    .bind(Json(&attempt.answers))
    .bind(i64::from(attempt.score))
    .bind(i64::from(attempt.total_questions))
    .bind(attempt.competency)
    .bind(attempt.started_at)
    .bind(attempt.completed_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Store the answers and score of a submitted attempt.
///
/// Only an attempt still in progress is written; returns `false` when the
/// attempt is unknown or was already completed.
pub async fn complete_attempt<'e, E>(executor: E, attempt: &QuizAttempt) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            UPDATE quiz_attempts
            SET answers = ?, score = ?, completed_at = ?
            WHERE id = ? AND completed_at IS NULL
        "#,
    )
    .bind(Json(&attempt.answers))
    .bind(i64::from(attempt.score))
    .bind(attempt.completed_at)
    .bind(attempt.id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Completed attempts matching `filter`, newest first.
pub async fn completed_attempts<'e, E>(
    executor: E,
    filter: &AttemptFilter,
) -> Result<Vec<QuizAttempt>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, area_id, category, questions, answers, score, total_questions,
                competency, started_at, completed_at
            FROM quiz_attempts
            WHERE completed_at IS NOT NULL
                AND (?1 IS NULL OR area_id = ?1)
                AND (?2 IS NULL OR category = ?2)
            ORDER BY completed_at DESC, rowid DESC
            LIMIT ?3
        "#,
    )
    .bind(filter.area_id)
    .bind(filter.category.as_deref())
    .bind(sql_limit(filter.limit))
    .fetch_all(executor)
    .await
}
