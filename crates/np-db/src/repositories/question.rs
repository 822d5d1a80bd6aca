use sqlx::{Executor, Sqlite, types::Json};
use uuid::Uuid;

use crate::models::{Question, QuestionFilter, sql_limit};

pub async fn get_question<'e, E>(executor: E, id: Uuid) -> Result<Option<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, area_id, question_text, options, correct_answer_id,
                explanation, difficulty, category
            FROM questions
            WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Questions matching every set field of `filter`, in creation order.
pub async fn find_questions<'e, E>(
    executor: E,
    filter: &QuestionFilter,
) -> Result<Vec<Question>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, area_id, question_text, options, correct_answer_id,
                explanation, difficulty, category
            FROM questions
            WHERE (?1 IS NULL OR area_id = ?1)
                AND (?2 IS NULL OR difficulty = ?2)
                AND (?3 IS NULL OR category = ?3)
            ORDER BY rowid
            LIMIT ?4
        "#,
    )
    .bind(filter.area_id)
    .bind(filter.difficulty.map(|d| d.as_str()))
    .bind(filter.category.as_deref())
    .bind(sql_limit(filter.limit))
    .fetch_all(executor)
    .await
}

pub async fn count_questions<'e, E>(executor: E, area_id: Uuid) -> Result<i64, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar(
        // language=SQLite
        r#"
            SELECT COUNT(*) FROM questions WHERE area_id = ?
        "#,
    )
    .bind(area_id)
    .fetch_one(executor)
    .await
}

pub async fn insert_question<'e, E>(executor: E, question: &Question) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO questions (id, area_id, question_text, options, correct_answer_id,
                explanation, difficulty, category)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(question.id)
    .bind(question.area_id)
    .bind(&question.question_text)
    .bind(Json(&question.options))
    .bind(question.correct_answer_id)
    .bind(question.explanation.as_deref())
    .bind(question.difficulty.as_str())
    .bind(question.category.as_deref())
    .execute(executor)
    .await?;
    Ok(())
}
