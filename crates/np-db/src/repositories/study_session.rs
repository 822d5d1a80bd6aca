use sqlx::{Executor, Sqlite, types::Json};
use uuid::Uuid;

use crate::models::StudySession;

pub async fn get_session<'e, E>(executor: E, id: Uuid) -> Result<Option<StudySession>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, set_id, cards_studied, correct_cards, session_duration,
                started_at, completed_at
            FROM study_sessions
            WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_session<'e, E>(executor: E, session: &StudySession) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO study_sessions (id, set_id, cards_studied, correct_cards,
                session_duration, started_at, completed_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(session.id)
    .bind(session.set_id)
    .bind(Json(&session.cards_studied))
    .bind(Json(&session.correct_cards))
    .bind(session.session_duration)
    .bind(session.started_at)
    .bind(session.completed_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Write back a session's progress. Returns `false` if the session is unknown.
pub async fn update_session<'e, E>(executor: E, session: &StudySession) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query(
        // language=SQLite
        r#"
            UPDATE study_sessions
            SET cards_studied = ?, correct_cards = ?, session_duration = ?, completed_at = ?
            WHERE id = ?
        "#,
    )
    .bind(Json(&session.cards_studied))
    .bind(Json(&session.correct_cards))
    .bind(session.session_duration)
    .bind(session.completed_at)
    .bind(session.id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected() > 0)
}

/// Every session that studied at least one card, oldest first.
pub async fn sessions_with_reviews<'e, E>(executor: E) -> Result<Vec<StudySession>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, set_id, cards_studied, correct_cards, session_duration,
                started_at, completed_at
            FROM study_sessions
            WHERE json_array_length(cards_studied) > 0
            ORDER BY rowid
        "#,
    )
    .fetch_all(executor)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{fixtures::stored_set, in_memory_pool};
    use chrono::{Duration, Utc};

    #[tokio::test]
    async fn test_session_progress_is_written_back() {
        let pool = in_memory_pool().await.unwrap();
        let set = stored_set(&pool, "Prefixes").await;
        let start = Utc::now();
        let mut session = StudySession::new(set.id, start);
        insert_session(&pool, &session).await.unwrap();

        let card = Uuid::new_v4();
        session.record_review(card, true);
        session.complete(start + Duration::seconds(30));
        assert!(update_session(&pool, &session).await.unwrap());

        let fetched = get_session(&pool, session.id).await.unwrap().unwrap();
        assert_eq!(fetched, session);
        assert_eq!(fetched.session_duration, Some(30));
    }

    #[tokio::test]
    async fn test_update_unknown_session() {
        let pool = in_memory_pool().await.unwrap();
        let set = stored_set(&pool, "Prefixes").await;
        let session = StudySession::new(set.id, Utc::now());

        assert!(!update_session(&pool, &session).await.unwrap());
        assert!(get_session(&pool, session.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_sessions_are_not_listed() {
        let pool = in_memory_pool().await.unwrap();
        let set = stored_set(&pool, "Roots").await;
        let now = Utc::now();

        let idle = StudySession::new(set.id, now);
        insert_session(&pool, &idle).await.unwrap();
        let mut active = StudySession::new(set.id, now);
        active.record_review(Uuid::new_v4(), false);
        insert_session(&pool, &active).await.unwrap();

        let listed = sessions_with_reviews(&pool).await.unwrap();
        assert_eq!(listed, vec![active]);
    }
}
