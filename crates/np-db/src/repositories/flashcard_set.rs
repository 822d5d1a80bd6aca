use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::models::{FlashcardSet, FlashcardSetSummary};

/// All flashcard sets with their card counts, in creation order.
pub async fn list_sets<'e, E>(executor: E) -> Result<Vec<FlashcardSetSummary>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT s.id, s.name, s.description, s.category, s.color,
                s.spaced_repetition_enabled, s.created_at,
                (SELECT COUNT(*) FROM flashcards f WHERE f.set_id = s.id) AS card_count
            FROM flashcard_sets s
            ORDER BY s.rowid
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_set<'e, E>(executor: E, id: Uuid) -> Result<Option<FlashcardSet>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, name, description, category, color, spaced_repetition_enabled, created_at
            FROM flashcard_sets
            WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_set<'e, E>(executor: E, set: &FlashcardSet) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO flashcard_sets (id, name, description, category, color,
                spaced_repetition_enabled, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(set.id)
    .bind(&set.name)
    .bind(&set.description)
    .bind(&set.category)
    .bind(&set.color)
    .bind(set.spaced_repetition_enabled)
    .bind(set.created_at)
    .execute(executor)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        fixtures::{stored_card, stored_set},
        in_memory_pool,
    };

    #[tokio::test]
    async fn test_list_counts_cards_per_set() {
        let pool = in_memory_pool().await.unwrap();
        let prefixes = stored_set(&pool, "Prefixes").await;
        let suffixes = stored_set(&pool, "Suffixes").await;
        stored_card(&pool, prefixes.id, "brady-").await;
        stored_card(&pool, prefixes.id, "tachy-").await;

        let listed = list_sets(&pool).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].set, prefixes);
        assert_eq!(listed[0].card_count, 2);
        assert_eq!(listed[1].set, suffixes);
        assert_eq!(listed[1].card_count, 0);
    }

    #[tokio::test]
    async fn test_get_set() {
        let pool = in_memory_pool().await.unwrap();
        let set = stored_set(&pool, "Roots").await;

        assert_eq!(get_set(&pool, set.id).await.unwrap(), Some(set));
        assert!(get_set(&pool, Uuid::new_v4()).await.unwrap().is_none());
    }
}
