use sqlx::{Executor, Sqlite};
use uuid::Uuid;

use crate::models::{StudyArea, StudyAreaSummary};

/// All study areas with their question counts, in creation order.
pub async fn list_areas<'e, E>(executor: E) -> Result<Vec<StudyAreaSummary>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT a.id, a.name, a.description, a.color,
                (SELECT COUNT(*) FROM questions q WHERE q.area_id = a.id) AS question_count
            FROM study_areas a
            ORDER BY a.rowid
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn get_area<'e, E>(executor: E, id: Uuid) -> Result<Option<StudyArea>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as(
        // language=SQLite
        r#"
            SELECT id, name, description, color
            FROM study_areas
            WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn insert_area<'e, E>(executor: E, area: &StudyArea) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO study_areas (id, name, description, color)
            VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(area.id)
    .bind(&area.name)
    .bind(&area.description)
    .bind(&area.color)
    .execute(executor)
    .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{in_memory_pool, models::DEFAULT_COLOR};

    fn area(name: &str) -> StudyArea {
        StudyArea {
            id: Uuid::new_v4(),
            name: name.to_string(),
            description: format!("{name} questions"),
            color: DEFAULT_COLOR.to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_list_in_order() {
        let pool = in_memory_pool().await.unwrap();
        let first = area("Pharmacology");
        let second = area("Fundamentals");
        insert_area(&pool, &first).await.unwrap();
        insert_area(&pool, &second).await.unwrap();

        let listed = list_areas(&pool).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].area, first);
        assert_eq!(listed[1].area, second);
        assert_eq!(listed[0].question_count, 0);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let pool = in_memory_pool().await.unwrap();
        let first = area("Pharmacology");
        insert_area(&pool, &first).await.unwrap();

        let err = insert_area(&pool, &first).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Database(_)));
        assert_eq!(list_areas(&pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_area_is_none() {
        let pool = in_memory_pool().await.unwrap();
        assert!(get_area(&pool, Uuid::new_v4()).await.unwrap().is_none());

        let stored = area("Pediatrics");
        insert_area(&pool, &stored).await.unwrap();
        assert_eq!(get_area(&pool, stored.id).await.unwrap(), Some(stored));
    }
}
