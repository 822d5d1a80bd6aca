use chrono::{DateTime, Utc};
use np_srs::CompetencyRecord;
use sqlx::{Executor, FromRow, Sqlite};
use uuid::Uuid;

// The whole-area record is stored under an empty category so that
// (area_id, category) can be the primary key.
const WHOLE_AREA: &str = "";

#[derive(FromRow)]
struct CompetencyRow {
    area_id: Uuid,
    category: String,
    competency: f64,
    #[sqlx(try_from = "i64")]
    question_count: u32,
    #[sqlx(try_from = "i64")]
    correct_count: u32,
    updated_at: DateTime<Utc>,
}

impl From<CompetencyRow> for CompetencyRecord {
    fn from(row: CompetencyRow) -> Self {
        Self {
            area_id: row.area_id,
            category: (row.category != WHOLE_AREA).then_some(row.category),
            competency: row.competency,
            question_count: row.question_count,
            correct_count: row.correct_count,
            updated_at: row.updated_at,
        }
    }
}

/// Fetch the record for an area (and category), creating an empty one on
/// first use.
pub async fn get_or_create_competency<'e, E>(
    executor: E,
    area_id: Uuid,
    category: Option<&str>,
    now: DateTime<Utc>,
) -> Result<CompetencyRecord, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    // The no-op update makes RETURNING yield the existing row on conflict
    let row: CompetencyRow = sqlx::query_as(
        // language=SQLite
        r#"
            INSERT INTO competency_records (area_id, category, competency, question_count,
                correct_count, updated_at)
            VALUES (?, ?, 0.0, 0, 0, ?)
            ON CONFLICT (area_id, category) DO UPDATE SET area_id = excluded.area_id
            RETURNING area_id, category, competency, question_count, correct_count, updated_at
        "#,
    )
    .bind(area_id)
    .bind(category.unwrap_or(WHOLE_AREA))
    .bind(now)
    .fetch_one(executor)
    .await?;
    Ok(row.into())
}

pub async fn upsert_competency<'e, E>(
    executor: E,
    record: &CompetencyRecord,
) -> Result<(), sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query(
        // language=SQLite
        r#"
            INSERT INTO competency_records (area_id, category, competency, question_count,
                correct_count, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT (area_id, category) DO UPDATE SET
                competency = excluded.competency,
                question_count = excluded.question_count,
                correct_count = excluded.correct_count,
                updated_at = excluded.updated_at
        "#,
    )
    .bind(record.area_id)
    .bind(record.category.as_deref().unwrap_or(WHOLE_AREA))
    .bind(record.competency)
    .bind(i64::from(record.question_count))
    .bind(i64::from(record.correct_count))
    .bind(record.updated_at)
    .execute(executor)
    .await?;
    Ok(())
}

/// Competency records, optionally for one area, in creation order. The
/// whole-area record of an area is created before its category records.
pub async fn list_competency<'e, E>(
    executor: E,
    area_id: Option<Uuid>,
) -> Result<Vec<CompetencyRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let rows: Vec<CompetencyRow> = sqlx::query_as(
        // language=SQLite
        r#"
            SELECT area_id, category, competency, question_count, correct_count, updated_at
            FROM competency_records
            WHERE (?1 IS NULL OR area_id = ?1)
            ORDER BY rowid
        "#,
    )
    .bind(area_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(CompetencyRecord::from).collect())
}
