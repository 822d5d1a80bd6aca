use std::sync::Arc;

use np_srs::WeightTable;
use sqlx::SqlitePool;

use crate::ApiConfig;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
    pub config: Arc<ApiConfig>,
    /// Competency band -> difficulty mix used when starting quizzes
    pub weights: WeightTable,
}

impl ApiState {
    pub fn new(config: ApiConfig, pool: SqlitePool) -> Self {
        Self {
            pool,
            config: Arc::new(config),
            weights: WeightTable::standard(),
        }
    }

    /// Connect to the configured database, run migrations and build the state
    pub async fn connect(config: ApiConfig) -> anyhow::Result<Self> {
        let pool =
            np_db::create_pool(&config.database_url, config.database_max_connections).await?;
        np_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

        tracing::info!(database_url = %config.database_url, "Database ready");

        Ok(Self::new(config, pool))
    }
}
