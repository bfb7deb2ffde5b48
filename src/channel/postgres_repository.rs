use super::{
    models::{Channel, ChannelFilter, ChannelPatch},
    repository::ChannelRepository,
};
use crate::errors::ApiError;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, Pool, Postgres};

const UNIQUE_VIOLATION: &str = "23505";

const CREATE_TABLE: &str = r#"CREATE TABLE IF NOT EXISTS "channels" (
    "id" BIGINT PRIMARY KEY,
    "name" TEXT NOT NULL,
    "url" TEXT NOT NULL,
    "logo_url" TEXT,
    "enabled" BOOLEAN NOT NULL DEFAULT TRUE,
    "category" TEXT[] NOT NULL DEFAULT '{}'
)"#;

#[derive(Clone)]
pub struct PostgresChannelRepository {
    pool: Pool<Postgres>,
}

impl PostgresChannelRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Opens the pool and makes sure the `channels` table exists.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        sqlx::query(CREATE_TABLE).execute(&pool).await?;

        Ok(Self::new(pool))
    }
}

#[inline]
fn sqlx_error(e: sqlx::Error, method: &'static str) -> ApiError {
    tracing::error!(
        error = e.to_string(),
        method,
        "PostgresChannelRepository sqlx error"
    );

    ApiError::StoreUnavailable
}

#[async_trait]
impl ChannelRepository for PostgresChannelRepository {
    async fn find(&self, filter: ChannelFilter) -> Result<Vec<Channel>, ApiError> {
        sqlx::query_as(
            r#"SELECT * FROM "channels"
            WHERE $1::BOOLEAN IS NULL OR "enabled" = $1
            ORDER BY "id""#,
        )
        .bind(filter.enabled)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| sqlx_error(e, "find"))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Channel>, ApiError> {
        sqlx::query_as(r#"SELECT * FROM "channels" WHERE "id" = $1"#)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, "get_by_id"))
    }

    async fn insert(&self, channel: Channel) -> Result<Channel, ApiError> {
        let id = channel.id;

        sqlx::query_as(
            r#"INSERT INTO "channels"
            ("id", "name", "url", "logo_url", "enabled", "category")
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *"#,
        )
        .bind(channel.id)
        .bind(channel.name)
        .bind(channel.url)
        .bind(channel.logo_url)
        .bind(channel.enabled)
        .bind(channel.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db_err)
                if db_err.code().as_deref() == Some(UNIQUE_VIOLATION) =>
            {
                ApiError::ChannelAlreadyExists(id)
            }
            e => sqlx_error(e, "insert"),
        })
    }

    async fn update(&self, id: i64, patch: ChannelPatch) -> Result<Channel, ApiError> {
        // Absent fields bind NULL and keep the column; logo_url takes a
        // separate flag since NULL is a valid new value for it.
        sqlx::query_as(
            r#"UPDATE "channels" SET
            "name" = COALESCE($2::TEXT, "name"),
            "url" = COALESCE($3::TEXT, "url"),
            "logo_url" = CASE WHEN $4::BOOLEAN THEN $5::TEXT ELSE "logo_url" END,
            "enabled" = COALESCE($6::BOOLEAN, "enabled"),
            "category" = COALESCE($7::TEXT[], "category")
            WHERE "id" = $1
            RETURNING *"#,
        )
        .bind(id)
        .bind(patch.name)
        .bind(patch.url)
        .bind(patch.logo_url.is_some())
        .bind(patch.logo_url.flatten())
        .bind(patch.enabled)
        .bind(patch.category)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if matches!(e, sqlx::Error::RowNotFound) {
                ApiError::ChannelNotFound(id)
            } else {
                sqlx_error(e, "update")
            }
        })
    }

    async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let res = sqlx::query(r#"DELETE FROM "channels" WHERE "id" = $1"#)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| sqlx_error(e, "delete"))?;

        if res.rows_affected() == 0 {
            Err(ApiError::ChannelNotFound(id))
        } else {
            Ok(())
        }
    }

    async fn ping(&self) -> bool {
        match sqlx::query("SELECT 1").execute(&self.pool).await {
            Ok(_) => true,
            Err(e) => {
                tracing::warn!(error = e.to_string(), "Channel store ping failed");
                false
            }
        }
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}
