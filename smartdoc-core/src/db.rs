use crate::config::DatabaseConfig;
use sqlx::{postgres::PgPoolOptions, PgPool};

/// Versions reported by `smartdoc-server --health`.
#[derive(Debug, Clone)]
pub struct DatabaseReport {
    pub postgresql: String,
    pub pgvector: Option<String>,
}

pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.url)
        .await
}

pub async fn server_version(pool: &PgPool) -> Result<String, sqlx::Error> {
    let row: (String,) = sqlx::query_as("SELECT version()").fetch_one(pool).await?;
    Ok(row.0)
}

/// `None` when the extension is not installed in this database.
pub async fn pgvector_version(pool: &PgPool) -> Result<Option<String>, sqlx::Error> {
    let row: Option<(String,)> =
        sqlx::query_as("SELECT extversion FROM pg_extension WHERE extname = 'vector'")
            .fetch_optional(pool)
            .await?;
    Ok(row.map(|r| r.0))
}

/// Install pgvector if missing. Requires CREATE privilege on the database.
pub async fn ensure_pgvector(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn report(pool: &PgPool) -> Result<DatabaseReport, sqlx::Error> {
    Ok(DatabaseReport {
        postgresql: server_version(pool).await?,
        pgvector: pgvector_version(pool).await?,
    })
}
