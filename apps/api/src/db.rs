use anyhow::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

const CREATE_UPLOADS: &str = r#"
    CREATE TABLE IF NOT EXISTS uploads (
        id            BIGSERIAL PRIMARY KEY,
        kind          TEXT NOT NULL,
        original_name TEXT NOT NULL,
        stored_name   TEXT NOT NULL,
        path          TEXT NOT NULL,
        mime_type     TEXT NOT NULL,
        size          BIGINT NOT NULL,
        uploaded_at   TIMESTAMPTZ NOT NULL
    )
"#;

const CREATE_ANALYSES: &str = r#"
    CREATE TABLE IF NOT EXISTS analyses (
        id               BIGSERIAL PRIMARY KEY,
        resume_upload_id BIGINT NOT NULL REFERENCES uploads(id),
        jd_upload_id     BIGINT NOT NULL REFERENCES uploads(id),
        score            INTEGER NOT NULL CHECK (score BETWEEN 0 AND 100),
        matched_skills   JSONB NOT NULL,
        missing_skills   JSONB NOT NULL,
        suggestions      JSONB NOT NULL,
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now()
    )
"#;

/// Creates and returns a PostgreSQL connection pool, creating tables if needed.
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    info!("Connecting to PostgreSQL...");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    info!("PostgreSQL connection pool established");

    ensure_schema(&pool).await?;
    Ok(pool)
}

async fn ensure_schema(pool: &PgPool) -> Result<()> {
    sqlx::query(CREATE_UPLOADS).execute(pool).await?;
    sqlx::query(CREATE_ANALYSES).execute(pool).await?;
    info!("Database schema ready (uploads, analyses)");
    Ok(())
}
