use crate::config;
use anyhow::Context;
use call_audit::webhook::elevenlabs::security;
use std::path::Path;

/// Renders a migration from the workspace `migrations` directory and applies it
pub async fn run_migrations(db_pool: &sqlx::SqlitePool, file_name: &str) -> anyhow::Result<()> {
    let mut tera = tera::Tera::new("../migrations/**/*.sql")?;
    tera.autoescape_on(vec![".sql"]);

    let migration_query = tera.render(file_name, &tera::Context::new())?;

    sqlx::raw_sql(&migration_query).execute(db_pool).await?;
    Ok(())
}

/// Signs the content of `body_file` the way the voice platform does
pub fn sign_payload(
    signing_config: &config::SigningConfig,
    body_file: &Path,
    timestamp: i64,
) -> anyhow::Result<String> {
    let body = std::fs::read(body_file)
        .with_context(|| format!("failed to read {}", body_file.display()))?;

    security::signature_header(&signing_config.webhook_secret, timestamp, &body)
        .context("failed to compute signature")
}
