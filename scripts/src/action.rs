use clap::{Args, Parser, Subcommand};
use envconfig::Envconfig;
use std::path::PathBuf;

use crate::{config, utils};

#[derive(Args, Debug, Clone)]
pub struct RunMigrationsArgs {
    /// Migration file name, relative to the migrations directory
    #[arg(short, long)]
    file: String,
}

#[derive(Args, Debug, Clone)]
pub struct SignPayloadArgs {
    /// File holding the exact webhook body to sign
    #[arg(short, long)]
    body_file: PathBuf,
    /// Unix seconds to sign with, defaults to now
    #[arg(short, long)]
    timestamp: Option<i64>,
}

#[derive(Subcommand, Clone, Debug)]
pub enum Action {
    RunMigrations(RunMigrationsArgs),
    /// Prints an `elevenlabs-signature` header for a webhook body
    SignPayload(SignPayloadArgs),
}

/// Operator tools for the call audit service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct AppArgs {
    #[command(subcommand)]
    pub action: Action,
}

impl AppArgs {
    pub async fn run(&self) -> anyhow::Result<()> {
        match &self.action {
            Action::RunMigrations(RunMigrationsArgs { file }) => {
                let db_config = config::DbConfig::init_from_env()?;
                let db_pool = call_audit::utils::setup_sqlite_db_pool(
                    &db_config.db_host,
                    db_config.db_pass_encrypt.as_deref(),
                    db_config.is_prod(),
                )
                .await?;

                utils::run_migrations(&db_pool, file).await
            }
            Action::SignPayload(SignPayloadArgs {
                body_file,
                timestamp,
            }) => {
                let signing_config = config::SigningConfig::init_from_env()?;
                let timestamp = timestamp.unwrap_or_else(|| chrono::Utc::now().timestamp());

                println!(
                    "{}",
                    utils::sign_payload(&signing_config, body_file, timestamp)?
                );
                Ok(())
            }
        }
    }
}
