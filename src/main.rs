//! # Call Audit Web Application
//!
//! Main entry point of the webhook receiver. Loads the configuration, wires
//! the services together and starts the web server.

#![recursion_limit = "256"]

use anyhow::Context;
use call_audit::{
    api, config, consts, repo, services, state, utils,
    webhook::{self, elevenlabs::security::WebhookAuthenticator},
};
use envconfig::Envconfig;
use logfire::config::{MetricsOptions, SendToLogfire};
use ntex::web;
use openssl::ssl::{SslAcceptor, SslFiletype, SslMethod};

#[ntex::main]
async fn main() -> anyhow::Result<()> {
    // Initialize configuration
    let app_config = config::AppConfig::init_from_env()
        .context("failed to load app config, check environment variables")?;

    // Initialize logging and metrics
    let mut logfire_config = logfire::configure()
        .install_panic_handler()
        .with_metrics(Some(MetricsOptions::default()))
        .send_to_logfire(SendToLogfire::IfTokenPresent);
    if let Some(token) = &app_config.logfire_token {
        logfire_config = logfire_config.with_token(token);
    }
    let shutdown_handler = logfire_config.finish()?;

    // Initialize database connection pool
    let sqlite_repo = repo::sqlite::SqlxSqliteRepo {
        db_pool: utils::setup_sqlite_db_pool(
            &app_config.db_host,
            app_config.db_pass_encrypt.as_deref(),
            app_config.is_prod(),
        )
        .await?,
    };

    let authenticator =
        WebhookAuthenticator::new(app_config.webhook_secret.clone(), app_config.webhook_max_skew);
    let evaluator = services::gemini::GeminiEvaluator::new(&app_config);

    configure_and_run_server(&app_config, authenticator, sqlite_repo, evaluator).await?;

    shutdown_handler.shutdown()?;

    Ok(())
}

/// Configures SSL acceptor for production environments
fn setup_ssl_acceptor(
    app_config: &config::AppConfig,
) -> anyhow::Result<openssl::ssl::SslAcceptorBuilder> {
    let mut ssl_acceptor = SslAcceptor::mozilla_intermediate(SslMethod::tls_server())
        .map_err(|e| anyhow::anyhow!("Failed to create SSL acceptor: {}", e))?;

    ssl_acceptor
        .set_private_key_file(&app_config.private_key_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load private key from {}: {}",
                app_config.private_key_path,
                e
            )
        })?;

    ssl_acceptor
        .set_certificate_file(&app_config.certificate_path, SslFiletype::PEM)
        .map_err(|e| {
            anyhow::anyhow!(
                "Failed to load certificate from {}: {}",
                app_config.certificate_path,
                e
            )
        })?;

    Ok(ssl_acceptor)
}

/// Creates application state from the provided services
fn create_app_state(
    authenticator: WebhookAuthenticator,
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
    evaluator: services::gemini::GeminiEvaluator,
) -> state::AppState {
    state::AppState {
        authenticator,
        repo: Box::new(sqlite_repo),
        evaluator: Box::new(evaluator),
    }
}

/// Configures and starts the web server with appropriate SSL settings
async fn configure_and_run_server(
    app_config: &config::AppConfig,
    authenticator: WebhookAuthenticator,
    sqlite_repo: repo::sqlite::SqlxSqliteRepo,
    evaluator: services::gemini::GeminiEvaluator,
) -> anyhow::Result<()> {
    let server_addr = (
        app_config.web_server_host.clone(),
        app_config.web_server_port,
    );

    let server = web::server(move || {
        web::App::new()
            .wrap(web::middleware::Logger::default())
            .wrap(web::middleware::Compress::default())
            .state(web::types::PayloadConfig::new(
                consts::MAX_WEBHOOK_PAYLOAD_BYTES,
            ))
            .state(create_app_state(
                authenticator.clone(),
                sqlite_repo.clone(),
                evaluator.clone(),
            ))
            .configure(webhook::routes::elevenlabs)
            .configure(api::routes::calls)
    });

    logfire::info!(
        "Starting web server on {host}:{port}",
        host = app_config.web_server_host.clone(),
        port = app_config.web_server_port.to_string()
    );

    let bound_server = if app_config.is_prod() {
        let ssl_acceptor = setup_ssl_acceptor(app_config)?;
        server.bind_openssl(server_addr, ssl_acceptor)?
    } else {
        server.bind(server_addr)?
    };

    bound_server
        .run()
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
