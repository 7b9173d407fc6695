//! Application configuration management with security considerations.
//!
//! The configuration is loaded once from the environment in `main` and handed
//! to the components that need it. Nothing here is a global.
//!
//! # Security Notes
//! - Sensitive fields are clearly marked and should never be logged
//! - The webhook secret is wrapped in [`WebhookSecret`], which redacts itself
//!   in `Debug` and `Display` output

use crate::webhook::elevenlabs::security::{MaxSkew, WebhookSecret};
use envconfig::Envconfig;

/// Application configuration with security-aware field management.
///
/// # Security Requirements
/// - All `SENSITIVE` fields must be stored securely (encrypted at rest)
/// - Never log or expose sensitive values
/// - Rotate the webhook secret from the voice platform dashboard, then restart
#[derive(Envconfig, Clone)]
pub struct AppConfig {
    /// Environment name to deploy the app (NON-SENSITIVE)
    /// Values: "local", "dev", "staging", "prod"
    #[envconfig(default = "local")]
    pub env: String,

    /// Database host value (NON-SENSITIVE)
    /// Example: "sqlite:data/calls.db"
    pub db_host: String,

    /// 🔒 SENSITIVE: Database password to encrypt SQLite data.
    /// Only required when running in production.
    pub db_pass_encrypt: Option<String>,

    /// Host address for web server binding (NON-SENSITIVE)
    #[envconfig(default = "0.0.0.0")]
    pub web_server_host: String,

    /// Port for web server binding (NON-SENSITIVE)
    #[envconfig(default = "8080")]
    pub web_server_port: u16,

    /// Path to SSL private key file (SENSITIVE PATH)
    #[envconfig(default = "server.key")]
    pub private_key_path: String,

    /// Path to SSL certificate file (NON-SENSITIVE)
    #[envconfig(default = "server.crt")]
    pub certificate_path: String,

    /// 🔒 SENSITIVE: Shared secret used by the voice platform to sign webhooks
    pub webhook_secret: WebhookSecret,

    /// Maximum accepted age of a signed webhook, in seconds (NON-SENSITIVE)
    /// Must be a positive integer, loading fails otherwise.
    #[envconfig(from = "WEBHOOK_MAX_SKEW_SECS", default = "1800")]
    pub webhook_max_skew: MaxSkew,

    /// 🔒 SENSITIVE: Google AI Studio API key for transcript evaluations
    pub google_api_key: String,

    /// Gemini model used to evaluate transcripts (NON-SENSITIVE)
    #[envconfig(default = "gemini-1.5-flash")]
    pub gemini_model: String,

    /// Base URL of the Gemini REST API (NON-SENSITIVE)
    #[envconfig(default = "https://generativelanguage.googleapis.com/v1beta")]
    pub gemini_api_base_url: String,

    /// 🔒 SENSITIVE: Logfire write token. Telemetry is only exported when set.
    pub logfire_token: Option<String>,
}

impl AppConfig {
    /// Checks if running in production environment
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }

    /// Constructs the Gemini endpoint used to generate evaluations
    pub fn gemini_generate_content_endpoint(&self) -> String {
        format!(
            "{base}/models/{model}:generateContent",
            base = self.gemini_api_base_url.trim_end_matches('/'),
            model = self.gemini_model
        )
    }
}
