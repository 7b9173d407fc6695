use call_audit::webhook::elevenlabs::security::WebhookSecret;
use envconfig::Envconfig;

#[derive(Envconfig, Clone)]
pub struct DbConfig {
    #[envconfig(default = "local")]
    pub env: String,
    pub db_host: String,
    pub db_pass_encrypt: Option<String>,
}

impl DbConfig {
    pub fn is_prod(&self) -> bool {
        self.env.to_lowercase() == "prod"
    }
}

#[derive(Envconfig, Clone)]
pub struct SigningConfig {
    pub webhook_secret: WebhookSecret,
}
