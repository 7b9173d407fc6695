use crate::webhook::elevenlabs::security::VerificationResult;
use derive_more::{Display, Error};
use ntex::{http, web};

/// Per-request errors returned by the webhook and listing endpoints
#[derive(Debug, Display, Error)]
pub enum WebhookError {
    #[display("missing signature header")]
    MissingSignature,
    #[display("invalid signature header format")]
    MalformedSignature,
    #[display("timestamp too old")]
    StaleSignature,
    #[display("invalid signature")]
    InvalidSignature,
    #[display("invalid webhook payload")]
    InvalidPayload(#[error(not(source))] String),
    #[display("internal server error")]
    InternalServerError(#[error(not(source))] String),
}

impl WebhookError {
    /// Maps a rejected verification to its error, `None` when authentic
    pub fn from_verification(result: VerificationResult) -> Option<Self> {
        match result {
            VerificationResult::Authentic => None,
            VerificationResult::MissingHeader => Some(WebhookError::MissingSignature),
            VerificationResult::MalformedHeader => Some(WebhookError::MalformedSignature),
            VerificationResult::Stale => Some(WebhookError::StaleSignature),
            VerificationResult::SignatureMismatch => Some(WebhookError::InvalidSignature),
        }
    }

    fn get_error_message(&self) -> String {
        match self {
            WebhookError::InvalidPayload(msg) => format!("[InvalidPayload] {:#?}", msg),
            WebhookError::InternalServerError(msg) => format!("[InternalServerError] {:#?}", msg),
            other => format!("[Rejected] {other}"),
        }
    }
}

impl web::error::WebResponseError for WebhookError {
    fn error_response(&self, _: &web::HttpRequest) -> web::HttpResponse {
        tracing::error!("{}", self.get_error_message());

        web::HttpResponse::build(self.status_code()).json(&serde_json::json!({
            "error": self.to_string()
        }))
    }

    fn status_code(&self) -> http::StatusCode {
        match *self {
            WebhookError::MissingSignature
            | WebhookError::MalformedSignature
            | WebhookError::StaleSignature
            | WebhookError::InvalidPayload(_) => http::StatusCode::BAD_REQUEST,
            WebhookError::InvalidSignature => http::StatusCode::UNAUTHORIZED,
            WebhookError::InternalServerError(_) => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
