//! ElevenLabs webhook endpoint handlers
//!
//! # Security
//!
//! The POST endpoint authenticates every request with the `elevenlabs-signature`
//! header before the body is even parsed. Rejected requests never reach the
//! repository or the evaluator.

use super::{handler, schemas, security::VerificationResult};
use crate::{consts, errors, metric, state::AppState};
use chrono::Utc;
use ntex::{util::Bytes, web};

/// Webhook receiver endpoint (POST)
///
/// # Returns
/// - 200 `{"status": "received"}` once the event is handled
/// - 400 if the signature header is missing, malformed or stale, or the body is not an event
/// - 401 if the signature does not match
/// - 500 if the call event could not be stored
///
/// # Processing
///
/// Process webhook synchronously, the compliance evaluation runs before the response.
#[web::post("/post_call_webhook")]
pub async fn receive(
    req: web::HttpRequest,
    body: Bytes,
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let header_value = match req.headers().get(consts::SIGNATURE_HEADER_NAME) {
        Some(value) => match value.to_str() {
            Ok(s) => Some(s),
            Err(_) => {
                logfire::warn!("Invalid signature header: not valid UTF-8");
                metric::incr_webhook_verification_statds(
                    &VerificationResult::MalformedHeader.to_string(),
                );
                return Err(errors::WebhookError::MalformedSignature.into());
            }
        },
        None => None,
    };

    let verification = app_state
        .authenticator
        .verify(&body, header_value, Utc::now());
    metric::incr_webhook_verification_statds(&verification.to_string());

    if let Some(rejection) = errors::WebhookError::from_verification(verification) {
        logfire::warn!(
            "Webhook signature verification failed: {reason}",
            reason = verification.to_string()
        );
        return Err(rejection.into());
    }

    // Parse the JSON payload after the signature verification
    let event: schemas::WebhookEvent = serde_json::from_slice(&body).map_err(|e| {
        logfire::error!(
            "Failed to parse webhook payload: {error}",
            error = e.to_string()
        );
        errors::WebhookError::InvalidPayload(e.to_string())
    })?;

    let webhook = schemas::CallWebhook::try_from(event).map_err(|e| {
        logfire::error!(
            "Failed to parse webhook event data: {error}",
            error = e.to_string()
        );
        errors::WebhookError::InvalidPayload(e.to_string())
    })?;

    handler::process_webhook(webhook, &app_state.repo, &app_state.evaluator)
        .await
        .map_err(|e| errors::WebhookError::InternalServerError(format!("{e:#}")))?;

    Ok(web::HttpResponse::Ok().json(&serde_json::json!({
        "status": "received"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::evaluation::{Decision, Verdict},
        repo::{self, MockCallRepo},
        services::{self, MockTranscriptEvaluator},
        webhook::elevenlabs::security::{
            MaxSkew, WebhookAuthenticator, WebhookSecret, signature_header,
        },
    };
    use ntex::{
        http::{self, header::HeaderValue},
        web::test,
    };

    const SECRET: &str = "wsec_route_test";
    const BODY: &str = r#"{"type":"post_call_transcription","event_timestamp":1739537297,"data":{"agent_id":"agent-1","conversation_id":"conv-1","status":"done","transcript":[{"role":"agent","message":"Hello"}]}}"#;

    fn secret() -> WebhookSecret {
        WebhookSecret::new(SECRET).unwrap()
    }

    fn app_state(repo: MockCallRepo, evaluator: MockTranscriptEvaluator) -> AppState {
        let repo: repo::ImplCallRepo = Box::new(repo);
        let evaluator: services::ImplTranscriptEvaluator = Box::new(evaluator);

        AppState {
            authenticator: WebhookAuthenticator::new(secret(), MaxSkew::default()),
            repo,
            evaluator,
        }
    }

    /// Mocks that fail the test if any storage or LLM work happens
    fn untouched_state() -> AppState {
        let mut mock_repo = MockCallRepo::new();
        mock_repo.expect_insert_call_event().never();
        mock_repo.expect_upsert_transcript_evaluation().never();
        let mut mock_evaluator = MockTranscriptEvaluator::new();
        mock_evaluator.expect_evaluate_transcript().never();

        app_state(mock_repo, mock_evaluator)
    }

    fn signed_now(body: &[u8]) -> String {
        signature_header(&secret(), Utc::now().timestamp(), body).unwrap()
    }

    /// Returns the response status and its JSON body
    async fn post(
        state: AppState,
        header: Option<HeaderValue>,
        body: &'static str,
    ) -> (http::StatusCode, serde_json::Value) {
        let app = test::init_service(web::App::new().state(state).service(receive)).await;

        let mut req = test::TestRequest::post().uri("/post_call_webhook");
        if let Some(header) = header {
            req = req.header(consts::SIGNATURE_HEADER_NAME, header);
        }

        let resp = test::call_service(&app, req.set_payload(body).to_request()).await;
        let status = resp.status();
        let body: serde_json::Value = serde_json::from_slice(&test::read_body(resp).await).unwrap();

        (status, body)
    }

    fn header(value: &str) -> Option<HeaderValue> {
        Some(HeaderValue::from_str(value).unwrap())
    }

    #[ntex::test]
    async fn test_authentic_transcription_is_processed() {
        let mut mock_repo = MockCallRepo::new();
        mock_repo
            .expect_insert_call_event()
            .withf(|event| event.conversation_id == "conv-1")
            .times(1)
            .returning(|_| Ok(1));
        mock_repo
            .expect_upsert_transcript_evaluation()
            .times(1)
            .returning(|_| Ok(()));
        let mut mock_evaluator = MockTranscriptEvaluator::new();
        mock_evaluator
            .expect_evaluate_transcript()
            .times(1)
            .returning(|_| {
                Ok(Verdict {
                    decision: Decision::NotJustified,
                    reason: "no fraud was reported".to_string(),
                    attention_score: 60,
                })
            });

        let (status, body) = post(
            app_state(mock_repo, mock_evaluator),
            header(&signed_now(BODY.as_bytes())),
            BODY,
        )
        .await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body, serde_json::json!({"status": "received"}));
    }

    #[ntex::test]
    async fn test_missing_header_is_bad_request() {
        let (status, body) = post(untouched_state(), None, BODY).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "missing signature header");
    }

    #[ntex::test]
    async fn test_malformed_header_is_bad_request() {
        let (status, body) = post(untouched_state(), header("t=1700000000"), BODY).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid signature header format");
    }

    #[ntex::test]
    async fn test_non_utf8_header_is_bad_request() {
        let value = HeaderValue::from_bytes(b"t=17\xff,v0=00").unwrap();

        let (status, body) = post(untouched_state(), Some(value), BODY).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid signature header format");
    }

    #[ntex::test]
    async fn test_stale_signature_is_bad_request() {
        let old_timestamp = Utc::now().timestamp() - 1801;
        let stale = signature_header(&secret(), old_timestamp, BODY.as_bytes()).unwrap();

        let (status, body) = post(untouched_state(), header(&stale), BODY).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "timestamp too old");
    }

    #[ntex::test]
    async fn test_signature_mismatch_is_unauthorized() {
        let signed_for_other_body = signed_now(b"{}");

        let (status, body) = post(untouched_state(), header(&signed_for_other_body), BODY).await;

        assert_eq!(status, http::StatusCode::UNAUTHORIZED);
        assert_eq!(body, serde_json::json!({"error": "invalid signature"}));
    }

    #[ntex::test]
    async fn test_authentic_invalid_json_is_bad_request() {
        const NOT_JSON: &str = "call ended";

        let (status, body) = post(untouched_state(), header(&signed_now(NOT_JSON.as_bytes())), NOT_JSON).await;

        assert_eq!(status, http::StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid webhook payload");
    }

    #[ntex::test]
    async fn test_authentic_unknown_event_is_acknowledged() {
        const UNKNOWN: &str = r#"{"type":"call_initiation_failure","data":{}}"#;

        let (status, body) = post(untouched_state(), header(&signed_now(UNKNOWN.as_bytes())), UNKNOWN).await;

        assert_eq!(status, http::StatusCode::OK);
        assert_eq!(body["status"], "received");
    }

    #[ntex::test]
    async fn test_storage_failure_is_internal_error() {
        let mut mock_repo = MockCallRepo::new();
        mock_repo
            .expect_insert_call_event()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("disk full")));
        let mut mock_evaluator = MockTranscriptEvaluator::new();
        mock_evaluator.expect_evaluate_transcript().never();

        let (status, body) = post(
            app_state(mock_repo, mock_evaluator),
            header(&signed_now(BODY.as_bytes())),
            BODY,
        )
        .await;

        assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "internal server error");
    }
}
