use crate::{errors, state::AppState};
use ntex::web;

/// Lists stored calls joined with their evaluation (GET)
///
/// Transcripts are reduced to the agent and user dialogue.
#[web::get("/calls")]
pub async fn list_calls(
    app_state: web::types::State<AppState>,
) -> Result<impl web::Responder, web::Error> {
    let summaries = app_state
        .repo
        .get_call_summaries()
        .await
        .map_err(|e| errors::WebhookError::InternalServerError(format!("{e:#}")))?;

    Ok(web::HttpResponse::Ok().json(&summaries))
}
