//! # ElevenLabs Webhook Handler
//!
//! Business logic run on authenticated post-call webhooks: persisting call
//! events and triggering the compliance evaluation of transcripts.

use super::schemas::{CallWebhook, PostCallTranscription};
use crate::{consts, metric, models, repo, services};
use anyhow::{Context, Result};
use chrono::Utc;

/// What was done with an authenticated webhook
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// The call was stored, `evaluated` tells whether its verdict was stored too
    TranscriptionStored {
        conversation_id: String,
        evaluated: bool,
    },
    AudioReceived {
        conversation_id: String,
    },
    Ignored {
        event_type: String,
    },
}

/// Dispatches an authenticated webhook by event type
///
/// # Errors
///
/// Only a failure to persist the call event is returned. Evaluation failures
/// are logged and reported through [`EventOutcome::TranscriptionStored`].
#[tracing::instrument(skip_all)]
pub async fn process_webhook(
    webhook: CallWebhook,
    repo: &repo::ImplCallRepo,
    evaluator: &services::ImplTranscriptEvaluator,
) -> Result<EventOutcome> {
    match webhook {
        CallWebhook::Transcription(call) => {
            metric::incr_webhook_event_statds(consts::EVENT_TYPE_POST_CALL_TRANSCRIPTION);
            let conversation_id = call.conversation_id.clone();

            let event = models::call_event::CallEvent::from_transcription(
                consts::EVENT_TYPE_POST_CALL_TRANSCRIPTION,
                call.clone(),
                Utc::now(),
            );
            repo.insert_call_event(&event)
                .await
                .with_context(|| format!("failed to store call event {conversation_id}"))?;

            let evaluated = evaluate_and_store(&call, repo, evaluator).await;

            logfire::info!(
                "Call ended. Conversation {conversation_id}",
                conversation_id = conversation_id.clone()
            );

            Ok(EventOutcome::TranscriptionStored {
                conversation_id,
                evaluated,
            })
        }
        CallWebhook::Audio(audio) => {
            metric::incr_webhook_event_statds(consts::EVENT_TYPE_POST_CALL_AUDIO);
            logfire::info!(
                "Received audio for conversation {conversation_id}",
                conversation_id = audio.conversation_id.clone()
            );

            Ok(EventOutcome::AudioReceived {
                conversation_id: audio.conversation_id,
            })
        }
        CallWebhook::Unknown(event_type) => {
            metric::incr_webhook_event_statds("unknown");
            logfire::warn!(
                "Unknown event type: {event_type}",
                event_type = event_type.clone()
            );

            Ok(EventOutcome::Ignored { event_type })
        }
    }
}

/// Returns whether a verdict was obtained and stored
async fn evaluate_and_store(
    call: &PostCallTranscription,
    repo: &repo::ImplCallRepo,
    evaluator: &services::ImplTranscriptEvaluator,
) -> bool {
    let verdict = match evaluator.evaluate_transcript(call).await {
        Ok(verdict) => verdict,
        Err(e) => {
            logfire::error!(
                "Failed to evaluate transcript of {conversation_id}: {error}",
                conversation_id = call.conversation_id.clone(),
                error = format!("{e:#}")
            );
            return false;
        }
    };

    metric::incr_evaluation_decision_statds(&verdict.decision.to_string());
    let evaluation =
        models::evaluation::TranscriptEvaluation::new(&call.conversation_id, verdict, Utc::now());

    if let Err(e) = repo.upsert_transcript_evaluation(&evaluation).await {
        logfire::error!(
            "Failed to store evaluation of {conversation_id}: {error}",
            conversation_id = call.conversation_id.clone(),
            error = format!("{e:#}")
        );
        return false;
    }

    true
}
