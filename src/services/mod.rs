pub mod gemini;
pub mod prompt;

use crate::{models, webhook::elevenlabs::schemas};
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TranscriptEvaluator {
    /// Asks the LLM whether the account block applied during the call was justified
    async fn evaluate_transcript(
        &self,
        call: &schemas::PostCallTranscription,
    ) -> anyhow::Result<models::evaluation::Verdict>;
}

pub type ImplTranscriptEvaluator = Box<dyn TranscriptEvaluator>;
