pub mod sqlite;
pub mod sqlite_queries;

use crate::models;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallRepo {
    async fn insert_call_event(&self, event: &models::call_event::CallEvent) -> anyhow::Result<i64>;

    /// Inserts the evaluation or replaces the one stored for the same conversation
    async fn upsert_transcript_evaluation(
        &self,
        evaluation: &models::evaluation::TranscriptEvaluation,
    ) -> anyhow::Result<()>;

    /// Newest calls first
    async fn get_call_summaries(&self) -> anyhow::Result<Vec<models::evaluation::CallSummary>>;
}

pub type ImplCallRepo = Box<dyn CallRepo>;
