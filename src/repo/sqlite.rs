use crate::{models, webhook::elevenlabs::schemas::TranscriptEntry};
use anyhow::Context;
use async_trait::async_trait;
use sqlx::{FromRow, Row, SqlitePool, sqlite::SqliteRow};

use super::{CallRepo, sqlite_queries};

#[derive(Clone)]
pub struct SqlxSqliteRepo {
    pub db_pool: SqlitePool,
}

/// Decodes a JSON text column, a NULL or unparsable value becomes `T::default()`
fn json_column<T>(row: &SqliteRow, column: &str) -> sqlx::Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    let Some(raw) = row.try_get::<Option<String>, &str>(column)? else {
        return Ok(T::default());
    };

    match serde_json::from_str(&raw) {
        Ok(value) => Ok(value),
        Err(e) => {
            logfire::warn!(
                "Stored {column} of call {conversation_id} is not valid JSON: {error}",
                column = column.to_string(),
                conversation_id = row
                    .try_get::<String, &str>("conversation_id")
                    .unwrap_or_default(),
                error = e.to_string()
            );
            Ok(T::default())
        }
    }
}

impl FromRow<'_, SqliteRow> for models::evaluation::CallSummary {
    fn from_row(row: &SqliteRow) -> sqlx::Result<Self> {
        let transcript: Vec<TranscriptEntry> = json_column(row, "transcript")?;

        Ok(Self {
            conversation_id: row.try_get("conversation_id")?,
            agent_id: row.try_get("agent_id")?,
            received_at: row.try_get("received_at")?,
            transcript: models::call_event::extract_dialogue(&transcript),
            analysis: json_column(row, "analysis")?,
            decision: row.try_get("decision")?,
            reason: row.try_get("reason")?,
            score: row.try_get("score")?,
        })
    }
}

#[async_trait]
impl CallRepo for SqlxSqliteRepo {
    async fn insert_call_event(&self, event: &models::call_event::CallEvent) -> anyhow::Result<i64> {
        let transcript =
            serde_json::to_string(&event.transcript).context("failed to serialize transcript")?;

        Ok(sqlx::query(sqlite_queries::QUERY_INSERT_CALL_EVENT)
            .bind(&event.event_type)
            .bind(&event.agent_id)
            .bind(&event.conversation_id)
            .bind(&event.status)
            .bind(&event.user_id)
            .bind(transcript)
            .bind(event.metadata.to_string())
            .bind(event.analysis.to_string())
            .bind(event.conversation_initiation_client_data.to_string())
            .bind(event.received_at)
            .execute(&self.db_pool)
            .await?
            .last_insert_rowid())
    }

    async fn upsert_transcript_evaluation(
        &self,
        evaluation: &models::evaluation::TranscriptEvaluation,
    ) -> anyhow::Result<()> {
        Ok(
            sqlx::query(sqlite_queries::QUERY_UPSERT_TRANSCRIPT_EVALUATION)
                .bind(&evaluation.conversation_id)
                .bind(evaluation.decision)
                .bind(&evaluation.reason)
                .bind(evaluation.attention_score)
                .bind(evaluation.evaluated_at)
                .execute(&self.db_pool)
                .await
                .map(|_| ())?,
        )
    }

    async fn get_call_summaries(&self) -> anyhow::Result<Vec<models::evaluation::CallSummary>> {
        Ok(
            sqlx::query_as::<_, models::evaluation::CallSummary>(
                sqlite_queries::QUERY_GET_CALL_SUMMARIES,
            )
            .fetch_all(&self.db_pool)
            .await?,
        )
    }
}
