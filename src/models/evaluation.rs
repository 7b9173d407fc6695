use chrono::{DateTime, Utc};
use derive_more::Display;
use serde::{Deserialize, Serialize};

use super::call_event::DialogueTurn;

/// Whether blocking the account during the call was justified
#[derive(Debug, Display, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "varchar")]
pub enum Decision {
    #[display("TRUE")]
    #[serde(rename = "TRUE")]
    #[sqlx(rename = "TRUE")]
    Justified,
    #[display("FALSE")]
    #[serde(rename = "FALSE")]
    #[sqlx(rename = "FALSE")]
    NotJustified,
}

/// Structured answer returned by the LLM
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Verdict {
    pub decision: Decision,
    pub reason: String,
    pub attention_score: i64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TranscriptEvaluation {
    pub conversation_id: String,
    pub decision: Decision,
    pub reason: String,
    pub attention_score: i64,
    pub evaluated_at: DateTime<Utc>,
}

impl TranscriptEvaluation {
    pub fn new(conversation_id: &str, verdict: Verdict, evaluated_at: DateTime<Utc>) -> Self {
        Self {
            conversation_id: conversation_id.to_string(),
            decision: verdict.decision,
            reason: verdict.reason,
            attention_score: verdict.attention_score,
            evaluated_at,
        }
    }
}

/// A stored call joined with its evaluation, if any
#[derive(Debug, Clone, Serialize)]
pub struct CallSummary {
    pub conversation_id: String,
    pub agent_id: Option<String>,
    pub received_at: DateTime<Utc>,
    pub transcript: Vec<DialogueTurn>,
    pub analysis: serde_json::Value,
    pub decision: Option<Decision>,
    pub reason: Option<String>,
    pub score: Option<i64>,
}
