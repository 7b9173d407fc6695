//! # ElevenLabs Webhook Schemas
//!
//! Data structures for the post-call webhook payloads. Only the fields this
//! service reads are typed, the rest of each call is kept as opaque JSON.

use crate::consts;
use serde::{Deserialize, Serialize};

/// Root webhook payload
#[derive(Debug, Deserialize, Serialize)]
pub struct WebhookEvent {
    /// The event type, e.g. "post_call_transcription" or "post_call_audio"
    #[serde(rename = "type", alias = "event_type")]
    pub event_type: String,
    /// Unix seconds at which the platform emitted the event
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub event_timestamp: Option<i64>,
    /// Event data, its shape depends on `event_type`
    #[serde(default)]
    pub data: serde_json::Value,
}

/// An event with its data parsed according to its type
#[derive(Debug)]
pub enum CallWebhook {
    Transcription(PostCallTranscription),
    Audio(PostCallAudio),
    Unknown(String),
}

impl TryFrom<WebhookEvent> for CallWebhook {
    type Error = serde_json::Error;

    fn try_from(event: WebhookEvent) -> Result<Self, Self::Error> {
        if event.event_type == consts::EVENT_TYPE_POST_CALL_TRANSCRIPTION {
            return Ok(CallWebhook::Transcription(serde_json::from_value(event.data)?));
        }
        if event.event_type == consts::EVENT_TYPE_POST_CALL_AUDIO {
            return Ok(CallWebhook::Audio(serde_json::from_value(event.data)?));
        }

        Ok(CallWebhook::Unknown(event.event_type))
    }
}

/// Data of a `post_call_transcription` event
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostCallTranscription {
    #[serde(default)]
    pub agent_id: Option<String>,
    pub conversation_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub transcript: Vec<TranscriptEntry>,
    #[serde(default)]
    pub metadata: serde_json::Value,
    #[serde(default)]
    pub analysis: serde_json::Value,
    #[serde(default)]
    pub conversation_initiation_client_data: serde_json::Value,
}

/// Data of a `post_call_audio` event.
///
/// The base64 audio itself is not deserialized.
#[derive(Debug, Deserialize, Serialize)]
pub struct PostCallAudio {
    #[serde(default)]
    pub agent_id: Option<String>,
    pub conversation_id: String,
}

/// One turn of a call transcript
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TranscriptEntry {
    /// "agent" or "user"
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_calls: Vec<ToolCall>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tool_results: Vec<ToolResult>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ToolCall {
    #[serde(default)]
    pub tool_name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct ToolResult {
    #[serde(default, deserialize_with = "null_as_default")]
    pub dynamic_variable_updates: Vec<DynamicVariableUpdate>,
}

/// A conversation variable changed by a tool
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct DynamicVariableUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub value: Option<serde_json::Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
