use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::webhook::elevenlabs::schemas::{PostCallTranscription, TranscriptEntry};

/// A received call event as it is persisted
#[derive(Debug, Clone, Serialize)]
pub struct CallEvent {
    pub event_type: String,
    pub agent_id: Option<String>,
    pub conversation_id: String,
    pub status: Option<String>,
    pub user_id: Option<String>,
    pub transcript: Vec<TranscriptEntry>,
    pub metadata: serde_json::Value,
    pub analysis: serde_json::Value,
    pub conversation_initiation_client_data: serde_json::Value,
    pub received_at: DateTime<Utc>,
}

impl CallEvent {
    pub fn from_transcription(
        event_type: &str,
        data: PostCallTranscription,
        received_at: DateTime<Utc>,
    ) -> Self {
        Self {
            event_type: event_type.to_string(),
            agent_id: data.agent_id,
            conversation_id: data.conversation_id,
            status: data.status,
            user_id: data.user_id,
            transcript: data.transcript,
            metadata: data.metadata,
            analysis: data.analysis,
            conversation_initiation_client_data: data.conversation_initiation_client_data,
            received_at,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct DialogueTurn {
    pub role: String,
    pub message: String,
}

/// Keeps only agent and user turns that carry a message, in call order
pub fn extract_dialogue(transcript: &[TranscriptEntry]) -> Vec<DialogueTurn> {
    transcript
        .iter()
        .filter_map(|entry| {
            let role = entry.role.to_lowercase();
            let message = entry.message.as_deref().filter(|msg| !msg.is_empty())?;

            matches!(role.as_str(), "agent" | "user").then(|| DialogueTurn {
                role,
                message: message.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(role: &str, message: Option<&str>) -> TranscriptEntry {
        TranscriptEntry {
            role: role.to_string(),
            message: message.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_dialogue_keeps_agent_and_user_messages() {
        let transcript = vec![
            entry("agent", Some("Hello, how can I help?")),
            entry("tool", Some("block_account ok")),
            entry("USER", Some("Block my card")),
            entry("user", None),
            entry("agent", Some("")),
        ];

        assert_eq!(
            extract_dialogue(&transcript),
            vec![
                DialogueTurn {
                    role: "agent".into(),
                    message: "Hello, how can I help?".into()
                },
                DialogueTurn {
                    role: "user".into(),
                    message: "Block my card".into()
                },
            ]
        );
    }

    #[test]
    fn test_from_transcription() {
        let data: PostCallTranscription = serde_json::from_value(serde_json::json!({
            "agent_id": "agent-1",
            "conversation_id": "conv-1",
            "status": "done",
            "transcript": [{"role": "agent", "message": "Hi"}]
        }))
        .unwrap();
        let now = Utc::now();

        let event = CallEvent::from_transcription("post_call_transcription", data, now);

        assert_eq!(event.event_type, "post_call_transcription");
        assert_eq!(event.conversation_id, "conv-1");
        assert_eq!(event.transcript.len(), 1);
        assert_eq!(event.received_at, now);
    }
}
