//! Renders call transcripts into the text sent to the LLM.

use crate::{consts, webhook::elevenlabs::schemas::TranscriptEntry};

fn role_label(role: &str) -> String {
    match role.to_lowercase().as_str() {
        "agent" => "Agent".to_string(),
        "user" => "User".to_string(),
        other => {
            let mut chars = other.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        }
    }
}

fn variable_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// One block per turn: the message, the tools it used and the variables they
/// updated, followed by a blank line.
pub fn format_transcript(transcript: &[TranscriptEntry]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for entry in transcript {
        if let Some(message) = entry.message.as_deref().filter(|msg| !msg.is_empty()) {
            lines.push(format!("{}: {message}", role_label(&entry.role)));
        }

        let tools: Vec<&str> = entry
            .tool_calls
            .iter()
            .filter_map(|call| call.tool_name.as_deref())
            .filter(|name| !name.is_empty())
            .collect();
        if !tools.is_empty() {
            lines.push(format!("Tools used: {}", tools.join(", ")));
        }

        let variables: Vec<String> = entry
            .tool_results
            .iter()
            .flat_map(|result| &result.dynamic_variable_updates)
            .filter_map(|update| {
                let name = update.name.as_deref()?;
                let value = update.value.as_ref().filter(|value| !value.is_null())?;
                Some(format!("{name}={}", variable_value(value)))
            })
            .collect();
        if !variables.is_empty() {
            lines.push(format!("Variables: {}", variables.join(", ")));
        }

        lines.push(String::new());
    }

    lines.join("\n")
}

/// User turn of the evaluation request
pub fn evaluation_request(transcript: &[TranscriptEntry]) -> String {
    format!(
        "Transcript:\n---\n{transcript}\n---\n\n{instructions}",
        transcript = format_transcript(transcript),
        instructions = consts::EVALUATION_RESPONSE_INSTRUCTIONS.trim()
    )
}
