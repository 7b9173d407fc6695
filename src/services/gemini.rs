//! # Gemini Transcript Evaluator
//!
//! Sends call transcripts to the Gemini `generateContent` API and reads back a
//! structured JSON verdict.

use super::prompt;
use crate::{config, consts, models, webhook::elevenlabs::schemas};
use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub system_instruction: Content,
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Part {
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
    pub response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Content,
}

impl Content {
    fn text(role: Option<&str>, text: String) -> Self {
        Self {
            role: role.map(str::to_string),
            parts: vec![Part { text }],
        }
    }
}

/// JSON schema Gemini must follow, mirrors [`models::evaluation::Verdict`]
fn verdict_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "OBJECT",
        "properties": {
            "decision": {"type": "STRING", "enum": ["TRUE", "FALSE"]},
            "reason": {"type": "STRING"},
            "attention_score": {"type": "INTEGER"}
        },
        "required": ["decision", "reason", "attention_score"]
    })
}

pub fn build_request(call: &schemas::PostCallTranscription) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Content::text(None, consts::EVALUATION_SYSTEM_PROMPT.trim().to_string()),
        contents: vec![Content::text(
            Some("user"),
            prompt::evaluation_request(&call.transcript),
        )],
        generation_config: GenerationConfig {
            temperature: consts::GEMINI_TEMPERATURE,
            max_output_tokens: consts::GEMINI_MAX_OUTPUT_TOKENS,
            response_mime_type: "application/json".to_string(),
            response_schema: verdict_schema(),
        },
    }
}

/// Extracts and validates the verdict from the first candidate
pub fn verdict_from_response(
    response: GenerateContentResponse,
) -> Result<models::evaluation::Verdict> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .context("Gemini response has no candidates")?
        .content
        .parts
        .into_iter()
        .map(|part| part.text)
        .collect();

    let verdict: models::evaluation::Verdict = serde_json::from_str(text.trim())
        .with_context(|| format!("Gemini returned an invalid verdict: {text}"))?;

    anyhow::ensure!(
        (0..=consts::MAX_ATTENTION_SCORE).contains(&verdict.attention_score),
        "attention_score {} outside of 0..={}",
        verdict.attention_score,
        consts::MAX_ATTENTION_SCORE
    );

    Ok(verdict)
}

/// Gemini API client evaluating call transcripts
#[derive(Clone)]
pub struct GeminiEvaluator {
    /// HTTP client for making API requests
    client: reqwest::Client,
    /// `generateContent` endpoint of the configured model
    endpoint: String,
    /// 🔒 SENSITIVE: API key
    api_key: String,
}

impl GeminiEvaluator {
    pub fn new(app_config: &config::AppConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: app_config.gemini_generate_content_endpoint(),
            api_key: app_config.google_api_key.clone(),
        }
    }
}

#[async_trait]
impl super::TranscriptEvaluator for GeminiEvaluator {
    async fn evaluate_transcript(
        &self,
        call: &schemas::PostCallTranscription,
    ) -> Result<models::evaluation::Verdict> {
        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", &self.api_key)
            .json(&build_request(call))
            .send()
            .await
            .context("Failed to send request to Gemini API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read response body".to_string());

            anyhow::bail!("Gemini API returned error status {}: {}", status, body);
        }

        let gemini_response: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini API response")?;

        verdict_from_response(gemini_response)
    }
}
