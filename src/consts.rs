use chrono::TimeDelta;

pub const SIGNATURE_HEADER_NAME: &str = "elevenlabs-signature";
pub const DEFAULT_WEBHOOK_MAX_SKEW: TimeDelta = TimeDelta::minutes(30);
/// Audio events carry the whole recording base64 encoded.
pub const MAX_WEBHOOK_PAYLOAD_BYTES: usize = 32 * 1024 * 1024;

pub const EVENT_TYPE_POST_CALL_TRANSCRIPTION: &str = "post_call_transcription";
pub const EVENT_TYPE_POST_CALL_AUDIO: &str = "post_call_audio";

pub const GEMINI_TEMPERATURE: f32 = 0.0;
pub const GEMINI_MAX_OUTPUT_TOKENS: u32 = 200;
pub const MAX_ATTENTION_SCORE: i64 = 100;

pub const EVALUATION_SYSTEM_PROMPT: &str = r#"
You are a quality-control system reviewing calls handled by a virtual banking agent.
Your only goal is to:
1. Review the transcript and check whether the agent correctly applied the block on the user's account.
2. You need no additional data: everything must be deduced from the conversation.
3. Your decision must be based exclusively on whether the block was justified or not.
"#;

pub const EVALUATION_RESPONSE_INSTRUCTIONS: &str = r#"
Return **only** a JSON object with these fields:
- decision: "TRUE" if blocking the account was justified, or "FALSE" if it was not.
- reason: a short explanation of the decision.
- attention_score: integer from 0 to 100 rating the overall quality of the agent's service.
"#;
