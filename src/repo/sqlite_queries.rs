pub const QUERY_INSERT_CALL_EVENT: &str = r#"
INSERT INTO call_events (
    event_type,agent_id,conversation_id,status,user_id,
    transcript,metadata,analysis,conversation_initiation_client_data,
    received_at
) VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9,$10);
"#;

pub const QUERY_UPSERT_TRANSCRIPT_EVALUATION: &str = r#"
INSERT INTO transcript_evaluations (
    conversation_id,decision,reason,attention_score,evaluated_at
) VALUES($1,$2,$3,$4,$5)
ON CONFLICT (conversation_id) DO UPDATE
    SET decision        = excluded.decision,
        reason          = excluded.reason,
        attention_score = excluded.attention_score,
        evaluated_at    = excluded.evaluated_at;
"#;

pub const QUERY_GET_CALL_SUMMARIES: &str = r#"
SELECT
    transcript,
    conversation_id,
    agent_id,
    received_at,
    analysis,
    decision,
    reason,
    score
FROM call_summary_view
ORDER BY received_at DESC;
"#;
