use opentelemetry::{KeyValue, metrics::UpDownCounter};
use std::sync::LazyLock;

static STATDS: LazyLock<UpDownCounter<i64>> = LazyLock::new(|| {
    logfire::i64_up_down_counter("call_audit_statds")
        .with_description("Call audit webhook statistics")
        .with_unit("event")
        .build()
});

fn incr_statds(metric: String, value: String) {
    STATDS.add(1, &[KeyValue::new(metric, value)]);
}

pub fn incr_webhook_verification_statds(result: &str) {
    incr_statds("webhook_verification".to_string(), result.into())
}

pub fn incr_webhook_event_statds(event_type: &str) {
    incr_statds("webhook_event".to_string(), event_type.into())
}

pub fn incr_evaluation_decision_statds(decision: &str) {
    incr_statds("evaluation_decision".to_string(), decision.into())
}
