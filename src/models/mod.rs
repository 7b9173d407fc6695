pub mod call_event;
pub mod evaluation;
