//! # Call Audit
//!
//! Receives post-call webhooks from the voice platform, authenticates them,
//! stores the calls and runs an LLM compliance check on their transcripts.

pub mod api;
pub mod config;
pub mod consts;
pub mod errors;
pub mod metric;
pub mod models;
pub mod repo;
pub mod services;
pub mod state;
pub mod utils;
pub mod webhook;
