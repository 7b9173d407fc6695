//! Webhook handlers for external integrations
//!
//! ## Modules
//!
//! - [`elevenlabs`] - ElevenLabs post-call webhook handlers

pub mod elevenlabs;
pub mod routes;
