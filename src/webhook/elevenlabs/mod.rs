//! ElevenLabs webhook integration module
//!
//! ## Submodules
//!
//! - [`security`] - Signature verification and replay protection
//! - [`routes`] - HTTP endpoint handlers for the post-call webhooks
//! - [`handler`] - Business logic run on authenticated events
//! - [`schemas`] - Data structures for the webhook payloads

pub mod handler;
pub mod routes;
pub mod schemas;
pub mod security;

// Re-export commonly used items for convenience
pub use routes::receive;
