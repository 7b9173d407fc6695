use ntex::web;

/// Configures webhook routes for the voice platform.
///
/// These routes are public endpoints: requests authenticate themselves with
/// a signature header instead of a session.
///
/// # Routes
/// - `POST /post_call_webhook` - ElevenLabs post-call webhook receiver
pub fn elevenlabs(cfg: &mut web::ServiceConfig) {
    cfg.service(super::elevenlabs::receive);
}
