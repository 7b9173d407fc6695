use crate::{repo, services, webhook::elevenlabs::security::WebhookAuthenticator};

/// Services shared by the handlers of one ntex worker
pub struct AppState {
    pub authenticator: WebhookAuthenticator,
    pub repo: repo::ImplCallRepo,
    pub evaluator: services::ImplTranscriptEvaluator,
}
