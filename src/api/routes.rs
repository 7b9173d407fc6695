use ntex::web;

/// Configures the call listing routes.
///
/// # Routes
/// - `GET /calls` - Stored calls with their evaluation, newest first
pub fn calls(cfg: &mut web::ServiceConfig) {
    cfg.service(super::calls::list_calls);
}
