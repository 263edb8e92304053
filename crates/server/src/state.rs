use std::sync::Arc;

use service::auth::AuthService;
use service::catalog::CatalogService;
use service::intake::IntakeService;

/// Shared handler state; every service is injected so tests can swap backends.
#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService>,
    pub catalog: Arc<CatalogService>,
    pub intake: Arc<IntakeService>,
}
