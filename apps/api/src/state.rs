use acesso_application::SignInService;
use sqlx::PgPool;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub sign_in_service: SignInService,
    pub postgres_pool: PgPool,
}
