//! Auth Router

use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokens;
use crate::domain::repository::UserRepository;
use crate::infra::postgres::PgUserRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthMiddlewareState, require_session};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgUserRepository, config: AuthConfig) -> Router {
    auth_router_generic(repo, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, config: AuthConfig) -> Router
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let tokens = Arc::new(SessionTokens::new(&config));
    let session_state = AuthMiddlewareState::from_tokens(tokens.clone());

    let state = AuthAppState {
        repo: Arc::new(repo),
        config: Arc::new(config),
        tokens,
    };

    let protected = Router::new()
        .route("/profile/{id}", get(handlers::profile::<R>))
        .route_layer(middleware::from_fn_with_state(session_state, require_session));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
