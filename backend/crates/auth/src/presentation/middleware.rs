//! Auth Middleware
//!
//! Requires a valid bearer session token on protected routes.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokens;
use crate::error::AuthError;

/// Middleware state
#[derive(Clone)]
pub struct AuthMiddlewareState {
    pub tokens: Arc<SessionTokens>,
}

impl AuthMiddlewareState {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            tokens: Arc::new(SessionTokens::new(config)),
        }
    }

    pub fn from_tokens(tokens: Arc<SessionTokens>) -> Self {
        Self { tokens }
    }
}

/// Middleware that requires a valid session token.
///
/// On success the verified [`kernel::session::CurrentUser`] is stored in the
/// request extensions for handlers to extract.
pub async fn require_session(
    State(state): State<AuthMiddlewareState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = platform::bearer::extract_bearer_token(req.headers())?;
    let current_user = state.tokens.verify(token)?;

    tracing::debug!(user_id = %current_user.user_id, "Session verified");
    req.extensions_mut().insert(current_user);

    Ok(next.run(req).await)
}
