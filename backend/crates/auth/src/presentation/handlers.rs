//! HTTP Handlers

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use kernel::error::app_error::AppError;
use kernel::extract::AppJson;
use kernel::id::UserId;
use kernel::session::CurrentUser;
use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::SessionTokens;
use crate::application::{
    GetProfileUseCase, LoginInput, LoginUseCase, RegisterInput, RegisterUseCase,
};
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};
use crate::presentation::dto::{AuthResponse, LoginRequest, ProfileResponse, RegisterRequest};

/// Shared state for auth handlers
#[derive(Clone)]
pub struct AuthAppState<R>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub config: Arc<AuthConfig>,
    pub tokens: Arc<SessionTokens>,
}

// ============================================================================
// Register
// ============================================================================

/// POST /register
pub async fn register<R>(
    State(state): State<AuthAppState<R>>,
    AppJson(req): AppJson<RegisterRequest>,
) -> AuthResult<(StatusCode, Json<AuthResponse>)>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = RegisterUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(RegisterInput {
            name: req.name.unwrap_or_default(),
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
            role: req.role.unwrap_or_default(),
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User registered successfully",
            user: output.user.into(),
            token: output.token.token,
            expires_at: output.token.expires_at,
        }),
    ))
}

// ============================================================================
// Login
// ============================================================================

/// POST /login
pub async fn login<R>(
    State(state): State<AuthAppState<R>>,
    AppJson(req): AppJson<LoginRequest>,
) -> AuthResult<Json<AuthResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let use_case = LoginUseCase::new(
        state.repo.clone(),
        state.config.clone(),
        state.tokens.clone(),
    );

    let output = use_case
        .execute(LoginInput {
            email: req.email.unwrap_or_default(),
            password: req.password.unwrap_or_default(),
        })
        .await?;

    Ok(Json(AuthResponse {
        message: "Login successful",
        user: output.user.into(),
        token: output.token.token,
        expires_at: output.token.expires_at,
    }))
}

// ============================================================================
// Profile
// ============================================================================

/// GET /profile/{id}
pub async fn profile<R>(
    State(state): State<AuthAppState<R>>,
    caller: CurrentUser,
    Path(raw_id): Path<String>,
) -> AuthResult<Json<ProfileResponse>>
where
    R: UserRepository + Clone + Send + Sync + 'static,
{
    let user_id = UserId::parse(&raw_id)
        .ok_or_else(|| AuthError::App(AppError::bad_request("Invalid user ID")))?;

    let user = GetProfileUseCase::new(state.repo.clone())
        .execute(&caller, user_id)
        .await?;

    Ok(Json(ProfileResponse { user: user.into() }))
}
