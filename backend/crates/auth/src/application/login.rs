//! Login Use Case
//!
//! Checks email and password and signs a session token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::{IssuedToken, SessionTokens};
use crate::domain::entity::user::User;
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{email::Email, user_password::RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct LoginInput {
    pub email: String,
    pub password: String,
}

pub struct LoginOutput {
    pub user: User,
    pub token: IssuedToken,
}

pub struct LoginUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<SessionTokens>,
}

impl<R> LoginUseCase<R>
where
    R: UserRepository,
{
    pub fn new(repo: Arc<R>, config: Arc<AuthConfig>, tokens: Arc<SessionTokens>) -> Self {
        Self {
            repo,
            config,
            tokens,
        }
    }

    pub async fn execute(&self, input: LoginInput) -> AuthResult<LoginOutput> {
        if input.email.trim().is_empty() || input.password.is_empty() {
            return Err(AuthError::MissingFields("Email and password are required"));
        }

        // A malformed address cannot belong to anyone; answer like a wrong password.
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;
        let raw_password = RawPassword::for_login(input.password);

        let user = self
            .repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !user.password.verify(&raw_password, self.config.pepper()) {
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, user.email.as_str())?;

        tracing::info!(user_id = %user.id, "User logged in");

        Ok(LoginOutput { user, token })
    }
}
