//! Register Use Case
//!
//! Creates a user account and signs the first session token.

use std::sync::Arc;

use crate::application::config::AuthConfig;
use crate::application::session_token::{IssuedToken, SessionTokens};
use crate::domain::entity::user::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{
    display_name::DisplayName,
    email::Email,
    user_password::{RawPassword, UserPassword},
    user_role::UserRole,
};
use crate::error::{AuthError, AuthResult};

/// Register input. Every field is required.
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: String,
}

pub struct RegisterOutput {
    pub user: User,
    pub token: IssuedToken,
}

pub struct RegisterUseCase<R>
where
    R: UserRepository,
{
    repo: Arc<R>,
    config: Arc<AuthConfig>,
    tokens: Arc<SessionTokens>,
}

impl<R> RegisterUseCase<R>
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

    pub async fn execute(&self, input: RegisterInput) -> AuthResult<RegisterOutput> {
        if [&input.name, &input.email, &input.password, &input.role]
            .iter()
            .any(|field| field.trim().is_empty())
        {
            return Err(AuthError::MissingFields("All fields are required"));
        }

        let name = DisplayName::new(input.name)?;
        let email = Email::new(input.email)?;
        let role = UserRole::new(input.role)?;

        if self.repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }

        let raw_password = RawPassword::new(input.password)?;
        let password = UserPassword::from_raw(&raw_password, self.config.pepper())?;

        let user = self
            .repo
            .create(&NewUser {
                name,
                email,
                password,
                role,
            })
            .await?;

        let token = self.tokens.issue(user.id, user.email.as_str())?;

        tracing::info!(
            user_id = %user.id,
            email = %user.email,
            role = %user.role,
            "User registered"
        );

        Ok(RegisterOutput { user, token })
    }
}
